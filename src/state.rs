use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::request::RequestSlot;

/// User-edited team ratings sent to the manual simulation endpoints.
/// Edits replace the whole profile (`with_*` constructors) so the composition
/// root always holds an immutable snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamProfile {
    pub name: String,
    pub off_rush: f64,
    pub off_pass: f64,
    pub def_rush: f64,
    pub def_pass: f64,
    pub st: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileField {
    Name,
    OffRush,
    OffPass,
    DefRush,
    DefPass,
    SpecialTeams,
}

pub const PROFILE_FIELDS: [ProfileField; 6] = [
    ProfileField::Name,
    ProfileField::OffRush,
    ProfileField::OffPass,
    ProfileField::DefRush,
    ProfileField::DefPass,
    ProfileField::SpecialTeams,
];

impl ProfileField {
    pub fn label(self) -> &'static str {
        match self {
            ProfileField::Name => "Name",
            ProfileField::OffRush => "Off Rush",
            ProfileField::OffPass => "Off Pass",
            ProfileField::DefRush => "Def Rush",
            ProfileField::DefPass => "Def Pass",
            ProfileField::SpecialTeams => "Special Teams",
        }
    }
}

impl TeamProfile {
    pub fn with_name(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }

    pub fn with_rating(&self, field: ProfileField, value: f64) -> Self {
        let mut next = self.clone();
        match field {
            ProfileField::Name => {}
            ProfileField::OffRush => next.off_rush = value,
            ProfileField::OffPass => next.off_pass = value,
            ProfileField::DefRush => next.def_rush = value,
            ProfileField::DefPass => next.def_pass = value,
            ProfileField::SpecialTeams => next.st = value,
        }
        next
    }

    pub fn rating(&self, field: ProfileField) -> Option<f64> {
        match field {
            ProfileField::Name => None,
            ProfileField::OffRush => Some(self.off_rush),
            ProfileField::OffPass => Some(self.off_pass),
            ProfileField::DefRush => Some(self.def_rush),
            ProfileField::DefPass => Some(self.def_pass),
            ProfileField::SpecialTeams => Some(self.st),
        }
    }

    pub fn field_display(&self, field: ProfileField) -> String {
        match field {
            ProfileField::Name => self.name.clone(),
            _ => format!("{}", self.rating(field).unwrap_or(0.0)),
        }
    }
}

/// Row returned by `GET /teams/search`; read-only on this side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamRecord {
    pub team_id: u32,
    pub name: String,
    #[serde(default)]
    pub conference: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SamplesDetail {
    #[serde(default)]
    pub home: Vec<f64>,
    #[serde(default)]
    pub away: Vec<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuantileRow {
    pub p05: Option<f64>,
    pub p50: Option<f64>,
    pub p95: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreQuantiles {
    #[serde(default)]
    pub home: QuantileRow,
    #[serde(default)]
    pub away: QuantileRow,
}

/// Response of the series endpoints. Only `home_win_pct` is required; the
/// rest degrades gracefully when an older backend omits it. `samples_detail`
/// is present only when the backend retained per-run scores.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeriesResult {
    #[serde(default)]
    pub samples: Option<u64>,
    pub home_win_pct: f64,
    #[serde(default)]
    pub away_win_pct: Option<f64>,
    #[serde(default)]
    pub ot_rate: Option<f64>,
    #[serde(default)]
    pub mean_score_home: Option<f64>,
    #[serde(default)]
    pub mean_score_away: Option<f64>,
    #[serde(default)]
    pub stdev_score_home: Option<f64>,
    #[serde(default)]
    pub stdev_score_away: Option<f64>,
    #[serde(default)]
    pub quantiles: Option<ScoreQuantiles>,
    #[serde(default)]
    pub home: Option<String>,
    #[serde(default)]
    pub away: Option<String>,
    #[serde(default)]
    pub samples_detail: Option<SamplesDetail>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Home,
    Away,
}

impl Side {
    pub fn label(self) -> &'static str {
        match self {
            Side::Home => "Home",
            Side::Away => "Away",
        }
    }
}

/// Whether a game/series action uses the manual profiles or the picked names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Manual,
    ByName,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminAction {
    IngestTeams,
    IngestGames,
    SeedRatings,
}

impl AdminAction {
    pub fn label(self) -> &'static str {
        match self {
            AdminAction::IngestTeams => "Ingest teams",
            AdminAction::IngestGames => "Ingest games",
            AdminAction::SeedRatings => "Seed ratings",
        }
    }

    pub fn done_message(self) -> &'static str {
        match self {
            AdminAction::IngestTeams => "Teams ingested",
            AdminAction::IngestGames => "Games ingested",
            AdminAction::SeedRatings => "Ratings seeded",
        }
    }
}

/// One team picker: free-text query, its own search slot, and the current
/// candidate selection. Home and away pickers never share state.
#[derive(Debug, Clone, Default)]
pub struct PickerState {
    pub query: String,
    pub slot: RequestSlot<Vec<TeamRecord>>,
    pub selected: usize,
    pub chosen: Option<String>,
    pub editing: bool,
}

impl PickerState {
    pub fn candidates(&self) -> &[TeamRecord] {
        self.slot.success().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn select_next(&mut self) {
        let total = self.candidates().len();
        if total == 0 {
            self.selected = 0;
            return;
        }
        self.selected = (self.selected + 1) % total;
    }

    pub fn select_prev(&mut self) {
        let total = self.candidates().len();
        if total == 0 {
            self.selected = 0;
            return;
        }
        if self.selected == 0 {
            self.selected = total - 1;
        } else {
            self.selected -= 1;
        }
    }

    pub fn choose_selected(&mut self) -> Option<String> {
        let name = self.candidates().get(self.selected).map(|t| t.name.clone());
        if let Some(name) = &name {
            self.chosen = Some(name.clone());
        }
        name
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    BaseUrl,
    HomePicker,
    AwayPicker,
    HomeRatings,
    AwayRatings,
    RunCount,
}

impl Focus {
    pub fn next(self) -> Self {
        match self {
            Focus::BaseUrl => Focus::HomePicker,
            Focus::HomePicker => Focus::AwayPicker,
            Focus::AwayPicker => Focus::HomeRatings,
            Focus::HomeRatings => Focus::AwayRatings,
            Focus::AwayRatings => Focus::RunCount,
            Focus::RunCount => Focus::BaseUrl,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Focus::BaseUrl => Focus::RunCount,
            Focus::HomePicker => Focus::BaseUrl,
            Focus::AwayPicker => Focus::HomePicker,
            Focus::HomeRatings => Focus::AwayPicker,
            Focus::AwayRatings => Focus::HomeRatings,
            Focus::RunCount => Focus::AwayRatings,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptAction {
    IngestGames,
    SeedRatings,
}

/// Modal input collector for the admin actions that need a season value.
/// This is the terminal rendition of a `confirmInput(prompt)` capability:
/// Enter submits the buffer, Esc cancels without dispatching anything.
#[derive(Debug, Clone)]
pub struct PromptState {
    pub title: &'static str,
    pub input: String,
    pub action: PromptAction,
}

impl PromptState {
    pub fn for_action(action: PromptAction) -> Self {
        let title = match action {
            PromptAction::IngestGames => "Season to ingest (e.g., 2024):",
            PromptAction::SeedRatings => "Season to seed ratings from (e.g., 2024):",
        };
        Self {
            title,
            input: String::new(),
            action,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub base_url: String,
    pub home: TeamProfile,
    pub away: TeamProfile,
    pub run_count: u32,
    pub home_picker: PickerState,
    pub away_picker: PickerState,
    pub game: RequestSlot<Value>,
    pub game_by_name: RequestSlot<Value>,
    pub series: RequestSlot<SeriesResult>,
    pub series_by_name: RequestSlot<SeriesResult>,
    pub ingest_teams: RequestSlot<()>,
    pub ingest_games: RequestSlot<()>,
    pub seed_ratings: RequestSlot<()>,
    pub cron: RequestSlot<Value>,
    pub logs: VecDeque<String>,
    pub focus: Focus,
    pub field_selected: usize,
    pub edit_buffer: Option<String>,
    pub prompt: Option<PromptState>,
    pub help_overlay: bool,
}

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_RUN_COUNT: u32 = 500;

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        let base_url =
            std::env::var("SIM_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self {
            base_url,
            home: TeamProfile {
                name: "Home U".to_string(),
                off_rush: 20.0,
                off_pass: 20.0,
                def_rush: 10.0,
                def_pass: 10.0,
                st: 0.0,
            },
            away: TeamProfile {
                name: "Away Tech".to_string(),
                off_rush: 10.0,
                off_pass: 10.0,
                def_rush: 20.0,
                def_pass: 20.0,
                st: 0.0,
            },
            run_count: DEFAULT_RUN_COUNT,
            home_picker: PickerState::default(),
            away_picker: PickerState::default(),
            game: RequestSlot::new(),
            game_by_name: RequestSlot::new(),
            series: RequestSlot::new(),
            series_by_name: RequestSlot::new(),
            ingest_teams: RequestSlot::new(),
            ingest_games: RequestSlot::new(),
            seed_ratings: RequestSlot::new(),
            cron: RequestSlot::new(),
            logs: VecDeque::with_capacity(200),
            focus: Focus::HomePicker,
            field_selected: 0,
            edit_buffer: None,
            prompt: None,
            help_overlay: false,
        }
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        const MAX_LOGS: usize = 200;
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }

    pub fn picker(&self, side: Side) -> &PickerState {
        match side {
            Side::Home => &self.home_picker,
            Side::Away => &self.away_picker,
        }
    }

    pub fn picker_mut(&mut self, side: Side) -> &mut PickerState {
        match side {
            Side::Home => &mut self.home_picker,
            Side::Away => &mut self.away_picker,
        }
    }

    pub fn game_slot_mut(&mut self, kind: ActionKind) -> &mut RequestSlot<Value> {
        match kind {
            ActionKind::Manual => &mut self.game,
            ActionKind::ByName => &mut self.game_by_name,
        }
    }

    pub fn series_slot_mut(&mut self, kind: ActionKind) -> &mut RequestSlot<SeriesResult> {
        match kind {
            ActionKind::Manual => &mut self.series,
            ActionKind::ByName => &mut self.series_by_name,
        }
    }

    pub fn admin_slot_mut(&mut self, action: AdminAction) -> &mut RequestSlot<()> {
        match action {
            AdminAction::IngestTeams => &mut self.ingest_teams,
            AdminAction::IngestGames => &mut self.ingest_games,
            AdminAction::SeedRatings => &mut self.seed_ratings,
        }
    }

    /// Both picked names, if the user has chosen them; validation input for
    /// the by-name actions.
    pub fn chosen_names(&self) -> Option<(String, String)> {
        match (&self.home_picker.chosen, &self.away_picker.chosen) {
            (Some(home), Some(away)) => Some((home.clone(), away.clone())),
            _ => None,
        }
    }
}

/// Settlement events sent back from the provider thread. Each echoes the
/// token of the request it answers; `apply_delta` drops it when the slot has
/// moved on to a newer request.
#[derive(Debug, Clone)]
pub enum Delta {
    SearchSettled {
        side: Side,
        token: u64,
        outcome: Result<Vec<TeamRecord>, String>,
    },
    GameSettled {
        kind: ActionKind,
        token: u64,
        outcome: Result<Value, String>,
    },
    SeriesSettled {
        kind: ActionKind,
        token: u64,
        outcome: Result<SeriesResult, String>,
    },
    AdminSettled {
        action: AdminAction,
        token: u64,
        outcome: Result<(), String>,
    },
    CronSettled {
        token: u64,
        outcome: Result<Value, String>,
    },
    Log(String),
}

/// Requests sent to the provider thread.
#[derive(Debug, Clone)]
pub enum ProviderCommand {
    SetBaseUrl(String),
    SearchTeams {
        side: Side,
        token: u64,
        query: String,
    },
    SimulateGame {
        token: u64,
        home: TeamProfile,
        away: TeamProfile,
    },
    SimulateByName {
        token: u64,
        home_name: String,
        away_name: String,
    },
    SimulateSeries {
        token: u64,
        home: TeamProfile,
        away: TeamProfile,
        n: u32,
    },
    SimulateSeriesByName {
        token: u64,
        home_name: String,
        away_name: String,
        n: u32,
    },
    IngestTeams {
        token: u64,
    },
    IngestGames {
        token: u64,
        season: String,
    },
    SeedRatings {
        token: u64,
        season: String,
        scale: f64,
    },
    CronNightly {
        token: u64,
    },
}

pub fn apply_delta(state: &mut AppState, delta: Delta) {
    match delta {
        Delta::SearchSettled {
            side,
            token,
            outcome,
        } => {
            let message = outcome.as_ref().err().cloned();
            let picker = state.picker_mut(side);
            if picker.slot.settle(token, outcome) {
                picker.selected = 0;
                if let Some(message) = message {
                    state.push_log(format!("[WARN] {} search failed: {message}", side.label()));
                }
            }
        }
        Delta::GameSettled {
            kind,
            token,
            outcome,
        } => {
            let failed = outcome.is_err();
            if state.game_slot_mut(kind).settle(token, outcome) && !failed {
                state.push_log("[INFO] Game simulated");
            }
        }
        Delta::SeriesSettled {
            kind,
            token,
            outcome,
        } => {
            let failed = outcome.is_err();
            if state.series_slot_mut(kind).settle(token, outcome) && !failed {
                state.push_log("[INFO] Series finished");
            }
        }
        Delta::AdminSettled {
            action,
            token,
            outcome,
        } => {
            let failed = outcome.is_err();
            if state.admin_slot_mut(action).settle(token, outcome) {
                if failed {
                    state.push_log(format!("[WARN] {} failed", action.label()));
                } else {
                    state.push_log(format!("[INFO] {}", action.done_message()));
                }
            }
        }
        Delta::CronSettled { token, outcome } => {
            let failed = outcome.is_err();
            if state.cron.settle(token, outcome) && !failed {
                state.push_log("[INFO] Cron hit");
            }
        }
        Delta::Log(message) => state.push_log(message),
    }
}
