use std::io;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Bar, BarChart, BarGroup, Block, Borders, Clear, Gauge, Paragraph, Wrap};
use serde_json::Value;

use cfb_sim_terminal::request::{RequestSlot, RequestState};
use cfb_sim_terminal::state::{
    AppState, Delta, Focus, PROFILE_FIELDS, PromptAction, PromptState, ProviderCommand,
    SeriesResult, Side, apply_delta,
};
use cfb_sim_terminal::{histogram, provider, series, state};

const SEED_RATINGS_SCALE: f64 = 10.0;
const PICK_BOTH_TEAMS: &str = "Pick both teams first.";

struct App {
    state: AppState,
    should_quit: bool,
    cmd_tx: mpsc::Sender<ProviderCommand>,
}

impl App {
    fn new(cmd_tx: mpsc::Sender<ProviderCommand>) -> Self {
        Self {
            state: AppState::new(),
            should_quit: false,
            cmd_tx,
        }
    }

    fn send(&mut self, cmd: ProviderCommand) {
        if self.cmd_tx.send(cmd).is_err() {
            self.state.push_log("[WARN] Provider unavailable");
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        if self.state.help_overlay {
            match key.code {
                KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q') => {
                    self.state.help_overlay = false;
                }
                _ => {}
            }
            return;
        }

        if self.state.prompt.is_some() {
            self.on_prompt_key(key);
            return;
        }

        if self.state.edit_buffer.is_some() {
            self.on_edit_key(key);
            return;
        }

        let picker_side = match self.state.focus {
            Focus::HomePicker if self.state.home_picker.editing => Some(Side::Home),
            Focus::AwayPicker if self.state.away_picker.editing => Some(Side::Away),
            _ => None,
        };
        if let Some(side) = picker_side {
            self.on_picker_key(side, key);
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.state.help_overlay = true,
            KeyCode::Tab => {
                self.state.focus = self.state.focus.next();
                self.state.field_selected = 0;
            }
            KeyCode::BackTab => {
                self.state.focus = self.state.focus.prev();
                self.state.field_selected = 0;
            }
            KeyCode::Enter => self.activate_focused(),
            KeyCode::Up | KeyCode::Char('k') => self.move_selection_up(),
            KeyCode::Down | KeyCode::Char('j') => self.move_selection_down(),
            KeyCode::Char('g') => self.simulate_game(),
            KeyCode::Char('b') => self.simulate_by_name(),
            KeyCode::Char('r') => self.run_series(),
            KeyCode::Char('R') => self.run_series_by_name(),
            KeyCode::Char('T') => self.ingest_teams(),
            KeyCode::Char('G') => {
                self.state.prompt = Some(PromptState::for_action(PromptAction::IngestGames));
            }
            KeyCode::Char('D') => {
                self.state.prompt = Some(PromptState::for_action(PromptAction::SeedRatings));
            }
            KeyCode::Char('C') => self.run_cron(),
            _ => {}
        }
    }

    fn on_prompt_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.state.prompt = None,
            KeyCode::Backspace => {
                if let Some(prompt) = self.state.prompt.as_mut() {
                    prompt.input.pop();
                }
            }
            KeyCode::Char(c) => {
                if let Some(prompt) = self.state.prompt.as_mut() {
                    prompt.input.push(c);
                }
            }
            KeyCode::Enter => {
                if let Some(prompt) = self.state.prompt.take() {
                    let season = prompt.input.trim().to_string();
                    if season.is_empty() {
                        return;
                    }
                    match prompt.action {
                        PromptAction::IngestGames => {
                            if self.state.ingest_games.is_loading() {
                                return;
                            }
                            let token = self.state.ingest_games.begin();
                            self.send(ProviderCommand::IngestGames { token, season });
                        }
                        PromptAction::SeedRatings => {
                            if self.state.seed_ratings.is_loading() {
                                return;
                            }
                            let token = self.state.seed_ratings.begin();
                            self.send(ProviderCommand::SeedRatings {
                                token,
                                season,
                                scale: SEED_RATINGS_SCALE,
                            });
                        }
                    }
                }
            }
            _ => {}
        }
    }

    fn on_edit_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.state.edit_buffer = None,
            KeyCode::Backspace => {
                if let Some(buffer) = self.state.edit_buffer.as_mut() {
                    buffer.pop();
                }
            }
            KeyCode::Char(c) => {
                if let Some(buffer) = self.state.edit_buffer.as_mut() {
                    buffer.push(c);
                }
            }
            KeyCode::Enter => {
                if let Some(buffer) = self.state.edit_buffer.take() {
                    self.commit_edit(buffer);
                }
            }
            _ => {}
        }
    }

    fn on_picker_key(&mut self, side: Side, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.state.picker_mut(side).editing = false,
            KeyCode::Up => self.state.picker_mut(side).select_prev(),
            KeyCode::Down => self.state.picker_mut(side).select_next(),
            KeyCode::Enter => {
                let picker = self.state.picker_mut(side);
                picker.editing = false;
                if let Some(name) = picker.choose_selected() {
                    self.state
                        .push_log(format!("[INFO] {} team: {name}", side.label()));
                }
            }
            KeyCode::Backspace => {
                self.state.picker_mut(side).query.pop();
                self.issue_search(side);
            }
            KeyCode::Char(c) => {
                self.state.picker_mut(side).query.push(c);
                self.issue_search(side);
            }
            _ => {}
        }
    }

    /// Every query change re-issues the search with a fresh token, so a
    /// slow response for an old query can never overwrite a newer list.
    fn issue_search(&mut self, side: Side) {
        let picker = self.state.picker_mut(side);
        let token = picker.slot.begin();
        let query = picker.query.clone();
        self.send(ProviderCommand::SearchTeams { side, token, query });
    }

    fn activate_focused(&mut self) {
        match self.state.focus {
            Focus::HomePicker => {
                self.state.home_picker.editing = true;
                self.issue_search(Side::Home);
            }
            Focus::AwayPicker => {
                self.state.away_picker.editing = true;
                self.issue_search(Side::Away);
            }
            Focus::BaseUrl => {
                self.state.edit_buffer = Some(self.state.base_url.clone());
            }
            Focus::RunCount => {
                self.state.edit_buffer = Some(self.state.run_count.to_string());
            }
            Focus::HomeRatings | Focus::AwayRatings => {
                let field = PROFILE_FIELDS[self.state.field_selected];
                let profile = if self.state.focus == Focus::HomeRatings {
                    &self.state.home
                } else {
                    &self.state.away
                };
                self.state.edit_buffer = Some(profile.field_display(field));
            }
        }
    }

    fn move_selection_up(&mut self) {
        match self.state.focus {
            Focus::HomeRatings | Focus::AwayRatings => {
                if self.state.field_selected == 0 {
                    self.state.field_selected = PROFILE_FIELDS.len() - 1;
                } else {
                    self.state.field_selected -= 1;
                }
            }
            Focus::HomePicker => self.state.home_picker.select_prev(),
            Focus::AwayPicker => self.state.away_picker.select_prev(),
            _ => {}
        }
    }

    fn move_selection_down(&mut self) {
        match self.state.focus {
            Focus::HomeRatings | Focus::AwayRatings => {
                self.state.field_selected = (self.state.field_selected + 1) % PROFILE_FIELDS.len();
            }
            Focus::HomePicker => self.state.home_picker.select_next(),
            Focus::AwayPicker => self.state.away_picker.select_next(),
            _ => {}
        }
    }

    fn commit_edit(&mut self, buffer: String) {
        match self.state.focus {
            Focus::BaseUrl => {
                let url = buffer.trim();
                if url.is_empty() {
                    self.state.push_log("[WARN] Base URL left unchanged");
                    return;
                }
                self.state.base_url = url.to_string();
                self.send(ProviderCommand::SetBaseUrl(url.to_string()));
            }
            Focus::RunCount => match buffer.trim().parse::<u32>() {
                Ok(n) if n > 0 => self.state.run_count = n,
                _ => self
                    .state
                    .push_log("[WARN] Run count must be a positive integer"),
            },
            Focus::HomeRatings | Focus::AwayRatings => {
                let field = PROFILE_FIELDS[self.state.field_selected];
                let home = self.state.focus == Focus::HomeRatings;
                let profile = if home {
                    &self.state.home
                } else {
                    &self.state.away
                };
                // Profiles are replaced wholesale so a half-applied edit can
                // never ride along with a simulation request.
                let next = match field {
                    state::ProfileField::Name => Some(profile.with_name(buffer.trim())),
                    _ => buffer
                        .trim()
                        .parse::<f64>()
                        .ok()
                        .map(|v| profile.with_rating(field, v)),
                };
                match next {
                    Some(next) => {
                        if home {
                            self.state.home = next;
                        } else {
                            self.state.away = next;
                        }
                    }
                    None => self.state.push_log("[WARN] Rating must be a number"),
                }
            }
            Focus::HomePicker | Focus::AwayPicker => {}
        }
    }

    fn simulate_game(&mut self) {
        if self.state.game.is_loading() {
            return;
        }
        let token = self.state.game.begin();
        self.send(ProviderCommand::SimulateGame {
            token,
            home: self.state.home.clone(),
            away: self.state.away.clone(),
        });
    }

    fn simulate_by_name(&mut self) {
        if self.state.game_by_name.is_loading() {
            return;
        }
        let Some((home_name, away_name)) = self.state.chosen_names() else {
            self.state.game_by_name.fail(PICK_BOTH_TEAMS);
            return;
        };
        let token = self.state.game_by_name.begin();
        self.send(ProviderCommand::SimulateByName {
            token,
            home_name,
            away_name,
        });
    }

    fn run_series(&mut self) {
        if self.state.series.is_loading() {
            return;
        }
        let token = self.state.series.begin();
        self.send(ProviderCommand::SimulateSeries {
            token,
            home: self.state.home.clone(),
            away: self.state.away.clone(),
            n: self.state.run_count,
        });
    }

    fn run_series_by_name(&mut self) {
        if self.state.series_by_name.is_loading() {
            return;
        }
        let Some((home_name, away_name)) = self.state.chosen_names() else {
            self.state.series_by_name.fail(PICK_BOTH_TEAMS);
            return;
        };
        let token = self.state.series_by_name.begin();
        self.send(ProviderCommand::SimulateSeriesByName {
            token,
            home_name,
            away_name,
            n: self.state.run_count,
        });
    }

    fn ingest_teams(&mut self) {
        if self.state.ingest_teams.is_loading() {
            return;
        }
        let token = self.state.ingest_teams.begin();
        self.send(ProviderCommand::IngestTeams { token });
    }

    fn run_cron(&mut self) {
        if self.state.cron.is_loading() {
            return;
        }
        let token = self.state.cron.begin();
        self.send(ProviderCommand::CronNightly { token });
    }
}

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("failed to enter alternate screen")?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend).context("failed to build terminal")?;

    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();

    let mut app = App::new(cmd_tx);
    provider::spawn_provider(tx, cmd_rx, app.state.base_url.clone());

    let res = run_app(&mut terminal, &mut app, rx);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<Delta>,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        while let Ok(delta) = rx.try_recv() {
            apply_delta(&mut app.state, delta);
        }

        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            app.on_key(key);
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(1),
            Constraint::Length(6),
            Constraint::Length(1),
        ])
        .split(frame.size());

    render_header(frame, chunks[0], &app.state);
    render_body(frame, chunks[1], &app.state);
    render_console(frame, chunks[2], &app.state);
    render_footer(frame, chunks[3]);

    if let Some(prompt) = &app.state.prompt {
        render_prompt_overlay(frame, frame.size(), prompt);
    }
    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn render_header(frame: &mut Frame, area: Rect, state: &AppState) {
    let editing_url = state.focus == Focus::BaseUrl && state.edit_buffer.is_some();
    let url = if editing_url {
        format!("{}_", state.edit_buffer.clone().unwrap_or_default())
    } else {
        state.base_url.clone()
    };
    let marker = if state.focus == Focus::BaseUrl { ">" } else { " " };
    let header = Paragraph::new(format!("CFB DRIVE SIM TERMINAL\n{marker}API: {url}"))
        .block(Block::default().borders(Borders::NONE));
    frame.render_widget(header, area);
}

fn render_body(frame: &mut Frame, area: Rect, state: &AppState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(30),
            Constraint::Length(30),
            Constraint::Min(40),
        ])
        .split(area);

    render_pickers_column(frame, columns[0], state);
    render_forms_column(frame, columns[1], state);
    render_results_column(frame, columns[2], state);
}

fn render_pickers_column(frame: &mut Frame, area: Rect, state: &AppState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(35),
            Constraint::Percentage(35),
            Constraint::Min(6),
        ])
        .split(area);

    render_picker(frame, rows[0], state, Side::Home);
    render_picker(frame, rows[1], state, Side::Away);
    render_admin_panel(frame, rows[2], state);
}

fn render_picker(frame: &mut Frame, area: Rect, state: &AppState, side: Side) {
    let picker = state.picker(side);
    let focused = matches!(
        (state.focus, side),
        (Focus::HomePicker, Side::Home) | (Focus::AwayPicker, Side::Away)
    );

    let block = Block::default()
        .title(format!("{} Team", side.label()))
        .borders(Borders::ALL)
        .border_style(focus_style(focused));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.height == 0 {
        return;
    }

    let mut lines = Vec::new();
    let cursor = if picker.editing { "_" } else { "" };
    lines.push(format!("Search: {}{cursor}", picker.query));
    lines.push(format!(
        "Chosen: {}",
        picker.chosen.as_deref().unwrap_or("-- choose --")
    ));

    match picker.slot.state() {
        RequestState::Loading => lines.push("Searching…".to_string()),
        RequestState::Error(message) => lines.push(format!("! {message}")),
        _ => {
            let visible = inner.height.saturating_sub(2) as usize;
            let candidates = picker.candidates();
            let start = picker.selected.saturating_sub(visible.saturating_sub(1));
            for (idx, team) in candidates.iter().enumerate().skip(start).take(visible) {
                let mark = if idx == picker.selected { "> " } else { "  " };
                lines.push(format!("{mark}{}", team.name));
            }
        }
    }

    frame.render_widget(Paragraph::new(lines.join("\n")), inner);
}

fn render_admin_panel(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default().title("Automation").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.height == 0 {
        return;
    }

    let mut lines = vec![
        format!("T Ingest teams  {}", slot_status_label(&state.ingest_teams)),
        format!("G Ingest games  {}", slot_status_label(&state.ingest_games)),
        format!("D Seed ratings  {}", slot_status_label(&state.seed_ratings)),
        format!("C Nightly cron  {}", slot_status_label(&state.cron)),
    ];
    if let Some(payload) = state.cron.success() {
        lines.push(compact_json(payload, inner.width as usize));
    }

    frame.render_widget(
        Paragraph::new(lines.join("\n")).wrap(Wrap { trim: false }),
        inner,
    );
}

fn slot_status_label<T>(slot: &RequestSlot<T>) -> String {
    match slot.state() {
        RequestState::Idle => "-".to_string(),
        RequestState::Loading => "…".to_string(),
        RequestState::Success(_) => "ok".to_string(),
        RequestState::Error(message) => format!("! {message}"),
    }
}

fn render_forms_column(frame: &mut Frame, area: Rect, state: &AppState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(8),
            Constraint::Length(8),
            Constraint::Min(3),
        ])
        .split(area);

    render_profile_form(frame, rows[0], state, Side::Home);
    render_profile_form(frame, rows[1], state, Side::Away);
    render_run_panel(frame, rows[2], state);
}

fn render_profile_form(frame: &mut Frame, area: Rect, state: &AppState, side: Side) {
    let focused = matches!(
        (state.focus, side),
        (Focus::HomeRatings, Side::Home) | (Focus::AwayRatings, Side::Away)
    );
    let profile = match side {
        Side::Home => &state.home,
        Side::Away => &state.away,
    };

    let block = Block::default()
        .title(format!("{} Ratings", side.label()))
        .borders(Borders::ALL)
        .border_style(focus_style(focused));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines = Vec::new();
    for (idx, field) in PROFILE_FIELDS.iter().enumerate() {
        let selected = focused && idx == state.field_selected;
        let mark = if selected { "> " } else { "  " };
        let value = if selected && state.edit_buffer.is_some() {
            format!("{}_", state.edit_buffer.clone().unwrap_or_default())
        } else {
            profile.field_display(*field)
        };
        lines.push(format!("{mark}{:<10}{value}", field.label()));
    }

    frame.render_widget(Paragraph::new(lines.join("\n")), inner);
}

fn render_run_panel(frame: &mut Frame, area: Rect, state: &AppState) {
    let focused = state.focus == Focus::RunCount;
    let block = Block::default()
        .title("Series Runs")
        .borders(Borders::ALL)
        .border_style(focus_style(focused));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let value = if focused && state.edit_buffer.is_some() {
        format!("{}_", state.edit_buffer.clone().unwrap_or_default())
    } else {
        state.run_count.to_string()
    };
    frame.render_widget(Paragraph::new(format!("n = {value}")), inner);
}

fn render_results_column(frame: &mut Frame, area: Rect, state: &AppState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(9),
            Constraint::Percentage(45),
            Constraint::Min(10),
        ])
        .split(area);

    let game_cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[0]);

    render_game_pane(frame, game_cols[0], "Game [g]", &state.game);
    render_game_pane(frame, game_cols[1], "Game by Name [b]", &state.game_by_name);
    render_series_pane(frame, rows[1], "Series [r]", &state.series);
    render_series_pane(frame, rows[2], "Series by Name [R]", &state.series_by_name);
}

fn render_game_pane(frame: &mut Frame, area: Rect, title: &str, slot: &RequestSlot<Value>) {
    let block = Block::default().title(title).borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.height == 0 {
        return;
    }

    let (text, style) = match slot.state() {
        RequestState::Idle => ("No result yet".to_string(), dim()),
        RequestState::Loading => ("Simulating…".to_string(), dim()),
        RequestState::Error(message) => (message.clone(), error_style()),
        RequestState::Success(payload) => (
            serde_json::to_string_pretty(payload).unwrap_or_else(|_| payload.to_string()),
            Style::default(),
        ),
    };
    frame.render_widget(
        Paragraph::new(text).style(style).wrap(Wrap { trim: false }),
        inner,
    );
}

fn render_series_pane(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    slot: &RequestSlot<SeriesResult>,
) {
    let block = Block::default().title(title).borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.height == 0 {
        return;
    }

    match slot.state() {
        RequestState::Idle => {
            frame.render_widget(Paragraph::new("No series yet").style(dim()), inner);
        }
        RequestState::Loading => {
            frame.render_widget(Paragraph::new("Running…").style(dim()), inner);
        }
        RequestState::Error(message) => {
            frame.render_widget(
                Paragraph::new(message.as_str())
                    .style(error_style())
                    .wrap(Wrap { trim: false }),
                inner,
            );
        }
        RequestState::Success(result) => render_series_result(frame, inner, result),
    }
}

fn render_series_result(frame: &mut Frame, area: Rect, result: &SeriesResult) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(3),
        ])
        .split(area);

    frame.render_widget(
        Paragraph::new(series::summary_lines(result).join("\n")),
        rows[0],
    );

    let Some(summary) = series::summarize(result) else {
        let note = Paragraph::new("No chart data (backend returned no samples)").style(dim());
        frame.render_widget(note, rows[1]);
        return;
    };

    render_win_gauge(frame, rows[1], summary.win_probability);

    let chart_area = if summary.length_mismatch {
        // Data-quality warning; the zero-filled margins still chart below it.
        let split = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(2)])
            .split(rows[2]);
        frame.render_widget(
            Paragraph::new("home/away sample lengths differ").style(error_style()),
            split[0],
        );
        split[1]
    } else {
        rows[2]
    };
    render_margin_histogram(frame, chart_area, &summary.margin_samples);
}

fn render_win_gauge(frame: &mut Frame, area: Rect, win_probability: f64) {
    let pct = series::win_pct_display(win_probability);
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::Green).bg(Color::DarkGray))
        .ratio(win_probability.clamp(0.0, 1.0))
        .label(format!("Home win {pct}%"));
    frame.render_widget(gauge, area);
}

fn render_margin_histogram(frame: &mut Frame, area: Rect, margins: &[f64]) {
    if margins.is_empty() || area.height < 2 {
        return;
    }
    let bins = histogram::bin(margins, histogram::DEFAULT_BIN_COUNT);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(area);

    let bars: Vec<Bar> = bins
        .iter()
        .map(|b| {
            Bar::default()
                .value(b.count)
                .text_value(String::new())
                .style(Style::default().fg(Color::Green))
        })
        .collect();
    let chart = BarChart::default()
        .data(BarGroup::default().bars(&bars))
        .bar_width(2)
        .bar_gap(1);
    frame.render_widget(chart, rows[0]);

    let min_label = format!("{:.1}", bins[0].lower);
    let max_label = format!("{:.1}", bins[bins.len() - 1].upper);
    let prefix = "Margin (Home - Away)  ";
    let width = rows[1].width as usize;
    let pad = width.saturating_sub(prefix.len() + min_label.len() + max_label.len());
    frame.render_widget(
        Paragraph::new(format!(
            "{prefix}{min_label}{}{max_label}",
            " ".repeat(pad)
        ))
        .style(dim()),
        rows[1],
    );
}

fn render_console(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default().title("Console").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.height == 0 {
        return;
    }

    let text = if state.logs.is_empty() {
        "No messages yet".to_string()
    } else {
        let take = inner.height as usize;
        let mut recent: Vec<String> = state.logs.iter().rev().take(take).cloned().collect();
        recent.reverse();
        recent.join("\n")
    };
    frame.render_widget(Paragraph::new(text), inner);
}

fn render_footer(frame: &mut Frame, area: Rect) {
    let footer = Paragraph::new(
        "Tab Focus | Enter Edit/Pick | g Game | b By Name | r Series | R Series by Name | T/G/D/C Admin | ? Help | q Quit",
    )
    .style(dim());
    frame.render_widget(footer, area);
}

fn render_prompt_overlay(frame: &mut Frame, area: Rect, prompt: &PromptState) {
    let popup_area = centered_rect(50, 20, area);
    frame.render_widget(Clear, popup_area);

    let body = Paragraph::new(format!("{}\n> {}_", prompt.title, prompt.input))
        .block(Block::default().title("Input").borders(Borders::ALL));
    frame.render_widget(body, popup_area);
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "Global:",
        "  Tab / Shift-Tab   cycle focus",
        "  Enter             edit focused field / open picker",
        "  j/k or Up/Down    move selection",
        "  g                 simulate one game (manual ratings)",
        "  b                 simulate one game by picked names",
        "  r                 run a series (manual ratings)",
        "  R                 run a series by picked names",
        "  T                 ingest teams",
        "  G                 ingest games (asks for a season)",
        "  D                 seed ratings (asks for a season)",
        "  C                 run the nightly cron",
        "  ?                 toggle this help",
        "  q                 quit",
        "",
        "Picker:",
        "  type to search, Enter picks the highlighted team, Esc closes",
    ]
    .join("\n");

    let help = Paragraph::new(text).block(Block::default().title("Help").borders(Borders::ALL));
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}

fn compact_json(payload: &Value, max_len: usize) -> String {
    let text = payload.to_string();
    let limit = max_len.max(1) * 2;
    if text.chars().count() <= limit {
        return text;
    }
    let mut clipped: String = text.chars().take(limit).collect();
    clipped.push('…');
    clipped
}

fn focus_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    }
}

fn dim() -> Style {
    Style::default().fg(Color::DarkGray)
}

fn error_style() -> Style {
    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
}
