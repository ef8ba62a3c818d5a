use cfb_sim_terminal::state::{
    ActionKind, AdminAction, AppState, Delta, SeriesResult, Side, TeamRecord, apply_delta,
};

fn team(id: u32, name: &str) -> TeamRecord {
    TeamRecord {
        team_id: id,
        name: name.to_string(),
        conference: Some("Big 12".to_string()),
    }
}

fn series_result(home_win_pct: f64) -> SeriesResult {
    SeriesResult {
        samples: Some(100),
        home_win_pct,
        ..SeriesResult::default()
    }
}

#[test]
fn stale_search_settlement_is_discarded() {
    let mut state = AppState::new();

    // Query "io" goes out, then the user keeps typing and "iowa" goes out.
    let stale = state.home_picker.slot.begin();
    let fresh = state.home_picker.slot.begin();

    apply_delta(
        &mut state,
        Delta::SearchSettled {
            side: Side::Home,
            token: fresh,
            outcome: Ok(vec![team(1, "Iowa"), team(2, "Iowa State")]),
        },
    );
    // The slow response for the superseded query arrives afterwards.
    apply_delta(
        &mut state,
        Delta::SearchSettled {
            side: Side::Home,
            token: stale,
            outcome: Ok(vec![team(3, "Ohio State")]),
        },
    );

    let names: Vec<&str> = state
        .home_picker
        .candidates()
        .iter()
        .map(|t| t.name.as_str())
        .collect();
    assert_eq!(names, vec!["Iowa", "Iowa State"]);
}

#[test]
fn stale_error_cannot_replace_a_fresh_result() {
    let mut state = AppState::new();

    let stale = state.series.begin();
    let fresh = state.series.begin();

    apply_delta(
        &mut state,
        Delta::SeriesSettled {
            kind: ActionKind::Manual,
            token: fresh,
            outcome: Ok(series_result(0.62)),
        },
    );
    apply_delta(
        &mut state,
        Delta::SeriesSettled {
            kind: ActionKind::Manual,
            token: stale,
            outcome: Err("request timed out".to_string()),
        },
    );

    let result = state.series.success().expect("fresh result should survive");
    assert!((result.home_win_pct - 0.62).abs() < f64::EPSILON);
    assert!(state.series.error().is_none());
}

#[test]
fn series_settlement_does_not_touch_other_action_slots() {
    let mut state = AppState::new();

    // The by-name action failed validation and shows its message.
    state.game_by_name.fail("Pick both teams first.");

    let token = state.series.begin();
    apply_delta(
        &mut state,
        Delta::SeriesSettled {
            kind: ActionKind::Manual,
            token,
            outcome: Ok(series_result(0.5)),
        },
    );

    assert!(state.series.success().is_some());
    assert_eq!(state.game_by_name.error(), Some("Pick both teams first."));
}

#[test]
fn home_and_away_search_slots_are_independent() {
    let mut state = AppState::new();

    let home_token = state.home_picker.slot.begin();
    let away_token = state.away_picker.slot.begin();

    apply_delta(
        &mut state,
        Delta::SearchSettled {
            side: Side::Away,
            token: away_token,
            outcome: Err("http 500 Internal Server Error".to_string()),
        },
    );
    apply_delta(
        &mut state,
        Delta::SearchSettled {
            side: Side::Home,
            token: home_token,
            outcome: Ok(vec![team(7, "Kansas")]),
        },
    );

    assert_eq!(state.home_picker.candidates().len(), 1);
    assert!(state.away_picker.slot.error().is_some());
}

#[test]
fn applied_search_resets_candidate_selection() {
    let mut state = AppState::new();

    let first = state.home_picker.slot.begin();
    apply_delta(
        &mut state,
        Delta::SearchSettled {
            side: Side::Home,
            token: first,
            outcome: Ok(vec![team(1, "Texas"), team(2, "Texas A&M"), team(3, "TCU")]),
        },
    );
    state.home_picker.select_next();
    state.home_picker.select_next();
    assert_eq!(state.home_picker.selected, 2);

    let second = state.home_picker.slot.begin();
    apply_delta(
        &mut state,
        Delta::SearchSettled {
            side: Side::Home,
            token: second,
            outcome: Ok(vec![team(4, "Baylor")]),
        },
    );
    assert_eq!(state.home_picker.selected, 0);
}

#[test]
fn admin_settlement_logs_an_outcome_line() {
    let mut state = AppState::new();

    let token = state.ingest_teams.begin();
    apply_delta(
        &mut state,
        Delta::AdminSettled {
            action: AdminAction::IngestTeams,
            token,
            outcome: Ok(()),
        },
    );
    assert!(state.ingest_teams.success().is_some());
    assert!(
        state
            .logs
            .iter()
            .any(|line| line.starts_with("[INFO]") && line.contains("Teams ingested"))
    );

    let token = state.seed_ratings.begin();
    apply_delta(
        &mut state,
        Delta::AdminSettled {
            action: AdminAction::SeedRatings,
            token,
            outcome: Err("no games for season".to_string()),
        },
    );
    assert_eq!(state.seed_ratings.error(), Some("no games for season"));
    assert!(state.logs.iter().any(|line| line.starts_with("[WARN]")));
}

#[test]
fn validation_failure_survives_until_the_next_trigger() {
    let mut state = AppState::new();

    state.series_by_name.fail("Pick both teams first.");
    let shown_at = state.series_by_name.token();

    // A later trigger with a fresh token clears the message.
    let token = state.series_by_name.begin();
    assert!(token > shown_at);
    assert!(state.series_by_name.is_loading());
    assert!(state.series_by_name.error().is_none());
}
