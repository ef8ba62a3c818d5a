use std::sync::mpsc::{Receiver, Sender};
use std::thread;

use crate::api::ApiClient;
use crate::state::{ActionKind, AdminAction, Delta, ProviderCommand};

/// Runs the blocking HTTP work off the UI thread. Commands arrive over one
/// channel, each produces exactly one settlement delta on the other; the UI
/// thread decides via the echoed token whether the settlement still applies.
pub fn spawn_provider(tx: Sender<Delta>, cmd_rx: Receiver<ProviderCommand>, base_url: String) {
    thread::spawn(move || {
        let mut client = ApiClient::new(base_url);

        while let Ok(cmd) = cmd_rx.recv() {
            let delta = match cmd {
                ProviderCommand::SetBaseUrl(url) => {
                    client.set_base_url(url);
                    Delta::Log(format!("[INFO] API base URL set to {}", client.base_url()))
                }
                ProviderCommand::SearchTeams { side, token, query } => Delta::SearchSettled {
                    side,
                    token,
                    outcome: client.search_teams(&query).map_err(|e| e.to_string()),
                },
                ProviderCommand::SimulateGame { token, home, away } => Delta::GameSettled {
                    kind: ActionKind::Manual,
                    token,
                    outcome: client.simulate_game(&home, &away).map_err(|e| e.to_string()),
                },
                ProviderCommand::SimulateByName {
                    token,
                    home_name,
                    away_name,
                } => Delta::GameSettled {
                    kind: ActionKind::ByName,
                    token,
                    outcome: client
                        .simulate_by_name(&home_name, &away_name)
                        .map_err(|e| e.to_string()),
                },
                ProviderCommand::SimulateSeries {
                    token,
                    home,
                    away,
                    n,
                } => Delta::SeriesSettled {
                    kind: ActionKind::Manual,
                    token,
                    outcome: client
                        .simulate_series(&home, &away, n)
                        .map_err(|e| e.to_string()),
                },
                ProviderCommand::SimulateSeriesByName {
                    token,
                    home_name,
                    away_name,
                    n,
                } => Delta::SeriesSettled {
                    kind: ActionKind::ByName,
                    token,
                    outcome: client
                        .simulate_series_by_name(&home_name, &away_name, n)
                        .map_err(|e| e.to_string()),
                },
                ProviderCommand::IngestTeams { token } => Delta::AdminSettled {
                    action: AdminAction::IngestTeams,
                    token,
                    outcome: client.ingest_teams().map_err(|e| e.to_string()),
                },
                ProviderCommand::IngestGames { token, season } => Delta::AdminSettled {
                    action: AdminAction::IngestGames,
                    token,
                    outcome: client.ingest_games(&season).map_err(|e| e.to_string()),
                },
                ProviderCommand::SeedRatings {
                    token,
                    season,
                    scale,
                } => Delta::AdminSettled {
                    action: AdminAction::SeedRatings,
                    token,
                    outcome: client.seed_ratings(&season, scale).map_err(|e| e.to_string()),
                },
                ProviderCommand::CronNightly { token } => Delta::CronSettled {
                    token,
                    outcome: client.cron_nightly().map_err(|e| e.to_string()),
                },
            };

            if tx.send(delta).is_err() {
                // UI side hung up; nothing left to serve.
                return;
            }
        }
    });
}
