use std::time::Duration;

use once_cell::sync::OnceCell;
use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde::Serialize;
use serde_json::{Value, json};
use thiserror::Error;

use crate::state::{SeriesResult, TeamProfile, TeamRecord};

const REQUEST_TIMEOUT_SECS: u64 = 10;

static CLIENT: OnceCell<Client> = OnceCell::new();

fn http_client() -> Result<&'static Client, ApiError> {
    CLIENT.get_or_try_init(|| {
        Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(ApiError::from)
    })
}

/// Failure taxonomy for backend calls. An HTTP failure displays as the
/// response body text the backend sent; a transport failure displays as the
/// underlying error description.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{}", http_error_message(.status, .body))]
    Http { status: StatusCode, body: String },
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
    #[error("invalid response json: {0}")]
    Decode(#[from] serde_json::Error),
}

fn http_error_message(status: &StatusCode, body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        format!("http {status}")
    } else {
        trimmed.to_string()
    }
}

/// Thin JSON client for the drive-sim backend. Holds only the base URL; the
/// underlying `reqwest` client is process-wide.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn set_base_url(&mut self, base_url: impl Into<String>) {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<String, ApiError> {
        let client = http_client()?;
        let resp = client.get(self.url(path)).query(query).send()?;
        read_body(resp)
    }

    fn post(&self, path: &str, query: &[(&str, &str)]) -> Result<String, ApiError> {
        let client = http_client()?;
        let resp = client.post(self.url(path)).query(query).send()?;
        read_body(resp)
    }

    fn post_json<B: Serialize>(&self, path: &str, body: &B) -> Result<String, ApiError> {
        let client = http_client()?;
        let resp = client.post(self.url(path)).json(body).send()?;
        read_body(resp)
    }

    pub fn search_teams(&self, query: &str) -> Result<Vec<TeamRecord>, ApiError> {
        let body = self.get("/teams/search", &[("q", query)])?;
        Ok(parse_teams_json(&body)?)
    }

    pub fn simulate_game(
        &self,
        home: &TeamProfile,
        away: &TeamProfile,
    ) -> Result<Value, ApiError> {
        let body = self.post_json("/simulate-game", &json!({ "home": home, "away": away }))?;
        Ok(parse_value_json(&body)?)
    }

    pub fn simulate_by_name(&self, home_name: &str, away_name: &str) -> Result<Value, ApiError> {
        let body = self.post_json(
            "/simulate-by-name",
            &json!({ "home_name": home_name, "away_name": away_name }),
        )?;
        Ok(parse_value_json(&body)?)
    }

    pub fn simulate_series(
        &self,
        home: &TeamProfile,
        away: &TeamProfile,
        n: u32,
    ) -> Result<SeriesResult, ApiError> {
        let body = self.post_json(
            "/simulate-series",
            &json!({ "home": home, "away": away, "n": n, "include_samples": true }),
        )?;
        Ok(parse_series_json(&body)?)
    }

    pub fn simulate_series_by_name(
        &self,
        home_name: &str,
        away_name: &str,
        n: u32,
    ) -> Result<SeriesResult, ApiError> {
        let body = self.post_json(
            "/simulate-series-by-name",
            &json!({ "home_name": home_name, "away_name": away_name, "n": n }),
        )?;
        Ok(parse_series_json(&body)?)
    }

    // Administrative triggers: body ignored beyond success/failure.

    pub fn ingest_teams(&self) -> Result<(), ApiError> {
        self.post("/ingest/teams", &[]).map(|_| ())
    }

    pub fn ingest_games(&self, season: &str) -> Result<(), ApiError> {
        self.post("/ingest/games", &[("season", season)]).map(|_| ())
    }

    pub fn seed_ratings(&self, season: &str, scale: f64) -> Result<(), ApiError> {
        let scale = scale.to_string();
        self.post("/ratings/seed", &[("season", season), ("scale", &scale)])
            .map(|_| ())
    }

    pub fn cron_nightly(&self) -> Result<Value, ApiError> {
        let body = self.get("/cron/nightly", &[])?;
        Ok(parse_value_json(&body)?)
    }
}

fn read_body(resp: reqwest::blocking::Response) -> Result<String, ApiError> {
    let status = resp.status();
    let body = resp.text()?;
    if !status.is_success() {
        return Err(ApiError::Http { status, body });
    }
    Ok(body)
}

pub fn parse_teams_json(raw: &str) -> Result<Vec<TeamRecord>, serde_json::Error> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    serde_json::from_str(trimmed)
}

pub fn parse_series_json(raw: &str) -> Result<SeriesResult, serde_json::Error> {
    serde_json::from_str(raw.trim())
}

pub fn parse_value_json(raw: &str) -> Result<Value, serde_json::Error> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = ApiClient::new("http://localhost:8000/");
        assert_eq!(client.url("/teams/search"), "http://localhost:8000/teams/search");
    }

    #[test]
    fn http_error_displays_the_body_text() {
        let err = ApiError::Http {
            status: StatusCode::NOT_FOUND,
            body: "Team not found in DB. Run /ingest/teams first or check names.".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Team not found in DB. Run /ingest/teams first or check names."
        );
    }

    #[test]
    fn http_error_with_empty_body_falls_back_to_status() {
        let err = ApiError::Http {
            status: StatusCode::BAD_GATEWAY,
            body: "  ".to_string(),
        };
        assert_eq!(err.to_string(), "http 502 Bad Gateway");
    }

    #[test]
    fn empty_search_body_parses_as_no_teams() {
        assert!(parse_teams_json("").expect("empty ok").is_empty());
        assert!(parse_teams_json("null").expect("null ok").is_empty());
    }
}
