//! JSON string API
//!
//! Every function takes and returns JSON strings so that any host (CLI, web
//! handler, FFI) can drive the service without sharing Rust types. Responses
//! are always an `ApiResponse` envelope, never a bare error.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{error, info, warn};

use super::service::{MatchService, ServiceError};
use crate::engine::{live_scoreline, score_point, MatchEvent};
use crate::models::{Match, MatchConfig, MatchStatus, Player};
use crate::store::{MatchRecord, MatchStore, MatchView};

/// API version for schema compatibility
pub const API_VERSION: &str = "v1";

/// Standard API response wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ApiError>,
    pub schema_version: String,
    pub timestamp: DateTime<Utc>,
}

/// Structured API error with codes and details
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, serde_json::Value>>,
}

impl ApiError {
    pub fn new(code: &str, message: &str) -> Self {
        Self { code: code.to_string(), message: message.to_string(), details: None }
    }

    pub fn with_details(
        code: &str,
        message: &str,
        details: HashMap<String, serde_json::Value>,
    ) -> Self {
        Self { code: code.to_string(), message: message.to_string(), details: Some(details) }
    }

    pub fn from_service_error(error: &ServiceError) -> Self {
        match error {
            ServiceError::Conflict { id, attempts } => {
                let details = HashMap::from([
                    ("matchId".to_string(), serde_json::Value::from(id.as_str())),
                    ("attempts".to_string(), serde_json::Value::from(*attempts)),
                ]);
                Self::with_details(error.code(), &error.to_string(), details)
            }
            _ => Self::new(error.code(), &error.to_string()),
        }
    }
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            schema_version: API_VERSION.to_string(),
            timestamp: Utc::now(),
        }
    }

    pub fn error(error: ApiError) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
            schema_version: API_VERSION.to_string(),
            timestamp: Utc::now(),
        }
    }
}

impl<T: Serialize> ApiResponse<T> {
    fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            r#"{"success":false,"error":{"code":"SERIALIZATION_FAILED","message":"Serialization failed"}}"#
                .to_string()
        })
    }
}

/// Create match response: the only response that carries the admin token
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMatchResponse {
    pub id: String,
    pub admin_token: String,
    pub share_url: String,
    #[serde(rename = "match")]
    pub state: Match,
}

impl From<MatchRecord> for CreateMatchResponse {
    fn from(record: MatchRecord) -> Self {
        Self {
            id: record.id,
            admin_token: record.admin_token,
            share_url: record.share_url,
            state: record.state,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyEventRequest {
    pub match_id: String,
    pub admin_token: String,
    pub event: MatchEvent,
}

/// One row of the match list
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchSummary {
    pub id: String,
    pub share_url: String,
    pub player1_name: String,
    pub player2_name: String,
    pub status: MatchStatus,
    pub scoreline: String,
    pub updated_at: DateTime<Utc>,
}

impl From<&MatchView> for MatchSummary {
    fn from(view: &MatchView) -> Self {
        let scoreline = match &view.state.final_scoreline {
            Some(final_line) => final_line.clone(),
            None => live_scoreline(&view.state),
        };
        Self {
            id: view.id.clone(),
            share_url: view.share_url.clone(),
            player1_name: view.state.config.player1_name.clone(),
            player2_name: view.state.config.player2_name.clone(),
            status: view.state.status,
            scoreline,
            updated_at: view.updated_at,
        }
    }
}

/// Offline scoring: a configuration and the winner of each point in order
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayRequest {
    pub config: MatchConfig,
    pub points: Vec<Player>,
}

fn parse_request<T: for<'de> Deserialize<'de>>(request_json: &str, name: &str) -> Result<T, ApiError> {
    serde_json::from_str(request_json).map_err(|e| {
        error!("Failed to parse {}: {}", name, e);
        ApiError::new("INVALID_JSON", &format!("Invalid JSON format: {}", e))
    })
}

fn service_failure<T: Serialize>(operation: &str, err: ServiceError) -> String {
    match err {
        ServiceError::Store(_) => error!("{} failed: {}", operation, err),
        _ => warn!("{} rejected: {}", operation, err),
    }
    ApiResponse::<T>::error(ApiError::from_service_error(&err)).to_json()
}

/// Create a match from a `MatchConfig` JSON object
///
/// # Returns
/// JSON string containing ApiResponse<CreateMatchResponse>
pub fn create_match_json<S: MatchStore>(service: &MatchService<S>, config_json: &str) -> String {
    info!("Processing match creation request");

    let config: MatchConfig = match parse_request(config_json, "MatchConfig") {
        Ok(config) => config,
        Err(error) => return ApiResponse::<CreateMatchResponse>::error(error).to_json(),
    };

    match service.create_match(config) {
        Ok(record) => {
            info!("Created match {} ({} vs {})", record.id, record.state.config.player1_name, record.state.config.player2_name);
            ApiResponse::success(CreateMatchResponse::from(record)).to_json()
        }
        Err(err) => service_failure::<CreateMatchResponse>("Match creation", err),
    }
}

/// Spectator view of one match
pub fn get_match_json<S: MatchStore>(service: &MatchService<S>, match_id: &str) -> String {
    match service.get_match(match_id) {
        Ok(view) => ApiResponse::success(view).to_json(),
        Err(err) => service_failure::<MatchView>("Match lookup", err),
    }
}

/// Apply an `ApplyEventRequest`; returns the updated spectator view
pub fn apply_event_json<S: MatchStore>(service: &MatchService<S>, request_json: &str) -> String {
    let request: ApplyEventRequest = match parse_request(request_json, "ApplyEventRequest") {
        Ok(request) => request,
        Err(error) => return ApiResponse::<MatchView>::error(error).to_json(),
    };

    match service.apply(&request.match_id, &request.admin_token, &request.event) {
        Ok(view) => ApiResponse::success(view).to_json(),
        Err(err) => service_failure::<MatchView>("Event", err),
    }
}

pub fn list_matches_json<S: MatchStore>(service: &MatchService<S>) -> String {
    match service.list_matches() {
        Ok(views) => {
            let rows: Vec<MatchSummary> = views.iter().map(MatchSummary::from).collect();
            ApiResponse::success(rows).to_json()
        }
        Err(err) => service_failure::<Vec<MatchSummary>>("Match listing", err),
    }
}

/// Score a whole match offline from a `ReplayRequest`; nothing is stored
pub fn replay_json(request_json: &str) -> String {
    let request: ReplayRequest = match parse_request(request_json, "ReplayRequest") {
        Ok(request) => request,
        Err(error) => return ApiResponse::<Match>::error(error).to_json(),
    };

    if let Err(err) = request.config.validate() {
        warn!("Replay config validation failed: {}", err);
        return ApiResponse::<Match>::error(ApiError::new("INVALID_CONFIG", &err.to_string())).to_json();
    }

    let start = Match::new(request.config);
    let state = request.points.iter().fold(start, |acc, player| score_point(&acc, *player));
    ApiResponse::success(state).to_json()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ServiceSettings;
    use crate::store::InMemoryStore;
    use serde_json::{json, Value};

    fn service() -> MatchService<InMemoryStore> {
        MatchService::new(InMemoryStore::new(), ServiceSettings::default())
    }

    fn parse(response: &str) -> Value {
        serde_json::from_str(response).unwrap()
    }

    const CONFIG: &str = r#"{
        "scoringSystem": "no-ad",
        "matchFormat": "single",
        "setDuration": 4,
        "tieBreakRules": "7-point",
        "player1Name": "Nicky",
        "player2Name": "Opponent"
    }"#;

    #[test]
    fn test_create_and_score_through_json() {
        let service = service();
        let created = parse(&create_match_json(&service, CONFIG));
        assert_eq!(created["success"], true);
        assert_eq!(created["schemaVersion"], "v1");

        let id = created["data"]["id"].as_str().unwrap().to_string();
        let token = created["data"]["adminToken"].as_str().unwrap().to_string();
        assert_eq!(created["data"]["match"]["config"]["setDuration"], 4);

        let request = json!({
            "matchId": id,
            "adminToken": token,
            "event": {"type": "pointWon", "player": "player1"}
        });
        let applied = parse(&apply_event_json(&service, &request.to_string()));
        assert_eq!(applied["success"], true);
        assert_eq!(applied["data"]["version"], 2);
        assert_eq!(applied["data"]["match"]["currentGameScore"]["player1Points"], "15");
        assert!(applied["data"].get("adminToken").is_none());

        let fetched = parse(&get_match_json(&service, &id));
        assert_eq!(fetched["data"]["match"]["currentGameScore"]["player1Points"], "15");
    }

    #[test]
    fn test_error_envelopes() {
        let service = service();

        let bad_json = parse(&create_match_json(&service, "{not json"));
        assert_eq!(bad_json["success"], false);
        assert_eq!(bad_json["error"]["code"], "INVALID_JSON");

        let bad_duration = parse(&create_match_json(&service, &CONFIG.replace("\"setDuration\": 4", "\"setDuration\": 5")));
        assert_eq!(bad_duration["error"]["code"], "INVALID_JSON");

        let empty_name = parse(&create_match_json(&service, &CONFIG.replace("Nicky", "")));
        assert_eq!(empty_name["error"]["code"], "INVALID_CONFIG");

        let missing = parse(&get_match_json(&service, "missing"));
        assert_eq!(missing["error"]["code"], "MATCH_NOT_FOUND");
        assert!(missing["data"].is_null());
    }

    #[test]
    fn test_wrong_token_rejected() {
        let service = service();
        let created = parse(&create_match_json(&service, CONFIG));
        let request = json!({
            "matchId": created["data"]["id"],
            "adminToken": "guess",
            "event": {"type": "paused"}
        });

        let response = parse(&apply_event_json(&service, &request.to_string()));
        assert_eq!(response["error"]["code"], "UNAUTHORIZED");
    }

    #[test]
    fn test_list_matches_rows() {
        let service = service();
        create_match_json(&service, CONFIG);

        let listed = parse(&list_matches_json(&service));
        let rows = listed["data"].as_array().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["player1Name"], "Nicky");
        assert_eq!(rows[0]["status"], "in-progress");
        assert_eq!(rows[0]["scoreline"], "0-0");
    }

    #[test]
    fn test_replay_json() {
        let points = vec!["player2"; 16];
        let request = json!({ "config": serde_json::from_str::<Value>(CONFIG).unwrap(), "points": points });

        let response = parse(&replay_json(&request.to_string()));
        assert_eq!(response["success"], true);
        assert_eq!(response["data"]["status"], "completed");
        assert_eq!(response["data"]["matchWinner"], "player2");
        assert_eq!(response["data"]["finalScoreline"], "4-0");
    }
}
