pub mod json_api;
pub mod service;
pub mod settings;

pub use json_api::{
    apply_event_json, create_match_json, get_match_json, list_matches_json, replay_json,
    ApiError, ApiResponse, ApplyEventRequest, CreateMatchResponse, MatchSummary, ReplayRequest,
    API_VERSION,
};
pub use service::{MatchService, ServiceError};
pub use settings::{ServiceSettings, SettingsError, SETTINGS_PATH_ENV};
