//! Match service: the boundary every frontend goes through.
//!
//! Owns id/token issuance, admin-token checks, and the read-reduce-save
//! cycle with optimistic retries on version conflicts.

use rand::distributions::Alphanumeric;
use rand::Rng;
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::settings::ServiceSettings;
use crate::engine::{create_match, reduce, MatchEvent};
use crate::models::{ConfigError, MatchConfig};
use crate::store::{MatchRecord, MatchStore, MatchView, StoreError};

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Invalid match configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    #[error("Match not found: {id}")]
    NotFound { id: String },

    #[error("Invalid admin token for match {id}")]
    Unauthorized { id: String },

    #[error("Match {id} kept changing; gave up after {attempts} attempts")]
    Conflict { id: String, attempts: u32 },

    #[error("Storage error: {0}")]
    Store(StoreError),
}

impl ServiceError {
    /// Stable code reported to API clients
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::InvalidConfig(_) => "INVALID_CONFIG",
            ServiceError::NotFound { .. } => "MATCH_NOT_FOUND",
            ServiceError::Unauthorized { .. } => "UNAUTHORIZED",
            ServiceError::Conflict { .. } => "VERSION_CONFLICT",
            ServiceError::Store(_) => "STORE_ERROR",
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { id } => ServiceError::NotFound { id },
            other => ServiceError::Store(other),
        }
    }
}

pub struct MatchService<S: MatchStore> {
    store: S,
    settings: ServiceSettings,
}

impl<S: MatchStore> MatchService<S> {
    pub fn new(store: S, settings: ServiceSettings) -> Self {
        Self { store, settings }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn settings(&self) -> &ServiceSettings {
        &self.settings
    }

    /// Validate `config` and store a fresh match.
    ///
    /// The returned record carries the admin token; it is the only time the
    /// token leaves the service.
    pub fn create_match(&self, config: MatchConfig) -> Result<MatchRecord, ServiceError> {
        config.validate()?;

        let id = Uuid::new_v4().to_string();
        let token = generate_token(self.settings.admin_token_length);
        let share_url = self.settings.share_url(&id);
        let record = MatchRecord::new(id, token, share_url, create_match(config));

        let created = self.store.create(record)?;
        info!(id = %created.id, summary = %created.state.config.summary(), "match created");
        Ok(created)
    }

    pub fn get_match(&self, id: &str) -> Result<MatchView, ServiceError> {
        Ok(self.store.load(id)?.view())
    }

    pub fn list_matches(&self) -> Result<Vec<MatchView>, ServiceError> {
        Ok(self.store.list()?.iter().map(MatchView::from).collect())
    }

    /// Apply one event to a stored match on behalf of its admin.
    ///
    /// Events the state machine ignores (e.g. a point on a completed match)
    /// return the current view without writing.
    pub fn apply(&self, id: &str, token: &str, event: &MatchEvent) -> Result<MatchView, ServiceError> {
        self.authorize(id, token)?;

        let attempts = self.settings.max_save_retries.saturating_add(1);
        for attempt in 1..=attempts {
            let record = self.store.load(id)?;
            let next_state = reduce(&record.state, event);
            if next_state == record.state {
                debug!(id, ?event, "event left match unchanged");
                return Ok(record.view());
            }

            let expected = record.version;
            let candidate = MatchRecord { state: next_state, ..record };
            match self.store.save(candidate, expected) {
                Ok(saved) => {
                    debug!(id, version = saved.version, ?event, "event applied");
                    return Ok(saved.view());
                }
                Err(StoreError::Conflict { found, .. }) => {
                    warn!(id, attempt, expected, found, "version conflict, retrying");
                }
                Err(err) => return Err(err.into()),
            }
        }

        Err(ServiceError::Conflict { id: id.to_string(), attempts })
    }

    pub fn delete_match(&self, id: &str, token: &str) -> Result<(), ServiceError> {
        self.authorize(id, token)?;
        if !self.store.delete(id)? {
            return Err(ServiceError::NotFound { id: id.to_string() });
        }
        info!(id, "match deleted");
        Ok(())
    }

    fn authorize(&self, id: &str, token: &str) -> Result<(), ServiceError> {
        if self.store.verify_token(id, token)? {
            Ok(())
        } else {
            warn!(id, "rejected admin token");
            Err(ServiceError::Unauthorized { id: id.to_string() })
        }
    }
}

fn generate_token(len: usize) -> String {
    rand::thread_rng().sample_iter(&Alphanumeric).take(len).map(char::from).collect()
}
