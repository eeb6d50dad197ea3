// Match storage
// Records are versioned; every save names the version it was derived from

pub mod error;
pub mod file;
pub mod memory;

pub use error::StoreError;
pub use file::{decode_snapshot, encode_snapshot, FileStore, SNAPSHOT_VERSION};
pub use memory::InMemoryStore;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::Match;

/// A stored match together with its access metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRecord {
    pub id: String,
    pub admin_token: String,
    pub share_url: String,
    /// Starts at 1 and increases by one on every successful save
    pub version: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(rename = "match")]
    pub state: Match,
}

impl MatchRecord {
    pub fn new(id: String, admin_token: String, share_url: String, state: Match) -> Self {
        let now = Utc::now();
        Self { id, admin_token, share_url, version: 1, created_at: now, updated_at: now, state }
    }

    pub fn view(&self) -> MatchView {
        MatchView::from(self)
    }

    /// The record as it should be stored on top of `expected_version`
    pub(crate) fn next_revision(mut self, expected_version: u64) -> Self {
        self.version = expected_version + 1;
        self.updated_at = Utc::now();
        self
    }
}

/// What spectators receive: the record minus the admin token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchView {
    pub id: String,
    pub share_url: String,
    pub version: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(rename = "match")]
    pub state: Match,
}

impl From<&MatchRecord> for MatchView {
    fn from(record: &MatchRecord) -> Self {
        Self {
            id: record.id.clone(),
            share_url: record.share_url.clone(),
            version: record.version,
            created_at: record.created_at,
            updated_at: record.updated_at,
            state: record.state.clone(),
        }
    }
}

/// Storage backend for match records.
///
/// Implementations must be safe to share between threads. `save` is a
/// compare-and-swap on `version`: it fails with [`StoreError::Conflict`]
/// when the stored version is not `expected_version`.
pub trait MatchStore: Send + Sync {
    fn create(&self, record: MatchRecord) -> Result<MatchRecord, StoreError>;

    fn load(&self, id: &str) -> Result<MatchRecord, StoreError>;

    /// Store `record` over `expected_version`, returning it with the bumped
    /// version and a fresh `updated_at`
    fn save(&self, record: MatchRecord, expected_version: u64) -> Result<MatchRecord, StoreError>;

    /// Returns whether a record was removed
    fn delete(&self, id: &str) -> Result<bool, StoreError>;

    /// All records, oldest first
    fn list(&self) -> Result<Vec<MatchRecord>, StoreError>;

    fn verify_token(&self, id: &str, token: &str) -> Result<bool, StoreError> {
        let record = self.load(id)?;
        Ok(tokens_match(&record.admin_token, token))
    }
}

/// Length-independent comparison of the token bytes
fn tokens_match(expected: &str, given: &str) -> bool {
    let (a, b) = (expected.as_bytes(), given.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
