use std::collections::HashMap;
use std::sync::RwLock;

use super::{MatchRecord, MatchStore, StoreError};

/// Process-local store, mostly for tests and the offline tools
#[derive(Debug, Default)]
pub struct InMemoryStore {
    records: RwLock<HashMap<String, MatchRecord>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.read().map(|records| records.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl MatchStore for InMemoryStore {
    fn create(&self, record: MatchRecord) -> Result<MatchRecord, StoreError> {
        let mut records = self.records.write().map_err(|_| StoreError::Poisoned)?;
        if records.contains_key(&record.id) {
            return Err(StoreError::AlreadyExists { id: record.id });
        }

        records.insert(record.id.clone(), record.clone());
        log::info!("Created match {}", record.id);
        Ok(record)
    }

    fn load(&self, id: &str) -> Result<MatchRecord, StoreError> {
        let records = self.records.read().map_err(|_| StoreError::Poisoned)?;
        records.get(id).cloned().ok_or_else(|| StoreError::NotFound { id: id.to_string() })
    }

    fn save(&self, record: MatchRecord, expected_version: u64) -> Result<MatchRecord, StoreError> {
        let mut records = self.records.write().map_err(|_| StoreError::Poisoned)?;
        let stored = records
            .get_mut(&record.id)
            .ok_or_else(|| StoreError::NotFound { id: record.id.clone() })?;

        if stored.version != expected_version {
            return Err(StoreError::Conflict {
                id: record.id,
                expected: expected_version,
                found: stored.version,
            });
        }

        let next = record.next_revision(expected_version);
        *stored = next.clone();
        log::debug!("Saved match {} at version {}", next.id, next.version);
        Ok(next)
    }

    fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let mut records = self.records.write().map_err(|_| StoreError::Poisoned)?;
        let removed = records.remove(id).is_some();
        if removed {
            log::info!("Deleted match {}", id);
        }
        Ok(removed)
    }

    fn list(&self) -> Result<Vec<MatchRecord>, StoreError> {
        let records = self.records.read().map_err(|_| StoreError::Poisoned)?;
        let mut all: Vec<MatchRecord> = records.values().cloned().collect();
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(all)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Match, MatchConfig};

    fn record(id: &str) -> MatchRecord {
        MatchRecord::new(id.into(), "token".into(), format!("http://x/match/{id}"), Match::new(MatchConfig::new("A", "B")))
    }

    #[test]
    fn test_create_load_delete() {
        let store = InMemoryStore::new();
        store.create(record("a")).unwrap();
        assert!(matches!(store.create(record("a")), Err(StoreError::AlreadyExists { .. })));

        assert_eq!(store.load("a").unwrap().version, 1);
        assert!(matches!(store.load("missing"), Err(StoreError::NotFound { .. })));

        assert!(store.delete("a").unwrap());
        assert!(!store.delete("a").unwrap());
        assert!(store.is_empty());
    }

    #[test]
    fn test_save_is_compare_and_swap() {
        let store = InMemoryStore::new();
        let created = store.create(record("a")).unwrap();

        let saved = store.save(created.clone(), 1).unwrap();
        assert_eq!(saved.version, 2);

        // A writer still holding version 1 loses
        let stale = store.save(created, 1);
        assert!(matches!(stale, Err(StoreError::Conflict { expected: 1, found: 2, .. })));
        assert_eq!(store.load("a").unwrap().version, 2);
    }

    #[test]
    fn test_verify_token() {
        let store = InMemoryStore::new();
        store.create(record("a")).unwrap();
        assert!(store.verify_token("a", "token").unwrap());
        assert!(!store.verify_token("a", "nope").unwrap());
        assert!(store.verify_token("b", "token").is_err());
    }

    #[test]
    fn test_list_sorted_by_creation() {
        let store = InMemoryStore::new();
        store.create(record("first")).unwrap();
        store.create(record("second")).unwrap();
        let ids: Vec<String> = store.list().unwrap().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["first", "second"]);
    }
}
