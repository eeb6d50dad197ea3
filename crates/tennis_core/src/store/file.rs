//! One-file-per-match store.
//!
//! Snapshot layout: MessagePack (named fields) of a versioned envelope,
//! LZ4-compressed with the size prepended, followed by a SHA-256 checksum
//! of the compressed bytes. Files are replaced atomically.

use std::fs::{self, rename, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use lz4_flex::{compress_prepend_size, decompress_size_prepended};
use rmp_serde::{from_slice, to_vec_named};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::{MatchRecord, MatchStore, StoreError};

pub const SNAPSHOT_VERSION: u32 = 1;

const EXTENSION: &str = "match";
const CHECKSUM_LEN: usize = 32;

#[derive(Serialize, Deserialize)]
struct SnapshotEnvelope {
    version: u32,
    record: MatchRecord,
}

/// Serialize and compress a record
pub fn encode_snapshot(record: &MatchRecord) -> Result<Vec<u8>, StoreError> {
    let envelope = SnapshotEnvelope { version: SNAPSHOT_VERSION, record: record.clone() };
    let msgpack = to_vec_named(&envelope)?;

    let mut bytes = compress_prepend_size(&msgpack);
    let checksum = Sha256::digest(&bytes);
    bytes.extend_from_slice(&checksum);

    Ok(bytes)
}

/// Verify, decompress and deserialize a record
pub fn decode_snapshot(bytes: &[u8]) -> Result<MatchRecord, StoreError> {
    // size header + checksum
    if bytes.len() < 4 + CHECKSUM_LEN {
        return Err(StoreError::Corrupted);
    }

    let (payload, checksum) = bytes.split_at(bytes.len() - CHECKSUM_LEN);
    if Sha256::digest(payload).as_slice() != checksum {
        return Err(StoreError::ChecksumMismatch);
    }

    let msgpack = decompress_size_prepended(payload).map_err(|_| StoreError::Decompression)?;
    let envelope: SnapshotEnvelope = from_slice(&msgpack)?;

    if envelope.version != SNAPSHOT_VERSION {
        return Err(StoreError::VersionMismatch {
            found: envelope.version,
            expected: SNAPSHOT_VERSION,
        });
    }

    Ok(envelope.record)
}

/// Stores each match as `<root>/<id>.match`
#[derive(Debug)]
pub struct FileStore {
    root: PathBuf,
    // Serializes read-check-write cycles within this process
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Open a store rooted at `root`, creating the directory if needed
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root, write_lock: Mutex::new(()) })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, id: &str) -> Result<PathBuf, StoreError> {
        // Ids become file names; anything else could escape the root
        let valid = !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StoreError::NotFound { id: id.to_string() });
        }
        Ok(self.root.join(format!("{id}.{EXTENSION}")))
    }

    fn write_atomic(path: &Path, record: &MatchRecord) -> Result<(), StoreError> {
        let data = encode_snapshot(record)?;
        let temp_path = path.with_extension("tmp");

        {
            let mut file = File::create(&temp_path)?;
            file.write_all(&data)?;
            file.flush()?;
            file.sync_all()?;
        }

        rename(&temp_path, path)?;

        log::debug!("Saved {} bytes to {:?}", data.len(), path);
        Ok(())
    }

    fn read_path(path: &Path, id: &str) -> Result<MatchRecord, StoreError> {
        if !path.exists() {
            return Err(StoreError::NotFound { id: id.to_string() });
        }

        let mut data = Vec::new();
        File::open(path)?.read_to_end(&mut data)?;
        let record = decode_snapshot(&data)?;

        log::debug!("Loaded {} bytes from {:?}", data.len(), path);
        Ok(record)
    }
}

impl MatchStore for FileStore {
    fn create(&self, record: MatchRecord) -> Result<MatchRecord, StoreError> {
        let path = self.path_for(&record.id)?;
        let _guard = self.write_lock.lock().map_err(|_| StoreError::Poisoned)?;

        if path.exists() {
            return Err(StoreError::AlreadyExists { id: record.id });
        }

        Self::write_atomic(&path, &record)?;
        log::info!("Created match {}", record.id);
        Ok(record)
    }

    fn load(&self, id: &str) -> Result<MatchRecord, StoreError> {
        let path = self.path_for(id)?;
        Self::read_path(&path, id)
    }

    fn save(&self, record: MatchRecord, expected_version: u64) -> Result<MatchRecord, StoreError> {
        let path = self.path_for(&record.id)?;
        let _guard = self.write_lock.lock().map_err(|_| StoreError::Poisoned)?;

        let stored = Self::read_path(&path, &record.id)?;
        if stored.version != expected_version {
            return Err(StoreError::Conflict {
                id: record.id,
                expected: expected_version,
                found: stored.version,
            });
        }

        let next = record.next_revision(expected_version);
        Self::write_atomic(&path, &next)?;
        Ok(next)
    }

    fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let path = self.path_for(id)?;
        let _guard = self.write_lock.lock().map_err(|_| StoreError::Poisoned)?;

        if !path.exists() {
            return Ok(false);
        }

        fs::remove_file(&path)?;
        log::info!("Deleted match {}", id);
        Ok(true)
    }

    fn list(&self) -> Result<Vec<MatchRecord>, StoreError> {
        let mut records = Vec::new();

        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(EXTENSION) {
                continue;
            }

            let id = path.file_stem().and_then(|stem| stem.to_str()).unwrap_or_default().to_string();
            match Self::read_path(&path, &id) {
                Ok(record) => records.push(record),
                // One bad file should not hide every other match
                Err(err) => log::warn!("Skipping unreadable match file {:?}: {}", path, err),
            }
        }

        records.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(records)
    }
}
