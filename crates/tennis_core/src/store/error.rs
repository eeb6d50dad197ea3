use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Match not found: {id}")]
    NotFound { id: String },

    #[error("Match already exists: {id}")]
    AlreadyExists { id: String },

    #[error("Version conflict on {id}: expected {expected}, found {found}")]
    Conflict { id: String, expected: u64, found: u64 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Encode error: {0}")]
    Encode(#[from] rmp_serde::encode::Error),

    #[error("Decode error: {0}")]
    Decode(#[from] rmp_serde::decode::Error),

    #[error("Decompression error")]
    Decompression,

    #[error("Checksum mismatch")]
    ChecksumMismatch,

    #[error("Corrupted data")]
    Corrupted,

    #[error("Snapshot version mismatch: found {found}, expected {expected}")]
    VersionMismatch { found: u32, expected: u32 },

    #[error("Store lock poisoned")]
    Poisoned,
}

impl StoreError {
    /// Whether retrying the same operation can succeed
    pub fn is_recoverable(&self) -> bool {
        match self {
            StoreError::Io(_) => true,
            StoreError::Conflict { .. } => true, // Reload and reapply
            StoreError::NotFound { .. } => false,
            StoreError::Corrupted => false,
            StoreError::ChecksumMismatch => false,
            StoreError::VersionMismatch { .. } => false,
            _ => false,
        }
    }
}
