use std::path::PathBuf;

use narthex_types::{KeyId, RegistrationOutcome};

/// Errors from key store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A record for this identifier already exists.
    #[error("key already registered: {0}")]
    AlreadyRegistered(KeyId),

    /// The record name would not fit in a single path component.
    #[error("record name for {id} exceeds {max} bytes")]
    NameTooLong { id: KeyId, max: usize },

    /// Fewer bytes were available than the request declared.
    #[error("short write: expected {expected} bytes, wrote {written}")]
    ShortWrite { expected: usize, written: usize },

    /// Exclusive creation failed for a reason other than existence.
    #[error("failed to create {}: {source}", .path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing or syncing the record failed after creation.
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// Outcome reported to the caller. Only an existing record is
    /// distinguishable; every other failure is an opaque internal error.
    pub fn outcome(&self) -> RegistrationOutcome {
        match self {
            Self::AlreadyRegistered(_) => RegistrationOutcome::Conflict,
            _ => RegistrationOutcome::InternalError,
        }
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
