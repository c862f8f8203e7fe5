//! # Client Error Types
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ClientError                                                           │
//! │  ├── Storage(StorageError)   key/value store failures                  │
//! │  │     ├── Io                 file read / write / rename               │
//! │  │     └── InvalidKey         key not usable as a file name            │
//! │  ├── Core(CoreError)          cart rule violations                     │
//! │  └── Config*                  client.toml load / save / validation     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Malformed persisted values are NOT errors. Readers log them and fall back
//! to defaults.

use thiserror::Error;

use resort_core::CoreError;

/// Key/value store failures.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Keys double as file names, so they are restricted to
    /// `[A-Za-z0-9_-]`.
    #[error("Invalid storage key: '{0}'")]
    InvalidKey(String),

    #[error("Failed to encode value for '{key}': {reason}")]
    Encode { key: String, reason: String },
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Errors surfaced by the client crate.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Invalid client configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),
}

pub type ClientResult<T> = Result<T, ClientError>;

impl From<toml::de::Error> for ClientError {
    fn from(err: toml::de::Error) -> Self {
        ClientError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for ClientError {
    fn from(err: toml::ser::Error) -> Self {
        ClientError::ConfigSaveFailed(err.to_string())
    }
}
