use std::path::PathBuf;

use thiserror::Error;

pub mod hydrate;
pub mod json;
pub mod memory;
pub mod migrations;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to load store from '{path}': {source}")]
    LoadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse JSON from '{path}': {source}")]
    ParseFailed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to save store to '{path}': {source}")]
    SaveFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize store to JSON: {source}")]
    SerializeFailed {
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to create backup at '{path}': {source}")]
    BackupFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to cleanup old backups in '{dir}': {source}")]
    CleanupFailed {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(
        "Store file was created by a newer version of totitodo (version {0}). Please upgrade totitodo to open this file."
    )]
    FutureVersion(u32),

    #[error("Store file has unsupported version {0}. This version of totitodo cannot read this file.")]
    UnsupportedVersion(u32),

    #[error("Storage is unavailable: {0}")]
    Unavailable(String),
}

/// String key-value persistence, in the manner of a browser's local storage.
pub trait Storage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
    /// Drops every key
    fn clear(&self) -> Result<(), StorageError>;
}
