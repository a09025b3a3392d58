use std::{
    fs,
    ops::RangeInclusive,
    path::{Path, PathBuf},
};

use thiserror::Error;

use crate::{
    clock::Clock,
    models::{
        export::ExportDocument,
        stats::TaskStats,
        store::{StoreError, TaskStore},
    },
    services::persist_daily_limit,
    storage::Storage,
};

/// Daily limits the settings screen accepts
pub const DAILY_LIMIT_RANGE: RangeInclusive<u32> = 1..=20;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Daily limit must be between 1 and 20, got {0}")]
    LimitOutOfRange(u32),

    #[error("Failed to serialize export: {source}")]
    SerializeFailed {
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write export to '{path}': {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub fn set_daily_limit<C: Clock>(
    store: &mut TaskStore<C>,
    storage: &impl Storage,
    limit: u32,
) -> Result<TaskStats, SettingsError> {
    if !DAILY_LIMIT_RANGE.contains(&limit) {
        return Err(SettingsError::LimitOutOfRange(limit));
    }

    let stats = store.set_daily_limit(limit)?;
    persist_daily_limit(storage, limit);

    Ok(stats)
}

pub fn export_data<C: Clock>(store: &TaskStore<C>) -> ExportDocument {
    ExportDocument::from_state(&store.snapshot(), store.clock().now())
}

/// Writes the export as pretty JSON. A directory target gets the default file name.
pub fn write_export(document: &ExportDocument, target: &Path) -> Result<PathBuf, SettingsError> {
    let path = if target.is_dir() {
        target.join(document.file_name())
    } else {
        target.to_path_buf()
    };

    let json = serde_json::to_string_pretty(document)
        .map_err(|e| SettingsError::SerializeFailed { source: e })?;
    fs::write(&path, json).map_err(|e| SettingsError::WriteFailed {
        path: path.clone(),
        source: e,
    })?;

    tracing::info!(path = %path.display(), tasks = document.tasks.len(), "Exported data");
    Ok(path)
}

/// Flushes everything the storage holds, then resets the in-memory copy.
///
/// If storage cannot be flushed nothing is reset, so the two never disagree
/// about whether the data is gone.
pub fn clear_all_data<C: Clock>(
    store: &mut TaskStore<C>,
    storage: &impl Storage,
) -> Result<(), SettingsError> {
    storage.clear().map_err(StoreError::from)?;
    store.reset();

    tracing::info!("Cleared all data");
    Ok(())
}
