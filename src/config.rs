use std::path::PathBuf;

/// Environment variable overriding the store file location
pub const STORE_PATH_ENV: &str = "TOTITODO_STORE";
/// Environment variable holding the `tracing` filter directives
pub const LOG_ENV: &str = "TOTITODO_LOG";
/// Filter used when [`LOG_ENV`] is unset
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// `<local data dir>/totitodo/store.json`, or `./totitodo/store.json` when the
/// platform has no data directory
pub fn default_store_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("totitodo")
        .join("store.json")
}

/// Explicit path if given, otherwise the platform default
pub fn resolve_store_path(explicit: Option<PathBuf>) -> PathBuf {
    explicit.unwrap_or_else(default_store_path)
}
