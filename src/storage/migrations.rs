use serde_json::{Map, Value};

use crate::storage::StorageError;

type MigrationFn = fn(Value) -> Result<Value, StorageError>;

fn get_migrations() -> Vec<MigrationFn> {
    vec![migrate_v1_to_v2]
}

/// Returns 1 if version field is missing (a bare key/value dump)
pub fn detect_version(value: &Value) -> Result<u32, StorageError> {
    match value.get("version") {
        Some(Value::Number(n)) => n
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .ok_or(StorageError::UnsupportedVersion(0)),
        // A v1 dump may legitimately hold a string entry called "version"
        Some(Value::String(_)) | None => Ok(1),
        Some(_) => Err(StorageError::UnsupportedVersion(0)),
    }
}

/// Migrations are applied sequentially: v1→v2→v3→...→target
pub fn apply_migrations(
    mut data: Value,
    from_version: u32,
    to_version: u32,
) -> Result<Value, StorageError> {
    if from_version == to_version {
        return Ok(data);
    }

    if from_version > to_version {
        return Err(StorageError::FutureVersion(from_version));
    }

    let migrations = get_migrations();

    for version in from_version..to_version {
        let migration_idx = (version as usize)
            .checked_sub(1)
            .ok_or(StorageError::UnsupportedVersion(version))?;

        let Some(migration) = migrations.get(migration_idx) else {
            return Err(StorageError::UnsupportedVersion(version));
        };

        data = migration(data)?;
    }

    Ok(data)
}

/// v1 is a flat object of key → string. v2 wraps it as
/// `{"version": 2, "entries": {...}}` and drops non-string values.
fn migrate_v1_to_v2(value: Value) -> Result<Value, StorageError> {
    let Value::Object(flat) = value else {
        return Err(StorageError::UnsupportedVersion(1));
    };

    let entries: Map<String, Value> = flat
        .into_iter()
        .filter(|(_, v)| v.is_string())
        .collect();

    Ok(serde_json::json!({
        "version": 2,
        "entries": entries,
    }))
}
