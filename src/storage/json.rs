use std::{
    collections::BTreeMap,
    fs::{self, OpenOptions, rename, write},
    path::{Path, PathBuf},
};

use fs2::FileExt;
use serde::{Deserialize, Serialize};
use serde_json::to_string_pretty;
use uuid::Uuid;

use crate::storage::{
    Storage, StorageError,
    migrations::{apply_migrations, detect_version},
};

/// Current schema version of the store file
pub const CURRENT_VERSION: u32 = 2;

/// How many previous copies of the store file are kept in `backups/`
const MAX_BACKUPS: usize = 5;

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct StoreFile {
    version: u32,
    entries: BTreeMap<String, String>,
}

impl Default for StoreFile {
    fn default() -> Self {
        Self {
            version: CURRENT_VERSION,
            entries: BTreeMap::new(),
        }
    }
}

/// Keeps every key in one JSON file, rewritten atomically on each change.
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_file(&self) -> Result<StoreFile, StorageError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(StoreFile::default()),
            Err(e) => {
                return Err(StorageError::LoadFailed {
                    path: self.path.clone(),
                    source: e,
                });
            }
        };

        let mut data: serde_json::Value =
            serde_json::from_str(&content).map_err(|e| StorageError::ParseFailed {
                path: self.path.clone(),
                source: e,
            })?;

        let file_version = detect_version(&data)?;
        if file_version > CURRENT_VERSION {
            return Err(StorageError::FutureVersion(file_version));
        }
        if file_version < CURRENT_VERSION {
            tracing::info!(
                path = %self.path.display(),
                from = file_version,
                to = CURRENT_VERSION,
                "Migrating store file"
            );
            data = apply_migrations(data, file_version, CURRENT_VERSION)?;
        }

        serde_json::from_value(data).map_err(|e| StorageError::ParseFailed {
            path: self.path.clone(),
            source: e,
        })
    }

    fn write_file(&self, file: &StoreFile, keep_backup: bool) -> Result<(), StorageError> {
        let json =
            to_string_pretty(file).map_err(|e| StorageError::SerializeFailed { source: e })?;

        let unique_temp = format!("{}.tmp.{}", self.path.display(), Uuid::new_v4());
        let temp_path = PathBuf::from(&unique_temp);
        write(&temp_path, json).map_err(|e| StorageError::SaveFailed {
            path: temp_path.clone(),
            source: e,
        })?;

        if keep_backup {
            self.create_backup()?;
            self.cleanup_old_backups()?;
        }

        rename(&temp_path, &self.path).map_err(|e| StorageError::SaveFailed {
            path: self.path.clone(),
            source: e,
        })
    }

    /// Runs `op` while holding an exclusive lock file next to the store
    fn with_lock(&self, op: impl FnOnce() -> Result<(), StorageError>) -> Result<(), StorageError> {
        let lock_file_path = self.path.with_extension("lock");
        let lock_file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_file_path)
            .map_err(|e| StorageError::SaveFailed {
                path: lock_file_path.clone(),
                source: e,
            })?;
        lock_file
            .lock_exclusive()
            .map_err(|e| StorageError::SaveFailed {
                path: lock_file_path.clone(),
                source: e,
            })?;

        let result = op();

        FileExt::unlock(&lock_file).map_err(|e| StorageError::SaveFailed {
            path: lock_file_path,
            source: e,
        })?;

        result
    }

    /// Read-modify-write cycle; the previous file goes to `backups/`
    fn modify(&self, change: impl FnOnce(&mut StoreFile)) -> Result<(), StorageError> {
        self.with_lock(|| {
            let mut file = self.read_file()?;
            change(&mut file);
            file.version = CURRENT_VERSION;
            self.write_file(&file, true)
        })
    }

    fn remove_backups(&self) -> Result<(), StorageError> {
        let backup_dir = self.get_backup_dir();
        match fs::remove_dir_all(&backup_dir) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::CleanupFailed {
                dir: backup_dir,
                source: e,
            }),
        }
    }

    fn create_backup_dir(&self) -> Result<(), StorageError> {
        let backups_dir = self.get_backup_dir();
        fs::create_dir_all(&backups_dir).map_err(|e| StorageError::BackupFailed {
            path: backups_dir,
            source: e,
        })
    }

    fn create_backup(&self) -> Result<u64, StorageError> {
        let file_exists = fs::exists(&self.path).map_err(|e| StorageError::BackupFailed {
            path: self.path.clone(),
            source: e,
        })?;
        if !file_exists {
            return Ok(0);
        }

        self.create_backup_dir()?;
        let backup_path = self.get_backup_path();
        fs::copy(&self.path, &backup_path).map_err(|e| StorageError::BackupFailed {
            path: backup_path,
            source: e,
        })
    }

    fn cleanup_old_backups(&self) -> Result<(), StorageError> {
        let backup_dir = self.get_backup_dir();
        let backup_dir_exists =
            fs::exists(&backup_dir).map_err(|e| StorageError::CleanupFailed {
                dir: backup_dir.clone(),
                source: e,
            })?;
        if !backup_dir_exists {
            return Ok(());
        }

        let mut file_entries = fs::read_dir(&backup_dir)
            .map_err(|e| StorageError::CleanupFailed {
                dir: backup_dir.clone(),
                source: e,
            })?
            .flatten()
            .filter(|entry| entry.metadata().map(|m| m.is_file()).unwrap_or(false))
            .map(|entry| entry.path())
            .collect::<Vec<_>>();

        // Names end in a zero-padded timestamp, so lexical order is age order
        file_entries.sort();

        let number_of_files_to_delete = file_entries.len().saturating_sub(MAX_BACKUPS);
        for file_path in &file_entries[..number_of_files_to_delete] {
            fs::remove_file(file_path).map_err(|e| StorageError::CleanupFailed {
                dir: backup_dir.clone(),
                source: e,
            })?;
        }

        Ok(())
    }

    fn get_backup_dir(&self) -> PathBuf {
        let parent_store_path = self.path.parent().unwrap_or(Path::new("."));
        parent_store_path.join("backups")
    }

    fn get_backup_path(&self) -> PathBuf {
        let file_name = self
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| String::from("store.json"));
        let nanos = jiff::Timestamp::now().as_nanosecond();

        self.get_backup_dir()
            .join(format!("{}-{:020}", file_name, nanos))
    }
}

impl Storage for JsonFileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_file()?.entries.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.modify(|file| {
            file.entries.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.modify(|file| {
            file.entries.remove(key);
        })
    }

    /// Empties the store file and deletes its backups, so nothing can be restored
    fn clear(&self) -> Result<(), StorageError> {
        self.with_lock(|| {
            self.write_file(&StoreFile::default(), false)?;
            self.remove_backups()
        })
    }
}
