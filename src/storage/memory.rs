use std::{
    cell::{Cell, RefCell},
    collections::BTreeMap,
};

use crate::storage::{Storage, StorageError};

/// Process-local storage. Can be switched off to exercise degraded paths.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RefCell<BTreeMap<String, String>>,
    offline: Cell<bool>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call fails with [`StorageError::Unavailable`] until switched back on
    pub fn set_offline(&self, offline: bool) {
        self.offline.set(offline);
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    fn ensure_online(&self) -> Result<(), StorageError> {
        if self.offline.get() {
            return Err(StorageError::Unavailable(String::from(
                "memory storage is offline",
            )));
        }
        Ok(())
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.ensure_online()?;
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.ensure_online()?;
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.ensure_online()?;
        self.entries.borrow_mut().remove(key);
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        self.ensure_online()?;
        self.entries.borrow_mut().clear();
        Ok(())
    }
}
