mod file_store;
mod memory_store;

pub use file_store::FileStateStore;
pub use memory_store::MemoryStateStore;

use std::fmt;

#[derive(Debug)]
pub enum StoreError {
    IoError(std::io::Error),
    FormatError(serde_yaml_ng::Error),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::IoError(e) => write!(f, "IO error: {}", e),
            StoreError::FormatError(e) => write!(f, "State file format error: {}", e),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        StoreError::IoError(e)
    }
}

impl From<serde_yaml_ng::Error> for StoreError {
    fn from(e: serde_yaml_ng::Error) -> Self {
        StoreError::FormatError(e)
    }
}

/// Opaque string store keyed by name. Values are never interpreted here.
pub trait StateStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
    /// Drops every key, including content that no longer parses.
    fn clear(&mut self) -> Result<(), StoreError>;
}
