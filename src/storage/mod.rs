//! Filesystem persistence for sections.
//!
//! One JSON snapshot per section under the data directory. The engine
//! never touches storage; callers load a section, run engine operations,
//! and write the result back.

mod section_store;

pub use section_store::SectionStore;

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("section not found: {0}")]
    SectionNotFound(String),
}

/// Configuration for storage paths.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl StorageConfig {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn sections_dir(&self) -> PathBuf {
        self.data_dir.join("sections")
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new(PathBuf::from("./data"))
    }
}
