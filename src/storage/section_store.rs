//! Section snapshot persistence.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use tracing::{debug, info};

use crate::models::Section;

use super::{StorageConfig, StorageError};

/// Reads and writes section snapshots as pretty-printed JSON files.
pub struct SectionStore {
    dir: PathBuf,
}

impl SectionStore {
    /// Create a store rooted at the configured sections directory.
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            dir: config.sections_dir(),
        }
    }

    /// File path for a section name.
    fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.json", file_stem(name)))
    }

    /// Whether a snapshot exists for this section name.
    pub fn exists(&self, name: &str) -> bool {
        self.path_for(name).exists()
    }

    /// Write a section snapshot, replacing any previous one.
    pub fn save(&self, section: &Section) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir)?;

        let path = self.path_for(&section.name);
        let file = File::create(&path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, section)?;
        writer.flush()?;

        debug!("Saved section {:?} to {:?}", section.name, path);
        Ok(())
    }

    /// Load a section snapshot by name.
    pub fn load(&self, name: &str) -> Result<Section, StorageError> {
        let path = self.path_for(name);
        if !path.exists() {
            return Err(StorageError::SectionNotFound(name.to_string()));
        }

        let contents = fs::read_to_string(&path)?;
        let section = serde_json::from_str(&contents)?;

        debug!("Loaded section {:?} from {:?}", name, path);
        Ok(section)
    }

    /// List stored section file stems, sorted.
    pub fn list(&self) -> Result<Vec<String>, StorageError> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) == Some("json") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    names.push(stem.to_string());
                }
            }
        }
        names.sort();

        info!("Found {} stored sections", names.len());
        Ok(names)
    }

    /// Delete a section snapshot.
    pub fn remove(&self, name: &str) -> Result<(), StorageError> {
        let path = self.path_for(name);
        if !path.exists() {
            return Err(StorageError::SectionNotFound(name.to_string()));
        }
        fs::remove_file(path)?;
        Ok(())
    }
}

/// Filesystem-safe stem for a section name.
fn file_stem(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '-'
            }
        })
        .collect::<String>()
        .to_lowercase()
}
