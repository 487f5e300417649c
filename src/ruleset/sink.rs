//! Destinations for serialized rule sets.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use super::RuleSetName;
use crate::error::{Error, Result};

/// Stores serialized rule sets. Each write fully replaces the previous
/// content for that rule set.
pub trait RuleSetSink {
    /// Store the JSON for one rule set.
    fn write(&mut self, name: RuleSetName, json: &str) -> Result<()>;
}

/// Writes each rule set to `<dir>/<name>.json`.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    /// Create a sink writing into `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Output directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path a rule set is written to.
    pub fn path_for(&self, name: RuleSetName) -> PathBuf {
        self.dir.join(name.file_name())
    }
}

impl RuleSetSink for DirectorySink {
    fn write(&mut self, name: RuleSetName, json: &str) -> Result<()> {
        let path = self.path_for(name);
        let persistence = |source: std::io::Error| Error::Persistence {
            path: path.clone(),
            source,
        };

        fs::create_dir_all(&self.dir).map_err(|source| Error::Persistence {
            path: self.dir.clone(),
            source,
        })?;

        // Write to a temp file in the same directory, then rename over the target
        let mut temp_file = NamedTempFile::new_in(&self.dir).map_err(persistence)?;
        temp_file.write_all(json.as_bytes()).map_err(persistence)?;
        temp_file.as_file().sync_all().map_err(persistence)?;
        temp_file.persist(&path).map_err(|e| persistence(e.error))?;

        log::debug!("Wrote {:?} ({} bytes)", path, json.len());
        Ok(())
    }
}

/// Keeps rule sets in memory. Used for dry runs and tests.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    files: BTreeMap<RuleSetName, String>,
}

impl MemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored JSON for a rule set.
    pub fn get(&self, name: RuleSetName) -> Option<&str> {
        self.files.get(&name).map(String::as_str)
    }

    /// Number of stored rule sets.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether nothing has been stored.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl RuleSetSink for MemorySink {
    fn write(&mut self, name: RuleSetName, json: &str) -> Result<()> {
        self.files.insert(name, json.to_string());
        Ok(())
    }
}
