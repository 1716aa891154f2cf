//! Streams provider interactions into a cassette file as they happen.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::format::Interaction;

#[derive(Serialize)]
struct Header<'a> {
    name: &'a str,
    recorded_at: DateTime<Utc>,
    commit: &'a str,
}

/// Open cassette file; each recorded call is appended and flushed immediately.
#[derive(Debug)]
pub struct CassetteRecorder {
    path: PathBuf,
    file: File,
    recorded: usize,
}

impl CassetteRecorder {
    /// Create `path` (and its directory) and write the cassette header.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be created.
    pub fn create(
        path: impl Into<PathBuf>,
        name: &str,
        commit: &str,
    ) -> Result<Self, std::io::Error> {
        let path = path.into();
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }

        let header = Header { name, recorded_at: Utc::now(), commit };
        let mut yaml = serde_yaml::to_string(&header).map_err(std::io::Error::other)?;
        yaml.push_str("interactions:\n");

        let mut file = File::create(&path)?;
        file.write_all(yaml.as_bytes())?;
        tracing::debug!(path = %path.display(), "cassette opened");
        Ok(Self { path, file, recorded: 0 })
    }

    /// Append one call; its `seq` is its position in the cassette.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry cannot be serialized or written.
    pub fn record(
        &mut self,
        port: impl Into<String>,
        method: impl Into<String>,
        input: serde_json::Value,
        output: serde_json::Value,
    ) -> Result<(), std::io::Error> {
        let interaction = Interaction {
            seq: self.recorded as u64,
            port: port.into(),
            method: method.into(),
            input,
            output,
        };
        // A top-level YAML sequence is valid as the value of `interactions:`.
        let entry = serde_yaml::to_string(std::slice::from_ref(&interaction))
            .map_err(std::io::Error::other)?;
        self.file.write_all(entry.as_bytes())?;
        self.file.flush()?;
        self.recorded += 1;
        Ok(())
    }

    /// Number of calls recorded so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.recorded
    }

    /// Whether nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.recorded == 0
    }

    /// The cassette file being written.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sync the file to disk and return its path.
    ///
    /// # Errors
    ///
    /// Returns an error if the sync fails.
    pub fn finish(&self) -> Result<PathBuf, std::io::Error> {
        self.file.sync_all()?;
        tracing::debug!(
            path = %self.path.display(),
            interactions = self.recorded,
            "cassette closed"
        );
        Ok(self.path.clone())
    }
}
