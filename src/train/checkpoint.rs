//! Best-model persistence.
//!
//! The controller writes a snapshot through a sink at every improvement
//! event. A write failure costs only the durability of that checkpoint;
//! the in-memory best state is untouched and training continues.

use crate::error::{Error, Result};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// A destination for best-model snapshots.
pub trait CheckpointSink<S> {
    /// Persist `snapshot`, replacing any previously persisted best.
    fn save(&mut self, snapshot: &S) -> Result<()>;
}

/// Writes snapshots as JSON to a single file, overwriting on each save.
///
/// # Example
///
/// ```no_run
/// use paciencia::train::JsonCheckpoint;
///
/// let sink = JsonCheckpoint::new("runs/best_model.json");
/// ```
pub struct JsonCheckpoint {
    path: PathBuf,
    pretty: bool,
}

impl JsonCheckpoint {
    /// Create a sink writing pretty-printed JSON to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), pretty: true }
    }

    /// Switch to compact single-line JSON.
    pub fn compact(mut self) -> Self {
        self.pretty = false;
        self
    }

    /// The configured output path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl<S: Serialize> CheckpointSink<S> for JsonCheckpoint {
    fn save(&mut self, snapshot: &S) -> Result<()> {
        let data = if self.pretty {
            serde_json::to_string_pretty(snapshot)
        } else {
            serde_json::to_string(snapshot)
        }
        .map_err(|e| Error::Serialization(format!("JSON serialization failed: {e}")))?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .map_err(|e| Error::io("creating checkpoint directory", e))?;
            }
        }
        fs::write(&self.path, data).map_err(|e| Error::io("writing checkpoint", e))
    }
}
