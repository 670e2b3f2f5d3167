#![warn(missing_docs)]
//! Deterministic testing surfaces: session event stream and container fixtures.

mod fixtures;

use anyhow::Result;
use serde::Serialize;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

pub use fixtures::*;

/// Primary event record captured by headless session runs.
#[derive(Debug, Serialize)]
pub struct EventRecord<'a> {
    /// Zero-based index of the step that produced the event.
    pub step: u64,
    /// Human-readable kind label.
    pub kind: &'a str,
    /// Free-form payload (usually compact JSON).
    pub payload: &'a str,
}

/// A sink that writes newline-delimited JSON to disk.
pub struct JsonlSink {
    file: File,
}

impl JsonlSink {
    /// Create a new sink at `path`, creating parent dirs if needed.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)?;
        }
        let file = File::create(path)?;
        Ok(Self { file })
    }

    /// Append an event to the log.
    pub fn write(&mut self, event: &EventRecord<'_>) -> Result<()> {
        let line = serde_json::to_string(event)?;
        self.file.write_all(line.as_bytes())?;
        self.file.write_all(b"\n")?;
        Ok(())
    }
}
