//! Persistence layer.
//!
//! Saves and loads the reveal log to/from a JSON file. The log is the
//! raw reveal sequence plus timestamps; the structured state is always
//! re-derived from it on load, which keeps reconstruction-from-history
//! exercised on every restart.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// Default reveal log path.
const DEFAULT_LOG_FILE: &str = "draftwatch_reveals.json";

/// One recorded reveal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevealEntry {
    pub team: String,
    pub revealed_at: DateTime<Utc>,
}

/// The persisted reveal sequence, oldest first.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RevealLog {
    pub reveals: Vec<RevealEntry>,
}

impl RevealLog {
    /// Append a reveal stamped with the current time.
    pub fn record(&mut self, team: &str) {
        self.reveals.push(RevealEntry {
            team: team.to_string(),
            revealed_at: Utc::now(),
        });
    }

    /// Team names in reveal order.
    pub fn names(&self) -> Vec<String> {
        self.reveals.iter().map(|e| e.team.clone()).collect()
    }

    pub fn clear(&mut self) {
        self.reveals.clear();
    }
}

/// Save the reveal log to a JSON file.
pub fn save_log(log: &RevealLog, path: Option<&str>) -> Result<()> {
    let path = path.unwrap_or(DEFAULT_LOG_FILE);
    let json = serde_json::to_string_pretty(log)
        .context("Failed to serialise reveal log")?;

    std::fs::write(path, &json)
        .context(format!("Failed to write reveal log to {path}"))?;

    debug!(path, reveals = log.reveals.len(), "Reveal log saved");
    Ok(())
}

/// Load the reveal log from a JSON file.
/// Returns None if the file doesn't exist (fresh lottery).
pub fn load_log(path: Option<&str>) -> Result<Option<RevealLog>> {
    let path = path.unwrap_or(DEFAULT_LOG_FILE);

    if !Path::new(path).exists() {
        info!(path, "No reveal log found, starting fresh");
        return Ok(None);
    }

    let json = std::fs::read_to_string(path)
        .context(format!("Failed to read reveal log from {path}"))?;

    let log: RevealLog = serde_json::from_str(&json)
        .context(format!("Failed to parse reveal log from {path}"))?;

    info!(path, reveals = log.reveals.len(), "Reveal log loaded from disk");

    Ok(Some(log))
}

/// Delete the reveal log (for testing or reset).
pub fn delete_log(path: Option<&str>) -> Result<()> {
    let path = path.unwrap_or(DEFAULT_LOG_FILE);
    if Path::new(path).exists() {
        std::fs::remove_file(path)
            .context(format!("Failed to delete reveal log {path}"))?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
