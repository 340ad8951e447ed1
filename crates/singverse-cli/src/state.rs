//! Last reader position.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use singverse_bible::DEFAULT_ROUTE;
use std::fs;
use std::path::Path;

/// Persisted reader state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReaderState {
    /// Route of the last shown chapter or verse.
    pub last_route: String,
    pub updated_at: String,
}

impl ReaderState {
    pub fn new(route: impl Into<String>) -> Self {
        Self {
            last_route: route.into(),
            updated_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Loads the state file. A missing or unreadable file means no state.
    pub fn load(path: &Path) -> Option<Self> {
        let json = fs::read_to_string(path).ok()?;
        match serde_json::from_str(&json) {
            Ok(state) => Some(state),
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "ignoring corrupt state file");
                None
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create state directory: {}", parent.display())
            })?;
        }
        let json = serde_json::to_string_pretty(self).context("Failed to serialize state")?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write state file: {}", path.display()))?;
        Ok(())
    }
}

/// The route to resume at: the saved one if it is a reader route, else the
/// default.
pub fn resume_route(path: &Path) -> String {
    ReaderState::load(path)
        .map(|s| s.last_route)
        .filter(|r| r.starts_with('/'))
        .unwrap_or_else(|| DEFAULT_ROUTE.to_string())
}
