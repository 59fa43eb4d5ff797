//! Durable storage for session cookies.

use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::cookie::SessionCookie;
use crate::error::{ScrapeError, ScrapeResult};

/// Read/write access to the persisted cookie collection.
///
/// `load` returns `Ok(None)` when nothing has ever been saved.
pub trait SessionStore {
    fn load(&self) -> ScrapeResult<Option<Vec<SessionCookie>>>;
    fn save(&self, cookies: &[SessionCookie]) -> ScrapeResult<()>;
}

/// Session cookies kept as a JSON array in a single file.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> ScrapeResult<Option<Vec<SessionCookie>>> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No session file at {}", self.path.display());
                return Ok(None);
            }
            Err(e) => {
                return Err(ScrapeError::Session(format!(
                    "Failed to read {}: {e}",
                    self.path.display()
                )));
            }
        };

        let cookies: Vec<SessionCookie> = serde_json::from_str(&raw).map_err(|e| {
            ScrapeError::Session(format!("Malformed session file {}: {e}", self.path.display()))
        })?;

        debug!(
            "Loaded {} cookies from {}",
            cookies.len(),
            self.path.display()
        );
        Ok(Some(cookies))
    }

    fn save(&self, cookies: &[SessionCookie]) -> ScrapeResult<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(cookies)
            .map_err(|e| ScrapeError::Session(format!("Failed to encode cookies: {e}")))?;
        std::fs::write(&self.path, json)?;

        info!("Saved {} cookies to {}", cookies.len(), self.path.display());
        Ok(())
    }
}
