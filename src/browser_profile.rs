//! Chrome user-data directory management
//!
//! Each launch gets its own UUID-named profile directory so concurrent or
//! crashed runs never contend for Chrome's SingletonLock.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::utils::PROFILE_DIR_PREFIX;

/// RAII wrapper for a Chrome profile directory
///
/// Throwaway profiles are removed on drop. Caller-supplied directories are
/// left in place.
#[derive(Debug)]
pub struct BrowserProfile {
    path: PathBuf,
    cleanup_on_drop: bool,
}

impl BrowserProfile {
    /// Use an existing (or to-be-created) directory that outlives the browser.
    pub fn persistent(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        std::fs::create_dir_all(&path)
            .with_context(|| format!("Failed to create profile directory: {}", path.display()))?;
        Ok(Self {
            path,
            cleanup_on_drop: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn is_temporary(&self) -> bool {
        self.cleanup_on_drop
    }
}

impl Drop for BrowserProfile {
    fn drop(&mut self) {
        if self.cleanup_on_drop && self.path.exists() {
            info!("BrowserProfile cleanup: removing {}", self.path.display());
            if let Err(e) = std::fs::remove_dir_all(&self.path) {
                warn!(
                    "Failed to cleanup profile directory {}: {}",
                    self.path.display(),
                    e
                );
            }
        }
    }
}

/// Create a unique, self-deleting Chrome profile directory in the temp dir
pub fn create_unique_profile() -> Result<BrowserProfile> {
    create_unique_profile_in(&std::env::temp_dir())
}

/// Create a unique, self-deleting Chrome profile directory under `parent`
pub fn create_unique_profile_in(parent: &Path) -> Result<BrowserProfile> {
    let path = parent.join(format!("{PROFILE_DIR_PREFIX}_{}", Uuid::new_v4()));

    debug!("Creating unique Chrome profile: {}", path.display());

    // create_dir (not create_dir_all) so a UUID collision fails loudly
    std::fs::create_dir(&path)
        .with_context(|| format!("Failed to create profile directory: {}", path.display()))?;

    Ok(BrowserProfile {
        path,
        cleanup_on_drop: true,
    })
}
