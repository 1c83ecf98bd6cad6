//! Persistence hooks for the cookie set.
//!
//! The session manager is decoupled from where cookies live between runs.
//! The default backend writes the full set to `cookies.json` in the profile
//! directory after every merge; tests use [`NoPersistence`].

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::cookie::Cookie;
use crate::error::Result;

/// Trait for cookie persistence backends.
///
/// `save` is invoked with the complete cookie set after every mutation,
/// so backends never have to reconcile partial updates.
pub trait PersistenceHook: Send + Sync {
    /// Load the persisted cookie set, if any exists.
    fn load(&self) -> Result<Option<Vec<Cookie>>>;

    /// Persist the complete cookie set.
    fn save(&self, cookies: &[Cookie]) -> Result<()>;
}

/// A no-op hook for in-memory only sessions.
#[derive(Debug, Clone, Default)]
pub struct NoPersistence;

impl PersistenceHook for NoPersistence {
    fn load(&self) -> Result<Option<Vec<Cookie>>> {
        Ok(None)
    }

    fn save(&self, _cookies: &[Cookie]) -> Result<()> {
        Ok(())
    }
}

/// Write-through JSON file persistence.
#[derive(Debug, Clone)]
pub struct CookieFilePersistence {
    path: PathBuf,
}

impl CookieFilePersistence {
    /// Create a hook backed by the given file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PersistenceHook for CookieFilePersistence {
    fn load(&self) -> Result<Option<Vec<Cookie>>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&self.path)?;
        let cookies: Vec<Cookie> = serde_json::from_str(&contents)?;
        debug!(path = %self.path.display(), count = cookies.len(), "Loaded cookies");
        Ok(Some(cookies))
    }

    fn save(&self, cookies: &[Cookie]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let contents = serde_json::to_string_pretty(cookies)?;
        std::fs::write(&self.path, contents)?;
        debug!(path = %self.path.display(), count = cookies.len(), "Saved cookies");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let hook = CookieFilePersistence::new(dir.path().join("cookies.json"));
        assert!(hook.load().unwrap().is_none());
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let hook = CookieFilePersistence::new(dir.path().join("cookies.json"));

        let cookies = vec![
            Cookie::access_token("tok", "api.example.com"),
            Cookie::new("sid", "abc", ".example.com", "/"),
        ];
        hook.save(&cookies).unwrap();

        let loaded = hook.load().unwrap().unwrap();
        assert_eq!(loaded, cookies);
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let hook = CookieFilePersistence::new(dir.path().join("profile/0/cookies.json"));

        hook.save(&[Cookie::new("a", "b", "c", "/")]).unwrap();
        assert!(hook.path().exists());
    }
}
