//! The session manager: in-memory cookie set plus write-through persistence.

use std::path::Path;

use parking_lot::Mutex;
use tracing::{debug, info};

use crate::cookie::{Cookie, ACCESS_TOKEN_COOKIE};
use crate::error::Result;
use crate::persistence::{CookieFilePersistence, NoPersistence, PersistenceHook};

/// File name used for cookie persistence inside a profile directory.
const COOKIES_FILE: &str = "cookies.json";

/// Holds the cookies authenticating requests to the vendor API.
///
/// Every authenticated call may mutate session state even on success: the
/// vendor rotates cookies on responses, and [`SessionManager::merge`] folds
/// them back in and persists the result.
pub struct SessionManager {
    cookies: Mutex<Vec<Cookie>>,
    hook: Box<dyn PersistenceHook>,
}

impl SessionManager {
    /// Create a session backed by the given persistence hook.
    ///
    /// Any previously persisted cookie set is loaded as the starting state.
    pub fn new(hook: Box<dyn PersistenceHook>) -> Result<Self> {
        let cookies = hook.load()?.unwrap_or_default();
        if !cookies.is_empty() {
            info!(count = cookies.len(), "Restored persisted session cookies");
        }
        Ok(Self {
            cookies: Mutex::new(cookies),
            hook,
        })
    }

    /// Create a session persisted to `<profile_dir>/cookies.json`.
    pub fn with_profile_dir(profile_dir: impl AsRef<Path>) -> Result<Self> {
        let profile_dir = profile_dir.as_ref();
        if !profile_dir.exists() {
            std::fs::create_dir_all(profile_dir)?;
        }
        Self::new(Box::new(CookieFilePersistence::new(
            profile_dir.join(COOKIES_FILE),
        )))
    }

    /// Create an in-memory session with no persistence.
    pub fn in_memory() -> Self {
        Self {
            cookies: Mutex::new(Vec::new()),
            hook: Box::new(NoPersistence),
        }
    }

    /// Append a synthetic access-token cookie granting API access.
    pub fn add_access_token(&self, token: &str, domain: &str) {
        self.cookies
            .lock()
            .push(Cookie::access_token(token, domain));
    }

    /// Render all held cookies as a single `Cookie` header value.
    pub fn cookie_header(&self) -> String {
        self.cookies
            .lock()
            .iter()
            .map(|c| format!("{}={}", c.name, c.value))
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// Merge cookies observed from a response into the session.
    ///
    /// Same-identity `(name, domain, path)` entries are replaced in place;
    /// new identities are appended. The order of unrelated cookies is
    /// preserved. The full set is persisted afterwards.
    pub fn merge(&self, observed: Vec<Cookie>) -> Result<()> {
        let snapshot = {
            let mut cookies = self.cookies.lock();
            for cookie in observed {
                match cookies
                    .iter_mut()
                    .find(|c| c.identity() == cookie.identity())
                {
                    Some(existing) => *existing = cookie,
                    None => cookies.push(cookie),
                }
            }
            cookies.clone()
        };
        debug!(count = snapshot.len(), "Merged response cookies");
        self.hook.save(&snapshot)
    }

    /// Remove every access-token cookie and persist the result.
    ///
    /// Invoked when the vendor rate-limits the current token.
    pub fn remove_access_token(&self) -> Result<()> {
        let snapshot = {
            let mut cookies = self.cookies.lock();
            cookies.retain(|c| c.name != ACCESS_TOKEN_COOKIE);
            cookies.clone()
        };
        info!("Access token removed from session");
        self.hook.save(&snapshot)
    }

    /// Snapshot of the current cookie set.
    pub fn cookies(&self) -> Vec<Cookie> {
        self.cookies.lock().clone()
    }

    /// Whether the session holds no cookies at all.
    pub fn is_empty(&self) -> bool {
        self.cookies.lock().is_empty()
    }
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("cookie_count", &self.cookies.lock().len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cookie(name: &str, value: &str) -> Cookie {
        Cookie::new(name, value, ".example.com", "/")
    }

    #[test]
    fn test_merge_replaces_same_identity() {
        let session = SessionManager::in_memory();
        session.merge(vec![cookie("sid", "old")]).unwrap();
        session.merge(vec![cookie("sid", "new")]).unwrap();

        let cookies = session.cookies();
        assert_eq!(cookies.len(), 1);
        assert_eq!(cookies[0].value, "new");
    }

    #[test]
    fn test_merge_appends_new_identity() {
        let session = SessionManager::in_memory();
        session.merge(vec![cookie("a", "1")]).unwrap();
        // Same name, different path — a distinct identity.
        session
            .merge(vec![Cookie::new("a", "2", ".example.com", "/api")])
            .unwrap();

        assert_eq!(session.cookies().len(), 2);
    }

    #[test]
    fn test_merge_preserves_order_of_unrelated_cookies() {
        let session = SessionManager::in_memory();
        session
            .merge(vec![cookie("a", "1"), cookie("b", "2"), cookie("c", "3")])
            .unwrap();
        session.merge(vec![cookie("b", "updated")]).unwrap();

        let names: Vec<_> = session.cookies().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert_eq!(session.cookies()[1].value, "updated");
    }

    #[test]
    fn test_cookie_header_joins_all_cookies() {
        let session = SessionManager::in_memory();
        session.add_access_token("tok", "api.example.com");
        session.merge(vec![cookie("sid", "abc")]).unwrap();

        assert_eq!(session.cookie_header(), "access_token=tok; sid=abc");
    }

    #[test]
    fn test_remove_access_token_strips_only_that_cookie() {
        let session = SessionManager::in_memory();
        session.add_access_token("tok", "api.example.com");
        session.merge(vec![cookie("sid", "abc")]).unwrap();

        session.remove_access_token().unwrap();

        let cookies = session.cookies();
        assert_eq!(cookies.len(), 1);
        assert_eq!(cookies[0].name, "sid");
    }

    #[test]
    fn test_profile_dir_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();

        {
            let session = SessionManager::with_profile_dir(dir.path()).unwrap();
            session.add_access_token("tok", "api.example.com");
            session.merge(vec![cookie("sid", "abc")]).unwrap();
        }

        let restored = SessionManager::with_profile_dir(dir.path()).unwrap();
        let names: Vec<_> = restored.cookies().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["access_token", "sid"]);
    }
}
