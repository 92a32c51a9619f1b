//! # Session
//!
//! The bearer token and the signed-in user, behind a single accessor/mutator
//! pair ([`SessionManager`]) that is injected into the API client.
//!
//! Writers: login/register success, explicit logout, and the 401 handler.
//! Reader: every outbound request.
//!
//! ## Invalidation
//!
//! A 401 tears down the session the failing request was authenticated with,
//! and only that one. The check-and-clear happens under one write lock, so a
//! burst of concurrent 401s clears the token and redirects exactly once, and a
//! late 401 from before a fresh login cannot log the new session out.

use crate::core::error::{AppError, Result};
use crate::core::service::{Navigator, SessionStore};
use parking_lot::{Mutex, RwLock};
use shared::{AuthResponse, UserInfo};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{error, info, warn};

/// An authenticated user context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    /// Known after login/register, or after boot-time validation.
    pub user: Option<UserInfo>,
}

/// Owns the current session and its durable copy.
pub struct SessionManager {
    store: Arc<dyn SessionStore>,
    navigator: Arc<dyn Navigator>,
    current: RwLock<Option<Session>>,
}

impl SessionManager {
    /// Restore any persisted token. The user is unknown until validated.
    pub fn new(store: Arc<dyn SessionStore>, navigator: Arc<dyn Navigator>) -> Self {
        let current = store.load().map(|token| Session { token, user: None });
        if current.is_some() {
            info!("Restored persisted session token");
        }
        Self {
            store,
            navigator,
            current: RwLock::new(current),
        }
    }

    /// A manager with an in-memory store and a navigator that does nothing.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemorySessionStore::default()), Arc::new(NoopNavigator))
    }

    pub fn token(&self) -> Option<String> {
        self.current.read().as_ref().map(|s| s.token.clone())
    }

    pub fn user(&self) -> Option<UserInfo> {
        self.current.read().as_ref().and_then(|s| s.user.clone())
    }

    pub fn snapshot(&self) -> Option<Session> {
        self.current.read().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.read().is_some()
    }

    /// Replace the session wholesale with a freshly issued one.
    pub fn establish(&self, auth: &AuthResponse) -> Result<()> {
        if auth.token.trim().is_empty() {
            return Err(AppError::Session("backend issued an empty token".to_string()));
        }
        let mut current = self.current.write();
        self.store.save(&auth.token)?;
        *current = Some(Session {
            token: auth.token.clone(),
            user: Some(auth.user.clone()),
        });
        info!(user_id = auth.user.id, "Session established");
        Ok(())
    }

    /// Attach the user resolved during boot-time validation.
    ///
    /// Ignored when the token changed in the meantime.
    pub fn attach_user(&self, token: &str, user: UserInfo) {
        let mut current = self.current.write();
        if let Some(session) = current.as_mut().filter(|s| s.token == token) {
            session.user = Some(user);
        }
    }

    /// Explicit logout. No redirect: the caller is already navigating.
    pub fn logout(&self) -> Result<()> {
        let mut current = self.current.write();
        *current = None;
        self.store.clear()?;
        info!("Logged out");
        Ok(())
    }

    /// Handle a 401 received by a request that carried `token_used`.
    ///
    /// Returns `true` when this call tore the session down (and redirected).
    pub fn invalidate(&self, token_used: Option<&str>) -> bool {
        let Some(token_used) = token_used else {
            return false;
        };

        {
            let mut current = self.current.write();
            match current.as_ref() {
                Some(session) if session.token == token_used => {}
                _ => return false,
            }
            *current = None;
            if let Err(e) = self.store.clear() {
                error!(error = %e, "Failed to remove persisted token after 401");
            }
        }

        warn!("Session rejected by backend, redirecting to login");
        self.navigator.redirect_to_login();
        true
    }
}

/// Token kept in process memory only.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    token: Mutex<Option<String>>,
}

impl MemorySessionStore {
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Option<String> {
        self.token.lock().clone()
    }

    fn save(&self, token: &str) -> Result<()> {
        *self.token.lock() = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.token.lock() = None;
        Ok(())
    }
}

/// Token persisted in a single file, surviving restarts.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Option<String> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim();
                (!token.is_empty()).then(|| token.to_string())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Unreadable session file, treating as logged out");
                None
            }
        }
    }

    fn save(&self, token: &str) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, token)?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNavigator;

impl Navigator for NoopNavigator {
    fn redirect_to_login(&self) {}
}

/// Counts redirects.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    redirects: AtomicUsize,
}

impl RecordingNavigator {
    pub fn redirects(&self) -> usize {
        self.redirects.load(Ordering::SeqCst)
    }
}

impl Navigator for RecordingNavigator {
    fn redirect_to_login(&self) {
        self.redirects.fetch_add(1, Ordering::SeqCst);
    }
}
