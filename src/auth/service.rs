//! Consumer-facing auth service.
//!
//! Owns the single session for the process and runs the reconciliation
//! engine against the injected directory and cache collaborators. All
//! session mutation happens here; consumers read snapshots only.

use std::sync::Arc;

use parking_lot::RwLock;
use secrecy::SecretString;
use tracing::{info_span, warn, Instrument};
use ulid::Ulid;

use crate::auth::engine::Engine;
use crate::auth::{Session, SessionStatus};
use crate::cache::CacheStore;
use crate::directory::Directory;

pub struct AuthService {
    directory: Arc<dyn Directory>,
    cache: Arc<dyn CacheStore>,
    session: RwLock<Session>,
}

impl AuthService {
    #[must_use]
    pub fn new(directory: Arc<dyn Directory>, cache: Arc<dyn CacheStore>) -> Self {
        Self {
            directory,
            cache,
            session: RwLock::new(Session::default()),
        }
    }

    /// Run a login attempt and record its outcome in the session.
    ///
    /// The session moves to `Loading` for the duration of the attempt and
    /// ends in `Authenticated` or `Failed`. A call while a login is already
    /// in flight, or while a user is still authenticated, is refused and
    /// leaves the session untouched.
    pub async fn login(&self, username: &str, secret: SecretString) {
        // The lock is never held across an await point.
        if !self.session.write().begin_login() {
            warn!(username, "login refused, session is busy or authenticated");
            return;
        }

        let attempt = Ulid::new();
        let span = info_span!("auth.login", attempt = %attempt);
        let engine = Engine::new(self.directory.as_ref(), self.cache.as_ref());
        let result = engine.login(username, &secret).instrument(span).await;

        let mut session = self.session.write();
        match result {
            Ok(success) => session.authenticate(success.account, success.permissions),
            Err(reason) => session.fail(reason),
        }
    }

    /// Revoke the remote session and reset local session state.
    ///
    /// Local state is always cleared; a failing remote revocation is logged
    /// and must not wedge the device into a logged-in surface.
    pub async fn logout(&self) {
        if let Err(err) = self.directory.revoke_session().await {
            warn!("remote session revocation failed: {err}");
        }
        self.session.write().logout();
    }

    /// Clear a `Failed` payload without touching account state.
    pub fn clear_error(&self) {
        self.session.write().clear_error();
    }

    /// Read-only snapshot of the current session.
    #[must_use]
    pub fn session(&self) -> Session {
        self.session.read().clone()
    }

    /// Convenience for callers gating submission on an in-flight login.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.session.read().status() == SessionStatus::Loading
    }
}
