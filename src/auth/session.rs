//! Session state machine.
//!
//! One logical session per [`crate::auth::AuthService`]. Transitions:
//! `Idle -> Loading -> {Authenticated | Failed}`, `Failed -> Loading`
//! (retry), `Failed -> Idle` (clear-error), and any state back to `Idle`
//! via logout. The session holds a transient reference to the authenticated
//! account for this process only; it is never written back into the cache.

use std::collections::HashSet;

use crate::auth::{Account, LoginError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionStatus {
    #[default]
    Idle,
    Loading,
    Authenticated,
    Failed(LoginError),
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    account: Option<Account>,
    permissions: HashSet<String>,
    status: SessionStatus,
}

impl Session {
    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    #[must_use]
    pub fn account(&self) -> Option<&Account> {
        self.account.as_ref()
    }

    #[must_use]
    pub fn permissions(&self) -> &HashSet<String> {
        &self.permissions
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.status == SessionStatus::Authenticated
    }

    /// User-safe message for a failed login, if any.
    #[must_use]
    pub fn error_message(&self) -> Option<String> {
        match self.status {
            SessionStatus::Failed(reason) => Some(reason.to_string()),
            _ => None,
        }
    }

    /// Enter `Loading` if a login may start now.
    ///
    /// Returns false while a login is already in flight or a user is still
    /// authenticated; callers must not race a second attempt.
    pub(crate) fn begin_login(&mut self) -> bool {
        match self.status {
            SessionStatus::Idle | SessionStatus::Failed(_) => {
                self.status = SessionStatus::Loading;
                true
            }
            SessionStatus::Loading | SessionStatus::Authenticated => false,
        }
    }

    pub(crate) fn authenticate(&mut self, account: Account, permissions: HashSet<String>) {
        self.account = Some(account);
        self.permissions = permissions;
        self.status = SessionStatus::Authenticated;
    }

    pub(crate) fn fail(&mut self, reason: LoginError) {
        self.account = None;
        self.permissions.clear();
        self.status = SessionStatus::Failed(reason);
    }

    /// Drop a `Failed` payload without touching account state.
    pub(crate) fn clear_error(&mut self) {
        if matches!(self.status, SessionStatus::Failed(_)) {
            self.status = SessionStatus::Idle;
        }
    }

    pub(crate) fn logout(&mut self) {
        *self = Self::default();
    }
}
