//! Closed error taxonomy for login outcomes.
//!
//! Every internal fault is mapped to exactly one of these reasons before it
//! reaches session state; `Display` is the user-safe message. Full internal
//! detail is logged at the point of failure and never carried here, so no
//! raw error text can leak into a user-visible field.

use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum LoginError {
    /// Wrong username or wrong secret, deliberately indistinguishable so the
    /// error channel cannot be used to enumerate usernames.
    #[error("invalid username or password")]
    InvalidCredentials,
    /// The local cache and the remote directory disagree about the account's
    /// existence. Needs administrative intervention, not a retry.
    #[error("account records are inconsistent, contact support")]
    Inconsistent,
    /// Credentials verified but no profile record exists for the account.
    #[error("account profile is missing, contact support")]
    ProfileMissing,
    /// Remote outage or timeout. Safe to retry.
    #[error("authentication service unavailable, try again")]
    VerifierUnavailable,
    /// Catch-all for internal faults; still degrades to a generic message.
    #[error("login failed, try again")]
    Unknown,
}

impl LoginError {
    /// Whether a caller may usefully offer a retry for this reason.
    #[must_use]
    pub const fn is_retryable(self) -> bool {
        matches!(self, Self::VerifierUnavailable)
    }
}
