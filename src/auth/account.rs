//! Identity records shared by the local cache and the remote directory.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An account as held by the local cache.
///
/// `id` is remote-assigned, globally unique and immutable; `username` is the
/// local lookup key and unique within the cache. `credential_digest` is
/// opaque to this system: the remote verifier is the sole judge of secrets,
/// so the digest is carried but never compared locally.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    pub username: String,
    pub employee_id: String,
    pub credential_digest: String,
    pub is_synced: bool,
    pub is_premium: bool,
    pub role: Option<String>,
}

/// Full profile record served by the remote directory, keyed by account id.
///
/// Besides the account fields it carries the account's permission list,
/// which the slow path persists into the local cache on hydration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub id: Uuid,
    pub username: String,
    pub employee_id: String,
    pub credential_digest: String,
    #[serde(default)]
    pub is_premium: bool,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub permissions: Vec<String>,
}

impl Account {
    /// Build a cache-ready account from a freshly fetched remote profile.
    /// Records hydrated this way are marked `is_synced`.
    #[must_use]
    pub fn from_profile(profile: &ProfileRecord) -> Self {
        Self {
            id: profile.id,
            username: profile.username.clone(),
            employee_id: profile.employee_id.clone(),
            credential_digest: profile.credential_digest.clone(),
            is_synced: true,
            is_premium: profile.is_premium,
            role: profile.role.clone(),
        }
    }
}
