//! Remote directory collaborator boundary.
//!
//! The directory resolves a username to the identifier the remote verifier
//! expects, verifies credential pairs, serves full profile records, and
//! revokes remote sessions on logout. The engine only ever talks to this
//! trait; [`HttpDirectory`] is the production implementation.

use async_trait::async_trait;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::auth::ProfileRecord;

pub mod http;
pub use http::HttpDirectory;

/// Remote-only `username -> email` mapping entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    pub email: String,
}

#[derive(Debug, Error)]
pub enum DirectoryError {
    /// The verifier rejected the credential pair. Implementations must not
    /// distinguish an unknown account from a wrong secret.
    #[error("credential rejected")]
    CredentialRejected,
    /// Transport failure, timeout, or remote outage. Detail is for logs only.
    #[error("remote directory unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait Directory: Send + Sync {
    /// Resolve a username to its directory entry. `Ok(None)` means the
    /// username has no entry; transport faults are `Err`.
    async fn resolve(&self, username: &str) -> Result<Option<DirectoryEntry>, DirectoryError>;

    /// Verify a credential pair, returning the verified account id.
    async fn verify(&self, email: &str, secret: &SecretString) -> Result<Uuid, DirectoryError>;

    /// Fetch the full profile record for a verified account id.
    async fn fetch_profile(&self, id: Uuid) -> Result<Option<ProfileRecord>, DirectoryError>;

    /// Revoke the remote session on logout.
    async fn revoke_session(&self) -> Result<(), DirectoryError>;
}
