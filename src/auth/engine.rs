//! Reconciliation engine: the two-path login decision.
//!
//! The fast path serves usernames already present in the local cache: the
//! cache supplies the profile, the remote verifier confirms the secret.
//! Local presence accelerates lookup, never trust of the secret: every
//! login performs a live credential check. The slow path resolves, verifies
//! and fetches the full profile remotely, then hydrates the cache so the
//! next login for that username is fast.
//!
//! All faults are mapped to a [`LoginError`] at this boundary; full detail
//! is logged here and only the generic reason travels upward.

use std::collections::HashSet;

use regex::Regex;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, error, info, warn};

use crate::auth::{Account, LoginError};
use crate::cache::CacheStore;
use crate::directory::{Directory, DirectoryError};

pub(crate) struct LoginSuccess {
    pub(crate) account: Account,
    pub(crate) permissions: HashSet<String>,
}

pub(crate) struct Engine<'a> {
    directory: &'a dyn Directory,
    cache: &'a dyn CacheStore,
}

fn valid_username(username: &str) -> bool {
    Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]{0,63}$").is_ok_and(|regex| regex.is_match(username))
}

fn directory_fault(err: &DirectoryError) -> LoginError {
    match err {
        DirectoryError::CredentialRejected => {
            debug!("remote verifier rejected the credential pair");
            LoginError::InvalidCredentials
        }
        DirectoryError::Unavailable(detail) => {
            warn!("remote directory unavailable: {detail}");
            LoginError::VerifierUnavailable
        }
    }
}

impl<'a> Engine<'a> {
    pub(crate) fn new(directory: &'a dyn Directory, cache: &'a dyn CacheStore) -> Self {
        Self { directory, cache }
    }

    pub(crate) async fn login(
        &self,
        username: &str,
        secret: &SecretString,
    ) -> Result<LoginSuccess, LoginError> {
        let username = username.trim();
        if !valid_username(username) || secret.expose_secret().is_empty() {
            // Same generic reason as a remote rejection, and no remote call.
            debug!("malformed username or empty secret");
            return Err(LoginError::InvalidCredentials);
        }

        match self.cache.find(username).await {
            Ok(Some(account)) => self.fast_path(account, secret).await,
            Ok(None) => self.slow_path(username, secret).await,
            Err(err) => {
                error!(username, "cache lookup failed: {err}");
                Err(LoginError::Unknown)
            }
        }
    }

    /// Cached username: verify the secret remotely, trust the cache for
    /// profile attributes. No profile re-fetch.
    async fn fast_path(
        &self,
        account: Account,
        secret: &SecretString,
    ) -> Result<LoginSuccess, LoginError> {
        debug!(username = %account.username, "cached account found, taking fast path");

        let entry = self
            .directory
            .resolve(&account.username)
            .await
            .map_err(|err| directory_fault(&err))?;
        let Some(entry) = entry else {
            // The two stores disagree about the account's existence. Stop
            // here: no guessing, no verifier call, no cache mutation.
            error!(
                username = %account.username,
                id = %account.id,
                "cached account has no remote directory entry"
            );
            return Err(LoginError::Inconsistent);
        };

        let verified_id = self
            .directory
            .verify(&entry.email, secret)
            .await
            .map_err(|err| directory_fault(&err))?;
        if verified_id != account.id {
            warn!(
                cached = %account.id,
                verified = %verified_id,
                "verifier returned a different account id than the cache"
            );
        }

        let permissions = match self.cache.permissions(account.id).await {
            Ok(permissions) => permissions,
            Err(err) => {
                // A cached-permission read failure does not fail an
                // otherwise valid login.
                warn!(
                    id = %account.id,
                    "permission load failed, continuing with empty set: {err}"
                );
                HashSet::new()
            }
        };

        Ok(LoginSuccess {
            account,
            permissions,
        })
    }

    /// Locally unknown username: full remote resolution, verification and
    /// profile fetch, then cache hydration.
    async fn slow_path(
        &self,
        username: &str,
        secret: &SecretString,
    ) -> Result<LoginSuccess, LoginError> {
        debug!(username, "no cached account, taking slow path");

        let entry = self
            .directory
            .resolve(username)
            .await
            .map_err(|err| directory_fault(&err))?;
        let Some(entry) = entry else {
            // Must stay indistinguishable from a wrong secret.
            debug!(username, "username has no remote directory entry");
            return Err(LoginError::InvalidCredentials);
        };

        let id = self
            .directory
            .verify(&entry.email, secret)
            .await
            .map_err(|err| directory_fault(&err))?;

        let profile = self
            .directory
            .fetch_profile(id)
            .await
            .map_err(|err| directory_fault(&err))?;
        let Some(profile) = profile else {
            // Valid credentials but an unusable account: surfaced as its own
            // reason, and nothing is written to the cache.
            error!(%id, username, "verified account has no profile record");
            return Err(LoginError::ProfileMissing);
        };

        let account = Account::from_profile(&profile);
        self.cache.upsert(&account).await.map_err(|err| {
            error!(id = %account.id, "cache hydration failed: {err}");
            LoginError::Unknown
        })?;

        let permissions: HashSet<String> = profile.permissions.iter().cloned().collect();
        self.cache
            .set_permissions(account.id, &permissions)
            .await
            .map_err(|err| {
                error!(id = %account.id, "permission persist failed: {err}");
                LoginError::Unknown
            })?;

        info!(
            id = %account.id,
            username = %account.username,
            "account hydrated from remote profile"
        );

        Ok(LoginSuccess {
            account,
            permissions,
        })
    }
}
