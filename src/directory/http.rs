//! HTTP implementation of the remote directory.
//!
//! Talks JSON to the identity provider's REST surface:
//!
//! - `GET  {base}/v1/directory/{username}`
//! - `POST {base}/v1/credentials/verify`
//! - `GET  {base}/v1/profiles/{id}`
//! - `POST {base}/v1/sessions/revoke`
//!
//! Every request carries a bounded timeout; timeouts, connection failures
//! and 5xx responses surface as [`DirectoryError::Unavailable`] so callers
//! can offer a retry.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;
use tracing::{info_span, Instrument};
use uuid::Uuid;

use crate::auth::ProfileRecord;
use crate::directory::{Directory, DirectoryEntry, DirectoryError};

pub struct HttpDirectory {
    client: Client,
    base_url: String,
}

#[derive(Deserialize)]
struct VerifyResponse {
    account_id: Uuid,
}

impl HttpDirectory {
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(crate::APP_USER_AGENT)
            .timeout(timeout)
            .build()
            .context("failed to build directory HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

fn transport_fault(err: &reqwest::Error) -> DirectoryError {
    DirectoryError::Unavailable(err.to_string())
}

#[async_trait]
impl Directory for HttpDirectory {
    async fn resolve(&self, username: &str) -> Result<Option<DirectoryEntry>, DirectoryError> {
        let url = self.endpoint(&format!("/v1/directory/{username}"));
        let span = info_span!("directory.request", http.method = "GET", url = %url);
        let response = self
            .client
            .get(&url)
            .send()
            .instrument(span)
            .await
            .map_err(|err| transport_fault(&err))?;

        match response.status() {
            StatusCode::OK => {
                let entry: DirectoryEntry = response
                    .json()
                    .await
                    .map_err(|err| transport_fault(&err))?;
                Ok(Some(entry))
            }
            StatusCode::NOT_FOUND => Ok(None),
            status => Err(DirectoryError::Unavailable(format!(
                "directory lookup returned {status}"
            ))),
        }
    }

    async fn verify(&self, email: &str, secret: &SecretString) -> Result<Uuid, DirectoryError> {
        let url = self.endpoint("/v1/credentials/verify");
        let span = info_span!("directory.request", http.method = "POST", url = %url);
        // The secret leaves the process only here, inside the request body.
        let body = json!({
            "email": email,
            "secret": secret.expose_secret(),
        });
        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .instrument(span)
            .await
            .map_err(|err| transport_fault(&err))?;

        match response.status() {
            StatusCode::OK => {
                let payload: VerifyResponse = response
                    .json()
                    .await
                    .map_err(|err| transport_fault(&err))?;
                Ok(payload.account_id)
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::NOT_FOUND => {
                Err(DirectoryError::CredentialRejected)
            }
            status => Err(DirectoryError::Unavailable(format!(
                "verifier returned {status}"
            ))),
        }
    }

    async fn fetch_profile(&self, id: Uuid) -> Result<Option<ProfileRecord>, DirectoryError> {
        let url = self.endpoint(&format!("/v1/profiles/{id}"));
        let span = info_span!("directory.request", http.method = "GET", url = %url);
        let response = self
            .client
            .get(&url)
            .send()
            .instrument(span)
            .await
            .map_err(|err| transport_fault(&err))?;

        match response.status() {
            StatusCode::OK => {
                let profile: ProfileRecord = response
                    .json()
                    .await
                    .map_err(|err| transport_fault(&err))?;
                Ok(Some(profile))
            }
            StatusCode::NOT_FOUND => Ok(None),
            status => Err(DirectoryError::Unavailable(format!(
                "profile fetch returned {status}"
            ))),
        }
    }

    async fn revoke_session(&self) -> Result<(), DirectoryError> {
        let url = self.endpoint("/v1/sessions/revoke");
        let span = info_span!("directory.request", http.method = "POST", url = %url);
        let response = self
            .client
            .post(&url)
            .send()
            .instrument(span)
            .await
            .map_err(|err| transport_fault(&err))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(DirectoryError::Unavailable(format!(
                "session revocation returned {}",
                response.status()
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_trims_trailing_slash() -> Result<()> {
        let directory = HttpDirectory::new("https://id.example.com/", Duration::from_secs(5))?;
        assert_eq!(
            directory.endpoint("/v1/directory/alice"),
            "https://id.example.com/v1/directory/alice"
        );
        Ok(())
    }

    #[test]
    fn endpoint_keeps_base_path() -> Result<()> {
        let directory = HttpDirectory::new("https://example.com/idp", Duration::from_secs(5))?;
        assert_eq!(
            directory.endpoint("/v1/sessions/revoke"),
            "https://example.com/idp/v1/sessions/revoke"
        );
        Ok(())
    }
}
