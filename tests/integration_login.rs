//! End-to-end login flow against an in-process fake identity provider.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use secrecy::SecretString;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use ensaluti::auth::{AuthService, LoginError, ProfileRecord, SessionStatus};
use ensaluti::cache::{CacheStore, SqliteCache};
use ensaluti::directory::HttpDirectory;

#[derive(Default)]
struct FakeRemote {
    directory: HashMap<String, String>,
    credentials: HashMap<String, (String, Uuid)>,
    profiles: HashMap<Uuid, ProfileRecord>,
    profile_hits: AtomicUsize,
    revocations: AtomicUsize,
}

impl FakeRemote {
    fn with_user(mut self, profile: ProfileRecord, email: &str, secret: &str) -> Self {
        self.directory
            .insert(profile.username.clone(), email.to_string());
        self.credentials
            .insert(email.to_string(), (secret.to_string(), profile.id));
        self.profiles.insert(profile.id, profile);
        self
    }
}

#[derive(Deserialize)]
struct VerifyRequest {
    email: String,
    secret: String,
}

async fn resolve(
    Path(username): Path<String>,
    Extension(state): Extension<Arc<FakeRemote>>,
) -> impl IntoResponse {
    match state.directory.get(&username) {
        Some(email) => (StatusCode::OK, Json(json!({ "email": email }))).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn verify(
    Extension(state): Extension<Arc<FakeRemote>>,
    Json(request): Json<VerifyRequest>,
) -> impl IntoResponse {
    match state.credentials.get(&request.email) {
        Some((expected, id)) if *expected == request.secret => {
            (StatusCode::OK, Json(json!({ "account_id": id }))).into_response()
        }
        _ => StatusCode::UNAUTHORIZED.into_response(),
    }
}

async fn profile(
    Path(id): Path<Uuid>,
    Extension(state): Extension<Arc<FakeRemote>>,
) -> impl IntoResponse {
    state.profile_hits.fetch_add(1, Ordering::SeqCst);
    match state.profiles.get(&id) {
        Some(profile) => (StatusCode::OK, Json(profile.clone())).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn revoke(Extension(state): Extension<Arc<FakeRemote>>) -> impl IntoResponse {
    state.revocations.fetch_add(1, Ordering::SeqCst);
    StatusCode::NO_CONTENT
}

async fn start_remote(state: Arc<FakeRemote>) -> Result<SocketAddr> {
    let app = Router::new()
        .route("/v1/directory/:username", get(resolve))
        .route("/v1/credentials/verify", post(verify))
        .route("/v1/profiles/:id", get(profile))
        .route("/v1/sessions/revoke", post(revoke))
        .layer(Extension(state));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .context("failed to bind fake remote")?;
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = axum::serve(listener, app.into_make_service()).await {
            eprintln!("fake remote stopped: {err}");
        }
    });

    Ok(addr)
}

fn alice_profile() -> ProfileRecord {
    ProfileRecord {
        id: Uuid::new_v4(),
        username: "alice".to_string(),
        employee_id: "E-100".to_string(),
        credential_digest: "digest".to_string(),
        is_premium: true,
        role: Some("pharmacist".to_string()),
        permissions: vec!["dispense".to_string(), "inventory".to_string()],
    }
}

fn secret(value: &str) -> SecretString {
    SecretString::from(value.to_string())
}

async fn service_for(addr: SocketAddr) -> Result<(AuthService, Arc<SqliteCache>)> {
    let directory = Arc::new(HttpDirectory::new(
        &format!("http://{addr}"),
        Duration::from_secs(5),
    )?);
    let cache = Arc::new(SqliteCache::connect("sqlite::memory:").await?);
    Ok((AuthService::new(directory, cache.clone()), cache))
}

#[tokio::test]
async fn full_hybrid_login_flow() -> Result<()> {
    let alice = alice_profile();
    let alice_id = alice.id;
    let remote = Arc::new(FakeRemote::default().with_user(alice, "alice@example.com", "secret1"));
    let addr = start_remote(remote.clone()).await?;
    let (service, cache) = service_for(addr).await?;

    // Cold cache: slow path hydrates the account and its permissions.
    service.login("alice", secret("secret1")).await;
    let session = service.session();
    assert_eq!(session.status(), SessionStatus::Authenticated);
    let account = session.account().context("missing account")?;
    assert_eq!(account.id, alice_id);
    assert!(account.is_synced);
    assert!(session.permissions().contains("dispense"));

    let cached = cache.find("alice").await?.context("account not cached")?;
    assert!(cached.is_synced);
    assert_eq!(cache.permissions(alice_id).await?.len(), 2);
    assert_eq!(remote.profile_hits.load(Ordering::SeqCst), 1);

    // Logout revokes the remote session and resets local state.
    service.logout().await;
    assert_eq!(service.session().status(), SessionStatus::Idle);
    assert_eq!(remote.revocations.load(Ordering::SeqCst), 1);

    // Warm cache: the repeat login never re-fetches the profile.
    service.login("alice", secret("secret1")).await;
    assert_eq!(service.session().status(), SessionStatus::Authenticated);
    assert_eq!(remote.profile_hits.load(Ordering::SeqCst), 1);
    Ok(())
}

#[tokio::test]
async fn rejections_stay_generic_over_the_wire() -> Result<()> {
    let remote = Arc::new(FakeRemote::default().with_user(
        alice_profile(),
        "alice@example.com",
        "secret1",
    ));
    let addr = start_remote(remote).await?;
    let (service, _cache) = service_for(addr).await?;

    service.login("alice", secret("wrong")).await;
    let wrong_secret = service.session().error_message();

    service.login("ghost", secret("whatever")).await;
    let unknown_user = service.session().error_message();

    assert_eq!(wrong_secret.as_deref(), Some("invalid username or password"));
    assert_eq!(wrong_secret, unknown_user);
    Ok(())
}

#[tokio::test]
async fn unreachable_remote_is_retryable() -> Result<()> {
    // Bind then drop to get an address nobody is listening on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    drop(listener);

    let (service, _cache) = service_for(addr).await?;
    service.login("alice", secret("secret1")).await;

    match service.session().status() {
        SessionStatus::Failed(reason) => {
            assert_eq!(reason, LoginError::VerifierUnavailable);
            assert!(reason.is_retryable());
        }
        other => anyhow::bail!("unexpected status: {other:?}"),
    }
    Ok(())
}
