use std::sync::Arc;

use anyhow::{Context, Result};
use secrecy::SecretString;
use url::Url;

use crate::cache::SqliteCache;
use crate::cli::globals::GlobalArgs;
use crate::directory::HttpDirectory;

pub mod clear;
pub mod login;
pub mod logout;
pub mod status;

#[derive(Debug)]
pub enum Action {
    Login {
        username: String,
        password: SecretString,
    },
    Logout,
    Status {
        username: String,
    },
    ClearCache,
}

pub(crate) async fn open_cache(globals: &GlobalArgs) -> Result<Arc<SqliteCache>> {
    let cache = SqliteCache::connect(&globals.dsn)
        .await
        .with_context(|| format!("failed to open local cache at {}", globals.dsn))?;
    Ok(Arc::new(cache))
}

pub(crate) fn open_directory(globals: &GlobalArgs) -> Result<Arc<HttpDirectory>> {
    let remote_url = globals
        .remote_url
        .as_deref()
        .context("missing required argument: --remote-url")?;
    Url::parse(remote_url).context("invalid remote URL")?;
    Ok(Arc::new(HttpDirectory::new(remote_url, globals.timeout)?))
}
