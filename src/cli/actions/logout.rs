use anyhow::Result;

use crate::auth::AuthService;
use crate::cli::actions::{open_cache, open_directory};
use crate::cli::globals::GlobalArgs;

/// Handle the logout action: revoke the remote session.
///
/// # Errors
/// Returns an error if wiring fails.
pub async fn handle(globals: &GlobalArgs) -> Result<()> {
    let directory = open_directory(globals)?;
    let cache = open_cache(globals).await?;
    let service = AuthService::new(directory, cache);

    service.logout().await;
    println!("Logged out");
    Ok(())
}
