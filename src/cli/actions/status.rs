use anyhow::{bail, Result};

use crate::cache::CacheStore;
use crate::cli::actions::{open_cache, Action};
use crate::cli::globals::GlobalArgs;

/// Handle the status action: inspect the local cache, no remote calls.
///
/// # Errors
/// Returns an error if the cache cannot be read.
pub async fn handle(action: Action, globals: &GlobalArgs) -> Result<()> {
    let Action::Status { username } = action else {
        bail!("unexpected action");
    };

    let cache = open_cache(globals).await?;
    let Some(account) = cache.find(&username).await? else {
        println!("No cached account for {username}");
        return Ok(());
    };

    println!("Username:    {}", account.username);
    println!("Account id:  {}", account.id);
    println!("Employee id: {}", account.employee_id);
    println!("Synced:      {}", account.is_synced);
    println!("Premium:     {}", account.is_premium);
    println!("Role:        {}", account.role.as_deref().unwrap_or("-"));

    let mut permissions: Vec<_> = cache.permissions(account.id).await?.into_iter().collect();
    permissions.sort();
    println!("Permissions: {}", permissions.join(", "));
    Ok(())
}
