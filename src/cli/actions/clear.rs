use anyhow::Result;

use crate::cache::CacheStore;
use crate::cli::actions::open_cache;
use crate::cli::globals::GlobalArgs;

/// Handle the clear-cache action.
///
/// # Errors
/// Returns an error if the cache cannot be cleared.
pub async fn handle(globals: &GlobalArgs) -> Result<()> {
    let cache = open_cache(globals).await?;
    cache.clear().await?;
    println!("Local cache cleared");
    Ok(())
}
