use anyhow::{bail, Context, Result};

use crate::auth::{AuthService, SessionStatus};
use crate::cli::actions::{open_cache, open_directory, Action};
use crate::cli::globals::GlobalArgs;

/// Handle the login action.
///
/// # Errors
/// Returns an error if wiring fails or the login is rejected; the error
/// message is the user-safe reason.
pub async fn handle(action: Action, globals: &GlobalArgs) -> Result<()> {
    let Action::Login { username, password } = action else {
        bail!("unexpected action");
    };

    let directory = open_directory(globals)?;
    let cache = open_cache(globals).await?;
    let service = AuthService::new(directory, cache);

    service.login(&username, password).await;

    let session = service.session();
    match session.status() {
        SessionStatus::Authenticated => {
            let account = session
                .account()
                .context("authenticated session has no account")?;
            println!("Logged in as {} ({})", account.username, account.id);
            if let Some(role) = &account.role {
                println!("Role: {role}");
            }
            let mut permissions: Vec<_> = session.permissions().iter().cloned().collect();
            permissions.sort();
            println!("Permissions: {}", permissions.join(", "));
            Ok(())
        }
        SessionStatus::Failed(reason) => bail!("{reason}"),
        SessionStatus::Idle | SessionStatus::Loading => bail!("login did not complete"),
    }
}
