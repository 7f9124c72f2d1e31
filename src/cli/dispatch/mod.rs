use anyhow::{Context, Result};
use secrecy::SecretString;

use crate::cli::actions::Action;
use crate::cli::commands;

pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    match matches.subcommand() {
        Some(("login", sub)) => {
            let username = sub
                .get_one::<String>(commands::ARG_USERNAME)
                .cloned()
                .context("missing required argument: --username")?;
            let password = sub
                .get_one::<String>(commands::ARG_PASSWORD)
                .cloned()
                .map(SecretString::from)
                .context("missing required argument: --password")?;
            Ok(Action::Login { username, password })
        }
        Some(("logout", _)) => Ok(Action::Logout),
        Some(("status", sub)) => {
            let username = sub
                .get_one::<String>(commands::ARG_USERNAME)
                .cloned()
                .context("missing required argument: --username")?;
            Ok(Action::Status { username })
        }
        Some(("clear-cache", _)) => Ok(Action::ClearCache),
        _ => anyhow::bail!("no subcommand provided"),
    }
}
