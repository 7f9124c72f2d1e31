use std::time::Duration;

use crate::cli::commands;

/// Arguments shared by every subcommand.
#[derive(Debug, Clone)]
pub struct GlobalArgs {
    pub remote_url: Option<String>,
    pub dsn: String,
    pub timeout: Duration,
}

impl GlobalArgs {
    #[must_use]
    pub fn from_matches(matches: &clap::ArgMatches) -> Self {
        Self {
            remote_url: matches.get_one::<String>(commands::ARG_REMOTE_URL).cloned(),
            dsn: matches
                .get_one::<String>(commands::ARG_DSN)
                .cloned()
                .unwrap_or_else(|| commands::DEFAULT_DSN.to_string()),
            timeout: Duration::from_secs(
                matches
                    .get_one::<u64>(commands::ARG_TIMEOUT)
                    .copied()
                    .unwrap_or(10),
            ),
        }
    }
}
