use clap::{
    builder::styling::{AnsiColor, Effects, Styles},
    Arg, ColorChoice, Command,
};

pub mod logging;

pub const ARG_REMOTE_URL: &str = "remote-url";
pub const ARG_DSN: &str = "dsn";
pub const ARG_TIMEOUT: &str = "timeout";
pub const ARG_USERNAME: &str = "username";
pub const ARG_PASSWORD: &str = "password";

pub const DEFAULT_DSN: &str = "sqlite://ensaluti.db?mode=rwc";

pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let command = Command::new("ensaluti")
        .about("Hybrid local/remote login reconciliation")
        .version(env!("CARGO_PKG_VERSION"))
        .color(ColorChoice::Auto)
        .styles(styles)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new(ARG_REMOTE_URL)
                .short('r')
                .long("remote-url")
                .help("Identity provider base URL, example: https://id.example.com")
                .env("ENSALUTI_REMOTE_URL")
                .global(true),
        )
        .arg(
            Arg::new(ARG_DSN)
                .short('d')
                .long("dsn")
                .help("Local cache connection string")
                .default_value(DEFAULT_DSN)
                .env("ENSALUTI_DSN")
                .global(true),
        )
        .arg(
            Arg::new(ARG_TIMEOUT)
                .short('t')
                .long("timeout")
                .help("Timeout in seconds for each remote call")
                .default_value("10")
                .env("ENSALUTI_TIMEOUT")
                .global(true)
                .value_parser(clap::value_parser!(u64)),
        )
        .subcommand(
            Command::new("login")
                .about("Authenticate a user and hydrate the local cache")
                .arg(
                    Arg::new(ARG_USERNAME)
                        .short('u')
                        .long("username")
                        .help("Username to authenticate")
                        .required(true),
                )
                .arg(
                    Arg::new(ARG_PASSWORD)
                        .short('p')
                        .long("password")
                        .help("Password, prefer passing it via the environment")
                        .env("ENSALUTI_PASSWORD")
                        .hide_env_values(true)
                        .required(true),
                ),
        )
        .subcommand(Command::new("logout").about("Revoke the remote session and reset local state"))
        .subcommand(
            Command::new("status")
                .about("Inspect the locally cached account for a username")
                .arg(
                    Arg::new(ARG_USERNAME)
                        .short('u')
                        .long("username")
                        .help("Username to look up in the cache")
                        .required(true),
                ),
        )
        .subcommand(
            Command::new("clear-cache").about("Remove every cached account and permission set"),
        );

    logging::with_args(command)
}
