//! Change a user's password in the credential store, interactively or not.

use std::path::PathBuf;

use clap::Parser;

use relctl::cli::output;
use relctl::cli::passwd::{self, PasswdArgs};
use relctl::core::config::Config;
use relctl::core::constants;
use relctl::error::Error;

/// Change the admin password.
#[derive(Parser)]
#[command(
    name = "change-admin-password",
    about = "Change the admin password",
    version
)]
struct Cli {
    /// Admin username (defaults to the configured admin)
    #[arg(long)]
    username: Option<String>,

    /// Generate a random password instead of prompting
    #[arg(long)]
    random_password: bool,

    /// Length of the generated random password
    #[arg(long, requires = "random_password")]
    random_password_length: Option<usize>,

    /// User credential store
    #[arg(long, env = "USERS_FILE", default_value = constants::USERS_FILE)]
    users_file: PathBuf,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    relctl::cli::init_tracing(cli.verbose);

    let config = Config::from_env();

    let args = PasswdArgs {
        username: cli.username,
        random_password: cli.random_password,
        random_password_length: cli.random_password_length,
        users_file: cli.users_file,
    };

    if let Err(e) = passwd::execute(&config, args) {
        output::error(&e.to_string());
        match &e {
            Error::UserNotFound(_) => {
                output::hint("check --username or provision the user store first");
            }
            Error::PermissionDenied(_) => {
                output::hint("check ownership of the user store file");
            }
            _ => {}
        }
        std::process::exit(1);
    }
}
