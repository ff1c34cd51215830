//! Generate cryptographically secure secrets and merge them into the
//! service's env file.

use std::path::PathBuf;

use clap::Parser;

use relctl::cli::{generate, output};
use relctl::core::constants;
use relctl::error::Error;

/// Generate secure secrets for the release service.
#[derive(Parser)]
#[command(
    name = "generate-secrets",
    about = "Generate secure secrets and merge them into the env file",
    version
)]
struct Cli {
    /// Target environment file
    #[arg(long, env = "ENV_FILE", default_value = constants::ENV_FILE)]
    env_file: PathBuf,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    relctl::cli::init_tracing(cli.verbose);

    if let Err(e) = generate::execute(&cli.env_file) {
        output::error(&e.to_string());
        if let Error::PermissionDenied(_) = &e {
            output::hint("check ownership of the target directory");
        }
        std::process::exit(1);
    }
}
