//! `change-admin-password` command handler.

use std::path::PathBuf;

use crate::cli::output;
use crate::core::config::Config;
use crate::core::passwd::{self, ChangeRequest, TerminalPrompt};
use crate::core::users::FileUserStore;
use crate::error::Result;

/// Parsed options for the password change.
pub struct PasswdArgs {
    pub username: Option<String>,
    pub random_password: bool,
    pub random_password_length: Option<usize>,
    pub users_file: PathBuf,
}

/// Resolve the request, run it against the file-backed user store, and
/// report. A generated password is printed exactly once, after the store
/// confirms the write.
pub fn execute(config: &Config, args: PasswdArgs) -> Result<()> {
    println!("Changing admin password...");

    let request = ChangeRequest::resolve(
        config,
        args.username,
        args.random_password,
        args.random_password_length,
    )?;

    let mut store = FileUserStore::new(args.users_file);
    let outcome = passwd::execute(request, config, &mut store, &mut TerminalPrompt)?;

    output::success(&format!(
        "password for {} updated",
        output::key(&outcome.username)
    ));
    if let Some(generated) = &outcome.generated {
        // The single disclosure point for a generated password.
        println!("New password: {}", generated.as_str());
    }

    Ok(())
}
