//! `generate-secrets` command handler.

use std::path::Path;

use crate::cli::output;
use crate::core::secrets;
use crate::error::Result;

/// Generate the secret catalog and merge it into `env_file`.
///
/// Reports key names only; values never reach stdout.
pub fn execute(env_file: &Path) -> Result<()> {
    println!("Generating secure secrets...");

    let report = secrets::rotate_into(env_file)?;

    for key in &report.updated {
        output::dimmed(&format!("  rotated {}", output::key(key)));
    }
    for key in &report.added {
        output::dimmed(&format!("  added {}", output::key(key)));
    }

    output::success(&format!(
        "secrets written to {}",
        output::path(&env_file.display().to_string())
    ));

    Ok(())
}
