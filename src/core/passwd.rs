//! Admin password rotation.
//!
//! One invocation resolves a username, obtains a new password, and hands the
//! plaintext to the user store exactly once. The plaintext lives in
//! [`Zeroizing`] wrappers and is wiped as soon as the store call returns;
//! in random mode one copy survives just long enough for the single
//! disclosure print by the caller.

use std::io::{self, BufRead, IsTerminal};

use dialoguer::Password;
use tracing::{debug, info};
use zeroize::Zeroizing;

use crate::cli::output;
use crate::core::config::Config;
use crate::core::constants::{CONFIRM_ATTEMPTS, MAX_PASSWORD_LENGTH};
use crate::core::generate;
use crate::core::users::UserStore;
use crate::error::{Error, Result};

/// Where the new password comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordSource {
    /// Generate with the secret generator, disclose once.
    Random { length: usize },
    /// Hidden terminal prompt with confirmation.
    Prompt,
    /// Single line from piped stdin, no confirmation.
    Stdin,
}

/// A resolved change request.
#[derive(Debug)]
pub struct ChangeRequest {
    pub username: String,
    pub source: PasswordSource,
}

impl ChangeRequest {
    /// Resolve flags into a request. All validation happens here, before
    /// any side effect.
    pub fn resolve(
        config: &Config,
        username: Option<String>,
        random: bool,
        random_length: Option<usize>,
    ) -> Result<Self> {
        let username = username.unwrap_or_else(|| config.admin_username.clone());
        if username.trim().is_empty() {
            return Err(Error::Validation {
                field: "username",
                reason: "must not be empty".to_string(),
            });
        }

        let source = if random {
            let length = random_length.unwrap_or(config.default_password_length);
            if length == 0 || length > MAX_PASSWORD_LENGTH {
                return Err(Error::Validation {
                    field: "random-password-length",
                    reason: format!("must be between 1 and {}", MAX_PASSWORD_LENGTH),
                });
            }
            PasswordSource::Random { length }
        } else if io::stdin().is_terminal() {
            PasswordSource::Prompt
        } else {
            PasswordSource::Stdin
        };

        Ok(Self { username, source })
    }
}

/// Interactive input seam, mockable in tests.
pub trait PasswordPrompt {
    fn read_password(&mut self, prompt: &str) -> Result<Zeroizing<String>>;
}

/// Hidden-input prompt on the controlling terminal.
pub struct TerminalPrompt;

impl PasswordPrompt for TerminalPrompt {
    fn read_password(&mut self, prompt: &str) -> Result<Zeroizing<String>> {
        Ok(Zeroizing::new(
            Password::new().with_prompt(prompt).interact()?,
        ))
    }
}

/// Outcome of a successful change.
pub struct Outcome {
    pub username: String,
    /// Present only in random mode; printed once by the caller, then wiped.
    pub generated: Option<Zeroizing<String>>,
}

/// Run the change against `store`.
///
/// The store is called exactly once; there is no retry across the
/// username/password boundary.
pub fn execute(
    request: ChangeRequest,
    config: &Config,
    store: &mut dyn UserStore,
    prompt: &mut dyn PasswordPrompt,
) -> Result<Outcome> {
    let ChangeRequest { username, source } = request;
    debug!("changing password for {}", username);

    let (password, disclose) = match source {
        PasswordSource::Random { length } => {
            let value = generate::token(length)?;
            (value.clone(), Some(value))
        }
        PasswordSource::Prompt => (prompt_with_confirmation(config, prompt)?, None),
        PasswordSource::Stdin => (read_stdin_password(config)?, None),
    };

    store.set_password(&username, &password)?;
    drop(password);
    info!("password updated for {}", username);

    Ok(Outcome {
        username,
        generated: disclose,
    })
}

/// Prompt twice with hidden input; mismatches retry up to
/// [`CONFIRM_ATTEMPTS`] times before failing with `PasswordMismatch`.
fn prompt_with_confirmation(
    config: &Config,
    prompt: &mut dyn PasswordPrompt,
) -> Result<Zeroizing<String>> {
    for attempt in 1..=CONFIRM_ATTEMPTS {
        let password = prompt.read_password("New password")?;
        validate_password(config, &password)?;

        let confirmation = prompt.read_password("Confirm password")?;
        if *password == *confirmation {
            return Ok(password);
        }

        if attempt < CONFIRM_ATTEMPTS {
            output::warn("passwords do not match, try again");
        }
    }

    Err(Error::PasswordMismatch)
}

/// Piped mode: one line, no confirmation possible.
fn read_stdin_password(config: &Config) -> Result<Zeroizing<String>> {
    let mut line = Zeroizing::new(String::new());
    io::stdin().lock().read_line(&mut line)?;

    let password = Zeroizing::new(line.trim_end_matches(&['\r', '\n'][..]).to_string());
    validate_password(config, &password)?;
    Ok(password)
}

fn validate_password(config: &Config, password: &str) -> Result<()> {
    if password.trim().is_empty() {
        return Err(Error::Validation {
            field: "password",
            reason: "must not be empty".to_string(),
        });
    }
    if password.chars().count() < config.min_password_length {
        return Err(Error::Validation {
            field: "password",
            reason: format!(
                "must be at least {} characters long",
                config.min_password_length
            ),
        });
    }
    Ok(())
}
