//! Runtime configuration.
//!
//! Resolved once at process start from environment variables and passed by
//! reference; nothing reads the environment after startup.

use tracing::warn;

/// Tool configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Username targeted when `--username` is omitted.
    pub admin_username: String,
    /// Minimum length accepted for operator-supplied passwords.
    pub min_password_length: usize,
    /// Length of generated passwords when no override is given.
    pub default_password_length: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            admin_username: "admin".to_string(),
            min_password_length: 16,
            default_password_length: 32,
        }
    }
}

impl Config {
    /// Build from `ADMIN_USERNAME`, `MIN_PASSWORD_LENGTH`, and
    /// `DEFAULT_PASSWORD_LENGTH`, falling back to the defaults above.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            admin_username: std::env::var("ADMIN_USERNAME")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.admin_username),
            min_password_length: parse_env("MIN_PASSWORD_LENGTH", defaults.min_password_length),
            default_password_length: parse_env(
                "DEFAULT_PASSWORD_LENGTH",
                defaults.default_password_length,
            ),
        }
    }
}

fn parse_env(name: &str, default: usize) -> usize {
    match std::env::var(name) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("ignoring invalid {}: {:?}", name, raw);
            default
        }),
        Err(_) => default,
    }
}
