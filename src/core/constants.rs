//! Constants used throughout relctl.
//!
//! Centralizes magic strings and configuration values.

/// Default environment file written by `generate-secrets`.
pub const ENV_FILE: &str = ".env";

/// Default user credential store consumed by `change-admin-password`.
pub const USERS_FILE: &str = "users.passwd";

/// Comment marking the block of the env file owned by the generator.
pub const GENERATED_MARKER: &str = "# Generated secrets";

/// Minimum length accepted for a catalog secret.
pub const MIN_SECRET_LENGTH: usize = 16;

/// Upper bound for operator-requested random password lengths.
pub const MAX_PASSWORD_LENGTH: usize = 256;

/// Interactive confirmation attempts before giving up.
pub const CONFIRM_ATTEMPTS: usize = 3;
