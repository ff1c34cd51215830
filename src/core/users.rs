//! User store collaborator.
//!
//! The password tool hands a plaintext credential to a [`UserStore`] and
//! trusts it to hash and persist. [`FileUserStore`] is the file-backed
//! implementation used on hosts without the application database: one
//! `username:hash` line per user, hashes in the service's
//! `pbkdf2_sha256$iterations$salt$base64` format.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::core::generate;
use crate::error::{Error, Result};

/// Credential store consumed by the password tool.
pub trait UserStore {
    /// Hash and persist a new password for `username`.
    ///
    /// # Errors
    ///
    /// `UserNotFound` if the username is unknown, `Validation` if the store
    /// rejects the password under its own policy.
    fn set_password(&mut self, username: &str, password: &str) -> Result<()>;
}

const ALGORITHM: &str = "pbkdf2_sha256";
const ITERATIONS: u32 = 180_000;
const SALT_LENGTH: usize = 12;

/// Store policy: passwords this short are rejected outright, independent of
/// the CLI's own minimum for operator-typed input.
const STORE_MIN_PASSWORD: usize = 8;

/// Line-oriented `username:hash` store with owner-only file permissions.
pub struct FileUserStore {
    path: PathBuf,
}

impl FileUserStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create or replace an entry. Used when provisioning a fresh store.
    pub fn seed(&mut self, username: &str, password: &str) -> Result<()> {
        validate_password(password)?;

        let mut lines = self.load_lines()?.unwrap_or_default();
        let entry = format!("{}:{}", username, encode_password(password)?);

        match lines.iter_mut().find(|l| line_matches(l, username)) {
            Some(existing) => *existing = entry,
            None => lines.push(entry),
        }

        self.write_lines(&lines)
    }

    /// Check a password against the stored hash. Diagnostics and tests.
    pub fn verify_password(&self, username: &str, password: &str) -> Result<bool> {
        let lines = self
            .load_lines()?
            .ok_or_else(|| Error::UserNotFound(username.to_string()))?;

        let encoded = lines
            .iter()
            .find_map(|l| {
                l.split_once(':')
                    .filter(|(u, _)| *u == username)
                    .map(|(_, hash)| hash.to_string())
            })
            .ok_or_else(|| Error::UserNotFound(username.to_string()))?;

        let mut parts = encoded.split('$');
        let (Some(algorithm), Some(iterations), Some(salt), Some(hash), None) = (
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
        ) else {
            return Ok(false);
        };

        if algorithm != ALGORITHM {
            return Ok(false);
        }
        let Ok(iterations) = iterations.parse::<u32>() else {
            return Ok(false);
        };

        Ok(derive(password, salt, iterations) == hash)
    }

    fn load_lines(&self) -> Result<Option<Vec<String>>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(contents.lines().map(str::to_string).collect())),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::io_at(e, &self.path)),
        }
    }

    /// Same atomic protocol as the env file: temp file, 0600, rename.
    fn write_lines(&self, lines: &[String]) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| Error::io_at(e, dir))?;
        for line in lines {
            writeln!(tmp, "{}", line)?;
        }
        tmp.flush()?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tmp.as_file()
                .set_permissions(fs::Permissions::from_mode(0o600))?;
        }

        tmp.persist(&self.path)
            .map_err(|e| Error::io_at(e.error, &self.path))?;

        Ok(())
    }
}

impl UserStore for FileUserStore {
    fn set_password(&mut self, username: &str, password: &str) -> Result<()> {
        validate_password(password)?;

        let mut lines = self
            .load_lines()?
            .ok_or_else(|| Error::UserNotFound(username.to_string()))?;

        let entry = lines
            .iter_mut()
            .find(|l| line_matches(l, username))
            .ok_or_else(|| Error::UserNotFound(username.to_string()))?;
        *entry = format!("{}:{}", username, encode_password(password)?);

        self.write_lines(&lines)?;
        debug!("updated credential for {}", username);

        Ok(())
    }
}

fn line_matches(line: &str, username: &str) -> bool {
    line.split_once(':').map(|(u, _)| u) == Some(username)
}

fn validate_password(password: &str) -> Result<()> {
    if password.trim().is_empty() {
        return Err(Error::Validation {
            field: "password",
            reason: "must not be empty".to_string(),
        });
    }
    if password.chars().count() < STORE_MIN_PASSWORD {
        return Err(Error::Validation {
            field: "password",
            reason: format!("must be at least {} characters long", STORE_MIN_PASSWORD),
        });
    }
    Ok(())
}

fn encode_password(password: &str) -> Result<String> {
    let salt = generate::alnum(SALT_LENGTH)?;
    Ok(format!(
        "{}${}${}${}",
        ALGORITHM,
        ITERATIONS,
        salt.as_str(),
        derive(password, salt.as_str(), ITERATIONS)
    ))
}

fn derive(password: &str, salt: &str, iterations: u32) -> String {
    let mut digest = [0u8; 32];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt.as_bytes(), iterations, &mut digest);
    BASE64.encode(digest)
}
