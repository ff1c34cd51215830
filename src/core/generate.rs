//! Secret generation.
//!
//! Every character is drawn from the operating system CSPRNG. There is no
//! fallback to a weaker source: if the OS RNG fails, generation fails with
//! [`Error::EntropyUnavailable`].

use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::Zeroizing;

use crate::core::constants::MIN_SECRET_LENGTH;
use crate::error::{Error, Result};

/// URL-safe token alphabet (64 characters).
///
/// Contains no `=`, `#`, quotes, or whitespace, so generated values never
/// need quoting in an env file.
pub const TOKEN_CHARSET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

/// Alphanumeric alphabet, used for hash salts.
pub const ALNUM_CHARSET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// A named secret to generate.
#[derive(Debug, Clone, Copy)]
pub struct SecretSpec {
    /// Env key the value is stored under (e.g. `DB_PASSWORD`).
    pub name: &'static str,
    /// Exact output length in characters.
    pub length: usize,
}

impl SecretSpec {
    pub const fn new(name: &'static str, length: usize) -> Self {
        Self { name, length }
    }
}

/// An ephemeral name/value pair.
///
/// The value zeroizes on drop and must never be logged or printed.
pub struct GeneratedSecret {
    pub name: &'static str,
    pub value: Zeroizing<String>,
}

/// Generate one secret.
///
/// # Errors
///
/// Returns `Validation` if the spec length is below the secure minimum and
/// `EntropyUnavailable` if the OS RNG cannot be read.
pub fn generate(spec: &SecretSpec) -> Result<GeneratedSecret> {
    if spec.length < MIN_SECRET_LENGTH {
        return Err(Error::Validation {
            field: "length",
            reason: format!(
                "{} is below the minimum of {} characters",
                spec.length, MIN_SECRET_LENGTH
            ),
        });
    }

    Ok(GeneratedSecret {
        name: spec.name,
        value: random_string(spec.length, TOKEN_CHARSET)?,
    })
}

/// Generate all secrets in catalog order.
pub fn generate_all(specs: &[SecretSpec]) -> Result<Vec<GeneratedSecret>> {
    specs.iter().map(generate).collect()
}

/// Random URL-safe token of the requested length.
pub fn token(length: usize) -> Result<Zeroizing<String>> {
    random_string(length, TOKEN_CHARSET)
}

/// Random alphanumeric string (hash salts).
pub fn alnum(length: usize) -> Result<Zeroizing<String>> {
    random_string(length, ALNUM_CHARSET)
}

/// Uniform random string over `charset` from the OS CSPRNG.
///
/// Rejection sampling: bytes at or above the largest multiple of the charset
/// size are discarded, so every character is equally likely regardless of
/// the charset size.
fn random_string(length: usize, charset: &[u8]) -> Result<Zeroizing<String>> {
    debug_assert!(!charset.is_empty() && charset.len() <= 256);

    let limit = 256 - (256 % charset.len());
    let mut out = Zeroizing::new(String::with_capacity(length));
    let mut buf = Zeroizing::new([0u8; 64]);

    while out.len() < length {
        OsRng
            .try_fill_bytes(&mut buf[..])
            .map_err(|e| Error::EntropyUnavailable(e.to_string()))?;

        for &byte in buf.iter() {
            if out.len() == length {
                break;
            }
            if (byte as usize) < limit {
                out.push(charset[byte as usize % charset.len()] as char);
            }
        }
    }

    Ok(out)
}
