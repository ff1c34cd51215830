//! The generated-secret catalog and its rotation into the env file.

use std::path::Path;

use tracing::info;

use crate::core::envfile::{EnvDocument, MergeReport};
use crate::core::generate::{self, SecretSpec};
use crate::error::Result;

/// Secrets owned by `generate-secrets`, in output order.
///
/// Lengths match the entropy the service has always used: 6 bits per
/// character of the URL-safe alphabet, so 20 chars ≈ 120 bits and
/// 43 chars ≈ 256 bits.
pub const CATALOG: &[SecretSpec] = &[
    SecretSpec::new("DB_PASSWORD", 20),
    SecretSpec::new("ADMIN_PASSWORD", 20),
    SecretSpec::new("APP_SECRET_KEY", 43),
];

/// Generate fresh values for the whole catalog and merge them into `path`.
///
/// Running twice intentionally rotates: the same keys get new values and
/// never duplicate lines.
pub fn rotate_into(path: &Path) -> Result<MergeReport> {
    let secrets = generate::generate_all(CATALOG)?;

    let mut doc = EnvDocument::load(path)?;
    let report = doc.merge(&secrets);
    doc.save(path)?;

    info!("merged {} generated secrets", secrets.len());
    Ok(report)
}
