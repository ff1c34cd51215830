//! .env document parsing and merging.
//!
//! Line-preserving: anything a merge does not rewrite stays byte-identical,
//! including comments, blank lines, and lines that do not parse. Writes go
//! through a temp file in the target directory with mode 0600 set before an
//! atomic rename, so a concurrent reader never observes a partial file.

use std::fmt;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::debug;

use crate::core::constants::GENERATED_MARKER;
use crate::core::generate::GeneratedSecret;
use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq)]
enum Line {
    /// `KEY=VALUE`. `raw` is the original line, kept verbatim until the key
    /// is rewritten by a merge.
    Assignment { key: String, raw: String },
    /// Comment, blank, or unparseable line. Never touched.
    Raw(String),
}

fn parse_line(line: &str) -> Line {
    let trimmed = line.trim_start();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Line::Raw(line.to_string());
    }

    match line.split_once('=') {
        Some((key, _)) if !key.trim().is_empty() => Line::Assignment {
            key: key.trim().to_string(),
            raw: line.to_string(),
        },
        _ => Line::Raw(line.to_string()),
    }
}

/// Which keys a merge touched. Key names only, never values.
#[derive(Debug, Default)]
pub struct MergeReport {
    pub updated: Vec<String>,
    pub added: Vec<String>,
}

/// An ordered .env document.
#[derive(Debug, Clone)]
pub struct EnvDocument {
    lines: Vec<Line>,
}

impl EnvDocument {
    /// Load from `path`. A missing file is an empty document.
    ///
    /// # Errors
    ///
    /// Returns `PermissionDenied` or `Io` if the file exists but cannot be
    /// read.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => String::new(),
            Err(e) => return Err(Error::io_at(e, path)),
        };

        Ok(Self::parse(&contents))
    }

    fn parse(contents: &str) -> Self {
        Self {
            lines: contents.lines().map(parse_line).collect(),
        }
    }

    /// Merge secrets into the document.
    ///
    /// An existing assignment for the key is replaced in place (first
    /// occurrence wins); otherwise the secret is appended to the block under
    /// the `# Generated secrets` marker, creating the marker when absent.
    pub fn merge(&mut self, secrets: &[GeneratedSecret]) -> MergeReport {
        let mut report = MergeReport::default();

        for secret in secrets {
            if self.replace(secret) {
                report.updated.push(secret.name.to_string());
            } else {
                self.append_generated(secret);
                report.added.push(secret.name.to_string());
            }
        }

        report
    }

    fn replace(&mut self, secret: &GeneratedSecret) -> bool {
        for line in &mut self.lines {
            if let Line::Assignment { key, raw } = line {
                if key == secret.name {
                    *raw = format!("{}={}", secret.name, secret.value.as_str());
                    return true;
                }
            }
        }
        false
    }

    fn append_generated(&mut self, secret: &GeneratedSecret) {
        let raw = format!("{}={}", secret.name, secret.value.as_str());
        let at = self.generated_block_end();
        self.lines.insert(
            at,
            Line::Assignment {
                key: secret.name.to_string(),
                raw,
            },
        );
    }

    /// Index one past the last assignment of the block following the marker,
    /// creating the marker (preceded by a blank separator) when absent.
    fn generated_block_end(&mut self) -> usize {
        let marker = self
            .lines
            .iter()
            .position(|l| matches!(l, Line::Raw(raw) if raw.trim() == GENERATED_MARKER));

        let marker = match marker {
            Some(index) => index,
            None => {
                if !self.lines.is_empty() {
                    self.lines.push(Line::Raw(String::new()));
                }
                self.lines.push(Line::Raw(GENERATED_MARKER.to_string()));
                self.lines.len() - 1
            }
        };

        let mut end = marker + 1;
        while end < self.lines.len() && matches!(self.lines[end], Line::Assignment { .. }) {
            end += 1;
        }
        end
    }

    /// Write atomically: temp file in the target directory, mode 0600 before
    /// the rename, then rename over `path`.
    ///
    /// # Errors
    ///
    /// Returns `PermissionDenied` or `Io`. Any failure before the rename
    /// leaves the original file untouched; the temp file is cleaned up on
    /// drop.
    pub fn save(&self, path: &Path) -> Result<()> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| Error::io_at(e, dir))?;
        tmp.write_all(self.to_string().as_bytes())?;
        tmp.flush()?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tmp.as_file()
                .set_permissions(fs::Permissions::from_mode(0o600))?;
        }

        tmp.persist(path).map_err(|e| Error::io_at(e.error, path))?;
        debug!("wrote {}", path.display());

        Ok(())
    }
}

impl fmt::Display for EnvDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            match line {
                Line::Assignment { raw, .. } | Line::Raw(raw) => writeln!(f, "{}", raw)?,
            }
        }
        Ok(())
    }
}
