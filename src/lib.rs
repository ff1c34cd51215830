//! relctl - credential lifecycle tooling for the release service.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── bin/                        # Entry points
//! │   ├── generate-secrets        # rotate the secret catalog into .env
//! │   └── change-admin-password   # rotate the admin credential
//! ├── cli/              # Command handlers + terminal output
//! └── core/             # Core library components
//!     ├── config        # runtime configuration from the environment
//!     ├── generate      # CSPRNG-backed secret generation
//!     ├── envfile       # line-preserving .env merge with atomic writes
//!     ├── passwd        # password rotation state machine
//!     └── users         # user-store collaborator seam + file store
//! ```
//!
//! # Safety contract
//!
//! - Every write to the env file or the user store goes through a temp file
//!   in the target directory, gets mode 0600 before the rename, and replaces
//!   the target atomically: a concurrent reader sees either the old or the
//!   new content, never a partial write.
//! - Plaintext secrets live in [`zeroize::Zeroizing`] wrappers and are wiped
//!   as soon as persistence returns. Values are never logged; the only
//!   disclosure is the deliberate one-time print of a generated password.

pub mod cli;
pub mod core;
pub mod error;
