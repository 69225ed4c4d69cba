//! # secrets-cli
//!
//! `secretsctl`, an operator tool for secret configuration files.
//!
//! Provides commands for:
//! - Checking a secrets file, optionally with strict region validation
//! - Resolving a declared secret against a local JSON store
//!
//! # Architecture
//!
//! Secrets files are parsed with [`secrets_manager::parse_all`]. Each secret
//! is provisioned as a [`secrets_manager::Plugin`] against a [`FileStore`],
//! which plays the part of the remote store.
//!
//! ```text
//! ┌─────────────┐   parse    ┌─────────────────┐   fetch   ┌───────────┐
//! │ Secretsfile │──────────►│ secrets-manager │─────────►│ FileStore │
//! └─────────────┘            └─────────────────┘           └───────────┘
//! ```

pub mod cli;
pub mod commands;
pub mod error;
pub mod output;
pub mod store;

pub use cli::{CheckArgs, Cli, Commands, Format, ShowArgs};
pub use error::CliError;
pub use output::OutputFormat;
pub use store::FileStore;
