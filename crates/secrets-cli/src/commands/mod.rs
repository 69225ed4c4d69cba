//! CLI command implementations.
//!
//! Each submodule implements a specific CLI command:
//! - [`check`] - Parse and validate a secrets file
//! - [`show`] - Resolve a secret from the file store

pub mod check;
pub mod show;

pub use check::CheckCommand;
pub use show::ShowCommand;

use std::path::Path;

use secrets_manager::{parse_all, Config, Replacer};

use crate::error::CliError;

/// Reads and parses every secret block in `path`.
///
/// Positions in parse errors name the file as given on the command line.
pub(crate) fn load_configs(path: &Path) -> Result<Vec<Config>, CliError> {
    let input = std::fs::read_to_string(path)?;
    let filename = path.display().to_string();
    Ok(parse_all(&filename, &input, &Replacer::new())?)
}
