//! Check command implementation.

use std::io::Write;

use tracing::info;

use crate::cli::CheckArgs;
use crate::error::CliError;
use crate::output::{ConfigList, OutputFormat};

use super::load_configs;

/// Handler for `secretsctl check`.
#[derive(Debug, Default)]
pub struct CheckCommand;

impl CheckCommand {
    /// Creates a new check command handler.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Parses the secrets file and prints every declared secret.
    ///
    /// # Errors
    ///
    /// Returns the first parse or validation failure.
    pub fn execute<W: Write>(
        &self,
        out: &mut W,
        format: &OutputFormat,
        args: &CheckArgs,
    ) -> Result<(), CliError> {
        let secrets = load_configs(&args.config)?;
        if args.strict {
            for config in &secrets {
                config.validate_strict()?;
            }
        }
        info!(
            source = %args.config.display(),
            secrets = secrets.len(),
            strict = args.strict,
            "secrets file checked"
        );

        let list = ConfigList {
            source: args.config.display().to_string(),
            strict: args.strict,
            secrets,
        };
        format.write(out, &list)
    }
}
