//! Show command implementation.
//!
//! Provisions the requested secret against the file store, resolves it once
//! and prints either the whole secret or a single key.

use std::io::Write;
use std::time::Duration;

use secrets_manager::{FetchContext, Plugin};

use crate::cli::ShowArgs;
use crate::error::CliError;
use crate::output::{render_value, OutputFormat, SecretValue, SecretView};
use crate::store::FileStore;

use super::load_configs;

/// Handler for `secretsctl show`.
pub struct ShowCommand<'a> {
    store: &'a FileStore,
}

impl<'a> ShowCommand<'a> {
    /// Creates a new show command handler.
    #[must_use]
    pub const fn new(store: &'a FileStore) -> Self {
        Self { store }
    }

    /// Resolves the secret and writes it out.
    ///
    /// # Errors
    ///
    /// Returns an error if the secret is not declared, fails provisioning,
    /// cannot be resolved, or lacks the requested key.
    pub fn execute<W: Write>(
        &self,
        out: &mut W,
        format: &OutputFormat,
        args: &ShowArgs,
    ) -> Result<(), CliError> {
        let config = load_configs(&args.config)?
            .into_iter()
            .find(|c| c.id == args.id)
            .ok_or_else(|| CliError::SecretNotFound(args.id.clone()))?;

        let mut plugin = Plugin::with_config(config);
        plugin.provision(self.store)?;

        let ctx = match args.timeout {
            Some(secs) => FetchContext::background().with_timeout(Duration::from_secs(secs)),
            None => FetchContext::background(),
        };

        if let Some(key) = &args.key {
            let value = plugin.get_secret_by_key(&ctx, key)?;
            let view = SecretValue {
                id: args.id.clone(),
                key: key.clone(),
                value: render_value(value, args.reveal),
            };
            return format.write(out, &view);
        }

        let bundle = plugin.get_secret(&ctx)?;
        let values = bundle
            .entries()
            .iter()
            .map(|(k, v)| (k.clone(), render_value(v, args.reveal)))
            .collect();
        let metadata = *bundle.metadata();
        let view = SecretView {
            config: plugin.display_config(),
            metadata,
            values,
        };
        format.write(out, &view)
    }
}
