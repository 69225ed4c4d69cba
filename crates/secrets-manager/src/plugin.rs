//! A configured secret instance and its cached bundle.
//!
//! A [`Plugin`] moves through `Unparsed -> Parsed -> Provisioned ->
//! Resolved`. Parsing stores the configuration, provisioning validates it
//! strictly and connects a store client, and resolving fetches and caches
//! the secret. Resolving again replaces the cache wholesale; a failed
//! resolution leaves the previous cache in place.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::bundle::SecretBundle;
use crate::client::{Connector, FetchContext, SecretStoreClient};
use crate::config::Config;
use crate::error::{Error, LookupError, ParseError, ResolveError, Result};
use crate::parser::{parse_block, Dispenser};
use crate::replacer::Replacer;

/// Lifecycle stage of a [`Plugin`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluginState {
    /// No configuration has been supplied.
    Unparsed,
    /// Configuration is stored but no client is connected.
    Parsed,
    /// A client is connected but nothing is cached.
    Provisioned,
    /// A bundle is cached.
    Resolved,
}

/// The operations an embedding application drives on a secret instance.
///
/// Callers sequence them as provision, then validate, then lookups.
pub trait SecretSource {
    /// Validates the configuration strictly and connects a store client.
    fn provision(&mut self, connector: &dyn Connector) -> Result<()>;

    /// Resolves the secret once, failing if resolution fails.
    fn validate(&mut self, ctx: &FetchContext) -> Result<()>;

    /// Fetches, decodes and caches the secret.
    fn resolve(&mut self, ctx: &FetchContext) -> Result<&SecretBundle>;

    /// Returns the cached secret, resolving it first if nothing is cached.
    fn get_secret(&mut self, ctx: &FetchContext) -> Result<&SecretBundle>;

    /// Returns one value of the secret, resolving first if nothing is cached.
    fn get_secret_by_key(&mut self, ctx: &FetchContext, key: &str) -> Result<&Value>;
}

/// One secret: its configuration, store client and cached bundle.
#[derive(Default)]
pub struct Plugin {
    raw_config: Option<String>,
    config: Option<Config>,
    client: Option<Box<dyn SecretStoreClient>>,
    bundle: Option<SecretBundle>,
    generation: u64,
}

impl Plugin {
    /// Creates an unparsed instance.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an instance holding the structured form undecoded; decoding
    /// happens during provisioning.
    #[must_use]
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self {
            raw_config: Some(raw.into()),
            ..Self::default()
        }
    }

    /// Creates an instance from the structured form.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::Decode`] if the input is not a JSON object of the
    /// expected shape.
    pub fn from_json(raw: &str) -> std::result::Result<Self, ParseError> {
        let mut plugin = Self::new();
        plugin.parse_json(raw)?;
        Ok(plugin)
    }

    /// Creates an instance from the first secret block of `input`.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] if the block is malformed or incomplete.
    pub fn from_block(filename: &str, input: &str) -> std::result::Result<Self, ParseError> {
        let mut d = Dispenser::new(filename, input)?;
        let mut plugin = Self::new();
        plugin.parse_block(&mut d)?;
        Ok(plugin)
    }

    /// Creates an instance from an already parsed configuration.
    #[must_use]
    pub fn with_config(config: Config) -> Self {
        let mut plugin = Self::new();
        plugin.store_config(config, None);
        plugin
    }

    /// Decodes the structured form and stores it.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::Decode`] on malformed input.
    pub fn parse_json(&mut self, raw: &str) -> std::result::Result<(), ParseError> {
        let config = Config::from_json(raw)?;
        self.store_config(config, Some(raw.to_string()));
        Ok(())
    }

    /// Parses one secret block from `d` and stores it, expanding
    /// placeholders against the process environment.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] if the block is malformed or incomplete.
    pub fn parse_block(&mut self, d: &mut Dispenser) -> std::result::Result<(), ParseError> {
        self.parse_block_with(d, &Replacer::new())
    }

    /// Like [`Plugin::parse_block`] with a caller-supplied [`Replacer`].
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] if the block is malformed or incomplete.
    pub fn parse_block_with(
        &mut self,
        d: &mut Dispenser,
        replacer: &Replacer,
    ) -> std::result::Result<(), ParseError> {
        let config = parse_block(d, replacer)?;
        let raw = config.to_json()?;
        self.store_config(config, Some(raw));
        Ok(())
    }

    fn store_config(&mut self, config: Config, raw: Option<String>) {
        self.raw_config = raw;
        self.config = Some(config);
        self.client = None;
        self.bundle = None;
        self.generation = 0;
    }

    /// The stored configuration, if it has been decoded.
    #[must_use]
    pub fn config(&self) -> Option<&Config> {
        self.config.as_ref()
    }

    /// The structured form the configuration was read from or encoded to.
    #[must_use]
    pub fn raw_config(&self) -> Option<&str> {
        self.raw_config.as_deref()
    }

    /// The secret id, or an empty string before parsing.
    #[must_use]
    pub fn id(&self) -> &str {
        self.config.as_ref().map_or("", |c| c.id.as_str())
    }

    /// Current lifecycle stage.
    #[must_use]
    pub fn state(&self) -> PluginState {
        if self.bundle.is_some() {
            PluginState::Resolved
        } else if self.client.is_some() {
            PluginState::Provisioned
        } else if self.config.is_some() || self.raw_config.is_some() {
            PluginState::Parsed
        } else {
            PluginState::Unparsed
        }
    }

    /// The cached bundle, without resolving.
    #[must_use]
    pub fn cached_secret(&self) -> Option<&SecretBundle> {
        self.bundle.as_ref()
    }

    /// Drops the cached bundle. The next lookup resolves again.
    pub fn clear_cache(&mut self) {
        self.bundle = None;
    }

    /// Validates the configuration strictly and connects a store client.
    ///
    /// A configuration held only in structured form is decoded first.
    /// Reprovisioning replaces the client and drops the cache.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`], [`Error::Validation`] or [`Error::Store`].
    pub fn provision(&mut self, connector: &dyn Connector) -> Result<()> {
        let config = match (&self.config, &self.raw_config) {
            (Some(config), _) => config.clone(),
            (None, Some(raw)) => Config::from_json(raw)?,
            (None, None) => Config::default(),
        };
        config.validate_strict()?;

        let client = connector.connect(&config.id, &config.region).map_err(|e| {
            warn!(id = %config.id, region = %config.region, error = %e, "failed to connect secret store");
            Error::Store(e)
        })?;

        debug!(id = %config.id, region = %config.region, "provisioned secret");
        self.config = Some(config);
        self.client = Some(client);
        self.bundle = None;
        Ok(())
    }

    fn ready(&self) -> Result<(&Config, &dyn SecretStoreClient)> {
        match (&self.config, &self.client) {
            (Some(config), Some(client)) => Ok((config, client.as_ref())),
            _ => Err(Error::NotReady {
                id: self.id().to_string(),
            }),
        }
    }

    /// Fetches, decodes and caches the secret.
    ///
    /// On success the new bundle replaces any cached one; on failure the
    /// cache is left untouched. The context is passed to the store client
    /// as-is.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotReady`] before provisioning, or
    /// [`Error::Resolve`] if the store or the decoder fails.
    pub fn resolve(&mut self, ctx: &FetchContext) -> Result<&SecretBundle> {
        let bundle = {
            let (config, client) = self.ready()?;
            debug!(id = %config.id, path = %config.path, "resolving secret");

            let payload = client.fetch_secret(ctx, &config.path).map_err(|e| {
                warn!(id = %config.id, path = %config.path, error = %e, "secret fetch failed");
                ResolveError::StoreFetch(e)
            })?;

            SecretBundle::decode(&payload, self.generation + 1).inspect_err(|e| {
                warn!(id = %config.id, path = %config.path, error = %e, "secret payload rejected");
            })?
        };

        self.generation = bundle.metadata().generation;
        info!(
            id = %self.id(),
            keys = bundle.len(),
            generation = self.generation,
            "resolved secret"
        );
        Ok(self.bundle.insert(bundle))
    }

    /// Resolves the secret once, failing if resolution fails.
    ///
    /// # Errors
    ///
    /// Same as [`Plugin::resolve`].
    pub fn validate(&mut self, ctx: &FetchContext) -> Result<()> {
        self.resolve(ctx).map(|_| ())
    }

    /// Returns the cached secret, resolving it first if nothing is cached.
    ///
    /// # Errors
    ///
    /// Same as [`Plugin::resolve`].
    pub fn get_secret(&mut self, ctx: &FetchContext) -> Result<&SecretBundle> {
        if self.bundle.is_none() {
            self.resolve(ctx)?;
        }
        self.bundle.as_ref().ok_or_else(|| Error::NotReady {
            id: self.id().to_string(),
        })
    }

    /// Returns the value stored under `key`, resolving first if nothing is
    /// cached.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::KeyNotFound`] if the resolved secret has no such
    /// key, or any error of [`Plugin::resolve`].
    pub fn get_secret_by_key(&mut self, ctx: &FetchContext, key: &str) -> Result<&Value> {
        let id = self.id().to_string();
        self.get_secret(ctx)?.get(key).ok_or_else(|| {
            Error::Lookup(LookupError::KeyNotFound {
                id,
                key: key.to_string(),
            })
        })
    }

    /// Non-secret description of the instance for inspection surfaces.
    ///
    /// Store metadata such as `provider` is merged with the configured `id`,
    /// `path` and `region`. The cache is never consulted.
    #[must_use]
    pub fn display_config(&self) -> BTreeMap<String, Value> {
        let mut out = self
            .client
            .as_ref()
            .map(|client| client.describe())
            .unwrap_or_default();
        if let Some(config) = &self.config {
            out.insert("id".to_string(), Value::from(config.id.as_str()));
            out.insert("path".to_string(), Value::from(config.path.as_str()));
            out.insert("region".to_string(), Value::from(config.region.as_str()));
        }
        out
    }
}

impl SecretSource for Plugin {
    fn provision(&mut self, connector: &dyn Connector) -> Result<()> {
        Plugin::provision(self, connector)
    }

    fn validate(&mut self, ctx: &FetchContext) -> Result<()> {
        Plugin::validate(self, ctx)
    }

    fn resolve(&mut self, ctx: &FetchContext) -> Result<&SecretBundle> {
        Plugin::resolve(self, ctx)
    }

    fn get_secret(&mut self, ctx: &FetchContext) -> Result<&SecretBundle> {
        Plugin::get_secret(self, ctx)
    }

    fn get_secret_by_key(&mut self, ctx: &FetchContext, key: &str) -> Result<&Value> {
        Plugin::get_secret_by_key(self, ctx, key)
    }
}

impl fmt::Debug for Plugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Plugin")
            .field("config", &self.config)
            .field("state", &self.state())
            .field("bundle", &self.bundle)
            .finish_non_exhaustive()
    }
}
