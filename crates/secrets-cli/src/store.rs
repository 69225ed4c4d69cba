//! File-backed secret store.
//!
//! The store document is a JSON object whose keys are secret paths and whose
//! values are the secrets themselves:
//!
//! ```json
//! { "apps/db": { "username": "app", "password": "p1" } }
//! ```

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::debug;

use secrets_manager::{Connector, FetchContext, SecretPayload, SecretStoreClient, StoreError};

use crate::error::CliError;

/// Provider name reported by [`FileStore`].
pub const FILE_PROVIDER: &str = "file";

/// A read-only secret store loaded from a JSON document.
#[derive(Clone)]
pub struct FileStore {
    source: PathBuf,
    secrets: Arc<HashMap<String, SecretPayload>>,
}

impl FileStore {
    /// Loads the store document at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a JSON object.
    pub fn open(path: &Path) -> Result<Self, CliError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(path, &raw)
    }

    /// Builds a store from document text; `source` is only reported.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Store`] if `raw` is not a JSON object.
    pub fn from_json(source: &Path, raw: &str) -> Result<Self, CliError> {
        let document: Map<String, Value> = serde_json::from_str(raw)
            .map_err(|e| CliError::Store(format!("{}: {e}", source.display())))?;
        let secrets = document
            .into_iter()
            .map(|(path, secret)| (path, SecretPayload::from(secret.to_string())))
            .collect::<HashMap<_, _>>();
        debug!(source = %source.display(), paths = secrets.len(), "loaded file store");
        Ok(Self {
            source: source.to_path_buf(),
            secrets: Arc::new(secrets),
        })
    }

    /// Number of secret paths in the document.
    #[must_use]
    pub fn len(&self) -> usize {
        self.secrets.len()
    }

    /// Returns true if the document holds no secrets.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.secrets.is_empty()
    }
}

impl SecretStoreClient for FileStore {
    fn fetch_secret(&self, ctx: &FetchContext, path: &str) -> Result<SecretPayload, StoreError> {
        ctx.check()?;
        self.secrets
            .get(path)
            .cloned()
            .ok_or_else(|| StoreError::not_found(path))
    }

    fn describe(&self) -> BTreeMap<String, Value> {
        BTreeMap::from([
            ("provider".to_string(), Value::from(FILE_PROVIDER)),
            (
                "source".to_string(),
                Value::from(self.source.display().to_string()),
            ),
        ])
    }
}

impl Connector for FileStore {
    fn connect(&self, id: &str, region: &str) -> Result<Box<dyn SecretStoreClient>, StoreError> {
        // Regions have no meaning for a local document.
        debug!(id, region, source = %self.source.display(), "connecting file store");
        Ok(Box::new(self.clone()))
    }
}

impl std::fmt::Debug for FileStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileStore")
            .field("source", &self.source)
            .field("secrets", &self.secrets.len())
            .finish()
    }
}
