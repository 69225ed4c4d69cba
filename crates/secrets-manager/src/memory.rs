//! In-process secret store.
//!
//! [`MemoryStore`] keeps payloads in a map keyed by path. It is both a
//! [`Connector`] and a [`SecretStoreClient`]; clones share the same state,
//! so a test can keep a handle and change the store between resolutions.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use serde_json::Value;
use tracing::debug;

use crate::client::{Connector, FetchContext, SecretPayload, SecretStoreClient};
use crate::error::StoreError;

/// Provider name reported by [`MemoryStore::describe`].
pub const MEMORY_PROVIDER: &str = "memory";

#[derive(Default)]
struct Inner {
    secrets: RwLock<HashMap<String, SecretPayload>>,
    failure: RwLock<Option<StoreError>>,
    fetches: AtomicUsize,
    connections: RwLock<Vec<(String, String)>>,
}

/// A secret store held entirely in memory.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Inner>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `payload` at `path`, replacing any previous value.
    pub fn put(&self, path: impl Into<String>, payload: impl Into<SecretPayload>) {
        let mut secrets = self
            .inner
            .secrets
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        secrets.insert(path.into(), payload.into());
    }

    /// Stores a JSON object at `path`.
    pub fn put_json(&self, path: impl Into<String>, secret: &Value) {
        self.put(path, secret.to_string());
    }

    /// Removes the payload at `path`.
    pub fn remove(&self, path: &str) {
        let mut secrets = self
            .inner
            .secrets
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        secrets.remove(path);
    }

    /// Makes every subsequent fetch fail with `error`, or clears the failure.
    pub fn fail_with(&self, error: Option<StoreError>) {
        let mut failure = self
            .inner
            .failure
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        *failure = error;
    }

    /// Number of fetches attempted so far.
    #[must_use]
    pub fn fetch_count(&self) -> usize {
        self.inner.fetches.load(Ordering::SeqCst)
    }

    /// `(id, region)` pairs this store was connected with, in order.
    #[must_use]
    pub fn connections(&self) -> Vec<(String, String)> {
        self.inner
            .connections
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

impl SecretStoreClient for MemoryStore {
    fn fetch_secret(&self, ctx: &FetchContext, path: &str) -> Result<SecretPayload, StoreError> {
        self.inner.fetches.fetch_add(1, Ordering::SeqCst);
        ctx.check()?;

        if let Some(err) = self
            .inner
            .failure
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
        {
            return Err(err);
        }

        let secrets = self
            .inner
            .secrets
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        secrets
            .get(path)
            .cloned()
            .ok_or_else(|| StoreError::not_found(path))
    }

    fn describe(&self) -> BTreeMap<String, Value> {
        BTreeMap::from([("provider".to_string(), Value::from(MEMORY_PROVIDER))])
    }
}

impl Connector for MemoryStore {
    fn connect(&self, id: &str, region: &str) -> Result<Box<dyn SecretStoreClient>, StoreError> {
        debug!(id, region, "connecting memory store");
        self.inner
            .connections
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push((id.to_string(), region.to_string()));
        Ok(Box::new(self.clone()))
    }
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let paths = self
            .inner
            .secrets
            .read()
            .map(|s| s.len())
            .unwrap_or_default();
        f.debug_struct("MemoryStore")
            .field("secrets", &paths)
            .field("fetches", &self.fetch_count())
            .finish()
    }
}
