//! Secret-store collaborator interfaces.
//!
//! The core never talks to a network itself. A [`Connector`] builds a
//! [`SecretStoreClient`] scoped to one secret's id and region, and the client
//! fetches raw payloads by path.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::Value;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{StoreError, StoreErrorKind};

/// Deadline and cancellation signal for a single fetch.
///
/// The core hands this to the client untouched and imposes no timeout of its
/// own; honoring it is the client's job.
#[derive(Debug, Clone, Default)]
pub struct FetchContext {
    deadline: Option<Instant>,
    cancelled: Option<Arc<AtomicBool>>,
}

impl FetchContext {
    /// A context with no deadline that is never cancelled.
    #[must_use]
    pub fn background() -> Self {
        Self::default()
    }

    /// Sets an absolute deadline.
    #[must_use]
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Sets a deadline relative to now.
    #[must_use]
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Attaches a shared cancellation flag.
    #[must_use]
    pub fn with_cancellation(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancelled = Some(flag);
        self
    }

    /// The deadline, if any.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Time left until the deadline, if one is set.
    #[must_use]
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    /// Returns true if the cancellation flag has been raised.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::SeqCst))
    }

    /// Returns true if the deadline has passed.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }

    /// Fails if the fetch should not proceed.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreErrorKind::Cancelled`] or [`StoreErrorKind::Timeout`]
    /// error.
    pub fn check(&self) -> Result<(), StoreError> {
        if self.is_cancelled() {
            return Err(StoreError::new(StoreErrorKind::Cancelled, "fetch cancelled"));
        }
        if self.is_expired() {
            return Err(StoreError::new(StoreErrorKind::Timeout, "deadline exceeded"));
        }
        Ok(())
    }
}

/// Raw secret bytes as returned by a store.
///
/// The bytes are cleared from memory on drop and never shown in debug
/// output.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretPayload {
    data: Vec<u8>,
}

impl SecretPayload {
    /// Wraps raw payload bytes.
    #[must_use]
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    /// Returns the payload as a byte slice.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Length of the payload in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the payload is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl From<String> for SecretPayload {
    fn from(value: String) -> Self {
        Self::new(value.into_bytes())
    }
}

impl From<&str> for SecretPayload {
    fn from(value: &str) -> Self {
        Self::new(value.as_bytes().to_vec())
    }
}

impl fmt::Debug for SecretPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretPayload")
            .field("len", &self.data.len())
            .field("data", &"[REDACTED]")
            .finish()
    }
}

/// A client for one remote secret store, scoped to a single secret.
pub trait SecretStoreClient: Send + Sync {
    /// Fetches the raw payload stored at `path`.
    ///
    /// # Errors
    ///
    /// Returns whatever [`StoreError`] the store reports.
    fn fetch_secret(&self, ctx: &FetchContext, path: &str) -> Result<SecretPayload, StoreError>;

    /// Non-secret metadata about the store, such as a `provider` name.
    fn describe(&self) -> BTreeMap<String, Value>;
}

/// Builds store clients for provisioned secrets.
pub trait Connector {
    /// Creates a client for the secret `id` in `region`.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the client cannot be created.
    fn connect(&self, id: &str, region: &str) -> Result<Box<dyn SecretStoreClient>, StoreError>;
}

impl<F> Connector for F
where
    F: Fn(&str, &str) -> Result<Box<dyn SecretStoreClient>, StoreError>,
{
    fn connect(&self, id: &str, region: &str) -> Result<Box<dyn SecretStoreClient>, StoreError> {
        self(id, region)
    }
}
