//! Decoded secret contents.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::client::SecretPayload;
use crate::error::ResolveError;

/// Metadata recorded when a bundle is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleMetadata {
    /// When the payload was decoded.
    pub resolved_at: DateTime<Utc>,
    /// Number of successful resolutions of the owning instance since its
    /// configuration was last stored, this one included.
    pub generation: u64,
}

/// The key-value contents of one resolved secret.
///
/// A bundle is immutable; a new resolution produces a new bundle that
/// replaces the old one wholesale.
#[derive(Clone)]
pub struct SecretBundle {
    entries: Map<String, Value>,
    metadata: BundleMetadata,
}

impl SecretBundle {
    /// Decodes a payload that must hold a JSON object.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::SecretDecode`] with the decoder's message if
    /// the payload is not valid JSON or not an object.
    pub fn decode(payload: &SecretPayload, generation: u64) -> Result<Self, ResolveError> {
        let entries: Map<String, Value> =
            serde_json::from_slice(payload.as_bytes()).map_err(|e| ResolveError::SecretDecode {
                message: e.to_string(),
            })?;
        Ok(Self::from_entries(entries, generation))
    }

    /// Builds a bundle from already decoded entries.
    #[must_use]
    pub fn from_entries(entries: Map<String, Value>, generation: u64) -> Self {
        Self {
            entries,
            metadata: BundleMetadata {
                resolved_at: Utc::now(),
                generation,
            },
        }
    }

    /// Looks up a single key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Returns true if the bundle holds `key`.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// The key names, in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// All entries.
    #[must_use]
    pub fn entries(&self) -> &Map<String, Value> {
        &self.entries
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the secret holds no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolution metadata.
    #[must_use]
    pub fn metadata(&self) -> &BundleMetadata {
        &self.metadata
    }
}

impl fmt::Debug for SecretBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Key names only, values never leave through Debug.
        f.debug_struct("SecretBundle")
            .field("keys", &self.entries.keys().collect::<Vec<_>>())
            .field("values", &"[REDACTED]")
            .field("metadata", &self.metadata)
            .finish()
    }
}
