//! The secret configuration value and its structured encoding.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ParseError, ValidationError};
use crate::validation::{validate, RegionCheck};

/// Identifies a single secret to resolve.
///
/// The structured form is a JSON object with optional string fields `id`,
/// `path` and `region`. Empty fields are left out when serializing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Logical name of the secret within its owning scope.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    /// Store-specific locator of the secret.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub path: String,
    /// Store region.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub region: String,
}

impl Config {
    /// Creates a configuration from its three fields.
    #[must_use]
    pub fn new(id: impl Into<String>, path: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            path: path.into(),
            region: region.into(),
        }
    }

    /// Decodes the structured form.
    ///
    /// The input must be a JSON object; any other shape is rejected even if
    /// it could be coerced into the struct.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::Decode`] carrying the decoder's message verbatim,
    /// including its line and column.
    pub fn from_json(raw: &str) -> Result<Self, ParseError> {
        if !raw.trim_start().starts_with('{') {
            // Only reports the shape error; a non-object never decodes as a map.
            serde_json::from_str::<Map<String, Value>>(raw).map_err(decode_error)?;
        }
        serde_json::from_str(raw).map_err(decode_error)
    }

    /// Encodes the structured form.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::Decode`] if serialization fails.
    pub fn to_json(&self) -> Result<String, ParseError> {
        serde_json::to_string(self).map_err(decode_error)
    }

    /// Checks that all fields are present.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate(self, RegionCheck::Lenient)
    }

    /// Checks that all fields are present and the region is well formed.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found.
    pub fn validate_strict(&self) -> Result<(), ValidationError> {
        validate(self, RegionCheck::Strict)
    }
}

fn decode_error(err: serde_json::Error) -> ParseError {
    ParseError::Decode {
        message: err.to_string(),
    }
}
