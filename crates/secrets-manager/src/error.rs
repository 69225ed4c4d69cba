//! Error types for secret configuration and resolution.
//!
//! Each stage of the pipeline has its own error enum so callers can match on
//! the failure category; [`Error`] unifies them for the instance-level API.

use std::fmt;

use thiserror::Error;

/// Location of a token in a textual configuration source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    /// Name of the configuration source (usually a file name).
    pub filename: String,
    /// 1-based line number, or 0 when no token was available.
    pub line: usize,
}

impl Position {
    /// Creates a new position.
    #[must_use]
    pub fn new(filename: impl Into<String>, line: usize) -> Self {
        Self {
            filename: filename.into(),
            line,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.filename, self.line)
    }
}

/// Malformed configuration input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The input held no tokens where a secret block was expected.
    #[error("{position} - Error during parsing: unexpected end of configuration")]
    EndOfInput {
        /// Where the input ran out.
        position: Position,
    },

    /// A recognized field did not carry exactly one value.
    #[error(
        "{position} - Error during parsing: field {field:?} of {secret:?} secret with value of {values:?} has invalid syntax"
    )]
    InvalidFieldSyntax {
        /// Where the field was declared.
        position: Position,
        /// The field name.
        field: String,
        /// The declared secret name.
        secret: String,
        /// The values captured for the field.
        values: Vec<String>,
    },

    /// A field name the secret block does not know.
    #[error(
        "{position} - Error during parsing: unsupported {field:?} field of {secret:?} secret with value of {values:?}"
    )]
    UnsupportedField {
        /// Where the field was declared.
        position: Position,
        /// The field name.
        field: String,
        /// The declared secret name.
        secret: String,
        /// The values captured for the field.
        values: Vec<String>,
    },

    /// A quoted token was never closed.
    #[error("{position} - Error during parsing: unterminated quoted string")]
    UnterminatedQuote {
        /// Where the quote was opened.
        position: Position,
    },

    /// A secret block was opened but never closed.
    #[error("{position} - Error during parsing: block of {id:?} secret is not closed")]
    UnclosedBlock {
        /// Where the block's secret name is declared.
        position: Position,
        /// The declared secret name.
        id: String,
    },

    /// The same secret name was declared twice in one source.
    #[error("{position} - Error during parsing: duplicate secret {id:?}")]
    DuplicateSecret {
        /// Where the second declaration starts.
        position: Position,
        /// The repeated secret name.
        id: String,
    },

    /// The block parsed but the resulting configuration is invalid.
    #[error("{position} - Error during parsing: {source}")]
    Invalid {
        /// Where the block ended.
        position: Position,
        /// The validation failure.
        source: ValidationError,
    },

    /// The structured form could not be decoded.
    #[error("{message}")]
    Decode {
        /// The decoder's error message, verbatim.
        message: String,
    },
}

impl ParseError {
    /// Returns the textual position of the error, if it has one.
    #[must_use]
    pub fn position(&self) -> Option<&Position> {
        match self {
            Self::EndOfInput { position }
            | Self::InvalidFieldSyntax { position, .. }
            | Self::UnsupportedField { position, .. }
            | Self::UnterminatedQuote { position }
            | Self::UnclosedBlock { position, .. }
            | Self::DuplicateSecret { position, .. }
            | Self::Invalid { position, .. } => Some(position),
            Self::Decode { .. } => None,
        }
    }
}

/// Incomplete or semantically invalid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The secret has no identifier.
    #[error("empty id")]
    EmptyId,

    /// The secret has no storage path.
    #[error("secret {id:?} has empty path")]
    EmptyPath {
        /// The secret identifier.
        id: String,
    },

    /// The secret has no region.
    #[error("secret {id:?} has empty region")]
    EmptyRegion {
        /// The secret identifier.
        id: String,
    },

    /// The region does not follow the store's naming grammar.
    #[error("malformed {region:?} region")]
    MalformedRegion {
        /// The rejected region.
        region: String,
    },
}

/// Broad category of a secret-store failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorKind {
    /// Nothing is stored at the requested path.
    NotFound,
    /// The store refused the request.
    AccessDenied,
    /// The caller's deadline passed.
    Timeout,
    /// The caller cancelled the request.
    Cancelled,
    /// The store could not be reached.
    Unavailable,
    /// Anything else.
    Other,
}

impl fmt::Display for StoreErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::NotFound => "not found",
            Self::AccessDenied => "access denied",
            Self::Timeout => "timeout",
            Self::Cancelled => "cancelled",
            Self::Unavailable => "unavailable",
            Self::Other => "error",
        };
        f.write_str(s)
    }
}

/// Failure reported by a secret-store client.
///
/// The core never inspects or rewrites these; they reach the caller as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct StoreError {
    /// The failure category.
    pub kind: StoreErrorKind,
    /// Client-provided detail.
    pub message: String,
}

impl StoreError {
    /// Creates a new store error.
    #[must_use]
    pub fn new(kind: StoreErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Shorthand for a [`StoreErrorKind::NotFound`] error.
    #[must_use]
    pub fn not_found(path: &str) -> Self {
        Self::new(StoreErrorKind::NotFound, format!("no secret at {path:?}"))
    }
}

/// Failure while fetching or decoding a secret payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// The store client failed.
    #[error("failed to fetch secret: {0}")]
    StoreFetch(#[source] StoreError),

    /// The payload was not a JSON object.
    #[error("failed to decode secret payload: {message}")]
    SecretDecode {
        /// The decoder's error message, verbatim.
        message: String,
    },
}

/// A key was absent from a resolved secret.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// The requested key is not in the bundle.
    #[error("key {key:?} not found in secret {id:?}")]
    KeyNotFound {
        /// The secret identifier.
        id: String,
        /// The requested key.
        key: String,
    },
}

/// Errors returned by a secret instance.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Configuration input was malformed.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Configuration was incomplete or invalid.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Fetching or decoding the secret failed.
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// A key lookup failed.
    #[error(transparent)]
    Lookup(#[from] LookupError),

    /// The store client could not be constructed.
    #[error("failed to connect to secret store: {0}")]
    Store(#[from] StoreError),

    /// The instance was used before it was provisioned.
    #[error("secret {id:?} is not provisioned")]
    NotReady {
        /// The secret identifier, possibly empty.
        id: String,
    },
}

/// Result type alias for secret operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_display_includes_position() {
        let err = ParseError::InvalidFieldSyntax {
            position: Position::new("Testfile", 3),
            field: "region".to_string(),
            secret: "access_token".to_string(),
            values: vec!["us-east-1".to_string(), "foo".to_string()],
        };
        assert_eq!(
            err.to_string(),
            r#"Testfile:3 - Error during parsing: field "region" of "access_token" secret with value of ["us-east-1", "foo"] has invalid syntax"#
        );
    }

    #[test]
    fn invalid_wraps_validation_message() {
        let err = ParseError::Invalid {
            position: Position::new("Testfile", 4),
            source: ValidationError::EmptyPath {
                id: "access_token".to_string(),
            },
        };
        assert_eq!(
            err.to_string(),
            r#"Testfile:4 - Error during parsing: secret "access_token" has empty path"#
        );
        assert_eq!(err.position().map(|p| p.line), Some(4));
    }

    #[test]
    fn validation_error_display() {
        assert_eq!(ValidationError::EmptyId.to_string(), "empty id");
        let err = ValidationError::MalformedRegion {
            region: "foo-bar-baz".to_string(),
        };
        assert_eq!(err.to_string(), r#"malformed "foo-bar-baz" region"#);
    }

    #[test]
    fn store_error_passes_through_resolve_error() {
        let store_err = StoreError::new(StoreErrorKind::AccessDenied, "role lacks permission");
        let err = Error::from(ResolveError::StoreFetch(store_err.clone()));
        assert_eq!(
            err.to_string(),
            "failed to fetch secret: access denied: role lacks permission"
        );
        assert!(matches!(err, Error::Resolve(ResolveError::StoreFetch(e)) if e == store_err));
    }

    #[test]
    fn decode_error_has_no_position() {
        let err = ParseError::Decode {
            message: "expected value at line 1 column 1".to_string(),
        };
        assert!(err.position().is_none());
        assert_eq!(err.to_string(), "expected value at line 1 column 1");
    }
}
