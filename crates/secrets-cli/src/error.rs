//! CLI error types.

use std::fmt;

/// CLI-specific errors.
#[derive(Debug)]
pub enum CliError {
    /// The secrets file or a secret operation failed.
    Secret(secrets_manager::Error),
    /// The store document could not be loaded.
    Store(String),
    /// Output formatting error.
    Format(String),
    /// Secret block not found in the secrets file.
    SecretNotFound(String),
    /// Invalid argument.
    InvalidArgument(String),
    /// IO error.
    Io(std::io::Error),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Secret(e) => write!(f, "{e}"),
            Self::Store(msg) => write!(f, "store error: {msg}"),
            Self::Format(msg) => write!(f, "format error: {msg}"),
            Self::SecretNotFound(id) => write!(f, "secret not found: {id}"),
            Self::InvalidArgument(msg) => write!(f, "invalid argument: {msg}"),
            Self::Io(e) => write!(f, "IO error: {e}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Secret(e) => Some(e),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<secrets_manager::Error> for CliError {
    fn from(err: secrets_manager::Error) -> Self {
        Self::Secret(err)
    }
}

impl From<secrets_manager::ParseError> for CliError {
    fn from(err: secrets_manager::ParseError) -> Self {
        Self::Secret(err.into())
    }
}

impl From<secrets_manager::ValidationError> for CliError {
    fn from(err: secrets_manager::ValidationError) -> Self {
        Self::Secret(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrets_manager::{Position, ValidationError};

    #[test]
    fn cli_error_display_secret_not_found() {
        let err = CliError::SecretNotFound("db".into());
        assert_eq!(err.to_string(), "secret not found: db");
    }

    #[test]
    fn cli_error_keeps_parse_message() {
        let err = CliError::from(secrets_manager::ParseError::EndOfInput {
            position: Position::new("Secretsfile", 0),
        });
        assert_eq!(
            err.to_string(),
            "Secretsfile:0 - Error during parsing: unexpected end of configuration"
        );
    }

    #[test]
    fn cli_error_from_validation_error() {
        let err = CliError::from(ValidationError::EmptyId);
        assert!(matches!(err, CliError::Secret(secrets_manager::Error::Validation(_))));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn cli_error_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let cli_err = CliError::from(io_err);
        assert!(matches!(cli_err, CliError::Io(_)));
    }
}
