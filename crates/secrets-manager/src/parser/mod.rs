//! Block-grammar configuration parser.
//!
//! A secret is declared as a named block:
//!
//! ```text
//! access_token {
//!     region us-east-1
//!     path apps/gateway/access_token
//! }
//! ```
//!
//! Each field takes exactly one value. Values go through placeholder
//! expansion (see [`crate::replacer`]) before they are stored.

pub mod dispenser;
pub mod lexer;

pub use dispenser::Dispenser;
pub use lexer::{tokenize, Token};

use tracing::debug;

use crate::config::Config;
use crate::error::ParseError;
use crate::replacer::Replacer;

/// File name reported in positions when the caller has none.
pub const DEFAULT_FILENAME: &str = "Secretsfile";

/// Parses one secret block starting at the dispenser's next token.
///
/// The resulting configuration is checked with the lenient validator, so a
/// missing `path` or `region` is reported as [`ParseError::Invalid`] at the
/// position where the block ended.
///
/// # Errors
///
/// Returns a [`ParseError`] describing the first problem found.
pub fn parse_block(d: &mut Dispenser, replacer: &Replacer) -> Result<Config, ParseError> {
    if !d.next_token() {
        return Err(ParseError::EndOfInput {
            position: d.position(),
        });
    }

    let start = d.position();
    let mut config = Config {
        id: d.val().to_string(),
        ..Config::default()
    };

    while d.next_block(0) {
        let field = d.val().to_string();
        let values = replacer.replace_values(&d.remaining_args());
        let slot = match field.as_str() {
            "path" => &mut config.path,
            "region" => &mut config.region,
            _ if !d.closes_all_blocks() => {
                // A missing `}` pulls the next block's name in as a field.
                return Err(ParseError::UnclosedBlock {
                    position: start,
                    id: config.id,
                });
            }
            _ => {
                return Err(ParseError::UnsupportedField {
                    position: d.position(),
                    field,
                    secret: config.id,
                    values,
                });
            }
        };
        let [value] = values.as_slice() else {
            return Err(ParseError::InvalidFieldSyntax {
                position: d.position(),
                field,
                secret: config.id,
                values,
            });
        };
        slot.clone_from(value);
    }

    if d.nesting() > 0 {
        return Err(ParseError::UnclosedBlock {
            position: start,
            id: config.id,
        });
    }

    config.validate().map_err(|source| ParseError::Invalid {
        position: d.position(),
        source,
    })?;

    debug!(id = %config.id, line = d.line(), "parsed secret block");
    Ok(config)
}

/// Parses every secret block in `input`.
///
/// # Errors
///
/// Returns [`ParseError::EndOfInput`] for empty input,
/// [`ParseError::DuplicateSecret`] if a name repeats, or the first error of
/// any block.
pub fn parse_all(
    filename: &str,
    input: &str,
    replacer: &Replacer,
) -> Result<Vec<Config>, ParseError> {
    let mut d = Dispenser::new(filename, input)?;
    let mut configs: Vec<Config> = Vec::new();

    loop {
        let start = d.next_position();
        let config = parse_block(&mut d, replacer)?;
        if configs.iter().any(|c| c.id == config.id) {
            return Err(ParseError::DuplicateSecret {
                position: start,
                id: config.id,
            });
        }
        configs.push(config);
        if d.is_exhausted() {
            break;
        }
    }

    Ok(configs)
}
