//! Configuration validation.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::Config;
use crate::error::ValidationError;

/// Region naming grammar of the remote store: `<area>-<direction>-<digit>`,
/// with optional extra segments such as `us-gov-west-1`.
static REGION_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z]{2}(-[a-z]+)+-[0-9]+$").unwrap_or_else(|_| unreachable!()));

/// How strictly the region field is checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegionCheck {
    /// Region only has to be non-empty.
    #[default]
    Lenient,
    /// Region must also match the store's naming grammar.
    Strict,
}

/// Returns true if `region` follows the store's region naming grammar.
#[must_use]
pub fn is_valid_region(region: &str) -> bool {
    REGION_REGEX.is_match(region)
}

/// Validates a configuration. The first failing rule wins.
///
/// Rules, in order: non-empty id, non-empty path, non-empty region, and with
/// [`RegionCheck::Strict`] a well-formed region.
///
/// # Errors
///
/// Returns the [`ValidationError`] of the first rule that fails.
pub fn validate(config: &Config, check: RegionCheck) -> Result<(), ValidationError> {
    if config.id.is_empty() {
        return Err(ValidationError::EmptyId);
    }
    if config.path.is_empty() {
        return Err(ValidationError::EmptyPath {
            id: config.id.clone(),
        });
    }
    if config.region.is_empty() {
        return Err(ValidationError::EmptyRegion {
            id: config.id.clone(),
        });
    }
    if check == RegionCheck::Strict && !is_valid_region(&config.region) {
        return Err(ValidationError::MalformedRegion {
            region: config.region.clone(),
        });
    }
    Ok(())
}
