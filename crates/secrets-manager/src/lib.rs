//! # Secrets Manager
//!
//! Configuration-driven secret resolution with lazy fetch and per-instance
//! caching:
//!
//! - **Two configuration forms**: a block grammar for humans and a JSON
//!   object for machines, both producing the same [`Config`]
//! - **Validation**: lenient checks while parsing, strict region checks
//!   when provisioning
//! - **Pluggable stores**: a [`Connector`] builds a [`SecretStoreClient`]
//!   per secret; [`MemoryStore`] is provided for tests and local use
//! - **Caching**: each [`Plugin`] keeps the last resolved [`SecretBundle`]
//!   and replaces it wholesale on the next successful resolution
//!
//! ## Example
//!
//! ```rust
//! use secrets_manager::{FetchContext, MemoryStore, Plugin};
//!
//! let store = MemoryStore::new();
//! store.put("apps/db", r#"{"username":"app","password":"p1"}"#);
//!
//! let mut plugin = Plugin::from_block(
//!     "Secretsfile",
//!     "db {\n  path apps/db\n  region us-east-1\n}",
//! )
//! .expect("valid block");
//! plugin.provision(&store).expect("provisioned");
//!
//! let ctx = FetchContext::background();
//! let password = plugin.get_secret_by_key(&ctx, "password").expect("resolved");
//! assert_eq!(password, "p1");
//! ```
//!
//! ## Security Considerations
//!
//! - Raw payloads use `zeroize` to clear memory on drop
//! - Debug output for payloads, bundles and instances is redacted

pub mod bundle;
pub mod client;
pub mod config;
pub mod error;
pub mod memory;
pub mod parser;
pub mod plugin;
pub mod replacer;
pub mod validation;

// Re-export commonly used types
pub use error::{
    Error, LookupError, ParseError, Position, ResolveError, Result, StoreError, StoreErrorKind,
    ValidationError,
};

pub use bundle::{BundleMetadata, SecretBundle};
pub use client::{Connector, FetchContext, SecretPayload, SecretStoreClient};
pub use config::Config;
pub use memory::MemoryStore;
pub use parser::{parse_all, parse_block, Dispenser, DEFAULT_FILENAME};
pub use plugin::{Plugin, PluginState, SecretSource};
pub use replacer::{Replacer, REPLACEMENT_FAILED};
pub use validation::{is_valid_region, validate, RegionCheck};
