//! # Varsub
//!
//! Single-pass token scanning and placeholder substitution for configuration
//! text.
//!
//! Text containing `${...}` markers is rewritten by replacing each marker's
//! content with a value from a key/value store. Backslash-escaped delimiters,
//! `${key:default}` fallbacks, and unterminated markers are all handled
//! without ever failing: anything that cannot be resolved comes back as
//! literal text.
//!
//! ```
//! use varsub::{PlaceholderResolver, VariableStore};
//!
//! let mut vars = VariableStore::new();
//! vars.insert("username", "zhangsan");
//!
//! let resolver = PlaceholderResolver::new(&vars);
//! assert_eq!(resolver.resolve("user=${username}"), "user=zhangsan");
//! assert_eq!(resolver.resolve(r"\${username}"), "${username}");
//! ```
//!
//! ## Modules
//!
//! - `scan` - Generic delimited-token scanner with a pluggable content handler
//! - `store` - Key/value variable store, buildable from pairs or JSON objects
//! - `resolve` - `${key}` / `${key:default}` resolution over a store
//! - `error` - Error type for strict resolution

pub mod error;
pub mod resolve;
pub mod scan;
pub mod store;

pub use error::Error;
pub use resolve::{
    placeholder_references, PlaceholderResolver, KEY_DEFAULT_VALUE_SEPARATOR,
    KEY_ENABLE_DEFAULT_VALUE,
};
pub use scan::{ContentHandler, TokenScanner};
pub use store::VariableStore;
