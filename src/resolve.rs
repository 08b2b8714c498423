//! `${key}` placeholder resolution over a variable store
//!
//! [`PlaceholderResolver`] is the [`ContentHandler`] for `${...}` markers:
//! it looks each marker's content up in a [`VariableStore`] and substitutes
//! the stored value. Markers that cannot be resolved pass through as literal
//! `${...}` text, so partial resolution is safe to repeat.
//!
//! Two resolver options live in the store itself under reserved keys,
//! snapshotted once when the resolver is built:
//! - [`KEY_ENABLE_DEFAULT_VALUE`] turns on `${key:default}` syntax
//!   (off unless the value is `"true"`, case-insensitive);
//! - [`KEY_DEFAULT_VALUE_SEPARATOR`] overrides the `":"` separator.

use std::cell::RefCell;
use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, trace};

use crate::error::Error;
use crate::scan::{ContentHandler, TokenScanner};
use crate::store::VariableStore;

/// Reserved store key that enables `${key:default}` syntax.
pub const KEY_ENABLE_DEFAULT_VALUE: &str = "enable-default-value";

/// Reserved store key that overrides the key/default separator.
pub const KEY_DEFAULT_VALUE_SEPARATOR: &str = "default-value-separator";

const OPEN_TOKEN: &str = "${";
const CLOSE_TOKEN: &str = "}";
const DEFAULT_VALUE_SEPARATOR: &str = ":";

/// Regex for markers left in already-resolved text
static MARKER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{([^}]+)\}").expect("Valid regex pattern"));

/// Resolves `${...}` markers against an optional [`VariableStore`].
///
/// ```
/// use varsub::{PlaceholderResolver, VariableStore};
///
/// let vars: VariableStore = [("username", "zhangsan")].into_iter().collect();
/// let resolver = PlaceholderResolver::new(&vars);
///
/// assert_eq!(resolver.resolve("user=${username}"), "user=zhangsan");
/// assert_eq!(resolver.resolve("${missing}"), "${missing}");
/// ```
///
/// With no store at all, every marker passes through untouched:
///
/// ```
/// use varsub::PlaceholderResolver;
///
/// let resolver = PlaceholderResolver::new(None);
/// assert_eq!(resolver.resolve("${anything}"), "${anything}");
/// ```
pub struct PlaceholderResolver<'a> {
    variables: Option<&'a VariableStore>,
    enable_default_value: bool,
    default_value_separator: String,
}

impl<'a> PlaceholderResolver<'a> {
    /// Build a resolver over `variables`, snapshotting the reserved option
    /// keys. The snapshot is fixed for the resolver's lifetime.
    pub fn new(variables: impl Into<Option<&'a VariableStore>>) -> Self {
        let variables = variables.into();
        let enable_default_value =
            option_value(variables, KEY_ENABLE_DEFAULT_VALUE, "false").eq_ignore_ascii_case("true");
        let default_value_separator =
            option_value(variables, KEY_DEFAULT_VALUE_SEPARATOR, DEFAULT_VALUE_SEPARATOR)
                .to_string();
        Self {
            variables,
            enable_default_value,
            default_value_separator,
        }
    }

    /// Resolve every well-formed `${...}` marker in `text`.
    ///
    /// Accepts either `&str` or `Option<&str>`; absent and empty input both
    /// resolve to an empty string. Malformed markers and unknown keys never
    /// fail — they come back as literal text.
    pub fn resolve<'t>(&self, text: impl Into<Option<&'t str>>) -> String {
        TokenScanner::new(OPEN_TOKEN, CLOSE_TOKEN, self).parse(text)
    }

    /// Resolve like [`resolve`](Self::resolve), but fail if any well-formed
    /// marker's lookup fell through to passthrough.
    ///
    /// Escaped markers and unterminated spans never reach the handler, so
    /// they do not trip strictness; callers that also want those rejected can
    /// run [`placeholder_references`] over the output.
    ///
    /// ```
    /// use varsub::{Error, PlaceholderResolver, VariableStore};
    ///
    /// let vars: VariableStore = [("present", "1")].into_iter().collect();
    /// let resolver = PlaceholderResolver::new(&vars);
    ///
    /// assert_eq!(resolver.resolve_strict("${present}").unwrap(), "1");
    ///
    /// let err = resolver.resolve_strict("${present} ${absent}").unwrap_err();
    /// assert_eq!(err, Error::UnresolvedPlaceholders(vec!["absent".into()]));
    /// ```
    pub fn resolve_strict<'t>(&self, text: impl Into<Option<&'t str>>) -> Result<String, Error> {
        let missing = RefCell::new(Vec::new());
        let recording = |content: &str| match self.lookup(content) {
            Some(value) => value,
            None => {
                let mut seen = missing.borrow_mut();
                if !seen.iter().any(|name| name == content) {
                    seen.push(content.to_string());
                }
                passthrough(content)
            }
        };
        let resolved = TokenScanner::new(OPEN_TOKEN, CLOSE_TOKEN, &recording).parse(text);

        let missing = missing.into_inner();
        if missing.is_empty() {
            Ok(resolved)
        } else {
            Err(Error::UnresolvedPlaceholders(missing))
        }
    }

    /// Look `content` up per the resolution rules; `None` means the marker
    /// stays unresolved.
    fn lookup(&self, content: &str) -> Option<String> {
        let variables = self.variables?;
        if self.enable_default_value {
            if let Some(at) = content.find(&self.default_value_separator) {
                // Split at the first separator; a hit on the key wins, the
                // literal default covers the miss. Never falls through.
                let key = &content[..at];
                let default = &content[at + self.default_value_separator.len()..];
                return Some(match variables.get(key) {
                    Some(value) => value.to_string(),
                    None => {
                        trace!("placeholder '{}' fell back to its default", key);
                        default.to_string()
                    }
                });
            }
        }
        let value = variables.get(content)?;
        trace!("placeholder '{}' resolved", content);
        Some(value.to_string())
    }
}

impl ContentHandler for PlaceholderResolver<'_> {
    fn handle(&self, content: &str) -> String {
        match self.lookup(content) {
            Some(value) => value,
            None => {
                debug!("placeholder '{}' left unresolved", content);
                passthrough(content)
            }
        }
    }
}

fn passthrough(content: &str) -> String {
    format!("${{{}}}", content)
}

fn option_value<'v>(
    variables: Option<&'v VariableStore>,
    key: &str,
    default: &'v str,
) -> &'v str {
    variables.and_then(|vars| vars.get(key)).unwrap_or(default)
}

/// Collect the distinct `${...}` marker contents present in `text`.
///
/// The building block for callers enforcing their own leftover-marker policy
/// on resolver output. Note that an escaped marker resolves to literal
/// `${...}` text and is indistinguishable from an unresolved one here.
///
/// ```
/// use varsub::placeholder_references;
///
/// let refs = placeholder_references("a ${x} b ${y:fallback} ${x}");
/// assert_eq!(refs.len(), 2);
/// assert!(refs.contains("x"));
/// assert!(refs.contains("y:fallback"));
/// ```
pub fn placeholder_references(text: &str) -> HashSet<String> {
    MARKER_REGEX
        .captures_iter(text)
        .map(|cap| cap[1].to_string())
        .collect()
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    fn marker_free_value() -> impl Strategy<Value = String> {
        "[a-zA-Z0-9 _.-]{0,20}"
    }

    proptest! {
        #[test]
        fn prop_resolve_is_deterministic(text in ".*") {
            let vars: VariableStore = [("a", "1"), ("b", "2")].into_iter().collect();
            let resolver = PlaceholderResolver::new(&vars);

            prop_assert_eq!(resolver.resolve(text.as_str()), resolver.resolve(text.as_str()));
        }

        #[test]
        fn prop_empty_store_is_identity_on_backslash_free_text(text in r"[^\\]*") {
            // With nothing to substitute and no escapes to strip, every
            // marker (terminated or not) reproduces itself byte-for-byte.
            let vars = VariableStore::new();
            let resolver = PlaceholderResolver::new(&vars);

            prop_assert_eq!(resolver.resolve(text.as_str()), text);
        }

        #[test]
        fn prop_resolution_is_idempotent_for_marker_free_values(
            text in r"[^\\]*",
            vars in prop::collection::hash_map("[a-z]{1,8}", marker_free_value(), 0..4),
        ) {
            let vars: VariableStore = vars.into_iter().collect();
            let resolver = PlaceholderResolver::new(&vars);

            let once = resolver.resolve(text.as_str());
            let twice = resolver.resolve(once.as_str());

            prop_assert_eq!(once, twice);
        }
    }
}
