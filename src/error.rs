use thiserror::Error;

/// Errors surfaced by strict resolution.
///
/// The scanning and resolution core never fails — malformed markers and
/// unknown keys degrade to literal text. Only
/// [`resolve_strict`](crate::PlaceholderResolver::resolve_strict) turns
/// leftover placeholders into an error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("unresolved placeholders: {}", .0.join(", "))]
    UnresolvedPlaceholders(Vec<String>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unresolved_placeholders_display() {
        let err = Error::UnresolvedPlaceholders(vec!["a".to_string(), "b:x".to_string()]);

        assert_eq!(err.to_string(), "unresolved placeholders: a, b:x");
    }
}
