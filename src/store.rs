//! Key/value store consulted during placeholder resolution
//!
//! A [`VariableStore`] is a flat map from string keys to string values. It
//! can be built up directly, collected from pairs, deserialized from any
//! map-shaped document, or flattened out of a nested JSON object with
//! dot-notation keys.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The mapping placeholders are resolved against.
///
/// Keys are unique and insertion order is irrelevant. The store serializes
/// transparently as a plain map, so it can be read straight out of a
/// configuration document:
///
/// ```
/// use varsub::VariableStore;
///
/// let store: VariableStore = serde_json::from_str(r#"{"db.host": "localhost"}"#).unwrap();
/// assert_eq!(store.get("db.host"), Some("localhost"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariableStore {
    variables: HashMap<String, String>,
}

impl VariableStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a variable, returning the previous value for the key if any.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.variables.insert(key.into(), value.into())
    }

    /// Look up a variable by key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.variables.get(key).map(String::as_str)
    }

    /// Whether the store holds a value for `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.variables.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Iterate over all key/value pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.variables
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// Flatten a JSON object into a store with dot-notation keys.
    ///
    /// Nested objects contribute one variable per leaf; scalars are
    /// stringified (`null` becomes `"null"`), and arrays are kept as compact
    /// JSON text.
    ///
    /// ```
    /// use serde_json::json;
    /// use varsub::VariableStore;
    ///
    /// let doc = json!({"db": {"host": "localhost", "port": 5432}});
    /// let store = VariableStore::from_json_object(doc.as_object().unwrap());
    ///
    /// assert_eq!(store.get("db.host"), Some("localhost"));
    /// assert_eq!(store.get("db.port"), Some("5432"));
    /// ```
    pub fn from_json_object(object: &Map<String, Value>) -> Self {
        let mut variables = HashMap::new();
        for (key, value) in object {
            flatten_value(&mut variables, key, value);
        }
        Self { variables }
    }
}

impl From<HashMap<String, String>> for VariableStore {
    fn from(variables: HashMap<String, String>) -> Self {
        Self { variables }
    }
}

impl<K, V> FromIterator<(K, V)> for VariableStore
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(pairs: I) -> Self {
        Self {
            variables: pairs
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

impl<K, V> Extend<(K, V)> for VariableStore
where
    K: Into<String>,
    V: Into<String>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, pairs: I) {
        self.variables
            .extend(pairs.into_iter().map(|(key, value)| (key.into(), value.into())));
    }
}

fn flatten_value(variables: &mut HashMap<String, String>, prefix: &str, value: &Value) {
    match value {
        Value::Object(object) => {
            for (key, nested) in object {
                flatten_value(variables, &format!("{}.{}", prefix, key), nested);
            }
        }
        _ => {
            variables.insert(prefix.to_string(), value_to_string(value));
        }
    }
}

fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(_) | Value::Object(_) => {
            serde_json::to_string(value).unwrap_or_else(|_| String::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_collect_from_pairs() {
        let store: VariableStore = [("a", "1"), ("b", "2")].into_iter().collect();

        assert_eq!(store.len(), 2);
        assert_eq!(store.get("a"), Some("1"));
        assert!(store.contains_key("b"));
        assert!(!store.contains_key("c"));
    }

    #[test]
    fn test_insert_replaces_and_reports_previous() {
        let mut store = VariableStore::new();

        assert_eq!(store.insert("key", "old"), None);
        assert_eq!(store.insert("key", "new"), Some("old".to_string()));
        assert_eq!(store.get("key"), Some("new"));
    }

    #[test]
    fn test_from_json_object_flattens_nested_values() {
        let doc = json!({
            "name": "app",
            "db": {
                "host": "localhost",
                "pool": {"size": 8}
            },
            "debug": true,
            "tags": ["a", "b"],
            "missing": null
        });
        let store = VariableStore::from_json_object(doc.as_object().unwrap());

        assert_eq!(store.get("name"), Some("app"));
        assert_eq!(store.get("db.host"), Some("localhost"));
        assert_eq!(store.get("db.pool.size"), Some("8"));
        assert_eq!(store.get("debug"), Some("true"));
        assert_eq!(store.get("tags"), Some(r#"["a","b"]"#));
        assert_eq!(store.get("missing"), Some("null"));
    }

    #[test]
    fn test_extend_overrides_existing_keys() {
        let mut store: VariableStore = [("a", "1")].into_iter().collect();
        store.extend([("a", "2"), ("b", "3")]);

        assert_eq!(store.get("a"), Some("2"));
        assert_eq!(store.get("b"), Some("3"));
    }
}
