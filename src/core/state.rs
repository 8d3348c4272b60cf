//! Accumulated configuration state shared across checks.
//!
//! Every resolved check writes its results here; later checks and the
//! output emitter read them. Keys are unique within the run's namespace:
//! a second `set` on the same key is a programming defect and fails
//! loudly instead of silently overwriting. List-valued keys (flags,
//! libraries) grow through [`ConfigState::append`].

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

/// A single configuration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Str(String),
    Bool(bool),
    List(Vec<String>),
}

impl Value {
    /// Render the value the way `make.inc` expects it.
    pub fn render(&self) -> String {
        match self {
            Value::Str(s) => s.clone(),
            Value::Bool(b) => {
                if *b {
                    "1".to_string()
                } else {
                    "0".to_string()
                }
            }
            Value::List(items) => items.join(" "),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Vec<String>> for Value {
    fn from(items: Vec<String>) -> Self {
        Value::List(items)
    }
}

/// Error writing to the configuration state.
#[derive(Debug, Error)]
pub enum StateError {
    /// A resolver tried to overwrite an existing key. Resolvers may only
    /// introduce new keys or append to list-valued keys.
    #[error("configuration key `{key}` is already set (existing value: {existing})")]
    Conflict { key: String, existing: String },

    /// `append` was called on a key that does not hold a list.
    #[error("configuration key `{key}` is not a list")]
    NotAList { key: String },
}

/// Insertion-ordered mapping from option key to resolved value.
///
/// Created empty at the start of a run, mutated only by check resolvers,
/// and read-only once the run completes.
#[derive(Debug)]
pub struct ConfigState {
    namespace: String,
    entries: Vec<(String, Value)>,
    index: HashMap<String, usize>,
}

impl ConfigState {
    /// Create an empty state for the given define namespace (e.g. `FATHOM`).
    pub fn new(namespace: impl Into<String>) -> Self {
        ConfigState {
            namespace: namespace.into().to_uppercase(),
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// The define namespace for emitted symbols.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Introduce a new key. Fails if the key already exists.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Result<(), StateError> {
        let key = key.into();
        if let Some(&i) = self.index.get(&key) {
            return Err(StateError::Conflict {
                key,
                existing: self.entries[i].1.render(),
            });
        }
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push((key, value.into()));
        Ok(())
    }

    /// Append an item to a list-valued key, creating the list if absent.
    pub fn append(&mut self, key: impl Into<String>, item: impl Into<String>) -> Result<(), StateError> {
        let key = key.into();
        match self.index.get(&key) {
            Some(&i) => match &mut self.entries[i].1 {
                Value::List(items) => {
                    items.push(item.into());
                    Ok(())
                }
                _ => Err(StateError::NotAList { key }),
            },
            None => self.set(key, vec![item.into()]),
        }
    }

    /// Look up a key. Absent keys mean "not resolved", never an error.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.index.get(key).map(|&i| &self.entries[i].1)
    }

    /// Look up a string value.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        match self.get(key) {
            Some(Value::Str(s)) => Some(s),
            _ => None,
        }
    }

    /// Look up a boolean value. Absent keys read as `false`.
    pub fn get_bool(&self, key: &str) -> bool {
        matches!(self.get(key), Some(Value::Bool(true)))
    }

    /// Look up a list value. Absent keys read as empty.
    pub fn get_list(&self, key: &str) -> &[String] {
        match self.get(key) {
            Some(Value::List(items)) => items,
            _ => &[],
        }
    }

    /// Whether a key has been resolved.
    pub fn is_set(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// All entries in insertion order, for output emission.
    pub fn all(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of resolved entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no entries have been resolved yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The preprocessor symbol emitted for a key, e.g. `FATHOM_HAVE_MKL`.
    pub fn symbol(&self, key: &str) -> String {
        format!("{}_{}", self.namespace, key.to_uppercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let mut state = ConfigState::new("fathom");
        state.set("CXX", "g++").unwrap();
        assert_eq!(state.get_str("CXX"), Some("g++"));
        assert!(state.is_set("CXX"));
        assert!(!state.is_set("LIBS"));
    }

    #[test]
    fn test_duplicate_set_conflicts() {
        let mut state = ConfigState::new("fathom");
        state.set("CXX", "g++").unwrap();
        let err = state.set("CXX", "clang++").unwrap_err();
        assert!(matches!(err, StateError::Conflict { .. }));
        // Original value untouched.
        assert_eq!(state.get_str("CXX"), Some("g++"));
    }

    #[test]
    fn test_append_creates_and_grows_list() {
        let mut state = ConfigState::new("fathom");
        state.append("CXXFLAGS", "-O2").unwrap();
        state.append("CXXFLAGS", "-Wall").unwrap();
        assert_eq!(state.get_list("CXXFLAGS"), ["-O2", "-Wall"]);
    }

    #[test]
    fn test_append_to_scalar_fails() {
        let mut state = ConfigState::new("fathom");
        state.set("CXX", "g++").unwrap();
        let err = state.append("CXX", "-O2").unwrap_err();
        assert!(matches!(err, StateError::NotAList { .. }));
    }

    #[test]
    fn test_absent_keys_read_as_unavailable() {
        let state = ConfigState::new("fathom");
        assert!(state.get("HAVE_XBLAS").is_none());
        assert!(!state.get_bool("HAVE_XBLAS"));
        assert!(state.get_list("LIBS").is_empty());
    }

    #[test]
    fn test_all_preserves_insertion_order() {
        let mut state = ConfigState::new("fathom");
        state.set("CXX", "g++").unwrap();
        state.append("CXXFLAGS", "-std=c++17").unwrap();
        state.set("HAVE_BLAS", true).unwrap();
        let keys: Vec<&str> = state.all().map(|(k, _)| k).collect();
        assert_eq!(keys, ["CXX", "CXXFLAGS", "HAVE_BLAS"]);
    }

    #[test]
    fn test_symbol_uses_namespace() {
        let state = ConfigState::new("lapack");
        assert_eq!(state.symbol("HAVE_MKL"), "LAPACK_HAVE_MKL");
    }
}
