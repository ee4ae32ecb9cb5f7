use std::collections::HashMap;

/// Case-insensitive named-value store backing the persistent variable
/// namespace. Keys are normalized to lowercase; `answer`, `pi` and `e`
/// are seeded on construction and after every `reset`.
#[derive(Debug, Clone)]
pub struct VariableStore {
    values: HashMap<String, f64>,
}

/// Reserved name updated after every successful evaluation.
pub const ANSWER: &str = "answer";

impl VariableStore {
    pub fn new() -> Self {
        let mut store = VariableStore {
            values: HashMap::new(),
        };
        store.seed();
        store
    }

    fn seed(&mut self) {
        self.values.insert(ANSWER.to_string(), 0.0);
        self.values.insert("pi".to_string(), std::f64::consts::PI);
        self.values.insert("e".to_string(), std::f64::consts::E);
    }

    /// Drops every user variable and re-seeds the reserved entries.
    pub fn reset(&mut self) {
        self.values.clear();
        self.seed();
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(&name.to_lowercase()).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(&name.to_lowercase())
    }

    /// Unvalidated insert; callers are responsible for the naming rules.
    pub(crate) fn set(&mut self, name: &str, value: f64) {
        self.values.insert(name.to_lowercase(), value);
    }

    pub(crate) fn remove(&mut self, name: &str) -> Option<f64> {
        self.values.remove(&name.to_lowercase())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(name, value)| (name.as_str(), *value))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Naming rule shared by assignment, external mutation and function
    /// registration: a letter followed by letters, digits or underscores.
    pub fn is_valid_name(name: &str) -> bool {
        let mut chars = name.chars();
        match chars.next() {
            Some(first) if first.is_ascii_alphabetic() => {
                chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
            }
            _ => false,
        }
    }
}

impl Default for VariableStore {
    fn default() -> Self {
        VariableStore::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserved_entries_seeded() {
        let store = VariableStore::new();
        assert_eq!(store.get(ANSWER), Some(0.0));
        assert_eq!(store.get("pi"), Some(std::f64::consts::PI));
        assert_eq!(store.get("e"), Some(std::f64::consts::E));
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let mut store = VariableStore::new();
        store.set("Rate", 0.25);
        assert_eq!(store.get("rate"), Some(0.25));
        assert_eq!(store.get("RATE"), Some(0.25));
    }

    #[test]
    fn test_remove_and_reset() {
        let mut store = VariableStore::new();
        store.set("x", 800.0);
        assert_eq!(store.remove("X"), Some(800.0));
        assert_eq!(store.get("x"), None);

        store.set("y", 1.0);
        store.reset();
        assert_eq!(store.get("y"), None);
        assert_eq!(store.get(ANSWER), Some(0.0));
    }

    #[test]
    fn test_name_validation() {
        assert!(VariableStore::is_valid_name("x"));
        assert!(VariableStore::is_valid_name("answer52"));
        assert!(VariableStore::is_valid_name("a_long_name"));
        assert!(!VariableStore::is_valid_name("_x3"));
        assert!(!VariableStore::is_valid_name("3x"));
        assert!(!VariableStore::is_valid_name(""));
        assert!(!VariableStore::is_valid_name("x-y"));
    }
}
