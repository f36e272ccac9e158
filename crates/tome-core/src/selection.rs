//! # Selection Table
//!
//! Which book each logged-in identity has `select`ed for `modify`/`import`.

use std::collections::HashMap;

/// Identity → selected ISBN.
#[derive(Debug, Clone, Default)]
pub struct SelectionTable {
    bindings: HashMap<String, String>,
}

impl SelectionTable {
    pub fn new() -> Self {
        SelectionTable::default()
    }

    /// Sets or overwrites the binding for `user_id`.
    pub fn select(&mut self, user_id: impl Into<String>, isbn: impl Into<String>) {
        self.bindings.insert(user_id.into(), isbn.into());
    }

    pub fn current(&self, user_id: &str) -> Option<&str> {
        self.bindings.get(user_id).map(String::as_str)
    }

    pub fn clear(&mut self, user_id: &str) {
        self.bindings.remove(user_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_overwrites() {
        let mut table = SelectionTable::new();
        table.select("alice", "111");
        table.select("alice", "222");
        assert_eq!(table.current("alice"), Some("222"));
        assert_eq!(table.current("bob"), None);
    }

    #[test]
    fn test_clear() {
        let mut table = SelectionTable::new();
        table.select("alice", "111");
        table.clear("alice");
        table.clear("nobody");
        assert_eq!(table.current("alice"), None);
    }
}
