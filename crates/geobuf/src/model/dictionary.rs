//! Document-wide property key dictionary.

use rustc_hash::FxHashMap;

/// Builder for the key table written to `Data.keys`.
///
/// Append-only: a key keeps the index it was first given for the rest of the
/// encode call.
#[derive(Debug, Clone, Default)]
pub struct KeyDictionary {
    keys: Vec<String>,
    indices: FxHashMap<String, u32>,
}

impl KeyDictionary {
    /// Creates a new empty dictionary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or gets the index for a key.
    pub fn add_key(&mut self, key: &str) -> u32 {
        if let Some(&idx) = self.indices.get(key) {
            idx
        } else {
            let idx = self.keys.len() as u32;
            self.keys.push(key.to_string());
            self.indices.insert(key.to_string(), idx);
            idx
        }
    }

    /// Returns the keys in index order.
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Returns the number of keys.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns true if no keys were added.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
