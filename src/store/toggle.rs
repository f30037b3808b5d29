use std::collections::HashMap;

/// Externally-owned keyed boolean store, used for per-entity expansion
/// state. Reads fall back to the store's default; every write bumps a
/// version counter so derived views can detect staleness without
/// re-reading every key.
#[derive(Debug, Clone)]
pub struct ToggleStore {
    values: HashMap<String, bool>,
    default: bool,
    version: u64,
}

impl ToggleStore {
    pub fn new(default: bool) -> Self {
        ToggleStore {
            values: HashMap::new(),
            default,
            version: 0,
        }
    }

    pub fn get(&self, id: &str) -> bool {
        self.values.get(id).copied().unwrap_or(self.default)
    }

    pub fn set(&mut self, id: &str, value: bool) {
        let previous = self.values.insert(id.to_string(), value);
        if previous != Some(value) {
            self.version += 1;
        }
    }

    /// Flip the stored value and return the new one
    pub fn toggle(&mut self, id: &str) -> bool {
        let value = !self.get(id);
        self.set(id, value);
        value
    }

    /// Monotonic change counter. Consumers cache the last version they
    /// saw and recompute when it moves.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn default_value(&self) -> bool {
        self.default
    }

    /// Only the explicitly-set entries, for persistence
    pub fn entries(&self) -> &HashMap<String, bool> {
        &self.values
    }

    /// Rebuild from persisted entries
    pub fn from_entries(default: bool, entries: HashMap<String, bool>) -> Self {
        ToggleStore {
            values: entries,
            default,
            version: 0,
        }
    }
}
