//! Stores

use rustc_hash::FxHashMap;
use slotmap::{SlotMap, new_key_type};

new_key_type! {
    /// Store Key
    pub struct StoreKey;
}

/// A store known to the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Store {
    /// Store display name
    pub name: String,
}

/// Interned directory of stores with a stable registration order.
///
/// Registration order doubles as the tie-break ordering for best-price
/// resolution and as the display ordering, so it must be identical for
/// every load of the same catalog source.
#[derive(Debug, Default)]
pub struct StoreDirectory {
    stores: SlotMap<StoreKey, Store>,
    by_name: FxHashMap<String, StoreKey>,
    order: Vec<StoreKey>,
}

impl StoreDirectory {
    /// Create an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a store by name, returning its key.
    ///
    /// Names are trimmed before lookup; registering an already-known name
    /// returns the existing key without changing the ordering.
    pub fn intern(&mut self, name: &str) -> StoreKey {
        let name = name.trim();

        if let Some(key) = self.by_name.get(name) {
            return *key;
        }

        let key = self.stores.insert(Store {
            name: name.to_string(),
        });

        self.by_name.insert(name.to_string(), key);
        self.order.push(key);

        key
    }

    /// Look up a store by key.
    pub fn get(&self, key: StoreKey) -> Option<&Store> {
        self.stores.get(key)
    }

    /// Look up a store's name by key.
    pub fn name(&self, key: StoreKey) -> Option<&str> {
        self.stores.get(key).map(|store| store.name.as_str())
    }

    /// Look up a store key by name.
    pub fn key_of(&self, name: &str) -> Option<StoreKey> {
        self.by_name.get(name.trim()).copied()
    }

    /// Iterate over store keys in registration order.
    pub fn keys(&self) -> impl Iterator<Item = StoreKey> + '_ {
        self.order.iter().copied()
    }

    /// Iterate over stores in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (StoreKey, &Store)> {
        self.order
            .iter()
            .filter_map(|key| self.stores.get(*key).map(|store| (*key, store)))
    }

    /// Get the number of registered stores.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Check if the directory is empty.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
