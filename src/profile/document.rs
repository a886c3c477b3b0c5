//! Profile document model.
//!
//! A profile file looks like:
//!
//! ```json
//! {
//!   "Core": { "Name": "dev" },
//!   "PluginSettings": {
//!     "acme.git": { "Remote": "origin" }
//!   }
//! }
//! ```
//!
//! `Core` belongs to the host. `PluginSettings` is keyed by plugin id; plugin
//! ids and config keys are matched case-insensitively.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

fn fold(key: &str) -> String {
    key.to_lowercase()
}

/// Insertion-ordered map with case-insensitive string keys.
///
/// The spelling of the first insertion is kept for serialization.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseInsensitiveMap<V> {
    entries: IndexMap<String, (String, V)>,
}

impl<V> Default for CaseInsensitiveMap<V> {
    fn default() -> Self {
        Self { entries: IndexMap::new() }
    }
}

impl<V> CaseInsensitiveMap<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries.get(&fold(key)).map(|(_, value)| value)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        self.entries.get_mut(&fold(key)).map(|(_, value)| value)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(&fold(key))
    }

    /// Insert or replace, returning the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: V) -> Option<V> {
        let key = key.into();
        match self.entries.get_mut(&fold(&key)) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.insert(fold(&key), (key, value));
                None
            }
        }
    }

    /// Value for `key`, inserting `make()` first when absent.
    pub fn get_or_insert_with(&mut self, key: &str, make: impl FnOnce() -> V) -> &mut V {
        let (_, value) =
            self.entries.entry(fold(key)).or_insert_with(|| (key.to_string(), make()));
        value
    }

    pub fn remove(&mut self, key: &str) -> Option<V> {
        self.entries.shift_remove(&fold(key)).map(|(_, value)| value)
    }

    /// Entries with their original key spelling.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.values().map(|(key, value)| (key.as_str(), value))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.values().map(|(key, _)| key.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V> FromIterator<(K, V)> for CaseInsensitiveMap<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

impl<V: Serialize> Serialize for CaseInsensitiveMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for CaseInsensitiveMap<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = IndexMap::<String, V>::deserialize(deserializer)?;
        Ok(raw.into_iter().collect())
    }
}

/// Settings of one plugin: config key to JSON scalar.
pub type PluginSection = CaseInsensitiveMap<Value>;

/// Plugin sections keyed by plugin id.
pub type PluginSettings = CaseInsensitiveMap<PluginSection>;

/// Root persisted profile document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProfileDocument<C> {
    /// Host-owned settings.
    pub core: C,
    /// Plugin settings keyed by plugin id.
    #[serde(default)]
    pub plugin_settings: PluginSettings,
}

impl<C> ProfileDocument<C> {
    /// Document with the given core settings and no plugin settings.
    pub fn new(core: C) -> Self {
        Self { core, plugin_settings: PluginSettings::new() }
    }

    /// Value of `key` in the section of `plugin_id`.
    pub fn plugin_value(&self, plugin_id: &str, key: &str) -> Option<&Value> {
        self.plugin_settings.get(plugin_id)?.get(key)
    }
}
