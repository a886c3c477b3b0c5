//! Configuration entries contributed by plugins.
//!
//! Plugins describe the settings they understand as [`ConfigEntry`] values.
//! Only the default value ends up in a profile; the remaining metadata is
//! there for interactive editors.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A JSON-serializable config value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum ConfigValue {
    /// A string value; `None` materializes as JSON `null`.
    String(Option<String>),
    /// A boolean value.
    Boolean(bool),
    /// An integer value.
    Integer(i32),
}

impl ConfigValue {
    /// Convenience constructor for a present string.
    pub fn string(value: impl Into<String>) -> Self {
        Self::String(Some(value.into()))
    }

    /// The JSON scalar written into a profile.
    pub fn to_json(&self) -> Value {
        match self {
            Self::String(Some(text)) => Value::String(text.clone()),
            Self::String(None) => Value::Null,
            Self::Boolean(flag) => Value::Bool(*flag),
            Self::Integer(number) => Value::from(*number),
        }
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        Self::string(value)
    }
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<i32> for ConfigValue {
    fn from(value: i32) -> Self {
        Self::Integer(value)
    }
}

/// Describes a single configuration key and its suggested default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigEntry {
    /// Key within the plugin's settings section (e.g. `Message`).
    pub key: String,
    /// Suggested default value.
    pub default_value: ConfigValue,
    /// Label for interactive UIs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Help text for interactive UIs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether the value is sensitive.
    #[serde(default)]
    pub is_secret: bool,
    /// Allowed values, in presentation order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allowed_values: Vec<ConfigValue>,
}

impl ConfigEntry {
    /// Create an entry with the two required fields.
    pub fn new(key: impl Into<String>, default_value: impl Into<ConfigValue>) -> Self {
        Self {
            key: key.into(),
            default_value: default_value.into(),
            display_name: None,
            description: None,
            is_secret: false,
            allowed_values: Vec::new(),
        }
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Mark the value as sensitive.
    pub fn secret(mut self) -> Self {
        self.is_secret = true;
        self
    }

    pub fn with_allowed_values(mut self, values: impl IntoIterator<Item = ConfigValue>) -> Self {
        self.allowed_values = values.into_iter().collect();
        self
    }

    /// Entries with a blank key are ignored when profiles are generated.
    pub fn has_key(&self) -> bool {
        !self.key.trim().is_empty()
    }
}

/// Optional plugin capability: contribute configuration entries to profiles.
pub trait ConfigSchemaContributor {
    /// Entries this plugin wants in every generated profile.
    fn config_entries(&self) -> Vec<ConfigEntry>;
}
