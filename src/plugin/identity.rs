//! Plugin identity value objects.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{PluginError, PluginResult};
use crate::version::{SemanticVersion, VersionRange};

fn require_text(value: impl Into<String>, field: &'static str) -> PluginResult<String> {
    let value = value.into();
    if value.trim().is_empty() {
        return Err(PluginError::BlankIdentity { field });
    }
    Ok(value)
}

/// Unique plugin identifier (e.g. `hostkit.sample`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct PluginId(String);

impl PluginId {
    /// Create an identifier, rejecting empty or whitespace-only values.
    pub fn new(value: impl Into<String>) -> PluginResult<Self> {
        require_text(value, "identifier").map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PluginId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for PluginId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Self::new(String::deserialize(deserializer)?).map_err(serde::de::Error::custom)
    }
}

/// Human-friendly plugin name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PluginDisplayName(String);

impl PluginDisplayName {
    /// Create a display name, rejecting empty or whitespace-only values.
    pub fn new(value: impl Into<String>) -> PluginResult<Self> {
        require_text(value, "display name").map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PluginDisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for PluginDisplayName {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Self::new(String::deserialize(deserializer)?).map_err(serde::de::Error::custom)
    }
}

/// Metadata declared by a plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginMetadata {
    /// Unique plugin identifier.
    pub id: PluginId,
    /// Human friendly name.
    pub display_name: PluginDisplayName,
    /// Plugin version.
    pub version: SemanticVersion,
    /// Host versions this plugin supports.
    pub required_host_range: VersionRange,
}

impl PluginMetadata {
    pub fn new(
        id: PluginId,
        display_name: PluginDisplayName,
        version: SemanticVersion,
        required_host_range: VersionRange,
    ) -> Self {
        Self { id, display_name, version, required_host_range }
    }

    /// Build metadata from raw text, validating every field.
    ///
    /// ```
    /// use hostkit::plugin::PluginMetadata;
    ///
    /// let meta = PluginMetadata::parse("acme.git", "Git", "1.4.0", ">=0.1.0 <1.0.0").unwrap();
    /// assert_eq!(meta.id.as_str(), "acme.git");
    /// assert_eq!(meta.required_host_range.to_string(), ">=0.1.0 <1.0.0");
    /// ```
    pub fn parse(
        id: &str,
        display_name: &str,
        version: &str,
        host_range: &str,
    ) -> PluginResult<Self> {
        Ok(Self {
            id: PluginId::new(id)?,
            display_name: PluginDisplayName::new(display_name)?,
            version: SemanticVersion::parse(version)?,
            required_host_range: VersionRange::parse(host_range)?,
        })
    }

    /// Whether the plugin accepts the given host version.
    pub fn is_compatible_with(&self, host_version: SemanticVersion) -> bool {
        self.required_host_range.contains(host_version)
    }
}
