//! Host identity.

use crate::version::SemanticVersion;

/// Identity of a host application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostAppInfo {
    /// Name used for the binary, profile file prefix and help output.
    pub application_name: String,
    /// Version checked against plugin host ranges.
    pub version: SemanticVersion,
    /// Settings file read when neither `--config` nor the environment names one.
    pub default_config_file_name: String,
    /// Prefix of environment variables overlaid on the settings file.
    pub default_env_prefix: String,
}

impl HostAppInfo {
    /// Identity with `{name}.json` as settings file and `{NAME}_` as env prefix.
    pub fn new(application_name: impl Into<String>, version: SemanticVersion) -> Self {
        let application_name = application_name.into().trim().to_string();
        let default_config_file_name = format!("{application_name}.json");
        let default_env_prefix = format!("{}_", env_name(&application_name));
        Self { application_name, version, default_config_file_name, default_env_prefix }
    }

    pub fn with_config_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.default_config_file_name = file_name.into();
        self
    }

    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.default_env_prefix = prefix.into();
        self
    }

    /// Environment variable naming the settings file (e.g. `HOSTKIT_CONFIG_FILE`).
    pub fn config_file_variable(&self) -> String {
        format!("{}_CONFIG_FILE", env_name(&self.application_name))
    }

    /// Environment variable naming the env prefix (e.g. `HOSTKIT_ENV_PREFIX`).
    pub fn env_prefix_variable(&self) -> String {
        format!("{}_ENV_PREFIX", env_name(&self.application_name))
    }
}

/// Upper-case `name` with every non-alphanumeric character replaced by `_`.
fn env_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_uppercase() } else { '_' })
        .collect()
}
