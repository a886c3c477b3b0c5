//! Core settings of the sample host's profiles.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::host::Prompter;
use crate::profile::shape;

/// Environments offered by the wizard.
pub const ENVIRONMENTS: [&str; 3] = ["dev", "test", "prod"];

/// Log levels offered by the wizard.
pub const LOG_LEVELS: [&str; 6] = ["Trace", "Debug", "Information", "Warning", "Error", "Critical"];

/// API endpoints offered by the wizard, one per environment.
pub const API_BASE_URLS: [&str; 3] =
    ["https://api.example.local", "https://api.test.example.com", "https://api.example.com"];

/// Host-owned part of a profile document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct HostProfile {
    pub name: String,
    pub environment: String,
    pub api_base_url: String,
    pub log_level: String,
}

impl Default for HostProfile {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            environment: ENVIRONMENTS[0].to_string(),
            api_base_url: API_BASE_URLS[0].to_string(),
            log_level: "Information".to_string(),
        }
    }
}

impl HostProfile {
    /// Defaults for `name`; the canonical profiles pick their own environment.
    pub fn for_profile(name: &str) -> Self {
        let mut profile = Self { name: name.to_string(), ..Self::default() };
        if let Some(i) = ENVIRONMENTS.iter().position(|env| env.eq_ignore_ascii_case(name)) {
            profile.environment = ENVIRONMENTS[i].to_string();
            profile.api_base_url = API_BASE_URLS[i].to_string();
        }
        profile
    }

    /// Ask for every field.
    pub fn prompt(name: &str, prompter: &dyn Prompter) -> Result<Self> {
        Ok(Self {
            name: name.to_string(),
            environment: prompter.select("Select environment", &choices(&ENVIRONMENTS))?,
            api_base_url: prompter.select("Select API base URL", &choices(&API_BASE_URLS))?,
            log_level: prompter.select("Select log level", &choices(&LOG_LEVELS))?,
        })
    }

    /// Whether a JSON document looks like a saved sample profile.
    pub fn is_profile(value: &Value) -> bool {
        shape::has_keys(value, &["Name", "Environment", "ApiBaseUrl", "LogLevel"])
    }
}

fn choices(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| (*v).to_string()).collect()
}
