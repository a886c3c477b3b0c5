//! Layered host settings.
//!
//! Settings come from an optional JSON file overlaid by environment variables
//! carrying the host's prefix. Nested JSON keys are flattened to
//! `Section:Key`; environment variables spell the separator as `__`, so
//! `ACME_Greeting__Prefix=Hi` sets `Greeting:Prefix`. Lookups ignore case.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::Value;

use super::HostAppInfo;
use crate::profile::CaseInsensitiveMap;

/// Settings file and env prefix picked for this invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostOptions {
    pub config_file: PathBuf,
    pub env_prefix: String,
}

impl HostOptions {
    /// Resolve from `args` and the process environment.
    pub fn resolve(args: &[String], info: &HostAppInfo) -> Self {
        Self::resolve_with(args, info, |name| std::env::var(name).ok())
    }

    /// Resolve from `args`, then `env`, then the defaults in `info`.
    pub fn resolve_with<E>(args: &[String], info: &HostAppInfo, env: E) -> Self
    where
        E: Fn(&str) -> Option<String>,
    {
        let early = EarlyArgs::scan(args);
        let config_file = early
            .config
            .map(str::to_string)
            .or_else(|| env(&info.config_file_variable()).filter(|v| !v.trim().is_empty()))
            .unwrap_or_else(|| info.default_config_file_name.clone());

        let env_prefix = early
            .env_prefix
            .map(str::to_string)
            .or_else(|| env(&info.env_prefix_variable()).filter(|v| !v.trim().is_empty()))
            .unwrap_or_else(|| info.default_env_prefix.clone());

        Self {
            config_file: PathBuf::from(shellexpand::tilde(&config_file).into_owned()),
            env_prefix: normalize_prefix(&env_prefix, &info.default_env_prefix),
        }
    }
}

/// Global options picked out of the raw arguments before clap runs.
///
/// Accepts the spellings clap does: `--config file`, `--config=file`,
/// `-c file`, `-cfile`, `-c=file` and bundles such as `-vc file`. The first
/// occurrence of an option decides its value; a blank value counts as absent.
/// Scanning stops at `--`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EarlyArgs<'a> {
    pub verbose: bool,
    pub config: Option<&'a str>,
    pub env_prefix: Option<&'a str>,
}

impl<'a> EarlyArgs<'a> {
    /// Scan `args` (program name excluded).
    pub fn scan(args: &'a [String]) -> Self {
        let mut verbose = false;
        let mut config = None;
        let mut env_prefix = None;
        let mut rest = args.iter().map(String::as_str);

        while let Some(arg) = rest.next() {
            if arg == "--" {
                break;
            }

            if let Some(long) = arg.strip_prefix("--") {
                let (name, inline) = match long.split_once('=') {
                    Some((name, value)) => (name, Some(value)),
                    None => (long, None),
                };
                match name {
                    "verbose" => verbose = true,
                    "config" => first_value(&mut config, inline.or_else(|| rest.next())),
                    "env-prefix" => first_value(&mut env_prefix, inline.or_else(|| rest.next())),
                    _ => {}
                }
                continue;
            }

            let Some(cluster) = arg.strip_prefix('-') else {
                continue;
            };
            for (at, short) in cluster.char_indices() {
                let slot = match short {
                    'v' => {
                        verbose = true;
                        continue;
                    }
                    'h' | 'V' => continue,
                    'c' => &mut config,
                    'p' => &mut env_prefix,
                    _ => break,
                };
                let attached = &cluster[at + short.len_utf8()..];
                let attached = attached.strip_prefix('=').unwrap_or(attached);
                let value = if attached.is_empty() { rest.next() } else { Some(attached) };
                first_value(slot, value);
                break;
            }
        }

        Self { verbose, config: config.flatten(), env_prefix: env_prefix.flatten() }
    }
}

fn first_value<'a>(slot: &mut Option<Option<&'a str>>, value: Option<&'a str>) {
    if slot.is_none() {
        *slot = Some(value.filter(|v| !v.trim().is_empty()));
    }
}

fn normalize_prefix(prefix: &str, default: &str) -> String {
    let prefix = prefix.trim();
    if prefix.is_empty() {
        return default.to_string();
    }
    if prefix.ends_with('_') {
        prefix.to_string()
    } else {
        format!("{prefix}_")
    }
}

/// Flattened, case-insensitive host settings.
#[derive(Debug, Clone, Default)]
pub struct HostSettings {
    values: CaseInsensitiveMap<String>,
}

impl HostSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the settings file (if present) and overlay the process environment.
    pub fn load(options: &HostOptions) -> Result<Self> {
        let mut settings = Self::new();
        if options.config_file.is_file() {
            settings.merge_file(&options.config_file)?;
        } else {
            tracing::debug!(path = %options.config_file.display(), "No settings file");
        }
        settings.merge_env(&options.env_prefix, std::env::vars());
        Ok(settings)
    }

    /// Overlay the contents of a JSON settings file.
    pub fn merge_file(&mut self, path: &Path) -> Result<()> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file {}", path.display()))?;
        let value: Value = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse settings file {}", path.display()))?;
        self.merge_json(&value);
        Ok(())
    }

    /// Overlay a JSON value, flattening nested keys.
    pub fn merge_json(&mut self, value: &Value) {
        flatten(value, None, &mut self.values);
    }

    /// Overlay variables whose name starts with `prefix` (compared without
    /// regard to ASCII case), stripping the prefix and mapping `__` to `:`.
    pub fn merge_env<I>(&mut self, prefix: &str, vars: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (name, value) in vars {
            let Some(head) = name.get(..prefix.len()) else {
                continue;
            };
            if !head.eq_ignore_ascii_case(prefix) {
                continue;
            }
            let key = name[prefix.len()..].replace("__", ":");
            if !key.is_empty() {
                self.values.insert(key, value);
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key, value.into());
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

fn flatten(value: &Value, prefix: Option<&str>, out: &mut CaseInsensitiveMap<String>) {
    let join = |key: &str| match prefix {
        Some(prefix) => format!("{prefix}:{key}"),
        None => key.to_string(),
    };

    match value {
        Value::Object(map) => {
            for (key, child) in map {
                flatten(child, Some(&join(key)), out);
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                flatten(child, Some(&join(&index.to_string())), out);
            }
        }
        Value::String(text) => insert_leaf(out, prefix, text.clone()),
        Value::Null => insert_leaf(out, prefix, String::new()),
        Value::Bool(_) | Value::Number(_) => insert_leaf(out, prefix, value.to_string()),
    }
}

fn insert_leaf(out: &mut CaseInsensitiveMap<String>, key: Option<&str>, value: String) {
    if let Some(key) = key {
        out.insert(key, value);
    }
}
