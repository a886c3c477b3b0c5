//! # Hostkit
//!
//! Plugin-extensible host framework for command-line applications.
//!
//! A host declares its identity, version and the modules that carry plugins.
//! Hostkit resolves layered settings, admits the plugins whose required host
//! range contains the host version, lets them register services and commands,
//! and generates named configuration profiles seeded with plugin defaults.
//!
//! ## Layout
//!
//! - [`version`]: semantic versions and host compatibility ranges
//! - [`plugin`]: plugin contract, discovery, services and the command tree
//! - [`profile`]: profile documents and the on-disk profile store
//! - [`host`]: settings, built-in commands, the `config` wizard and [`host::HostApp`]
//! - [`sample`]: the sample host shipped as the `hostkit` binary
//!
//! ## Quick Start
//!
//! ```bash
//! hostkit hello Ada
//! hostkit config create --name dev --non-interactive --overwrite
//! hostkit plugin-hello
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
// Allow common patterns that are intentional in this codebase

pub mod host;
pub mod plugin;
pub mod profile;
pub mod sample;
pub mod version;

pub use host::{HostApp, HostAppInfo};
pub use plugin::{Plugin, PluginError, PluginMetadata, PluginResult};
pub use version::{SemanticVersion, VersionRange};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "hostkit";
