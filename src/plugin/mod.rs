//! Plugin system for hostkit.
//!
//! Plugins are ordinary Rust types implementing [`Plugin`]. A host lists the
//! modules that declare them, collects the instances into a [`PluginCatalog`]
//! and hands the catalog to [`register_all`], which gates each plugin on its
//! required host version range before letting it register services and
//! commands.
//!
//! # Registration order
//!
//! For each compatible plugin, services are registered first and commands
//! second. Incompatible plugins are skipped silently so one stale plugin never
//! blocks host startup.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use hostkit::plugin::{
//!     register_all, CommandRegistry, CommandTree, Plugin, PluginCatalog, PluginMetadata,
//!     PluginResult, ServiceCollection, ServiceRegistry,
//! };
//! use hostkit::version::SemanticVersion;
//!
//! struct Legacy(PluginMetadata);
//!
//! impl Plugin for Legacy {
//!     fn metadata(&self) -> &PluginMetadata {
//!         &self.0
//!     }
//!
//!     fn register_services(&self, _services: &mut dyn ServiceRegistry) {}
//!
//!     fn register_commands(&self, _commands: &mut dyn CommandRegistry) -> PluginResult<()> {
//!         Ok(())
//!     }
//! }
//!
//! let meta = PluginMetadata::parse("acme.legacy", "Legacy", "0.9.0", "<1.0.0").unwrap();
//! let mut catalog = PluginCatalog::new();
//! catalog.add(Arc::new(Legacy(meta)));
//!
//! let mut services = ServiceCollection::new();
//! let mut tree = CommandTree::new();
//! let types =
//!     register_all(&catalog, &mut services, &mut tree, SemanticVersion::new(1, 0, 0)).unwrap();
//! assert!(types.is_empty());
//! ```

mod catalog;
mod command;
mod config;
mod discovery;
mod error;
mod identity;
mod loader;
mod services;
mod tree;
mod types;

pub use catalog::{PluginCatalog, PluginContext};
pub use command::{
    CommandContext, CommandDescriptor, CommandRegistry, CommandType, CommandTypeCatalog,
    ConfigureBranch, HostCommand,
};
pub use config::{ConfigEntry, ConfigSchemaContributor, ConfigValue};
pub use discovery::{discover, PluginMarker, PluginModule, StaticModule};
pub use error::{PluginError, PluginResult, ServiceError};
pub use identity::{PluginDisplayName, PluginId, PluginMetadata};
pub use loader::register_all;
pub use services::{
    ServiceCollection, ServiceDescriptor, ServiceLifetime, ServiceProvider, ServiceRegistry,
    ServiceRegistryExt,
};
pub use tree::{CommandTree, Resolution};
pub use types::Plugin;
