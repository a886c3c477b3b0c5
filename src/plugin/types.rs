//! Core plugin capability set.

use super::{
    CommandRegistry, ConfigSchemaContributor, PluginMetadata, PluginResult, ServiceRegistry,
};

/// A pluggable feature module.
///
/// The host calls [`Plugin::register_services`] before
/// [`Plugin::register_commands`], so commands may rely on the plugin's own
/// services being present. Neither callback is called for a plugin whose
/// required host range excludes the running host.
pub trait Plugin: Send + Sync {
    /// Identity and compatibility declaration.
    fn metadata(&self) -> &PluginMetadata;

    /// Add services to the host container.
    fn register_services(&self, services: &mut dyn ServiceRegistry);

    /// Add commands to the host command tree.
    fn register_commands(&self, commands: &mut dyn CommandRegistry) -> PluginResult<()>;

    /// Configuration defaults this plugin contributes to new profiles.
    fn config_schema(&self) -> Option<&dyn ConfigSchemaContributor> {
        None
    }
}
