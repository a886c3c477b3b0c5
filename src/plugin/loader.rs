//! Compatibility-gated plugin registration.

use super::command::RecordingRegistry;
use super::{
    CommandRegistry, CommandTypeCatalog, PluginCatalog, PluginError, PluginResult,
    ServiceRegistry,
};
use crate::version::SemanticVersion;

/// Register every compatible plugin in `catalog`.
///
/// Plugins run in catalog order. Services are registered before commands.
/// Plugins whose required host range excludes `host_version` are skipped
/// without error. Returns every command type the plugins registered so the
/// host can make them constructible.
pub fn register_all(
    catalog: &PluginCatalog,
    services: &mut dyn ServiceRegistry,
    commands: &mut dyn CommandRegistry,
    host_version: SemanticVersion,
) -> PluginResult<CommandTypeCatalog> {
    let mut types = CommandTypeCatalog::new();

    for plugin in catalog.iter() {
        let metadata = plugin.metadata();
        if !metadata.is_compatible_with(host_version) {
            tracing::debug!(
                plugin = %metadata.id,
                required = %metadata.required_host_range,
                host = %host_version,
                "Skipping incompatible plugin"
            );
            continue;
        }

        tracing::debug!(plugin = %metadata.id, version = %metadata.version, "Registering plugin");
        plugin.register_services(services);

        let mut recording = RecordingRegistry::new(commands, &mut types);
        plugin.register_commands(&mut recording).map_err(|source| PluginError::Registration {
            plugin: metadata.id.to_string(),
            source: Box::new(source),
        })?;
    }

    Ok(types)
}
