//! Plugin catalog and the shared discovered-plugin context.

use std::fmt;
use std::sync::Arc;

use super::discovery::{discover, PluginModule};
use super::{Plugin, PluginMetadata};
use crate::version::SemanticVersion;

/// Insertion-ordered collection of plugin instances.
#[derive(Clone, Default)]
pub struct PluginCatalog {
    plugins: Vec<Arc<dyn Plugin>>,
}

impl PluginCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a plugin instance.
    pub fn add(&mut self, plugin: Arc<dyn Plugin>) {
        tracing::debug!(plugin = %plugin.metadata().id, "Adding plugin to catalog");
        self.plugins.push(plugin);
    }

    /// Instantiate every plugin declared by the modules that pass discovery.
    ///
    /// Returns the number of plugins added.
    pub fn add_from_modules<P>(&mut self, modules: &[Box<dyn PluginModule>], predicate: P) -> usize
    where
        P: Fn(&dyn PluginModule) -> bool,
    {
        let before = self.plugins.len();
        for module in discover(modules, predicate) {
            for marker in module.markers() {
                tracing::debug!(
                    module = module.name(),
                    plugin_type = marker.type_name(),
                    "Instantiating plugin"
                );
                match marker.instantiate() {
                    Ok(plugin) => self.add(plugin),
                    Err(e) => tracing::warn!(
                        module = module.name(),
                        plugin_type = marker.type_name(),
                        error = %e,
                        "Skipping plugin that failed to construct"
                    ),
                }
            }
        }
        self.plugins.len() - before
    }

    /// Plugins in insertion order.
    pub fn plugins(&self) -> &[Arc<dyn Plugin>] {
        &self.plugins
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Plugin>> {
        self.plugins.iter()
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}

impl fmt::Debug for PluginCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.plugins.iter().map(|p| p.metadata().id.as_str())).finish()
    }
}

impl FromIterator<Arc<dyn Plugin>> for PluginCatalog {
    fn from_iter<I: IntoIterator<Item = Arc<dyn Plugin>>>(iter: I) -> Self {
        Self { plugins: iter.into_iter().collect() }
    }
}

/// One discovery snapshot, shared by the command tree and the config wizard.
#[derive(Debug, Clone)]
pub struct PluginContext {
    catalog: PluginCatalog,
    host_version: SemanticVersion,
}

impl PluginContext {
    pub fn new(catalog: PluginCatalog, host_version: SemanticVersion) -> Self {
        Self { catalog, host_version }
    }

    pub fn catalog(&self) -> &PluginCatalog {
        &self.catalog
    }

    pub fn host_version(&self) -> SemanticVersion {
        self.host_version
    }

    /// Every discovered plugin, compatible or not.
    pub fn plugins(&self) -> &[Arc<dyn Plugin>] {
        self.catalog.plugins()
    }

    /// Plugins whose host range contains the running host version.
    pub fn compatible(&self) -> impl Iterator<Item = &Arc<dyn Plugin>> {
        let host_version = self.host_version;
        self.catalog.iter().filter(move |p| p.metadata().is_compatible_with(host_version))
    }

    /// Metadata of every discovered plugin with its compatibility flag.
    pub fn summary(&self) -> Vec<(PluginMetadata, bool)> {
        self.catalog
            .iter()
            .map(|p| {
                let metadata = p.metadata().clone();
                let compatible = metadata.is_compatible_with(self.host_version);
                (metadata, compatible)
            })
            .collect()
    }
}
