//! Merge plugin-contributed configuration defaults into profiles.

use crate::plugin::Plugin;

use super::{PluginSection, ProfileDocument};

/// Write each contributing plugin's defaults into `doc`.
///
/// Sections are keyed by plugin id. Keys already present are left untouched
/// and entries with a blank key are ignored.
pub fn apply_plugin_defaults<C, I>(doc: &mut ProfileDocument<C>, plugins: I)
where
    I: IntoIterator,
    I::Item: AsRef<dyn Plugin>,
{
    for plugin in plugins {
        let plugin = plugin.as_ref();
        let Some(contributor) = plugin.config_schema() else {
            continue;
        };

        let plugin_id = plugin.metadata().id.as_str();
        let section = doc.plugin_settings.get_or_insert_with(plugin_id, PluginSection::new);

        for entry in contributor.config_entries() {
            if !entry.has_key() || section.contains_key(&entry.key) {
                continue;
            }
            tracing::trace!(plugin = plugin_id, key = %entry.key, "Applying plugin default");
            section.insert(entry.key, entry.default_value.to_json());
        }
    }
}
