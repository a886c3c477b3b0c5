//! Sample plugin used to exercise discovery, registration and config defaults.

use std::sync::Arc;

use anyhow::Result;

use crate::plugin::{
    CommandContext, CommandDescriptor, CommandRegistry, CommandType, ConfigEntry,
    ConfigSchemaContributor, HostCommand, Plugin, PluginMarker, PluginMetadata, PluginResult,
    ServiceError, ServiceProvider, ServiceRegistry, ServiceRegistryExt,
};

pub const SAMPLE_PLUGIN_ID: &str = "hostkit.sample";

/// Message source registered by [`SamplePlugin`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleMessageProvider {
    message: String,
}

impl SampleMessageProvider {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// `plugin-hello`: prints the provider's message.
pub struct PluginHelloCommand {
    messages: Arc<SampleMessageProvider>,
}

impl HostCommand for PluginHelloCommand {
    fn execute(&self, _ctx: &CommandContext<'_>) -> Result<i32> {
        println!("Plugin hello: {}", self.messages.message());
        Ok(0)
    }
}

impl CommandDescriptor for PluginHelloCommand {
    fn build(services: &ServiceProvider) -> Result<Self, ServiceError> {
        Ok(Self { messages: services.require()? })
    }
}

pub struct SamplePlugin {
    metadata: PluginMetadata,
}

impl SamplePlugin {
    pub fn new() -> PluginResult<Self> {
        let metadata = PluginMetadata::parse(SAMPLE_PLUGIN_ID, "Sample Plugin", "0.1.0", "*")?;
        Ok(Self { metadata })
    }

    /// Discovery marker for this plugin.
    pub fn marker() -> PluginMarker {
        PluginMarker::new(std::any::type_name::<Self>(), || {
            Ok(Arc::new(Self::new()?) as Arc<dyn Plugin>)
        })
    }
}

impl Plugin for SamplePlugin {
    fn metadata(&self) -> &PluginMetadata {
        &self.metadata
    }

    fn register_services(&self, services: &mut dyn ServiceRegistry) {
        services.add_singleton_instance(SampleMessageProvider::new("plugin says hi"));
    }

    fn register_commands(&self, commands: &mut dyn CommandRegistry) -> PluginResult<()> {
        commands.add_command(
            "plugin-hello",
            CommandType::of::<PluginHelloCommand>(),
            Some("Hello from a plugin (validates plugin registration)"),
        )
    }

    fn config_schema(&self) -> Option<&dyn ConfigSchemaContributor> {
        Some(self)
    }
}

impl ConfigSchemaContributor for SamplePlugin {
    fn config_entries(&self) -> Vec<ConfigEntry> {
        vec![ConfigEntry::new("Message", "Hello from plugin config")
            .with_display_name("Greeting message")
            .with_description("Message printed by the sample plugin.")]
    }
}
