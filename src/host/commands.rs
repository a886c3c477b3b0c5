//! Built-in host commands.

use std::sync::Arc;

use anyhow::Result;
use clap::Arg;

use super::{GreetingService, HostAppInfo};
use crate::plugin::{
    CommandContext, CommandDescriptor, HostCommand, PluginContext, ServiceError, ServiceProvider,
};

/// `hello [name]`: prints a greeting.
pub struct HelloCommand {
    greeting: Arc<GreetingService>,
}

impl HostCommand for HelloCommand {
    fn execute(&self, ctx: &CommandContext<'_>) -> Result<i32> {
        let name = ctx.matches.get_one::<String>("name").map(String::as_str);
        println!("{}", self.greeting.format_greeting(name));
        Ok(0)
    }
}

impl CommandDescriptor for HelloCommand {
    fn args() -> Vec<Arg> {
        vec![Arg::new("name").value_name("NAME").help("Who to greet")]
    }

    fn build(services: &ServiceProvider) -> Result<Self, ServiceError> {
        Ok(Self { greeting: services.require()? })
    }
}

/// `info`: host version and the load decision for every discovered plugin.
pub struct InfoCommand {
    info: Arc<HostAppInfo>,
    plugins: Option<Arc<PluginContext>>,
}

impl InfoCommand {
    fn render(&self) -> Vec<String> {
        let mut lines = vec![format!("{} {}", self.info.application_name, self.info.version)];

        let Some(context) = &self.plugins else {
            lines.push("Plugins: disabled".to_string());
            return lines;
        };

        let summary = context.summary();
        if summary.is_empty() {
            lines.push("Plugins: none".to_string());
            return lines;
        }

        lines.push("Plugins:".to_string());
        for (metadata, compatible) in summary {
            let status = if compatible { "loaded" } else { "skipped (incompatible host)" };
            lines.push(format!(
                "  {} {} ({}) requires host {}: {status}",
                metadata.id, metadata.version, metadata.display_name, metadata.required_host_range
            ));
        }
        lines
    }
}

impl HostCommand for InfoCommand {
    fn execute(&self, _ctx: &CommandContext<'_>) -> Result<i32> {
        for line in self.render() {
            println!("{line}");
        }
        Ok(0)
    }
}

impl CommandDescriptor for InfoCommand {
    fn build(services: &ServiceProvider) -> Result<Self, ServiceError> {
        Ok(Self { info: services.require()?, plugins: services.try_get()? })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugin::{
        CommandRegistry, Plugin, PluginCatalog, PluginMetadata, PluginResult, ServiceRegistry,
    };
    use crate::version::SemanticVersion;

    struct Stub(PluginMetadata);

    impl Plugin for Stub {
        fn metadata(&self) -> &PluginMetadata {
            &self.0
        }

        fn register_services(&self, _services: &mut dyn ServiceRegistry) {}

        fn register_commands(&self, _commands: &mut dyn CommandRegistry) -> PluginResult<()> {
            Ok(())
        }
    }

    fn stub(id: &str, range: &str) -> Arc<dyn Plugin> {
        Arc::new(Stub(PluginMetadata::parse(id, "Stub", "0.3.0", range).unwrap()))
    }

    #[test]
    fn test_render_plugins() {
        let version = SemanticVersion::new(1, 0, 0);
        let catalog: PluginCatalog = [stub("new", ">=1.0.0"), stub("old", "<1.0.0")]
            .into_iter()
            .collect();
        let command = InfoCommand {
            info: Arc::new(HostAppInfo::new("acme", version)),
            plugins: Some(Arc::new(PluginContext::new(catalog, version))),
        };

        assert_eq!(
            command.render(),
            vec![
                "acme 1.0.0",
                "Plugins:",
                "  new 0.3.0 (Stub) requires host >=1.0.0: loaded",
                "  old 0.3.0 (Stub) requires host <1.0.0: skipped (incompatible host)",
            ]
        );
    }

    #[test]
    fn test_render_without_plugins() {
        let command = InfoCommand {
            info: Arc::new(HostAppInfo::new("acme", SemanticVersion::new(0, 1, 0))),
            plugins: None,
        };
        assert_eq!(command.render(), vec!["acme 0.1.0", "Plugins: disabled"]);
    }
}
