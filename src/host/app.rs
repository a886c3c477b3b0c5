//! Host application wiring.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, Command};
use serde::Serialize;

use super::{
    Clock, ConfigWizard, ConfigWizardCommand, ConsolePrompter, GreetingService, HelloCommand,
    HostAppInfo, HostOptions, HostSettings, InfoCommand, Prompter, SystemClock,
};
use crate::plugin::{
    register_all, CommandContext, CommandRegistry, CommandTree, CommandType, PluginCatalog,
    PluginContext, PluginModule, PluginResult, Resolution, ServiceCollection, ServiceRegistryExt,
};

type ServicesHook = Box<dyn FnOnce(&mut ServiceCollection, &HostSettings)>;
type CommandsHook = Box<dyn FnOnce(&mut CommandTree) -> PluginResult<()>>;
type WizardHook = Box<dyn FnOnce(&mut ServiceCollection, &mut CommandTree) -> PluginResult<()>>;

/// Builder and runner for a host CLI.
///
/// `run` wires things up in a fixed order: settings, framework defaults,
/// plugins (gated on the host version), the `config` wizard, then caller
/// hooks. Later service registrations replace earlier ones, so hooks can
/// override anything registered before them.
pub struct HostApp {
    info: HostAppInfo,
    modules: Vec<Box<dyn PluginModule>>,
    enable_plugins: bool,
    enable_framework_defaults: bool,
    prompter: Arc<dyn Prompter>,
    wizard: Option<WizardHook>,
    services_hooks: Vec<ServicesHook>,
    commands_hooks: Vec<CommandsHook>,
}

impl HostApp {
    pub fn new(info: HostAppInfo) -> Self {
        Self {
            info,
            modules: Vec::new(),
            enable_plugins: true,
            enable_framework_defaults: true,
            prompter: Arc::new(ConsolePrompter),
            wizard: None,
            services_hooks: Vec::new(),
            commands_hooks: Vec::new(),
        }
    }

    /// Add a candidate module for plugin discovery.
    pub fn module(mut self, module: impl PluginModule + 'static) -> Self {
        self.modules.push(Box::new(module));
        self
    }

    /// Toggle plugin discovery and registration.
    pub fn plugins(mut self, enabled: bool) -> Self {
        self.enable_plugins = enabled;
        self
    }

    /// Toggle the built-in `hello` and `info` commands and their services.
    pub fn framework_defaults(mut self, enabled: bool) -> Self {
        self.enable_framework_defaults = enabled;
        self
    }

    pub fn prompter(mut self, prompter: impl Prompter + 'static) -> Self {
        self.prompter = Arc::new(prompter);
        self
    }

    /// Enable the `config` group backed by `wizard`.
    pub fn config_wizard<C>(mut self, wizard: ConfigWizard<C>) -> Self
    where
        C: Serialize + Send + Sync + 'static,
    {
        let register = move |services: &mut ServiceCollection, tree: &mut CommandTree| {
            services.add_singleton_instance(wizard);
            let command = CommandType::of::<ConfigWizardCommand<C>>();
            tree.add_branch_with_default(
                "config",
                command,
                &mut |config: &mut dyn CommandRegistry| {
                    config.add_command("create", command, Some("Create or update a profile"))
                },
                Some("Generate configuration profiles"),
            )
        };
        self.wizard = Some(Box::new(register));
        self
    }

    /// Extra service registrations, applied after plugins and the wizard.
    pub fn configure_services<F>(mut self, hook: F) -> Self
    where
        F: FnOnce(&mut ServiceCollection, &HostSettings) + 'static,
    {
        self.services_hooks.push(Box::new(hook));
        self
    }

    /// Extra commands, added after plugins and the wizard.
    pub fn configure_commands<F>(mut self, hook: F) -> Self
    where
        F: FnOnce(&mut CommandTree) -> PluginResult<()> + 'static,
    {
        self.commands_hooks.push(Box::new(hook));
        self
    }

    /// Parse `args` (program name first) and run the selected command.
    ///
    /// Returns the process exit code.
    pub fn run<I, T>(mut self, args: I) -> Result<i32>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        let options = HostOptions::resolve(args.get(1..).unwrap_or_default(), &self.info);
        let settings = HostSettings::load(&options)?;
        tracing::debug!(
            config_file = %options.config_file.display(),
            env_prefix = %options.env_prefix,
            settings = settings.len(),
            "Loaded host settings"
        );

        let (tree, services) = self.compose(options, settings)?;
        let mut cli = tree.to_clap(root_command(&self.info));

        let matches = match cli.try_get_matches_from_mut(&args) {
            Ok(matches) => matches,
            Err(e) => {
                let code = e.exit_code();
                e.print().context("Failed to print usage")?;
                return Ok(code);
            }
        };

        let provider = services.build();
        match tree.resolve(&matches) {
            Resolution::Command { command, path, matches } => {
                tracing::debug!(command = %path.join(" "), "Dispatching");
                let instance = provider
                    .create_command(&command)
                    .with_context(|| format!("Failed to construct '{}'", path.join(" ")))?;
                instance.execute(&CommandContext { path: &path, matches, services: &provider })
            }
            Resolution::Help { path } => {
                cli.build();
                let mut help = cli;
                for name in &path {
                    match help.find_subcommand(name) {
                        Some(sub) => help = sub.clone(),
                        None => break,
                    }
                }
                help.print_help().context("Failed to print help")?;
                println!();
                Ok(0)
            }
        }
    }

    /// Register every service and command in the documented order.
    fn compose(
        &mut self,
        options: HostOptions,
        settings: HostSettings,
    ) -> Result<(CommandTree, ServiceCollection)> {
        let mut services = ServiceCollection::new();
        let mut tree = CommandTree::new();

        services.add_singleton_instance(self.info.clone());
        services.add_singleton_instance(options);
        services.add_singleton_instance(settings.clone());
        services.add_singleton_instance(Arc::clone(&self.prompter));

        if self.enable_framework_defaults {
            add_framework_defaults(&mut services, &mut tree)?;
        }

        if self.enable_plugins {
            let mut catalog = PluginCatalog::new();
            let found = catalog.add_from_modules(&self.modules, |_| true);
            tracing::debug!(plugins = found, "Discovered plugins");

            let context = PluginContext::new(catalog, self.info.version);
            let types =
                register_all(context.catalog(), &mut services, &mut tree, self.info.version)?;
            for command in &types {
                services.add_command_type(*command);
            }
            services.add_singleton_instance(context);
        }

        if let Some(wizard) = self.wizard.take() {
            wizard(&mut services, &mut tree)?;
        }

        for hook in self.services_hooks.drain(..) {
            hook(&mut services, &settings);
        }
        for hook in self.commands_hooks.drain(..) {
            hook(&mut tree)?;
        }

        for command in &tree.command_types() {
            services.add_command_type(*command);
        }
        Ok((tree, services))
    }
}

fn add_framework_defaults(services: &mut ServiceCollection, tree: &mut CommandTree) -> Result<()> {
    services.add_singleton_instance::<Arc<dyn Clock>>(Arc::new(SystemClock));
    services.add_transient(|sp| {
        let clock = Arc::clone(&*sp.require::<Arc<dyn Clock>>()?);
        let settings = sp.require::<HostSettings>()?;
        Ok(GreetingService::new(clock, &settings))
    });

    tree.add_command(
        "hello",
        CommandType::of::<HelloCommand>(),
        Some("Prints a greeting (sample command that validates service wiring)"),
    )?;
    tree.add_command(
        "info",
        CommandType::of::<InfoCommand>(),
        Some("Shows the host version and discovered plugins"),
    )?;
    Ok(())
}

fn root_command(info: &HostAppInfo) -> Command {
    Command::new(info.application_name.clone())
        .version(info.version.to_string())
        .about("Extensible command-line host")
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .global(true)
                .help("Enable verbose logging"),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .global(true)
                .help("Settings file"),
        )
        .arg(
            Arg::new("env-prefix")
                .short('p')
                .long("env-prefix")
                .value_name("PREFIX")
                .global(true)
                .help("Prefix of environment variables overlaid on the settings"),
        )
}
