//! The `config` command group: generate configuration profiles.
//!
//! `config` and `config create` run the same wizard. It bootstraps the
//! default profiles, settles on a profile name (from `--name` or by asking),
//! builds the host's core settings, merges plugin defaults and writes the
//! result either into the profile store or to `--output`.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Arg, ArgAction, ArgMatches};
use serde::Serialize;
use serde_json::Value;

use super::{HostAppInfo, Prompter};
use crate::plugin::{
    CommandContext, CommandDescriptor, HostCommand, Plugin, PluginContext, ServiceError,
    ServiceProvider,
};
use crate::profile::{self, apply_plugin_defaults, shape, ProfileDocument, ProfileStore};

/// Choice offered next to the existing profiles in interactive mode.
pub const CREATE_NEW: &str = "<create new>";

/// Profile name suggested when creating a new one interactively.
pub const DEFAULT_NEW_PROFILE: &str = "custom";

type DefaultCoreFn<C> = dyn Fn(&str) -> C + Send + Sync;
type PromptCoreFn<C> = dyn Fn(&str, &dyn Prompter) -> Result<C> + Send + Sync;

/// Host-supplied pieces of the wizard.
pub struct ConfigWizard<C> {
    create_default: Arc<DefaultCoreFn<C>>,
    prompt: Arc<PromptCoreFn<C>>,
    is_profile: fn(&Value) -> bool,
}

impl<C> ConfigWizard<C> {
    /// `create_default` builds core settings without asking anything;
    /// `prompt` builds them interactively.
    pub fn new<D, P>(create_default: D, prompt: P) -> Self
    where
        D: Fn(&str) -> C + Send + Sync + 'static,
        P: Fn(&str, &dyn Prompter) -> Result<C> + Send + Sync + 'static,
    {
        Self {
            create_default: Arc::new(create_default),
            prompt: Arc::new(prompt),
            is_profile: shape::is_profile_document,
        }
    }

    /// Shape check used to list existing profiles.
    pub fn with_profile_shape(mut self, is_profile: fn(&Value) -> bool) -> Self {
        self.is_profile = is_profile;
        self
    }

    pub fn default_core(&self, name: &str) -> C {
        (self.create_default)(name)
    }
}

impl<C> Clone for ConfigWizard<C> {
    fn clone(&self) -> Self {
        Self {
            create_default: Arc::clone(&self.create_default),
            prompt: Arc::clone(&self.prompt),
            is_profile: self.is_profile,
        }
    }
}

/// Parsed `config` flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileRequest {
    pub name: Option<String>,
    pub output: Option<PathBuf>,
    pub profiles_root: Option<PathBuf>,
    pub overwrite: bool,
    pub non_interactive: bool,
}

impl ProfileRequest {
    fn from_matches(matches: &ArgMatches) -> Self {
        Self {
            name: matches.get_one::<String>("name").cloned(),
            output: matches.get_one::<PathBuf>("output").cloned(),
            profiles_root: matches.get_one::<PathBuf>("profiles-root").cloned(),
            overwrite: matches.get_flag("overwrite"),
            non_interactive: matches.get_flag("non-interactive"),
        }
    }
}

/// Outcome of a wizard run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenProfile {
    pub name: String,
    pub path: PathBuf,
    /// Store root, unless the profile went to `--output`.
    pub profiles_root: Option<PathBuf>,
}

impl<C: Serialize> ConfigWizard<C> {
    /// Run the wizard for `app_name` with the given plugins.
    pub fn run(
        &self,
        app_name: &str,
        request: &ProfileRequest,
        plugins: &[Arc<dyn Plugin>],
        prompter: &dyn Prompter,
    ) -> Result<WrittenProfile> {
        let store = ProfileStore::new(app_name, request.profiles_root.as_deref())?;
        store
            .ensure_default_profiles(|name| self.document(self.default_core(name), plugins))
            .context("Failed to create default profiles")?;

        let name = self.profile_name(&store, request, prompter)?;
        let core = if request.non_interactive {
            self.default_core(&name)
        } else {
            (self.prompt)(&name, prompter)?
        };
        let doc = self.document(core, plugins);

        if let Some(output) = &request.output {
            let path = absolute(output)?;
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            profile::write_json(&path, &doc)?;
            return Ok(WrittenProfile { name, path, profiles_root: None });
        }

        let path = store.save(&name, &doc, request.overwrite)?;
        Ok(WrittenProfile { name, path, profiles_root: Some(store.root().to_path_buf()) })
    }

    fn document(&self, core: C, plugins: &[Arc<dyn Plugin>]) -> ProfileDocument<C> {
        let mut doc = ProfileDocument::new(core);
        apply_plugin_defaults(&mut doc, plugins);
        doc
    }

    fn profile_name(
        &self,
        store: &ProfileStore,
        request: &ProfileRequest,
        prompter: &dyn Prompter,
    ) -> Result<String> {
        if let Some(name) = request.name.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
            return Ok(name.to_string());
        }
        if request.non_interactive {
            bail!("A profile name is required in non-interactive mode (use --name)");
        }

        let mut choices = store.list_profiles(self.is_profile);
        choices.push(CREATE_NEW.to_string());

        let selected = prompter.select("Select a profile", &choices)?;
        let name = if selected == CREATE_NEW {
            prompter.ask("New profile name?", DEFAULT_NEW_PROFILE)?
        } else {
            selected
        };

        let name = name.trim();
        Ok(if name.is_empty() { DEFAULT_NEW_PROFILE } else { name }.to_string())
    }
}

fn absolute(path: &Path) -> Result<PathBuf> {
    let path = PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).into_owned());
    if path.is_absolute() {
        return Ok(path);
    }
    let cwd = std::env::current_dir().context("Failed to read the current directory")?;
    Ok(cwd.join(path))
}

/// Command behind `config` and `config create`.
pub struct ConfigWizardCommand<C> {
    wizard: Arc<ConfigWizard<C>>,
    info: Arc<HostAppInfo>,
    prompter: Arc<Arc<dyn Prompter>>,
    plugins: Option<Arc<PluginContext>>,
}

impl<C: Serialize> HostCommand for ConfigWizardCommand<C> {
    fn execute(&self, ctx: &CommandContext<'_>) -> Result<i32> {
        let request = ProfileRequest::from_matches(ctx.matches);
        let plugins: Vec<Arc<dyn Plugin>> = self
            .plugins
            .as_ref()
            .map(|context| context.compatible().cloned().collect())
            .unwrap_or_default();

        let written = self.wizard.run(
            &self.info.application_name,
            &request,
            &plugins,
            &**self.prompter,
        )?;

        println!("Wrote profile '{}' to {}", written.name, written.path.display());
        if let Some(root) = &written.profiles_root {
            println!("Profiles root: {}", root.display());
        }
        Ok(0)
    }
}

impl<C: Serialize + Send + Sync + 'static> CommandDescriptor for ConfigWizardCommand<C> {
    fn args() -> Vec<Arg> {
        vec![
            Arg::new("name").long("name").value_name("NAME").help("Profile name"),
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("FILE")
                .value_parser(clap::value_parser!(PathBuf))
                .help("Write the profile to this file instead of the profiles root"),
            Arg::new("profiles-root")
                .long("profiles-root")
                .value_name("DIR")
                .value_parser(clap::value_parser!(PathBuf))
                .help("Directory holding profiles (defaults to the home directory)"),
            Arg::new("overwrite")
                .long("overwrite")
                .action(ArgAction::SetTrue)
                .help("Replace an existing profile"),
            Arg::new("non-interactive")
                .long("non-interactive")
                .action(ArgAction::SetTrue)
                .help("Use defaults instead of prompting"),
        ]
    }

    fn build(services: &ServiceProvider) -> Result<Self, ServiceError> {
        Ok(Self {
            wizard: services.require()?,
            info: services.require()?,
            prompter: services.require()?,
            plugins: services.try_get()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use serde::Deserialize;
    use serde_json::json;
    use tempfile::TempDir;

    use super::*;
    use crate::plugin::{
        CommandRegistry, ConfigEntry, ConfigSchemaContributor, PluginMetadata, PluginResult,
        ServiceRegistry,
    };

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "PascalCase")]
    struct Core {
        name: String,
        prompted: bool,
    }

    fn wizard() -> ConfigWizard<Core> {
        ConfigWizard::new(
            |name| Core { name: name.to_string(), prompted: false },
            |name, _| Ok(Core { name: name.to_string(), prompted: true }),
        )
    }

    /// Replays canned answers and records the choices it was offered.
    #[derive(Default)]
    struct Scripted {
        select: Option<String>,
        ask: Option<String>,
        offered: Mutex<Vec<String>>,
    }

    impl Prompter for Scripted {
        fn select(&self, _title: &str, choices: &[String]) -> std::io::Result<String> {
            *self.offered.lock().unwrap() = choices.to_vec();
            Ok(self.select.clone().unwrap_or_else(|| choices[0].clone()))
        }

        fn ask(&self, _question: &str, default: &str) -> std::io::Result<String> {
            Ok(self.ask.clone().unwrap_or_else(|| default.to_string()))
        }
    }

    struct Contributing(PluginMetadata);

    impl Plugin for Contributing {
        fn metadata(&self) -> &PluginMetadata {
            &self.0
        }

        fn register_services(&self, _services: &mut dyn ServiceRegistry) {}

        fn register_commands(&self, _commands: &mut dyn CommandRegistry) -> PluginResult<()> {
            Ok(())
        }

        fn config_schema(&self) -> Option<&dyn ConfigSchemaContributor> {
            Some(self)
        }
    }

    impl ConfigSchemaContributor for Contributing {
        fn config_entries(&self) -> Vec<ConfigEntry> {
            vec![ConfigEntry::new("Message", "hi")]
        }
    }

    fn plugins() -> Vec<Arc<dyn Plugin>> {
        vec![Arc::new(Contributing(PluginMetadata::parse("acme", "Acme", "1.0.0", "*").unwrap()))]
    }

    fn request(dir: &TempDir) -> ProfileRequest {
        ProfileRequest { profiles_root: Some(dir.path().to_path_buf()), ..Default::default() }
    }

    #[test]
    fn test_non_interactive_with_name() {
        let dir = TempDir::new().unwrap();
        let request =
            ProfileRequest { name: Some("myteam".into()), non_interactive: true, ..request(&dir) };

        let written = wizard().run("app", &request, &plugins(), &Scripted::default()).unwrap();

        assert_eq!(written.path, dir.path().join("app.myteam.json"));
        assert_eq!(written.profiles_root.as_deref(), Some(dir.path()));
        for name in ["dev", "test", "prod"] {
            assert!(dir.path().join(format!("app.{name}.json")).exists());
        }

        let store = ProfileStore::new("app", Some(dir.path())).unwrap();
        let doc: ProfileDocument<Core> = store.load("myteam").unwrap();
        assert_eq!(doc.core, Core { name: "myteam".into(), prompted: false });
        assert_eq!(doc.plugin_value("acme", "Message"), Some(&json!("hi")));
    }

    #[test]
    fn test_non_interactive_requires_name() {
        let dir = TempDir::new().unwrap();
        let request = ProfileRequest { non_interactive: true, ..request(&dir) };

        let err = wizard().run("app", &request, &[], &Scripted::default()).unwrap_err();
        assert!(err.to_string().contains("--name"));
    }

    #[test]
    fn test_interactive_create_new_uses_default_name() {
        let dir = TempDir::new().unwrap();
        let prompter = Scripted { select: Some(CREATE_NEW.into()), ..Default::default() };

        let written = wizard().run("app", &request(&dir), &[], &prompter).unwrap();

        assert_eq!(written.name, DEFAULT_NEW_PROFILE);
        assert_eq!(
            *prompter.offered.lock().unwrap(),
            vec!["dev", "prod", "test", CREATE_NEW]
        );
        let doc: ProfileDocument<Core> =
            ProfileStore::new("app", Some(dir.path())).unwrap().load("custom").unwrap();
        assert!(doc.core.prompted);
    }

    #[test]
    fn test_interactive_existing_profile_needs_overwrite() {
        let dir = TempDir::new().unwrap();
        let prompter = Scripted { select: Some("dev".into()), ..Default::default() };

        let err = wizard().run("app", &request(&dir), &[], &prompter).unwrap_err();
        assert!(err.to_string().contains("already exists"));

        let request = ProfileRequest { overwrite: true, ..request(&dir) };
        let written = wizard().run("app", &request, &[], &prompter).unwrap();
        assert_eq!(written.name, "dev");
    }

    #[test]
    fn test_output_path_bypasses_store() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("out").join("nested").join("profile.json");
        let request = ProfileRequest {
            name: Some("ci".into()),
            output: Some(output.clone()),
            non_interactive: true,
            ..request(&dir)
        };

        let written = wizard().run("app", &request, &plugins(), &Scripted::default()).unwrap();

        assert_eq!(written.path, output);
        assert!(written.profiles_root.is_none());
        assert!(!dir.path().join("app.ci.json").exists());
        let content = std::fs::read_to_string(&output).unwrap();
        let value: Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value["Core"]["Name"], "ci");
        assert_eq!(value["PluginSettings"]["acme"]["Message"], "hi");
    }
}
