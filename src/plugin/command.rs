//! Command types and the command registration surface.

use std::any::{type_name, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

use clap::{Arg, ArgMatches};
use indexmap::IndexSet;

use super::{PluginResult, ServiceError, ServiceProvider};

/// Everything a command sees when it runs.
pub struct CommandContext<'a> {
    /// Subcommand names leading to this command (e.g. `["config", "create"]`).
    pub path: &'a [String],
    /// Parsed arguments for this command.
    pub matches: &'a ArgMatches,
    /// Host services.
    pub services: &'a ServiceProvider,
}

/// An executable command.
pub trait HostCommand {
    /// Run the command, returning the process exit code.
    fn execute(&self, ctx: &CommandContext<'_>) -> anyhow::Result<i32>;
}

/// Static description of a command type: its arguments and how to build it.
pub trait CommandDescriptor: HostCommand + Sized + 'static {
    /// Arguments and flags accepted by the command.
    fn args() -> Vec<Arg> {
        Vec::new()
    }

    /// Construct the command from host services.
    fn build(services: &ServiceProvider) -> Result<Self, ServiceError>;
}

fn construct<T: CommandDescriptor>(
    services: &ServiceProvider,
) -> Result<Box<dyn HostCommand>, ServiceError> {
    Ok(Box::new(T::build(services)?))
}

/// Identifies a command type. Equality and hashing use the type identity only.
#[derive(Clone, Copy)]
pub struct CommandType {
    id: TypeId,
    type_name: &'static str,
    args: fn() -> Vec<Arg>,
    construct: fn(&ServiceProvider) -> Result<Box<dyn HostCommand>, ServiceError>,
}

impl CommandType {
    pub fn of<T: CommandDescriptor>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
            args: T::args,
            construct: construct::<T>,
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Fully qualified Rust type name.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn args(&self) -> Vec<Arg> {
        (self.args)()
    }

    pub(crate) fn construct(
        &self,
        services: &ServiceProvider,
    ) -> Result<Box<dyn HostCommand>, ServiceError> {
        (self.construct)(services)
    }
}

impl PartialEq for CommandType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for CommandType {}

impl Hash for CommandType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for CommandType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CommandType").field(&self.type_name).finish()
    }
}

/// Callback used to populate a nested command group.
pub type ConfigureBranch<'a> = &'a mut dyn FnMut(&mut dyn CommandRegistry) -> PluginResult<()>;

/// Command registration surface handed to plugins.
pub trait CommandRegistry {
    /// Register a leaf command under `name`.
    fn add_command(
        &mut self,
        name: &str,
        command: CommandType,
        description: Option<&str>,
    ) -> PluginResult<()>;

    /// Open a nested command group and let `configure` populate it.
    fn add_branch(
        &mut self,
        name: &str,
        configure: ConfigureBranch<'_>,
        description: Option<&str>,
    ) -> PluginResult<()>;
}

/// Set of command types touched during one registration pass.
#[derive(Debug, Clone, Default)]
pub struct CommandTypeCatalog {
    types: IndexSet<CommandType>,
}

impl CommandTypeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a command type. Returns `false` if it was already present.
    pub fn add(&mut self, command: CommandType) -> bool {
        self.types.insert(command)
    }

    pub fn contains(&self, command: &CommandType) -> bool {
        self.types.contains(command)
    }

    /// Registered types in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = &CommandType> {
        self.types.iter()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl<'a> IntoIterator for &'a CommandTypeCatalog {
    type Item = &'a CommandType;
    type IntoIter = indexmap::set::Iter<'a, CommandType>;

    fn into_iter(self) -> Self::IntoIter {
        self.types.iter()
    }
}

/// Forwards to an inner registry and records every command type it sees.
pub(crate) struct RecordingRegistry<'a, 'r> {
    inner: &'a mut (dyn CommandRegistry + 'r),
    types: &'a mut CommandTypeCatalog,
}

impl<'a, 'r> RecordingRegistry<'a, 'r> {
    pub(crate) fn new(
        inner: &'a mut (dyn CommandRegistry + 'r),
        types: &'a mut CommandTypeCatalog,
    ) -> Self {
        Self { inner, types }
    }
}

impl CommandRegistry for RecordingRegistry<'_, '_> {
    fn add_command(
        &mut self,
        name: &str,
        command: CommandType,
        description: Option<&str>,
    ) -> PluginResult<()> {
        self.inner.add_command(name, command, description)?;
        self.types.add(command);
        Ok(())
    }

    fn add_branch(
        &mut self,
        name: &str,
        configure: ConfigureBranch<'_>,
        description: Option<&str>,
    ) -> PluginResult<()> {
        let types = &mut *self.types;
        self.inner.add_branch(
            name,
            &mut |branch: &mut dyn CommandRegistry| {
                let mut recording = RecordingRegistry::new(branch, &mut *types);
                configure(&mut recording)
            },
            description,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Alpha;
    struct Beta;

    impl HostCommand for Alpha {
        fn execute(&self, _ctx: &CommandContext<'_>) -> anyhow::Result<i32> {
            Ok(0)
        }
    }

    impl CommandDescriptor for Alpha {
        fn build(_services: &ServiceProvider) -> Result<Self, ServiceError> {
            Ok(Self)
        }
    }

    impl HostCommand for Beta {
        fn execute(&self, _ctx: &CommandContext<'_>) -> anyhow::Result<i32> {
            Ok(1)
        }
    }

    impl CommandDescriptor for Beta {
        fn args() -> Vec<Arg> {
            vec![Arg::new("name")]
        }

        fn build(_services: &ServiceProvider) -> Result<Self, ServiceError> {
            Ok(Self)
        }
    }

    /// Registry that only remembers names.
    #[derive(Default)]
    struct NameLog(Vec<String>);

    impl CommandRegistry for NameLog {
        fn add_command(
            &mut self,
            name: &str,
            _command: CommandType,
            _description: Option<&str>,
        ) -> PluginResult<()> {
            self.0.push(name.to_string());
            Ok(())
        }

        fn add_branch(
            &mut self,
            name: &str,
            configure: ConfigureBranch<'_>,
            _description: Option<&str>,
        ) -> PluginResult<()> {
            self.0.push(format!("{name}/"));
            configure(self)
        }
    }

    #[test]
    fn test_command_type_identity() {
        assert_eq!(CommandType::of::<Alpha>(), CommandType::of::<Alpha>());
        assert_ne!(CommandType::of::<Alpha>(), CommandType::of::<Beta>());
        assert!(CommandType::of::<Beta>().type_name().ends_with("Beta"));
        assert_eq!(CommandType::of::<Beta>().args().len(), 1);
    }

    #[test]
    fn test_catalog_dedups() {
        let mut catalog = CommandTypeCatalog::new();
        assert!(catalog.add(CommandType::of::<Alpha>()));
        assert!(!catalog.add(CommandType::of::<Alpha>()));
        assert!(catalog.add(CommandType::of::<Beta>()));
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn test_recording_registry_records_nested_commands() {
        let mut log = NameLog::default();
        let mut types = CommandTypeCatalog::new();

        {
            let mut registry = RecordingRegistry::new(&mut log, &mut types);
            registry.add_command("alpha", CommandType::of::<Alpha>(), None).unwrap();
            registry
                .add_branch(
                    "group",
                    &mut |branch| {
                        branch.add_command("beta", CommandType::of::<Beta>(), Some("b"))?;
                        branch.add_command("alpha-again", CommandType::of::<Alpha>(), None)
                    },
                    None,
                )
                .unwrap();
        }

        assert_eq!(log.0, vec!["alpha", "group/", "beta", "alpha-again"]);
        assert_eq!(types.len(), 2);
        assert!(types.contains(&CommandType::of::<Beta>()));
    }
}
