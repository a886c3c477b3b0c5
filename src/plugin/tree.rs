//! Hierarchical command tree backed by clap.
//!
//! [`CommandTree`] is the host's concrete [`CommandRegistry`]. Once every
//! plugin has registered, it is rendered into a [`clap::Command`] and parsed
//! matches are resolved back to the selected [`CommandType`].

use clap::{ArgMatches, Command};
use indexmap::IndexMap;

use super::{
    CommandRegistry, CommandType, CommandTypeCatalog, ConfigureBranch, PluginError, PluginResult,
};

fn command_name(name: &str) -> PluginResult<&str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(PluginError::BlankCommandName);
    }
    Ok(name)
}

/// A command or a group. A group's `command` is its default command.
#[derive(Debug, Clone, Default)]
struct Node {
    description: Option<String>,
    command: Option<CommandType>,
    group: bool,
    children: IndexMap<String, Node>,
}

impl Node {
    fn group() -> Self {
        Self { group: true, ..Self::default() }
    }

    /// Ensure `name` is a group and return it.
    fn group_mut(&mut self, name: &str) -> &mut Node {
        let node = self.children.entry(name.to_string()).or_insert_with(Node::group);
        if !node.group {
            tracing::debug!(command = name, "Replacing command with group");
            *node = Node::group();
        }
        node
    }

    fn collect_types(&self, types: &mut CommandTypeCatalog) {
        if let Some(command) = self.command {
            types.add(command);
        }
        for child in self.children.values() {
            child.collect_types(types);
        }
    }

    fn to_clap(&self, mut command: Command) -> Command {
        if let Some(about) = &self.description {
            command = command.about(about.clone());
        }
        if let Some(own) = self.command {
            command = command.args(own.args());
            if !self.children.is_empty() {
                command = command.args_conflicts_with_subcommands(true);
            }
        }
        for (name, child) in &self.children {
            command = command.subcommand(child.to_clap(Command::new(name.clone())));
        }
        command
    }
}

impl CommandRegistry for Node {
    fn add_command(
        &mut self,
        name: &str,
        command: CommandType,
        description: Option<&str>,
    ) -> PluginResult<()> {
        let name = command_name(name)?;
        let leaf = Node {
            description: description.map(str::to_string),
            command: Some(command),
            ..Node::default()
        };
        if self.children.insert(name.to_string(), leaf).is_some() {
            tracing::debug!(command = name, "Replacing previously registered command");
        }
        Ok(())
    }

    fn add_branch(
        &mut self,
        name: &str,
        configure: ConfigureBranch<'_>,
        description: Option<&str>,
    ) -> PluginResult<()> {
        let name = command_name(name)?;
        let group = self.group_mut(name);
        if let Some(about) = description {
            group.description = Some(about.to_string());
        }
        configure(group)
    }
}

/// Where a parsed command line leads.
#[derive(Debug)]
pub enum Resolution<'m> {
    /// A runnable command with its own matches.
    Command { command: CommandType, path: Vec<String>, matches: &'m ArgMatches },
    /// A group with no default command was selected; show its help.
    Help { path: Vec<String> },
}

/// The host's command tree.
#[derive(Debug, Clone)]
pub struct CommandTree {
    root: Node,
}

impl Default for CommandTree {
    fn default() -> Self {
        Self { root: Node::group() }
    }
}

impl CommandTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a group that runs `default` when no subcommand is given.
    pub fn add_branch_with_default(
        &mut self,
        name: &str,
        default: CommandType,
        configure: ConfigureBranch<'_>,
        description: Option<&str>,
    ) -> PluginResult<()> {
        let name = command_name(name)?;
        self.root.group_mut(name).command = Some(default);
        self.root.add_branch(name, configure, description)
    }

    /// Whether a top-level command or group named `name` exists.
    pub fn contains(&self, name: &str) -> bool {
        self.root.children.contains_key(name)
    }

    /// Top-level command and group names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.root.children.keys().map(String::as_str)
    }

    /// Every command type reachable from the tree.
    pub fn command_types(&self) -> CommandTypeCatalog {
        let mut types = CommandTypeCatalog::new();
        self.root.collect_types(&mut types);
        types
    }

    /// Attach the tree to `root` as subcommands.
    pub fn to_clap(&self, root: Command) -> Command {
        self.root.to_clap(root)
    }

    /// Follow the subcommands in `matches` down to a command or group.
    pub fn resolve<'m>(&self, matches: &'m ArgMatches) -> Resolution<'m> {
        let mut node = &self.root;
        let mut matches = matches;
        let mut path = Vec::new();

        while let Some((name, sub)) = matches.subcommand() {
            let Some(child) = node.children.get(name) else {
                break;
            };
            path.push(name.to_string());
            node = child;
            matches = sub;
        }

        match node.command {
            Some(command) if !path.is_empty() => Resolution::Command { command, path, matches },
            _ => Resolution::Help { path },
        }
    }
}

impl CommandRegistry for CommandTree {
    fn add_command(
        &mut self,
        name: &str,
        command: CommandType,
        description: Option<&str>,
    ) -> PluginResult<()> {
        self.root.add_command(name, command, description)
    }

    fn add_branch(
        &mut self,
        name: &str,
        configure: ConfigureBranch<'_>,
        description: Option<&str>,
    ) -> PluginResult<()> {
        self.root.add_branch(name, configure, description)
    }
}
