//! Declarative plugin discovery.
//!
//! Hosts hand the catalog a table of candidate modules. Each module lists the
//! plugin types it provides through [`PluginMarker`]s; nothing is scanned.

use std::fmt;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use super::{Plugin, PluginResult};

type ConstructFn = fn() -> PluginResult<Arc<dyn Plugin>>;

/// Names a plugin type and knows how to build it.
#[derive(Clone, Copy)]
pub struct PluginMarker {
    type_name: &'static str,
    construct: ConstructFn,
}

fn construct<T: Plugin + Default + 'static>() -> PluginResult<Arc<dyn Plugin>> {
    Ok(Arc::new(T::default()))
}

impl PluginMarker {
    /// Marker for plugin type `T`, built with its zero-argument constructor.
    pub fn of<T: Plugin + Default + 'static>() -> Self {
        Self::new(std::any::type_name::<T>(), construct::<T>)
    }

    /// Marker with a fallible constructor.
    pub fn new(type_name: &'static str, construct: ConstructFn) -> Self {
        Self { type_name, construct }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Create a fresh plugin instance.
    pub fn instantiate(&self) -> PluginResult<Arc<dyn Plugin>> {
        (self.construct)()
    }
}

impl fmt::Debug for PluginMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PluginMarker").field(&self.type_name).finish()
    }
}

/// A loaded code unit that may declare plugins.
pub trait PluginModule {
    fn name(&self) -> &str;

    /// Generated at runtime; never considered for discovery.
    fn is_dynamic(&self) -> bool {
        false
    }

    /// Where the module was loaded from.
    fn location(&self) -> io::Result<PathBuf>;

    /// Plugin types declared by this module.
    fn markers(&self) -> Vec<PluginMarker>;
}

/// Plain [`PluginModule`] built from a fixed marker list.
#[derive(Debug, Clone)]
pub struct StaticModule {
    name: String,
    location: Option<PathBuf>,
    dynamic: bool,
    markers: Vec<PluginMarker>,
}

impl StaticModule {
    /// Module located at the current executable unless told otherwise.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), location: None, dynamic: false, markers: Vec::new() }
    }

    pub fn with_location(mut self, location: impl Into<PathBuf>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Mark the module as runtime-generated.
    pub fn dynamic(mut self) -> Self {
        self.dynamic = true;
        self
    }

    /// Declare plugin type `T`.
    pub fn with_plugin<T: Plugin + Default + 'static>(mut self) -> Self {
        self.markers.push(PluginMarker::of::<T>());
        self
    }

    pub fn with_marker(mut self, marker: PluginMarker) -> Self {
        self.markers.push(marker);
        self
    }
}

impl PluginModule for StaticModule {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_dynamic(&self) -> bool {
        self.dynamic
    }

    fn location(&self) -> io::Result<PathBuf> {
        match &self.location {
            Some(path) => Ok(path.clone()),
            None => std::env::current_exe(),
        }
    }

    fn markers(&self) -> Vec<PluginMarker> {
        self.markers.clone()
    }
}

/// Select candidate modules: drop dynamic ones and any whose location cannot
/// be read, then apply `predicate`.
pub fn discover<'m, P>(
    modules: &'m [Box<dyn PluginModule>],
    predicate: P,
) -> Vec<&'m dyn PluginModule>
where
    P: Fn(&dyn PluginModule) -> bool,
{
    modules
        .iter()
        .map(|module| &**module)
        .filter(|module| {
            if module.is_dynamic() {
                tracing::debug!(module = module.name(), "Skipping dynamic module");
                return false;
            }
            if let Err(e) = module.location() {
                tracing::debug!(module = module.name(), error = %e, "Skipping unreadable module");
                return false;
            }
            predicate(*module)
        })
        .collect()
}
