//! Plugin system error types.

use thiserror::Error;

use crate::version::VersionError;

/// Result type for plugin operations.
pub type PluginResult<T> = Result<T, PluginError>;

/// Errors that can occur while declaring or registering plugins.
#[derive(Debug, Error)]
pub enum PluginError {
    /// Plugin id or display name is empty or whitespace.
    #[error("Plugin {field} cannot be empty or whitespace")]
    BlankIdentity { field: &'static str },

    /// Command or branch name is empty or whitespace.
    #[error("Command name cannot be empty or whitespace")]
    BlankCommandName,

    /// Malformed version or compatibility range in plugin metadata.
    #[error(transparent)]
    Version(#[from] VersionError),

    /// Service resolution failed.
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// A plugin's registration callback failed.
    #[error("Plugin '{plugin}' failed to register: {source}")]
    Registration {
        plugin: String,
        #[source]
        source: Box<PluginError>,
    },
}

/// Errors raised by the service container.
#[derive(Debug, Clone, Error)]
pub enum ServiceError {
    /// Nothing registered for the requested type.
    #[error("No service registered for type '{type_name}'")]
    NotRegistered { type_name: &'static str },

    /// Registered factory produced a value of another type.
    #[error("Service registered for type '{type_name}' produced a value of a different type")]
    TypeMismatch { type_name: &'static str },

    /// Factory failed to build the service.
    #[error("Failed to construct '{type_name}': {message}")]
    Factory { type_name: &'static str, message: String },

    /// A factory asked for the type it is building, directly or indirectly.
    #[error("Circular dependency while resolving '{type_name}'")]
    Circular { type_name: &'static str },
}

impl ServiceError {
    /// Wrap an arbitrary error raised inside a factory.
    pub fn factory<T: ?Sized>(error: impl std::fmt::Display) -> Self {
        Self::Factory { type_name: std::any::type_name::<T>(), message: error.to_string() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_identity_message() {
        let err = PluginError::BlankIdentity { field: "identifier" };
        assert_eq!(err.to_string(), "Plugin identifier cannot be empty or whitespace");
    }

    #[test]
    fn test_version_error_is_transparent() {
        let err = PluginError::from(VersionError::InvalidVersion { input: "x".into() });
        assert!(err.to_string().contains("Invalid semantic version 'x'"));
    }

    #[test]
    fn test_registration_error_names_plugin() {
        let err = PluginError::Registration {
            plugin: "acme.tools".into(),
            source: Box::new(PluginError::BlankCommandName),
        };
        assert_eq!(
            err.to_string(),
            "Plugin 'acme.tools' failed to register: Command name cannot be empty or whitespace"
        );
    }

    #[test]
    fn test_factory_error_names_type() {
        let err = ServiceError::factory::<String>("boom");
        assert!(err.to_string().contains("alloc::string::String"));
        assert!(err.to_string().contains("boom"));
    }
}
