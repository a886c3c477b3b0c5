//! Minimal service container.
//!
//! Plugins only see [`ServiceRegistry`]; the host owns the concrete
//! [`ServiceCollection`] and turns it into a [`ServiceProvider`] once every
//! registration is in.

use std::any::{type_name, Any, TypeId};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use once_cell::unsync::OnceCell;

use super::command::{CommandType, HostCommand};
use super::ServiceError;

type AnyService = Arc<dyn Any + Send + Sync>;
type ServiceFactory = Arc<dyn Fn(&ServiceProvider) -> Result<AnyService, ServiceError>>;

/// How long a resolved service lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceLifetime {
    /// Created once, on first resolution.
    Singleton,
    /// Created on every resolution.
    Transient,
}

/// A single service registration.
#[derive(Clone)]
pub struct ServiceDescriptor {
    type_id: TypeId,
    type_name: &'static str,
    lifetime: ServiceLifetime,
    factory: ServiceFactory,
}

impl ServiceDescriptor {
    fn with_factory<T, F>(lifetime: ServiceLifetime, factory: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn(&ServiceProvider) -> Result<T, ServiceError> + 'static,
    {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
            lifetime,
            factory: Arc::new(move |provider: &ServiceProvider| {
                Ok(Arc::new(factory(provider)?) as AnyService)
            }),
        }
    }

    /// Singleton built lazily by `factory`.
    pub fn singleton<T, F>(factory: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn(&ServiceProvider) -> Result<T, ServiceError> + 'static,
    {
        Self::with_factory(ServiceLifetime::Singleton, factory)
    }

    /// Fresh instance from `factory` on every resolution.
    pub fn transient<T, F>(factory: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn(&ServiceProvider) -> Result<T, ServiceError> + 'static,
    {
        Self::with_factory(ServiceLifetime::Transient, factory)
    }

    /// Prebuilt singleton.
    pub fn instance<T: Send + Sync + 'static>(value: T) -> Self {
        let shared: AnyService = Arc::new(value);
        Self {
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
            lifetime: ServiceLifetime::Singleton,
            factory: Arc::new(move |_: &ServiceProvider| Ok(Arc::clone(&shared))),
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn lifetime(&self) -> ServiceLifetime {
        self.lifetime
    }
}

impl fmt::Debug for ServiceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceDescriptor")
            .field("type_name", &self.type_name)
            .field("lifetime", &self.lifetime)
            .finish()
    }
}

/// Service registration surface handed to plugins.
pub trait ServiceRegistry {
    /// Add a registration; a later registration of the same type wins.
    fn register(&mut self, descriptor: ServiceDescriptor);
}

/// Typed helpers over [`ServiceRegistry`].
pub trait ServiceRegistryExt: ServiceRegistry {
    /// Register a singleton factory.
    fn add_singleton<T, F>(&mut self, factory: F)
    where
        T: Send + Sync + 'static,
        F: Fn(&ServiceProvider) -> Result<T, ServiceError> + 'static,
    {
        self.register(ServiceDescriptor::singleton(factory));
    }

    /// Register a transient factory.
    fn add_transient<T, F>(&mut self, factory: F)
    where
        T: Send + Sync + 'static,
        F: Fn(&ServiceProvider) -> Result<T, ServiceError> + 'static,
    {
        self.register(ServiceDescriptor::transient(factory));
    }

    /// Register a prebuilt singleton instance.
    fn add_singleton_instance<T: Send + Sync + 'static>(&mut self, value: T) {
        self.register(ServiceDescriptor::instance(value));
    }
}

impl<R: ServiceRegistry + ?Sized> ServiceRegistryExt for R {}

/// Host-owned collection of registrations.
#[derive(Default)]
pub struct ServiceCollection {
    services: HashMap<TypeId, ServiceDescriptor>,
    commands: HashMap<TypeId, CommandType>,
}

impl ServiceCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allow the provider to construct `command`.
    pub fn add_command_type(&mut self, command: CommandType) {
        self.commands.insert(command.id(), command);
    }

    /// Whether a service of type `T` is registered.
    pub fn contains<T: 'static>(&self) -> bool {
        self.services.contains_key(&TypeId::of::<T>())
    }

    pub fn contains_command(&self, command: &CommandType) -> bool {
        self.commands.contains_key(&command.id())
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    /// Freeze registrations into a provider.
    pub fn build(self) -> ServiceProvider {
        let services = self
            .services
            .into_iter()
            .map(|(id, descriptor)| (id, Registration { descriptor, cached: OnceCell::new() }))
            .collect();

        ServiceProvider { services, commands: self.commands, resolving: RefCell::default() }
    }
}

impl ServiceRegistry for ServiceCollection {
    fn register(&mut self, descriptor: ServiceDescriptor) {
        tracing::trace!(
            service = descriptor.type_name,
            lifetime = ?descriptor.lifetime,
            "Registering service"
        );
        self.services.insert(descriptor.type_id, descriptor);
    }
}

impl fmt::Debug for ServiceCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceCollection")
            .field("services", &self.services.len())
            .field("commands", &self.commands.len())
            .finish()
    }
}

struct Registration {
    descriptor: ServiceDescriptor,
    cached: OnceCell<AnyService>,
}

/// Resolves services registered in a [`ServiceCollection`].
pub struct ServiceProvider {
    services: HashMap<TypeId, Registration>,
    commands: HashMap<TypeId, CommandType>,
    /// Types whose factories are currently running.
    resolving: RefCell<HashSet<TypeId>>,
}

impl ServiceProvider {
    /// Resolve `T` if registered.
    pub fn try_get<T: Send + Sync + 'static>(&self) -> Result<Option<Arc<T>>, ServiceError> {
        let Some(registration) = self.services.get(&TypeId::of::<T>()) else {
            return Ok(None);
        };

        let descriptor = &registration.descriptor;
        let value = match descriptor.lifetime {
            ServiceLifetime::Singleton => {
                Arc::clone(registration.cached.get_or_try_init(|| self.produce(descriptor))?)
            }
            ServiceLifetime::Transient => self.produce(descriptor)?,
        };

        value
            .downcast::<T>()
            .map(Some)
            .map_err(|_| ServiceError::TypeMismatch { type_name: descriptor.type_name })
    }

    /// Run `descriptor`'s factory, refusing to re-enter one already running.
    fn produce(&self, descriptor: &ServiceDescriptor) -> Result<AnyService, ServiceError> {
        if !self.resolving.borrow_mut().insert(descriptor.type_id) {
            return Err(ServiceError::Circular { type_name: descriptor.type_name });
        }
        let produced = (descriptor.factory)(self);
        self.resolving.borrow_mut().remove(&descriptor.type_id);
        produced
    }

    /// Resolve `T`, failing when it was never registered.
    pub fn require<T: Send + Sync + 'static>(&self) -> Result<Arc<T>, ServiceError> {
        self.try_get::<T>()?.ok_or(ServiceError::NotRegistered { type_name: type_name::<T>() })
    }

    /// Construct a command whose type was added with
    /// [`ServiceCollection::add_command_type`].
    pub fn create_command(
        &self,
        command: &CommandType,
    ) -> Result<Box<dyn HostCommand>, ServiceError> {
        if !self.commands.contains_key(&command.id()) {
            return Err(ServiceError::NotRegistered { type_name: command.type_name() });
        }
        command.construct(self)
    }
}

impl fmt::Debug for ServiceProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceProvider").field("services", &self.services.len()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug)]
    struct Counter(usize);

    struct Greeter {
        prefix: String,
    }

    #[test]
    fn test_singleton_is_cached() {
        let built = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&built);

        let mut services = ServiceCollection::new();
        services.add_singleton(move |_| Ok(Counter(seen.fetch_add(1, Ordering::SeqCst))));
        let provider = services.build();

        let a = provider.require::<Counter>().unwrap();
        let b = provider.require::<Counter>().unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(built.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_transient_is_rebuilt() {
        let built = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&built);

        let mut services = ServiceCollection::new();
        services.add_transient(move |_| Ok(Counter(seen.fetch_add(1, Ordering::SeqCst))));
        let provider = services.build();

        assert_eq!(provider.require::<Counter>().unwrap().0, 0);
        assert_eq!(provider.require::<Counter>().unwrap().0, 1);
    }

    #[test]
    fn test_factory_resolves_dependencies() {
        let mut services = ServiceCollection::new();
        services.add_singleton_instance(String::from("Howdy"));
        services.add_transient(|sp| Ok(Greeter { prefix: sp.require::<String>()?.to_string() }));
        let provider = services.build();

        assert_eq!(provider.require::<Greeter>().unwrap().prefix, "Howdy");
    }

    #[test]
    fn test_last_registration_wins() {
        let mut services = ServiceCollection::new();
        services.add_singleton_instance(Counter(1));
        services.add_singleton_instance(Counter(2));
        assert_eq!(services.len(), 1);

        assert_eq!(services.build().require::<Counter>().unwrap().0, 2);
    }

    #[test]
    fn test_missing_service() {
        let provider = ServiceCollection::new().build();
        assert!(provider.try_get::<Counter>().unwrap().is_none());
        assert!(matches!(provider.require::<Counter>(), Err(ServiceError::NotRegistered { .. })));
    }

    #[test]
    fn test_factory_error_propagates() {
        let mut services = ServiceCollection::new();
        services.add_singleton::<Counter, _>(|_| Err(ServiceError::factory::<Counter>("offline")));
        let provider = services.build();

        let err = provider.require::<Counter>().unwrap_err();
        assert!(err.to_string().contains("offline"));
    }

    #[derive(Debug)]
    struct Ping;

    #[derive(Debug)]
    struct Pong;

    #[test]
    fn test_self_referencing_singleton_is_circular() {
        let mut services = ServiceCollection::new();
        services.add_singleton(|sp| {
            sp.require::<Counter>()?;
            Ok(Counter(0))
        });
        let provider = services.build();

        let err = provider.require::<Counter>().unwrap_err();
        assert!(
            matches!(err, ServiceError::Circular { type_name } if type_name.ends_with("Counter"))
        );
    }

    #[test]
    fn test_indirect_cycle_is_circular_and_recoverable() {
        let mut services = ServiceCollection::new();
        services.add_singleton(|sp| {
            sp.require::<Pong>()?;
            Ok(Ping)
        });
        services.add_transient(|sp| {
            sp.require::<Ping>()?;
            Ok(Pong)
        });
        services.add_singleton_instance(Counter(3));
        let provider = services.build();

        assert!(matches!(provider.require::<Ping>(), Err(ServiceError::Circular { .. })));
        assert!(matches!(provider.require::<Pong>(), Err(ServiceError::Circular { .. })));
        assert_eq!(provider.require::<Counter>().unwrap().0, 3);
    }
}
