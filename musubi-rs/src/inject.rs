//! Type-keyed service container consumed by dispatch.
//!
//! Services are registered before the dispatcher is built and the map
//! is read-only from then on; cloning shares the underlying table. A
//! resolution miss is `None`, never an error: the handler receives the
//! absence and decides what to do with it.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

use crate::value::ServiceHandle;

#[derive(Clone)]
struct ServiceEntry {
    type_name: &'static str,
    handle: ServiceHandle,
}

/// Dependency container resolved by type during dispatch.
#[derive(Clone, Default)]
pub struct Injector {
    services: Arc<HashMap<TypeId, ServiceEntry>>,
}

impl Injector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a service. The last `provide` for a type wins.
    pub fn provide<T: Any + Send + Sync>(&mut self, service: T) -> &mut Self {
        let services = Arc::make_mut(&mut self.services);
        let entry = ServiceEntry {
            type_name: std::any::type_name::<T>(),
            handle: Arc::new(service),
        };
        if let Some(previous) = services.insert(TypeId::of::<T>(), entry) {
            tracing::debug!(
                service = previous.type_name,
                "Replacing previously provided service"
            );
        }
        self
    }

    /// Resolve a service by type.
    pub fn resolve<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.services
            .get(&TypeId::of::<T>())
            .and_then(|entry| entry.handle.clone().downcast::<T>().ok())
    }

    pub(crate) fn resolve_raw(&self, type_id: TypeId) -> Option<ServiceHandle> {
        self.services.get(&type_id).map(|entry| entry.handle.clone())
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Config {
        endpoint: String,
    }

    #[test]
    fn test_provide_and_resolve() {
        let mut injector = Injector::new();
        injector.provide(Config {
            endpoint: "https://api.example.com".to_string(),
        });

        let config = injector.resolve::<Config>().expect("should resolve");
        assert_eq!(config.endpoint, "https://api.example.com");
    }

    #[test]
    fn test_miss_is_none() {
        let injector = Injector::new();
        assert!(injector.resolve::<Config>().is_none());
        assert!(injector.is_empty());
    }

    #[test]
    fn test_last_provide_wins() {
        let mut injector = Injector::new();
        injector.provide(Config {
            endpoint: "first".to_string(),
        });
        injector.provide(Config {
            endpoint: "second".to_string(),
        });

        assert_eq!(injector.len(), 1);
        let config = injector.resolve::<Config>().expect("should resolve");
        assert_eq!(config.endpoint, "second");
    }

    #[test]
    fn test_clone_shares_services() {
        let mut injector = Injector::new();
        injector.provide(7_u32);
        let cloned = injector.clone();
        assert_eq!(cloned.resolve::<u32>().as_deref(), Some(&7));
    }
}
