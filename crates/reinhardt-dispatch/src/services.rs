//! Named service registry.
//!
//! A [`ServiceLocator`] maps names to type-erased shared services. The
//! [`ControllerManager`](crate::ControllerManager) peers into a locator for
//! identifiers it does not own; a located service is only dispatchable when
//! it was registered as a [`ControllerService`].

use crate::controller::Controller;
use crate::error::{MvcError, MvcResult};
use parking_lot::RwLock;
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Type-erased shared service.
pub type AnyService = Arc<dyn Any + Send + Sync>;

/// Factory building a service on first resolution.
pub type ServiceFactory = Arc<dyn Fn(&ServiceLocator) -> MvcResult<AnyService> + Send + Sync>;

/// Wrapper marking a located service as a dispatchable controller.
#[derive(Clone)]
pub struct ControllerService(pub Arc<dyn Controller>);

impl fmt::Debug for ControllerService {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("ControllerService").field(&self.0.name()).finish()
	}
}

/// Registry of named services.
///
/// Factory-built services are shared: the first resolution caches the
/// instance and later resolutions return the same `Arc`.
///
/// # Examples
///
/// ```
/// use reinhardt_dispatch::ServiceLocator;
/// use std::sync::Arc;
///
/// let services = ServiceLocator::new();
/// services.add("greeting", |_| Ok(Arc::new("hello".to_string())));
///
/// let greeting = services.get_as::<String>("greeting").unwrap();
/// assert_eq!(greeting.as_str(), "hello");
/// ```
#[derive(Default)]
pub struct ServiceLocator {
	factories: RwLock<HashMap<String, ServiceFactory>>,
	instances: RwLock<HashMap<String, AnyService>>,
}

impl ServiceLocator {
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers a factory, discarding any instance cached under `name`.
	pub fn add<F, T>(&self, name: impl Into<String>, factory: F)
	where
		F: Fn(&ServiceLocator) -> MvcResult<Arc<T>> + Send + Sync + 'static,
		T: Any + Send + Sync,
	{
		let name = name.into();
		self.instances.write().remove(&name);
		let factory: ServiceFactory = Arc::new(move |locator| {
			let service: AnyService = factory(locator)?;
			Ok(service)
		});
		self.factories.write().insert(name, factory);
	}

	/// Registers a ready-made instance.
	pub fn set<T: Any + Send + Sync>(&self, name: impl Into<String>, service: Arc<T>) {
		self.instances.write().insert(name.into(), service);
	}

	/// Registers a controller so the controller manager can dispatch it.
	pub fn set_controller(&self, name: impl Into<String>, controller: Arc<dyn Controller>) {
		self.set(name, Arc::new(ControllerService(controller)));
	}

	pub fn has(&self, name: &str) -> bool {
		self.instances.read().contains_key(name) || self.factories.read().contains_key(name)
	}

	/// Resolves `name`, building and caching the service on first use.
	pub fn get(&self, name: &str) -> MvcResult<AnyService> {
		if let Some(service) = self.instances.read().get(name) {
			return Ok(Arc::clone(service));
		}

		let factory = self
			.factories
			.read()
			.get(name)
			.cloned()
			.ok_or_else(|| MvcError::ServiceNotFound {
				name: name.to_string(),
				reason: "no service registered under this name".to_string(),
			})?;

		// Locks are released while the factory runs; it may resolve other services
		let service = factory(self).map_err(|err| match err {
			err @ MvcError::ServiceNotCreated { .. } => err,
			other => MvcError::ServiceNotCreated {
				service: name.to_string(),
				reason: other.to_string(),
			},
		})?;

		let mut instances = self.instances.write();
		let service = instances
			.entry(name.to_string())
			.or_insert(service)
			.clone();
		Ok(service)
	}

	/// Resolves `name` and downcasts it to `T`.
	pub fn get_as<T: Any + Send + Sync>(&self, name: &str) -> MvcResult<Arc<T>> {
		self.get(name)?
			.downcast::<T>()
			.map_err(|_| MvcError::ServiceNotFound {
				name: name.to_string(),
				reason: format!("service is not a {}", std::any::type_name::<T>()),
			})
	}
}

impl fmt::Debug for ServiceLocator {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut names: Vec<String> = self.factories.read().keys().cloned().collect();
		names.extend(self.instances.read().keys().cloned());
		names.sort();
		names.dedup();
		f.debug_struct("ServiceLocator")
			.field("services", &names)
			.finish()
	}
}
