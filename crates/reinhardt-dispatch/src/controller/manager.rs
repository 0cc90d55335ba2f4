//! Controller registry.

use super::Controller;
use crate::error::{MvcError, MvcResult};
use crate::services::{ControllerService, ServiceLocator};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Factory building a fresh controller for every resolution.
pub type ControllerFactory =
	Arc<dyn Fn(&Arc<ControllerManager>) -> MvcResult<Arc<dyn Controller>> + Send + Sync>;

/// Resolves controller identifiers to dispatchable controllers.
///
/// Lookup order: shared instances, factories, then the peering
/// [`ServiceLocator`] when one is configured.
#[derive(Default)]
pub struct ControllerManager {
	services: RwLock<HashMap<String, Arc<dyn Controller>>>,
	factories: RwLock<HashMap<String, ControllerFactory>>,
	peer: Option<Arc<ServiceLocator>>,
}

impl ControllerManager {
	pub fn new() -> Self {
		Self::default()
	}

	/// Falls back to `locator` for identifiers this manager does not own.
	pub fn with_peer(mut self, locator: Arc<ServiceLocator>) -> Self {
		self.peer = Some(locator);
		self
	}

	pub fn peer(&self) -> Option<&Arc<ServiceLocator>> {
		self.peer.as_ref()
	}

	/// Registers a factory; each resolution builds a new controller.
	pub fn set_factory<F>(&self, name: impl Into<String>, factory: F)
	where
		F: Fn(&Arc<ControllerManager>) -> MvcResult<Arc<dyn Controller>> + Send + Sync + 'static,
	{
		self.factories.write().insert(name.into(), Arc::new(factory));
	}

	/// Registers a shared controller instance.
	pub fn set_service(&self, name: impl Into<String>, controller: Arc<dyn Controller>) {
		self.services.write().insert(name.into(), controller);
	}

	pub fn has(&self, name: &str) -> bool {
		self.services.read().contains_key(name)
			|| self.factories.read().contains_key(name)
			|| self.peer.as_ref().is_some_and(|peer| peer.has(name))
	}

	/// Identifiers owned by this manager, sorted.
	pub fn registered_names(&self) -> Vec<String> {
		let mut names: Vec<String> = self.services.read().keys().cloned().collect();
		names.extend(self.factories.read().keys().cloned());
		names.sort();
		names.dedup();
		names
	}

	/// Resolves `name` to a dispatchable controller.
	pub fn get(self: &Arc<Self>, name: &str) -> MvcResult<Arc<dyn Controller>> {
		if let Some(controller) = self.services.read().get(name) {
			return Ok(Arc::clone(controller));
		}

		let factory = self.factories.read().get(name).cloned();
		if let Some(factory) = factory {
			tracing::trace!(controller = name, "building controller from factory");
			return factory(self);
		}

		let Some(peer) = self.peer.as_ref().filter(|peer| peer.has(name)) else {
			return Err(MvcError::ServiceNotFound {
				name: name.to_string(),
				reason: "no controller registered under this name".to_string(),
			});
		};

		peer.get(name)?
			.downcast::<ControllerService>()
			.map(|service| Arc::clone(&service.0))
			.map_err(|_| MvcError::ServiceNotFound {
				name: name.to_string(),
				reason: "located service is not a dispatchable controller".to_string(),
			})
	}
}

impl fmt::Debug for ControllerManager {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ControllerManager")
			.field("controllers", &self.registered_names())
			.field("peer", &self.peer)
			.finish()
	}
}
