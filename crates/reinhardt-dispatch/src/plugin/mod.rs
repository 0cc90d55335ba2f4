//! Controller plugins.

pub mod forward;

pub use forward::Forward;

use crate::controller::ControllerManager;
use crate::error::{MvcError, MvcResult};
use crate::settings::ForwardSettings;
use std::sync::{Arc, Weak};

/// Name of the forward plugin, used in diagnostics.
pub const FORWARD_PLUGIN: &str = "forward";

/// Hands out plugins to controllers.
///
/// The controller registry is held weakly: controllers registered in a
/// [`ControllerManager`] commonly own the plugin manager that points back at
/// it.
#[derive(Debug, Clone, Default)]
pub struct PluginManager {
	controllers: Option<Weak<ControllerManager>>,
	settings: ForwardSettings,
}

impl PluginManager {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_controller_manager(mut self, controllers: &Arc<ControllerManager>) -> Self {
		self.controllers = Some(Arc::downgrade(controllers));
		self
	}

	/// Replaces the forward settings after validating them.
	pub fn with_settings(mut self, settings: ForwardSettings) -> MvcResult<Self> {
		settings.validate()?;
		self.settings = settings;
		Ok(self)
	}

	pub fn settings(&self) -> &ForwardSettings {
		&self.settings
	}

	/// Builds the forward plugin.
	///
	/// Fails with [`MvcError::ServiceNotCreated`] when no controller registry
	/// is available.
	pub fn forward(&self) -> MvcResult<Forward> {
		let not_created = |reason: &str| MvcError::ServiceNotCreated {
			service: FORWARD_PLUGIN.to_string(),
			reason: reason.to_string(),
		};

		let controllers = self
			.controllers
			.as_ref()
			.ok_or_else(|| not_created("no controller manager is configured"))?
			.upgrade()
			.ok_or_else(|| not_created("the controller manager has been dropped"))?;

		Forward::new(controllers).with_settings(self.settings.clone())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_forward_without_controller_manager_is_not_created() {
		let plugins = PluginManager::new();

		let result = plugins.forward();

		match result {
			Err(MvcError::ServiceNotCreated { service, reason }) => {
				assert_eq!(service, FORWARD_PLUGIN);
				assert!(reason.contains("no controller manager"));
			}
			_ => panic!("Expected ServiceNotCreated"),
		}
	}

	#[rstest]
	fn test_forward_after_controller_manager_dropped_is_not_created() {
		let controllers = Arc::new(ControllerManager::new());
		let plugins = PluginManager::new().with_controller_manager(&controllers);
		drop(controllers);

		let result = plugins.forward();

		assert!(matches!(result, Err(MvcError::ServiceNotCreated { .. })));
	}

	#[rstest]
	fn test_forward_carries_settings() {
		let controllers = Arc::new(ControllerManager::new());
		let settings = ForwardSettings {
			max_nested_forwards: 3,
			..ForwardSettings::default()
		};
		let plugins = PluginManager::new()
			.with_controller_manager(&controllers)
			.with_settings(settings)
			.unwrap();

		let forward = plugins.forward().unwrap();

		assert_eq!(forward.max_nested_forwards(), 3);
	}

	#[rstest]
	#[case(0, "inject-template")]
	#[case(10, " ")]
	fn test_with_settings_rejects_invalid_settings(#[case] limit: usize, #[case] listener: &str) {
		let settings = ForwardSettings {
			max_nested_forwards: limit,
			listeners_to_detach: vec![listener.to_string()],
		};

		let result = PluginManager::new().with_settings(settings);

		assert!(matches!(result, Err(MvcError::Settings(_))));
	}
}
