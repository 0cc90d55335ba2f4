//! # Reinhardt MVC
//!
//! Controller forwarding for the Reinhardt MVC layer.
//!
//! A controller handling a request can dispatch another controller inline and
//! use its result, with circular forwarding detected and reported as an error.
//!
//! ## Feature Flags
//!
//! - `dispatch` (default) - Controller registry, dispatch listeners and the
//!   forward plugin
//!
//! ## Quick Example
//!
//! ```rust
//! use reinhardt_mvc::prelude::*;
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! struct Hello;
//!
//! #[async_trait]
//! impl ActionHandler for Hello {
//!     async fn on_dispatch(&self, ctx: &ActionContext<'_>) -> MvcResult<DispatchResult> {
//!         Ok(DispatchResult::ViewModel(ctx.route_params()))
//!     }
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let controllers = Arc::new(ControllerManager::new());
//! controllers.set_factory("hello", |_| Ok(Arc::new(ActionController::new(Hello))));
//! let plugins = Arc::new(PluginManager::new().with_controller_manager(&controllers));
//!
//! let caller = ActionController::new(Hello)
//!     .with_plugins(Arc::clone(&plugins))
//!     .with_event(MvcEvent::default());
//!
//! let mut params = Params::new();
//! params.insert("name".into(), json!("world"));
//! let result = plugins
//!     .forward()
//!     .unwrap()
//!     .dispatch(&caller, "hello", Some(params))
//!     .await
//!     .unwrap();
//! assert_eq!(result.view_model().unwrap()["name"], json!("world"));
//! # }
//! ```

#[cfg(feature = "dispatch")]
pub mod dispatch;

#[cfg(feature = "dispatch")]
pub use reinhardt_dispatch::{MvcError, MvcResult};

// Re-export common external dependencies
pub use async_trait::async_trait;
pub use serde::{Deserialize, Serialize};

pub mod prelude {
	pub use crate::{Deserialize, Serialize, async_trait};

	#[cfg(feature = "dispatch")]
	pub use crate::dispatch::{
		ActionContext, ActionController, ActionHandler, Controller, ControllerManager,
		DispatchResult, EventManager, Forward, ForwardSettings, InjectApplicationEvent, MvcError,
		MvcEvent, MvcResult, Params, PluginManager, RouteMatch, ServiceLocator,
	};
}
