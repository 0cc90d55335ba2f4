//! # Reinhardt Dispatch
//!
//! Controller dispatching and internal forwarding for Reinhardt framework.
//!
//! A controller handling a request can dispatch another controller inline,
//! without a new HTTP round trip, and use its result. This crate provides
//! the pieces that make that work.
//!
//! ## Overview
//!
//! The dispatch system handles:
//! - Controller resolution by identifier ([`ControllerManager`], with a
//!   peering [`ServiceLocator`])
//! - Per-request state ([`MvcEvent`], [`RouteMatch`], [`DispatchChain`])
//! - Event-aware action controllers ([`ActionController`], [`ActionHandler`])
//! - Request-scoped dispatch listeners ([`EventManager`])
//! - Forwarding with circular-forward detection ([`Forward`], acquired from a
//!   [`PluginManager`])
//!
//! ## Architecture
//!
//! ```text
//! Caller action → Forward → ControllerManager → target Controller → DispatchResult
//!                    ↓
//!              DispatchChain
//!       (circular / depth detection)
//! ```
//!
//! ## Examples
//!
//! ### Forwarding from an action
//!
//! ```rust
//! use async_trait::async_trait;
//! use reinhardt_dispatch::{
//!     ActionContext, ActionController, ActionHandler, Controller, ControllerManager,
//!     DispatchResult, MvcEvent, MvcResult, Params, PluginManager, RouteMatch,
//! };
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! struct Listing;
//!
//! #[async_trait]
//! impl ActionHandler for Listing {
//!     async fn on_dispatch(&self, _ctx: &ActionContext<'_>) -> MvcResult<DispatchResult> {
//!         let mut model = Params::new();
//!         model.insert("items".into(), json!(["a", "b"]));
//!         Ok(DispatchResult::ViewModel(model))
//!     }
//! }
//!
//! struct Dashboard;
//!
//! #[async_trait]
//! impl ActionHandler for Dashboard {
//!     async fn on_dispatch(&self, ctx: &ActionContext<'_>) -> MvcResult<DispatchResult> {
//!         ctx.forward("listing", None).await
//!     }
//! }
//!
//! # tokio_test::block_on(async {
//! let controllers = Arc::new(ControllerManager::new());
//! controllers.set_factory("listing", |_| Ok(Arc::new(ActionController::new(Listing))));
//! let plugins = Arc::new(PluginManager::new().with_controller_manager(&controllers));
//!
//! let event = MvcEvent::default()
//!     .with_route_match(RouteMatch::from_pairs([("action", json!("index"))]));
//! let dashboard = ActionController::new(Dashboard)
//!     .with_plugins(plugins)
//!     .with_event(event.clone());
//!
//! let result = dashboard
//!     .dispatch(event.request().clone(), event.response().clone())
//!     .await
//!     .unwrap();
//! assert_eq!(result.view_model().unwrap()["items"], json!(["a", "b"]));
//! assert!(event.chain().is_empty());
//! # });
//! ```

pub mod controller;
pub mod error;
pub mod event;
pub mod events;
pub mod plugin;
pub mod route_match;
pub mod services;
pub mod settings;

// Re-exports
pub use controller::{
	ActionContext, ActionController, ActionHandler, Controller, ControllerFactory,
	ControllerManager, DispatchResult, InjectApplicationEvent, NOT_FOUND_ACTION,
};
pub use error::{MvcError, MvcResult};
pub use event::{ChainGuard, DispatchChain, MvcEvent, Request, Response, SharedResponse};
pub use events::{DISPATCH_EVENT, EventManager, ListenerFn, SuspendedListeners};
pub use plugin::{FORWARD_PLUGIN, Forward, PluginManager};
pub use route_match::{Params, RouteMatch};
pub use services::{AnyService, ControllerService, ServiceFactory, ServiceLocator};
pub use settings::{DEFAULT_MAX_NESTED_FORWARDS, ForwardSettings, INJECT_TEMPLATE_LISTENER};
