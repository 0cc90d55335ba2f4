//! Forward plugin: dispatch another controller inline.
//!
//! ```text
//! caller action ── Forward::dispatch("target", params) ──▶ ControllerManager::get
//!                                                           │
//!        DispatchChain::enter  ◀────────────────────────────┘
//!                │  (circular / depth check)
//!                ▼
//!   child event (own route match) ─▶ target.dispatch_with_event(child)
//!                │
//!                ▼
//!   chain popped, listeners reattached
//! ```
//!
//! The caller's route match is never touched: a forwarded controller always
//! works on a route match of its own when parameters are supplied. The child
//! event travels with the call and is never stored on the target, so a
//! controller shared between requests keeps no request's state.

use crate::controller::{Controller, ControllerManager, DispatchResult};
use crate::error::{MvcError, MvcResult};
use crate::event::MvcEvent;
use crate::route_match::{Params, RouteMatch};
use crate::settings::ForwardSettings;
use std::fmt;
use std::sync::Arc;

/// Dispatches controllers from within another controller.
///
/// # Examples
///
/// ```
/// use async_trait::async_trait;
/// use reinhardt_dispatch::{
///     ActionContext, ActionController, ActionHandler, ControllerManager, DispatchResult,
///     Forward, MvcEvent, MvcResult, Params, RouteMatch,
/// };
/// use serde_json::json;
/// use std::sync::Arc;
///
/// struct Greeter;
///
/// #[async_trait]
/// impl ActionHandler for Greeter {
///     async fn on_dispatch(&self, ctx: &ActionContext<'_>) -> MvcResult<DispatchResult> {
///         let mut model = Params::new();
///         model.insert("greeting".into(), json!(format!("hello {}", ctx.action())));
///         Ok(DispatchResult::ViewModel(model))
///     }
/// }
///
/// # tokio_test::block_on(async {
/// let controllers = Arc::new(ControllerManager::new());
/// controllers.set_factory("greeter", |_| Ok(Arc::new(ActionController::new(Greeter))));
///
/// let caller = ActionController::new(Greeter).with_event(
///     MvcEvent::default().with_route_match(RouteMatch::from_pairs([("action", json!("index"))])),
/// );
///
/// let mut params = Params::new();
/// params.insert("action".into(), json!("world"));
/// let result = Forward::new(controllers)
///     .dispatch(&caller, "greeter", Some(params))
///     .await
///     .unwrap();
///
/// assert_eq!(result.view_model().unwrap()["greeting"], json!("hello world"));
/// # });
/// ```
#[derive(Clone)]
pub struct Forward {
	controllers: Arc<ControllerManager>,
	settings: ForwardSettings,
}

impl Forward {
	pub fn new(controllers: Arc<ControllerManager>) -> Self {
		Self {
			controllers,
			settings: ForwardSettings::default(),
		}
	}

	/// Replaces the settings after validating them.
	pub fn with_settings(mut self, settings: ForwardSettings) -> MvcResult<Self> {
		settings.validate()?;
		self.settings = settings;
		Ok(self)
	}

	pub fn controllers(&self) -> &Arc<ControllerManager> {
		&self.controllers
	}

	pub fn max_nested_forwards(&self) -> usize {
		self.settings.max_nested_forwards
	}

	/// Fails with [`MvcError::Settings`] when `limit` is 0.
	pub fn set_max_nested_forwards(&mut self, limit: usize) -> MvcResult<&mut Self> {
		let settings = ForwardSettings {
			max_nested_forwards: limit,
			..self.settings.clone()
		};
		settings.validate()?;
		self.settings = settings;
		Ok(self)
	}

	/// Listener ids suspended while a forwarded controller runs.
	pub fn listeners_to_detach(&self) -> &[String] {
		&self.settings.listeners_to_detach
	}

	/// Dispatches `target` on behalf of `caller` and returns its result.
	///
	/// With `params` the target sees a fresh route match holding exactly those
	/// parameters and the caller's matched route name; without, it sees the
	/// caller's route match.
	///
	/// # Errors
	///
	/// * [`MvcError::MissingEventAwareness`] when `caller` does not expose its
	///   event; nothing is resolved.
	/// * [`MvcError::ServiceNotFound`] when `target` does not resolve to a
	///   dispatchable controller.
	/// * [`MvcError::CircularForwarding`] when `target` is already being
	///   dispatched in this request, and [`MvcError::MaxNestedForwards`] when
	///   the chain is already at its limit; the target is not invoked.
	/// * Whatever the target's dispatch returns.
	pub async fn dispatch(
		&self,
		caller: &dyn Controller,
		target: &str,
		params: Option<Params>,
	) -> MvcResult<DispatchResult> {
		let parent = caller
			.as_event_aware()
			.ok_or_else(|| MvcError::MissingEventAwareness {
				controller: caller.name().to_string(),
			})?
			.event()
			.unwrap_or_default();

		self.dispatch_from(&parent, caller.name(), target, params)
			.await
	}

	/// Dispatches `target` from within `parent`, the event of the dispatch
	/// that is currently running.
	///
	/// Actions forward through this entry point so the chain of the running
	/// request is checked even when the caller was itself forwarded to.
	/// Fails like [`Forward::dispatch`] apart from the event-awareness check.
	pub async fn dispatch_from(
		&self,
		parent: &MvcEvent,
		caller: &str,
		target: &str,
		params: Option<Params>,
	) -> MvcResult<DispatchResult> {
		let controller = self.controllers.get(target)?;

		let _chain = parent
			.chain()
			.enter(target, self.settings.max_nested_forwards)
			.inspect_err(|err| {
				tracing::warn!(controller = target, error = %err, "forward rejected");
			})?;

		tracing::debug!(
			controller = target,
			depth = parent.chain().depth(),
			caller,
			"forwarding dispatch"
		);

		let child = child_event(parent, params);
		let _listeners = parent.event_manager().map(|events| {
			events.suspend(self.settings.listeners_to_detach.iter().map(String::as_str))
		});

		controller.dispatch_with_event(child).await
	}
}

impl fmt::Debug for Forward {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Forward")
			.field("controllers", &self.controllers.registered_names())
			.field("settings", &self.settings)
			.finish()
	}
}

/// Event seen by the forwarded controller.
fn child_event(parent: &MvcEvent, params: Option<Params>) -> MvcEvent {
	let mut child = parent.clone();
	match (params, parent.route_match()) {
		(Some(params), parent_match) => {
			let mut route_match = RouteMatch::new(params);
			if let Some(name) = parent_match.and_then(|m| m.matched_route_name()) {
				route_match.set_matched_route_name(name);
			}
			child.set_route_match(Arc::new(route_match));
		}
		(None, None) => child.set_route_match(Arc::new(RouteMatch::default())),
		(None, Some(_)) => {}
	}
	child
}
