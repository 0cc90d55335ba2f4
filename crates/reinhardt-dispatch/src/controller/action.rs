//! Action controllers.
//!
//! An [`ActionController`] is event-aware: a top-level dispatch runs within
//! the [`MvcEvent`] injected into it, a forwarded dispatch within the event
//! handed to [`Controller::dispatch_with_event`]. Either way it triggers the
//! [`DISPATCH_EVENT`] listeners and hands the action named by the route
//! match's `action` parameter to its [`ActionHandler`].

use super::{Controller, DispatchResult, InjectApplicationEvent};
use crate::error::{MvcError, MvcResult};
use crate::event::{MvcEvent, Request, SharedResponse};
use crate::events::DISPATCH_EVENT;
use crate::plugin::{Forward, PluginManager};
use crate::route_match::{Params, RouteMatch};
use async_trait::async_trait;
use http::StatusCode;
use parking_lot::RwLock;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Action used when the route match names none.
pub const NOT_FOUND_ACTION: &str = "not-found";

/// Route parameter selecting the action.
const ACTION_PARAM: &str = "action";

/// Application logic behind an [`ActionController`].
#[async_trait]
pub trait ActionHandler: Send + Sync + 'static {
	/// Runs the action named by [`ActionContext::action`].
	async fn on_dispatch(&self, ctx: &ActionContext<'_>) -> MvcResult<DispatchResult>;

	fn name(&self) -> &str {
		std::any::type_name::<Self>()
	}
}

/// What an action sees of the dispatch it runs in.
pub struct ActionContext<'a> {
	controller: &'a dyn Controller,
	event: &'a MvcEvent,
	plugins: Option<&'a Arc<PluginManager>>,
	action: String,
}

impl<'a> ActionContext<'a> {
	pub fn action(&self) -> &str {
		&self.action
	}

	pub fn event(&self) -> &MvcEvent {
		self.event
	}

	pub fn request(&self) -> &Arc<Request> {
		self.event.request()
	}

	pub fn response(&self) -> &SharedResponse {
		self.event.response()
	}

	pub fn route_match(&self) -> Option<&Arc<RouteMatch>> {
		self.event.route_match()
	}

	pub fn route_param(&self, name: &str) -> Option<&Value> {
		self.route_match().and_then(|route_match| route_match.param(name))
	}

	/// All route parameters; empty when the event has no route match.
	pub fn route_params(&self) -> Params {
		self.route_match()
			.map(|route_match| route_match.params().clone())
			.unwrap_or_default()
	}

	/// Acquires the forward plugin of the running controller.
	pub fn forward_plugin(&self) -> MvcResult<Forward> {
		acquire_forward(self.plugins)
	}

	/// Forwards to `target` from the running controller.
	pub async fn forward(
		&self,
		target: &str,
		params: Option<Params>,
	) -> MvcResult<DispatchResult> {
		self.forward_plugin()?
			.dispatch_from(self.event, self.controller.name(), target, params)
			.await
	}

	/// Marks the response as 404 and returns the default not-found view model.
	pub fn not_found(&self) -> DispatchResult {
		*self.response().lock().status_mut() = StatusCode::NOT_FOUND;
		let mut params = Params::new();
		params.insert("content".to_string(), Value::from("Page not found"));
		DispatchResult::ViewModel(params)
	}
}

fn acquire_forward(plugins: Option<&Arc<PluginManager>>) -> MvcResult<Forward> {
	plugins
		.ok_or_else(|| MvcError::ServiceNotCreated {
			service: crate::plugin::FORWARD_PLUGIN.to_string(),
			reason: "controller has no plugin manager".to_string(),
		})?
		.forward()
}

/// Event-aware controller dispatching to an [`ActionHandler`].
///
/// # Examples
///
/// ```
/// use async_trait::async_trait;
/// use reinhardt_dispatch::{
///     ActionContext, ActionController, ActionHandler, Controller, DispatchResult, MvcEvent,
///     MvcResult, RouteMatch,
/// };
/// use serde_json::json;
///
/// struct Hello;
///
/// #[async_trait]
/// impl ActionHandler for Hello {
///     async fn on_dispatch(&self, ctx: &ActionContext<'_>) -> MvcResult<DispatchResult> {
///         match ctx.action() {
///             "hello" => Ok(DispatchResult::ViewModel(ctx.route_params())),
///             _ => Ok(ctx.not_found()),
///         }
///     }
/// }
///
/// # tokio_test::block_on(async {
/// let event = MvcEvent::default()
///     .with_route_match(RouteMatch::from_pairs([("action", json!("hello"))]));
/// let controller = ActionController::new(Hello).with_event(event.clone());
///
/// let result = controller
///     .dispatch(event.request().clone(), event.response().clone())
///     .await
///     .unwrap();
/// assert_eq!(result.view_model().unwrap()["action"], json!("hello"));
/// # });
/// ```
pub struct ActionController<H> {
	handler: H,
	event: RwLock<Option<MvcEvent>>,
	plugins: Option<Arc<PluginManager>>,
}

impl<H: ActionHandler> ActionController<H> {
	pub fn new(handler: H) -> Self {
		Self {
			handler,
			event: RwLock::new(None),
			plugins: None,
		}
	}

	pub fn with_plugins(mut self, plugins: Arc<PluginManager>) -> Self {
		self.plugins = Some(plugins);
		self
	}

	pub fn with_event(self, event: MvcEvent) -> Self {
		*self.event.write() = Some(event);
		self
	}

	pub fn handler(&self) -> &H {
		&self.handler
	}

	pub fn plugins(&self) -> Option<&Arc<PluginManager>> {
		self.plugins.as_ref()
	}

	/// Acquires the forward plugin.
	///
	/// Fails with [`MvcError::ServiceNotCreated`] when the controller has no
	/// plugin manager or the plugin manager has no controller registry.
	pub fn forward_plugin(&self) -> MvcResult<Forward> {
		acquire_forward(self.plugins.as_ref())
	}
}

#[async_trait]
impl<H: ActionHandler> Controller for ActionController<H> {
	async fn dispatch(
		&self,
		request: Arc<Request>,
		response: SharedResponse,
	) -> MvcResult<DispatchResult> {
		let event = self
			.event()
			.unwrap_or_default()
			.with_request(request)
			.with_response(response);
		self.dispatch_with_event(event).await
	}

	async fn dispatch_with_event(&self, event: MvcEvent) -> MvcResult<DispatchResult> {
		if let Some(events) = event.event_manager() {
			events.trigger(DISPATCH_EVENT, &event)?;
		}

		let action = event
			.route_match()
			.and_then(|route_match| route_match.param_str(ACTION_PARAM))
			.unwrap_or(NOT_FOUND_ACTION)
			.to_string();
		tracing::debug!(controller = self.name(), action = %action, "dispatching action");

		let ctx = ActionContext {
			controller: self,
			event: &event,
			plugins: self.plugins.as_ref(),
			action,
		};
		self.handler.on_dispatch(&ctx).await
	}

	fn name(&self) -> &str {
		self.handler.name()
	}

	fn as_event_aware(&self) -> Option<&dyn InjectApplicationEvent> {
		Some(self)
	}
}

impl<H: ActionHandler> InjectApplicationEvent for ActionController<H> {
	fn event(&self) -> Option<MvcEvent> {
		self.event.read().clone()
	}

	fn replace_event(&self, event: Option<MvcEvent>) -> Option<MvcEvent> {
		std::mem::replace(&mut *self.event.write(), event)
	}
}

impl<H: ActionHandler> fmt::Debug for ActionController<H> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ActionController")
			.field("handler", &self.handler.name())
			.field("event", &*self.event.read())
			.field("has_plugins", &self.plugins.is_some())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::events::EventManager;
	use rstest::rstest;
	use serde_json::json;
	use std::sync::atomic::{AtomicUsize, Ordering};

	struct EchoActions;

	#[async_trait]
	impl ActionHandler for EchoActions {
		async fn on_dispatch(&self, ctx: &ActionContext<'_>) -> MvcResult<DispatchResult> {
			match ctx.action() {
				"echo" => Ok(DispatchResult::ViewModel(ctx.route_params())),
				_ => Ok(ctx.not_found()),
			}
		}
	}

	async fn run(controller: &ActionController<EchoActions>, event: &MvcEvent) -> DispatchResult {
		controller
			.dispatch(Arc::clone(event.request()), Arc::clone(event.response()))
			.await
			.unwrap()
	}

	#[rstest]
	#[tokio::test]
	async fn test_dispatches_named_action() {
		// Arrange
		let event = MvcEvent::default().with_route_match(RouteMatch::from_pairs([
			("action", json!("echo")),
			("id", json!(3)),
		]));
		let controller = ActionController::new(EchoActions).with_event(event.clone());

		// Act
		let result = run(&controller, &event).await;

		// Assert
		let view_model = result.into_view_model().unwrap();
		assert_eq!(view_model["action"], json!("echo"));
		assert_eq!(view_model["id"], json!(3));
	}

	#[rstest]
	#[tokio::test]
	async fn test_missing_action_falls_back_to_not_found() {
		// Arrange
		let event = MvcEvent::default();
		let controller = ActionController::new(EchoActions);

		// Act
		let result = run(&controller, &event).await;

		// Assert
		assert_eq!(
			result.view_model().unwrap()["content"],
			json!("Page not found")
		);
		assert_eq!(event.response().lock().status(), StatusCode::NOT_FOUND);
	}

	#[rstest]
	#[tokio::test]
	async fn test_dispatch_keeps_route_match_identity() {
		// Arrange
		let event = MvcEvent::default()
			.with_route_match(RouteMatch::from_pairs([("action", json!("echo"))]));
		let controller = ActionController::new(EchoActions).with_event(event.clone());

		// Act
		run(&controller, &event).await;

		// Assert
		let stored = controller.event().unwrap();
		assert!(Arc::ptr_eq(
			stored.route_match().unwrap(),
			event.route_match().unwrap()
		));
	}

	#[rstest]
	#[tokio::test]
	async fn test_dispatch_triggers_listeners() {
		// Arrange
		let events = Arc::new(EventManager::new());
		let calls = Arc::new(AtomicUsize::new(0));
		let counter = Arc::clone(&calls);
		events.attach(DISPATCH_EVENT, "count", 0, move |_| {
			counter.fetch_add(1, Ordering::SeqCst);
			Ok(())
		});
		let event = MvcEvent::default().with_event_manager(events);
		let controller = ActionController::new(EchoActions).with_event(event.clone());

		// Act
		run(&controller, &event).await;

		// Assert
		assert_eq!(calls.load(Ordering::SeqCst), 1);
	}

	#[rstest]
	#[tokio::test]
	async fn test_listener_error_aborts_dispatch() {
		let events = Arc::new(EventManager::new());
		events.attach(DISPATCH_EVENT, "deny", 0, |_| {
			Err(MvcError::Listener {
				listener: "deny".to_string(),
				message: "forbidden".to_string(),
			})
		});
		let event = MvcEvent::default().with_event_manager(events);
		let controller = ActionController::new(EchoActions).with_event(event.clone());

		let result = controller
			.dispatch(Arc::clone(event.request()), Arc::clone(event.response()))
			.await;

		assert!(matches!(result, Err(MvcError::Listener { .. })));
	}

	#[rstest]
	fn test_forward_plugin_without_plugin_manager_is_not_created() {
		let controller = ActionController::new(EchoActions);

		let result = controller.forward_plugin();

		assert!(matches!(result, Err(MvcError::ServiceNotCreated { .. })));
	}

	#[rstest]
	#[tokio::test]
	async fn test_dispatch_with_event_leaves_stored_event_untouched() {
		// Arrange
		let stored = MvcEvent::default()
			.with_route_match(RouteMatch::from_pairs([("action", json!("stored"))]));
		let controller = ActionController::new(EchoActions).with_event(stored.clone());
		let forwarded = MvcEvent::default().with_route_match(RouteMatch::from_pairs([
			("action", json!("echo")),
			("id", json!(9)),
		]));

		// Act
		let result = controller.dispatch_with_event(forwarded).await.unwrap();

		// Assert
		assert_eq!(result.view_model().unwrap()["id"], json!(9));
		let after = controller.event().unwrap();
		assert!(Arc::ptr_eq(
			after.route_match().unwrap(),
			stored.route_match().unwrap()
		));
	}

	#[rstest]
	fn test_replace_event_returns_previous() {
		let controller = ActionController::new(EchoActions);
		let first = MvcEvent::default();

		assert!(controller.replace_event(Some(first)).is_none());
		assert!(controller.replace_event(None).is_some());
		assert!(controller.event().is_none());
	}

	#[rstest]
	fn test_name_comes_from_handler() {
		let controller = ActionController::new(EchoActions);

		assert!(controller.name().ends_with("EchoActions"));
		assert!(controller.as_event_aware().is_some());
	}
}
