//! Shared controllers and fixtures for forward integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use bytes::Bytes;
use http::StatusCode;
use reinhardt_dispatch::{
	ActionContext, ActionController, ActionHandler, Controller, ControllerManager,
	DispatchResult, EventManager, Forward, MvcEvent, MvcResult, Params, PluginManager, Request,
	Response, RouteMatch, ServiceLocator, SharedResponse,
};
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Builds route parameters from string pairs.
pub fn params(pairs: &[(&str, &str)]) -> Params {
	pairs
		.iter()
		.map(|(k, v)| (k.to_string(), Value::from(*v)))
		.collect()
}

/// Actions of the controller registered as `forward`.
pub struct ForwardActions;

#[async_trait]
impl ActionHandler for ForwardActions {
	async fn on_dispatch(&self, ctx: &ActionContext<'_>) -> MvcResult<DispatchResult> {
		match ctx.action() {
			"test" => Ok(DispatchResult::ViewModel(params(&[(
				"content",
				"ForwardController::testAction",
			)]))),
			"test-matches" => Ok(DispatchResult::ViewModel(ctx.route_params())),
			"test-response" => {
				let response = http::Response::builder()
					.status(StatusCode::CREATED)
					.body(Bytes::from_static(b"created"))
					.map_err(|e| reinhardt_dispatch::MvcError::Action(e.to_string()))?;
				Ok(DispatchResult::Response(response))
			}
			_ => {
				let mut model = Params::new();
				model.insert("status".to_string(), json!("not-found"));
				model.insert("params".to_string(), Value::Object(ctx.route_params()));
				Ok(DispatchResult::ViewModel(model))
			}
		}
	}

	fn name(&self) -> &str {
		"ForwardController"
	}
}

/// Actions of the calling controller.
pub struct SampleActions;

#[async_trait]
impl ActionHandler for SampleActions {
	async fn on_dispatch(&self, ctx: &ActionContext<'_>) -> MvcResult<DispatchResult> {
		match ctx.action() {
			"test" => Ok(DispatchResult::ViewModel(params(&[(
				"content",
				"SampleController::testAction",
			)]))),
			"test-circular" => {
				ctx.forward("sample", Some(params(&[("action", "test-circular")])))
					.await
			}
			"forward-to" => {
				let target = ctx
					.route_param("target")
					.and_then(Value::as_str)
					.unwrap_or("forward")
					.to_string();
				ctx.forward(&target, Some(params(&[("action", "test")])))
					.await
			}
			_ => Ok(ctx.not_found()),
		}
	}

	fn name(&self) -> &str {
		"SampleController"
	}
}

/// Forwards to `next` (if any) and counts its own invocations.
pub struct HopActions {
	pub next: Option<&'static str>,
	pub calls: Arc<AtomicUsize>,
}

impl HopActions {
	pub fn new(next: Option<&'static str>) -> Self {
		Self {
			next,
			calls: Arc::new(AtomicUsize::new(0)),
		}
	}
}

#[async_trait]
impl ActionHandler for HopActions {
	async fn on_dispatch(&self, ctx: &ActionContext<'_>) -> MvcResult<DispatchResult> {
		self.calls.fetch_add(1, Ordering::SeqCst);
		match self.next {
			Some(next) => ctx.forward(next, Some(params(&[("action", "hop")]))).await,
			None => {
				let mut model = Params::new();
				model.insert("depth".to_string(), json!(ctx.event().chain().depth()));
				model.insert("path".to_string(), json!(ctx.event().chain().path()));
				Ok(DispatchResult::ViewModel(model))
			}
		}
	}
}

/// Echoes its route parameters and the chain it ran in, after yielding to
/// the scheduler as many times as the `yields` parameter asks.
pub struct EchoActions;

#[async_trait]
impl ActionHandler for EchoActions {
	async fn on_dispatch(&self, ctx: &ActionContext<'_>) -> MvcResult<DispatchResult> {
		let yields = ctx
			.route_param("yields")
			.and_then(Value::as_str)
			.and_then(|n| n.parse::<usize>().ok())
			.unwrap_or(0);
		for _ in 0..yields {
			tokio::task::yield_now().await;
		}

		let mut model = ctx.route_params();
		model.insert("path".to_string(), json!(ctx.event().chain().path()));
		Ok(DispatchResult::ViewModel(model))
	}
}

/// Controller without event awareness.
pub struct UneventfulController;

#[async_trait]
impl Controller for UneventfulController {
	async fn dispatch(
		&self,
		_request: Arc<Request>,
		_response: SharedResponse,
	) -> MvcResult<DispatchResult> {
		Ok(DispatchResult::ViewModel(Params::new()))
	}

	fn name(&self) -> &str {
		"UneventfulController"
	}
}

/// Object that is not a controller.
pub struct Bogus;

pub struct ForwardFixture {
	pub services: Arc<ServiceLocator>,
	pub controllers: Arc<ControllerManager>,
	pub plugins: Arc<PluginManager>,
	pub events: Arc<EventManager>,
	pub event: MvcEvent,
	pub controller: Arc<ActionController<SampleActions>>,
	pub plugin: Forward,
	pub forward_builds: Arc<AtomicUsize>,
}

/// Calling controller with an event, wired to a registry that knows `forward`.
pub fn forward_fixture() -> ForwardFixture {
	let services = Arc::new(ServiceLocator::new());
	let controllers = Arc::new(ControllerManager::new().with_peer(Arc::clone(&services)));
	let plugins = Arc::new(PluginManager::new().with_controller_manager(&controllers));

	let forward_builds = Arc::new(AtomicUsize::new(0));
	let builds = Arc::clone(&forward_builds);
	let factory_plugins = Arc::clone(&plugins);
	controllers.set_factory("forward", move |_| {
		builds.fetch_add(1, Ordering::SeqCst);
		Ok(Arc::new(
			ActionController::new(ForwardActions).with_plugins(Arc::clone(&factory_plugins)),
		))
	});

	let events = Arc::new(EventManager::new());
	let route_match =
		RouteMatch::from_pairs([("action", json!("test"))]).with_matched_route_name("some-route");
	let event = MvcEvent::new(Request::default(), Response::default())
		.with_route_match(route_match)
		.with_event_manager(Arc::clone(&events));

	let controller = Arc::new(
		ActionController::new(SampleActions)
			.with_plugins(Arc::clone(&plugins))
			.with_event(event.clone()),
	);
	let plugin = controller
		.forward_plugin()
		.expect("Forward plugin should be available");

	ForwardFixture {
		services,
		controllers,
		plugins,
		events,
		event,
		controller,
		plugin,
		forward_builds,
	}
}
