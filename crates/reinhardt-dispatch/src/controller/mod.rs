//! Controllers and the result of dispatching them.

pub mod action;
pub mod manager;

pub use action::{ActionContext, ActionController, ActionHandler, NOT_FOUND_ACTION};
pub use manager::{ControllerFactory, ControllerManager};

use crate::error::MvcResult;
use crate::event::{MvcEvent, Request, Response, SharedResponse};
use crate::route_match::Params;
use async_trait::async_trait;
use std::sync::Arc;

/// Value produced by a dispatched controller.
///
/// The dispatcher passes it through untouched.
#[derive(Debug)]
pub enum DispatchResult {
	/// Key/value mapping used as a view model.
	ViewModel(Params),
	/// A complete response.
	Response(Response),
}

impl DispatchResult {
	pub fn view_model(&self) -> Option<&Params> {
		match self {
			Self::ViewModel(params) => Some(params),
			Self::Response(_) => None,
		}
	}

	pub fn into_view_model(self) -> Option<Params> {
		match self {
			Self::ViewModel(params) => Some(params),
			Self::Response(_) => None,
		}
	}

	pub fn is_response(&self) -> bool {
		matches!(self, Self::Response(_))
	}
}

impl From<Params> for DispatchResult {
	fn from(params: Params) -> Self {
		Self::ViewModel(params)
	}
}

impl From<Response> for DispatchResult {
	fn from(response: Response) -> Self {
		Self::Response(response)
	}
}

/// A dispatchable controller.
#[async_trait]
pub trait Controller: Send + Sync {
	/// Handles the request, writing to the shared response as needed.
	async fn dispatch(
		&self,
		request: Arc<Request>,
		response: SharedResponse,
	) -> MvcResult<DispatchResult>;

	/// Handles a dispatch running within `event`.
	///
	/// Forwarded dispatches arrive here with an event of their own, which is
	/// never stored on the controller. The default only passes on the
	/// request and response.
	async fn dispatch_with_event(&self, event: MvcEvent) -> MvcResult<DispatchResult> {
		self.dispatch(Arc::clone(event.request()), Arc::clone(event.response()))
			.await
	}

	/// Name used in diagnostics.
	fn name(&self) -> &str {
		std::any::type_name::<Self>()
	}

	/// Returns the event-aware view of this controller, if it has one.
	fn as_event_aware(&self) -> Option<&dyn InjectApplicationEvent> {
		None
	}
}

/// Controllers that carry the event of the dispatch they are part of.
pub trait InjectApplicationEvent: Send + Sync {
	fn event(&self) -> Option<MvcEvent>;

	/// Installs `event` (or clears it), returning the previous event.
	fn replace_event(&self, event: Option<MvcEvent>) -> Option<MvcEvent>;

	fn set_event(&self, event: MvcEvent) {
		self.replace_event(Some(event));
	}
}
