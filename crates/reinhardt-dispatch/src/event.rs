//! Per-request MVC event and the forward dispatch chain.
//!
//! An [`MvcEvent`] is created once per top-level request and cloned for every
//! forwarded dispatch. Clones share the request, the response, the
//! [`DispatchChain`] and the [`EventManager`]; only the route match may differ
//! between a caller's event and the event of the controller it forwards to.

use crate::error::{MvcError, MvcResult};
use crate::events::EventManager;
use crate::route_match::RouteMatch;
use bytes::Bytes;
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

/// HTTP request seen by controllers.
pub type Request = http::Request<Bytes>;

/// HTTP response seen by controllers.
pub type Response = http::Response<Bytes>;

/// Response shared between a caller and every controller it forwards to.
pub type SharedResponse = Arc<Mutex<Response>>;

/// Identifiers of the controllers currently being forwarded to.
///
/// Cloning a chain yields a handle to the same stack. Entries are pushed by
/// [`DispatchChain::enter`] and popped when the returned [`ChainGuard`] drops,
/// so the chain unwinds on both success and error.
#[derive(Clone, Default)]
pub struct DispatchChain {
	stack: Arc<Mutex<Vec<String>>>,
}

impl DispatchChain {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn contains(&self, name: &str) -> bool {
		self.stack.lock().iter().any(|entry| entry == name)
	}

	pub fn depth(&self) -> usize {
		self.stack.lock().len()
	}

	pub fn is_empty(&self) -> bool {
		self.stack.lock().is_empty()
	}

	/// Snapshot of the chain, outermost first.
	pub fn path(&self) -> Vec<String> {
		self.stack.lock().clone()
	}

	/// Pushes `name` onto the chain.
	///
	/// Fails with [`MvcError::CircularForwarding`] when `name` is already on
	/// the chain, and with [`MvcError::MaxNestedForwards`] when `max_depth`
	/// entries are already active.
	pub fn enter(&self, name: &str, max_depth: usize) -> MvcResult<ChainGuard> {
		let mut stack = self.stack.lock();

		if stack.iter().any(|entry| entry == name) {
			let mut path = stack.clone();
			path.push(name.to_string());
			return Err(MvcError::CircularForwarding {
				controller: name.to_string(),
				path: path.join(" -> "),
			});
		}

		if stack.len() >= max_depth {
			return Err(MvcError::MaxNestedForwards(max_depth));
		}

		stack.push(name.to_string());
		Ok(ChainGuard {
			chain: self.clone(),
			name: name.to_string(),
		})
	}
}

impl fmt::Debug for DispatchChain {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("DispatchChain").field(&self.path()).finish()
	}
}

/// RAII guard: pops its entry from the chain on drop.
#[derive(Debug)]
pub struct ChainGuard {
	chain: DispatchChain,
	name: String,
}

impl Drop for ChainGuard {
	fn drop(&mut self) {
		let mut stack = self.chain.stack.lock();
		if let Some(pos) = stack.iter().rposition(|entry| *entry == self.name) {
			stack.remove(pos);
		}
	}
}

/// Event carried through one request's dispatch.
///
/// # Examples
///
/// ```
/// use reinhardt_dispatch::{MvcEvent, RouteMatch};
/// use serde_json::json;
/// use std::sync::Arc;
///
/// let event = MvcEvent::default()
///     .with_route_match(RouteMatch::from_pairs([("action", json!("test"))]));
/// let forwarded = event.clone();
///
/// assert!(Arc::ptr_eq(
///     event.route_match().unwrap(),
///     forwarded.route_match().unwrap(),
/// ));
/// ```
#[derive(Clone)]
pub struct MvcEvent {
	request: Arc<Request>,
	response: SharedResponse,
	route_match: Option<Arc<RouteMatch>>,
	events: Option<Arc<EventManager>>,
	chain: DispatchChain,
}

impl MvcEvent {
	pub fn new(request: Request, response: Response) -> Self {
		Self {
			request: Arc::new(request),
			response: Arc::new(Mutex::new(response)),
			route_match: None,
			events: None,
			chain: DispatchChain::new(),
		}
	}

	pub fn with_route_match(mut self, route_match: RouteMatch) -> Self {
		self.route_match = Some(Arc::new(route_match));
		self
	}

	pub fn with_event_manager(mut self, events: Arc<EventManager>) -> Self {
		self.events = Some(events);
		self
	}

	/// Replaces the request, keeping route match, chain and event manager.
	pub fn with_request(mut self, request: Arc<Request>) -> Self {
		self.request = request;
		self
	}

	/// Replaces the response, keeping route match, chain and event manager.
	pub fn with_response(mut self, response: SharedResponse) -> Self {
		self.response = response;
		self
	}

	pub fn request(&self) -> &Arc<Request> {
		&self.request
	}

	pub fn response(&self) -> &SharedResponse {
		&self.response
	}

	pub fn route_match(&self) -> Option<&Arc<RouteMatch>> {
		self.route_match.as_ref()
	}

	pub fn set_route_match(&mut self, route_match: Arc<RouteMatch>) {
		self.route_match = Some(route_match);
	}

	pub fn event_manager(&self) -> Option<&Arc<EventManager>> {
		self.events.as_ref()
	}

	pub fn chain(&self) -> &DispatchChain {
		&self.chain
	}
}

impl Default for MvcEvent {
	fn default() -> Self {
		Self::new(Request::default(), Response::default())
	}
}

impl fmt::Debug for MvcEvent {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("MvcEvent")
			.field("method", self.request.method())
			.field("uri", self.request.uri())
			.field("route_match", &self.route_match)
			.field("has_event_manager", &self.events.is_some())
			.field("chain", &self.chain)
			.finish()
	}
}
