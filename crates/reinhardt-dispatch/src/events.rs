//! Request-scoped event manager.
//!
//! Controllers trigger [`DISPATCH_EVENT`] before running an action. Listeners
//! are identified by a listener id (the analogue of a signal `dispatch_uid`),
//! which is what the forward plugin uses to suspend listeners that must not
//! run for a forwarded dispatch.

use crate::error::MvcResult;
use crate::event::MvcEvent;
use parking_lot::RwLock;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// Event triggered by action controllers before an action runs.
pub const DISPATCH_EVENT: &str = "dispatch";

/// Listener callback type.
pub type ListenerFn = Arc<dyn Fn(&MvcEvent) -> MvcResult<()> + Send + Sync>;

#[derive(Clone)]
struct Listener {
	event: String,
	id: String,
	priority: i32,
	callback: ListenerFn,
}

/// Listener registry for one request scope.
#[derive(Default)]
pub struct EventManager {
	listeners: RwLock<Vec<Listener>>,
}

impl EventManager {
	pub fn new() -> Self {
		Self::default()
	}

	/// Attaches a listener; an existing listener with the same id is replaced.
	///
	/// Higher priorities run first. Listeners of equal priority run in
	/// attachment order.
	pub fn attach<F>(
		&self,
		event: impl Into<String>,
		id: impl Into<String>,
		priority: i32,
		callback: F,
	) where
		F: Fn(&MvcEvent) -> MvcResult<()> + Send + Sync + 'static,
	{
		self.insert(Listener {
			event: event.into(),
			id: id.into(),
			priority,
			callback: Arc::new(callback),
		});
	}

	fn insert(&self, listener: Listener) {
		let mut listeners = self.listeners.write();
		listeners.retain(|l| l.id != listener.id);
		listeners.push(listener);
	}

	/// Removes the listener with `id`, returning whether one was attached.
	pub fn detach(&self, id: &str) -> bool {
		let mut listeners = self.listeners.write();
		let before = listeners.len();
		listeners.retain(|l| l.id != id);
		listeners.len() < before
	}

	pub fn has_listener(&self, id: &str) -> bool {
		self.listeners.read().iter().any(|l| l.id == id)
	}

	/// Ids of listeners attached to `event`, in trigger order.
	pub fn listener_ids(&self, event: &str) -> Vec<String> {
		self.ordered(event).into_iter().map(|l| l.id).collect()
	}

	fn ordered(&self, event: &str) -> Vec<Listener> {
		let mut matching: Vec<Listener> = self
			.listeners
			.read()
			.iter()
			.filter(|l| l.event == event)
			.cloned()
			.collect();
		// Stable sort keeps attachment order within a priority
		matching.sort_by(|a, b| b.priority.cmp(&a.priority));
		matching
	}

	/// Runs every listener of `event`; the first error stops propagation.
	///
	/// The registry lock is released before callbacks run, so a listener may
	/// attach or detach listeners.
	pub fn trigger(&self, event: &str, mvc_event: &MvcEvent) -> MvcResult<()> {
		for listener in self.ordered(event) {
			tracing::trace!(event = %event, listener = %listener.id, "triggering listener");
			(listener.callback)(mvc_event)?;
		}
		Ok(())
	}

	/// Detaches the listeners whose ids are in `ids` until the returned guard
	/// drops.
	pub fn suspend<'a, I>(self: &Arc<Self>, ids: I) -> SuspendedListeners
	where
		I: IntoIterator<Item = &'a str>,
	{
		let ids: HashSet<&str> = ids.into_iter().collect();
		let mut listeners = self.listeners.write();
		let mut suspended = Vec::new();
		listeners.retain(|l| {
			if ids.contains(l.id.as_str()) {
				suspended.push(l.clone());
				false
			} else {
				true
			}
		});

		if !suspended.is_empty() {
			tracing::debug!(count = suspended.len(), "suspended listeners");
		}

		SuspendedListeners {
			manager: Arc::clone(self),
			listeners: suspended,
		}
	}
}

impl fmt::Debug for EventManager {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let ids: Vec<String> = self.listeners.read().iter().map(|l| l.id.clone()).collect();
		f.debug_struct("EventManager").field("listeners", &ids).finish()
	}
}

/// RAII guard: reattaches suspended listeners on drop.
pub struct SuspendedListeners {
	manager: Arc<EventManager>,
	listeners: Vec<Listener>,
}

impl SuspendedListeners {
	pub fn len(&self) -> usize {
		self.listeners.len()
	}

	pub fn is_empty(&self) -> bool {
		self.listeners.is_empty()
	}
}

impl Drop for SuspendedListeners {
	fn drop(&mut self) {
		for listener in self.listeners.drain(..) {
			// A listener attached under the same id while suspended wins
			if !self.manager.has_listener(&listener.id) {
				self.manager.insert(listener);
			}
		}
	}
}
