//! Controller dispatch error types.

use thiserror::Error;

/// Result type for controller dispatch operations.
pub type MvcResult<T> = Result<T, MvcError>;

/// Errors raised while resolving, forwarding to, or dispatching controllers.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MvcError {
	/// The calling controller does not expose its event.
	#[error(
		"forward plugin requires a controller that implements InjectApplicationEvent; {controller} does not"
	)]
	MissingEventAwareness {
		/// Type name of the offending controller.
		controller: String,
	},

	/// A service or plugin could not be constructed.
	#[error("service '{service}' could not be created: {reason}")]
	ServiceNotCreated {
		/// Requested service name.
		service: String,
		/// Why construction failed.
		reason: String,
	},

	/// No dispatchable controller is registered under the identifier.
	#[error("controller '{name}' not found: {reason}")]
	ServiceNotFound {
		/// Requested identifier.
		name: String,
		/// Why resolution failed.
		reason: String,
	},

	/// The target is already being dispatched further up the chain.
	#[error("Circular forwarding detected: '{controller}' is already being dispatched ({path})")]
	CircularForwarding {
		/// Identifier that would be re-entered.
		controller: String,
		/// Chain including the rejected identifier, e.g. `a -> b -> a`.
		path: String,
	},

	/// The chain is deeper than the configured limit.
	#[error("Circular forwarding detected: greater than {0} nested forwards")]
	MaxNestedForwards(usize),

	/// A dispatch listener failed.
	#[error("listener '{listener}' failed: {message}")]
	Listener {
		/// Listener identifier.
		listener: String,
		/// Error message.
		message: String,
	},

	/// Application error raised by an action.
	#[error("action error: {0}")]
	Action(String),

	/// Settings could not be loaded.
	#[error("settings error: {0}")]
	Settings(String),
}

impl MvcError {
	/// Returns `true` for both circular-forwarding variants.
	pub fn is_circular(&self) -> bool {
		matches!(
			self,
			Self::CircularForwarding { .. } | Self::MaxNestedForwards(_)
		)
	}
}

impl From<toml::de::Error> for MvcError {
	fn from(err: toml::de::Error) -> Self {
		Self::Settings(err.to_string())
	}
}
