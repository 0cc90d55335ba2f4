//! Route match: the parameters a request was routed with.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Route parameters keyed by name.
pub type Params = serde_json::Map<String, Value>;

/// Parameters and matched route name resolved for a dispatch.
///
/// Events hold route matches behind an `Arc`, so two events refer to the same
/// match exactly when `Arc::ptr_eq` holds for their route matches.
///
/// # Examples
///
/// ```
/// use reinhardt_dispatch::RouteMatch;
/// use serde_json::json;
///
/// let route_match = RouteMatch::from_pairs([("action", json!("index"))])
///     .with_matched_route_name("home");
///
/// assert_eq!(route_match.param("action"), Some(&json!("index")));
/// assert_eq!(route_match.param_str("missing"), None);
/// assert_eq!(route_match.matched_route_name(), Some("home"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteMatch {
	#[serde(default)]
	params: Params,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	matched_route_name: Option<String>,
}

impl RouteMatch {
	pub fn new(params: Params) -> Self {
		Self {
			params,
			matched_route_name: None,
		}
	}

	/// Builds a route match from `(name, value)` pairs.
	pub fn from_pairs<K, I>(pairs: I) -> Self
	where
		K: Into<String>,
		I: IntoIterator<Item = (K, Value)>,
	{
		Self::new(pairs.into_iter().map(|(k, v)| (k.into(), v)).collect())
	}

	pub fn with_matched_route_name(mut self, name: impl Into<String>) -> Self {
		self.matched_route_name = Some(name.into());
		self
	}

	pub fn params(&self) -> &Params {
		&self.params
	}

	pub fn param(&self, name: &str) -> Option<&Value> {
		self.params.get(name)
	}

	/// Returns the parameter when it is a string.
	pub fn param_str(&self, name: &str) -> Option<&str> {
		self.params.get(name).and_then(Value::as_str)
	}

	pub fn matched_route_name(&self) -> Option<&str> {
		self.matched_route_name.as_deref()
	}

	pub fn set_matched_route_name(&mut self, name: impl Into<String>) -> &mut Self {
		self.matched_route_name = Some(name.into());
		self
	}
}
