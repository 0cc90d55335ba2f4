//! Forward plugin settings.
//!
//! ```toml
//! max_nested_forwards = 10
//! listeners_to_detach = ["inject-template"]
//! ```

use crate::error::{MvcError, MvcResult};
use serde::{Deserialize, Serialize};

/// Listener that injects a template name into the view model; it must not
/// run for forwarded dispatches.
pub const INJECT_TEMPLATE_LISTENER: &str = "inject-template";

/// Default limit on nested forwards within one request.
pub const DEFAULT_MAX_NESTED_FORWARDS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForwardSettings {
	/// Maximum number of forwards active at once in a request.
	pub max_nested_forwards: usize,
	/// Listener ids suspended while a forwarded controller runs.
	pub listeners_to_detach: Vec<String>,
}

impl Default for ForwardSettings {
	fn default() -> Self {
		Self {
			max_nested_forwards: DEFAULT_MAX_NESTED_FORWARDS,
			listeners_to_detach: vec![INJECT_TEMPLATE_LISTENER.to_string()],
		}
	}
}

impl ForwardSettings {
	/// Parses and validates settings from a TOML fragment.
	///
	/// Missing keys take their defaults.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_dispatch::ForwardSettings;
	///
	/// let settings = ForwardSettings::from_toml_str("max_nested_forwards = 4").unwrap();
	/// assert_eq!(settings.max_nested_forwards, 4);
	/// assert_eq!(settings.listeners_to_detach, vec!["inject-template".to_string()]);
	/// ```
	pub fn from_toml_str(source: &str) -> MvcResult<Self> {
		let settings: Self = toml::from_str(source)?;
		settings.validate()?;
		Ok(settings)
	}

	pub fn validate(&self) -> MvcResult<()> {
		if self.max_nested_forwards == 0 {
			return Err(MvcError::Settings(
				"max_nested_forwards must be at least 1".to_string(),
			));
		}
		if self.listeners_to_detach.iter().any(|id| id.trim().is_empty()) {
			return Err(MvcError::Settings(
				"listeners_to_detach must not contain empty ids".to_string(),
			));
		}
		Ok(())
	}
}
