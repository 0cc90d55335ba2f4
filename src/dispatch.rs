//! Dispatch module.
//!
//! This module provides controller resolution and the forward plugin.
//!
//! # Examples
//!
//! ```rust
//! use reinhardt_mvc::dispatch::{ForwardSettings, INJECT_TEMPLATE_LISTENER};
//!
//! let settings = ForwardSettings::from_toml_str("max_nested_forwards = 3").unwrap();
//! assert_eq!(settings.max_nested_forwards, 3);
//! assert_eq!(settings.listeners_to_detach, vec![INJECT_TEMPLATE_LISTENER.to_string()]);
//! ```

pub use reinhardt_dispatch::*;
