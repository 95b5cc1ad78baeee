//! Runtime settings for injection-point propagation
//!
//! Settings are layered: built-in defaults, then an optional TOML document, then
//! environment variables.
//!
//! ```toml
//! nesting_warning_threshold = 32
//! log_delegate_failures = true
//! trace_context_switches = false
//! ```
//!
//! With prefix `TESSERA_DI_`, the matching environment variables are
//! `TESSERA_DI_NESTING_WARNING_THRESHOLD`, `TESSERA_DI_LOG_DELEGATE_FAILURES` and
//! `TESSERA_DI_TRACE_CONTEXT_SWITCHES`.

use crate::error::SettingsError;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// Default environment variable prefix.
pub const ENV_PREFIX: &str = "TESSERA_DI_";

pub const DEFAULT_NESTING_WARNING_THRESHOLD: usize = 64;

static DEFAULT_SETTINGS: Lazy<Arc<ContextSettings>> =
	Lazy::new(|| Arc::new(ContextSettings::default()));

/// Diagnostics knobs for context-scoped providers.
///
/// None of these settings change resolution results; they only control what
/// is logged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContextSettings {
	/// Nesting depth above which a warning is logged for each provider call
	pub nesting_warning_threshold: usize,
	/// Log delegate failures at debug level before returning them
	pub log_delegate_failures: bool,
	/// Log every install and restore at trace level
	pub trace_context_switches: bool,
}

impl Default for ContextSettings {
	fn default() -> Self {
		Self {
			nesting_warning_threshold: DEFAULT_NESTING_WARNING_THRESHOLD,
			log_delegate_failures: true,
			trace_context_switches: false,
		}
	}
}

impl ContextSettings {
	/// Process-wide default instance, shared by providers built without explicit settings.
	pub fn shared_default() -> Arc<ContextSettings> {
		Arc::clone(&DEFAULT_SETTINGS)
	}

	/// Parses settings from a TOML document. Missing keys keep their defaults.
	///
	/// # Examples
	///
	/// ```
	/// use tessera_di::ContextSettings;
	///
	/// let settings = ContextSettings::from_toml_str("nesting_warning_threshold = 8").unwrap();
	/// assert_eq!(settings.nesting_warning_threshold, 8);
	/// assert!(settings.log_delegate_failures);
	/// ```
	pub fn from_toml_str(source: &str) -> Result<Self, SettingsError> {
		Ok(toml::from_str(source)?)
	}

	pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
		let path = path.as_ref();
		let source = fs::read_to_string(path).map_err(|source| SettingsError::Io {
			path: path.to_path_buf(),
			source,
		})?;
		Self::from_toml_str(&source)
	}

	/// Applies overrides from the process environment.
	pub fn with_env_overrides(self, prefix: &str) -> Result<Self, SettingsError> {
		self.with_overrides_from(prefix, std::env::vars())
	}

	/// Applies overrides from `(name, value)` pairs. Names without `prefix`, and
	/// names that match no setting, are ignored.
	pub fn with_overrides_from<I, K, V>(
		mut self,
		prefix: &str,
		vars: I,
	) -> Result<Self, SettingsError>
	where
		I: IntoIterator<Item = (K, V)>,
		K: AsRef<str>,
		V: AsRef<str>,
	{
		for (key, value) in vars {
			let Some(name) = key.as_ref().strip_prefix(prefix) else {
				continue;
			};
			let value = value.as_ref();
			match name.to_lowercase().as_str() {
				"nesting_warning_threshold" => {
					self.nesting_warning_threshold =
						value.trim().parse().map_err(|_| invalid(key.as_ref(), value))?;
				}
				"log_delegate_failures" => {
					self.log_delegate_failures =
						parse_bool(value).ok_or_else(|| invalid(key.as_ref(), value))?;
				}
				"trace_context_switches" => {
					self.trace_context_switches =
						parse_bool(value).ok_or_else(|| invalid(key.as_ref(), value))?;
				}
				_ => {}
			}
		}
		Ok(self)
	}
}

fn invalid(key: &str, value: &str) -> SettingsError {
	SettingsError::InvalidValue {
		key: key.to_string(),
		value: value.to_string(),
	}
}

fn parse_bool(value: &str) -> Option<bool> {
	match value.trim().to_lowercase().as_str() {
		"true" | "1" | "yes" | "on" => Some(true),
		"false" | "0" | "no" | "off" => Some(false),
		_ => None,
	}
}
