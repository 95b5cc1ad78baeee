//! Error types for the injection-point runtime

use std::path::PathBuf;

/// Result alias used by the synthetic metadata API.
pub type DiResult<T> = Result<T, DiError>;

/// Errors raised by the injection-point runtime itself.
///
/// Failures of delegate providers never appear here: they are returned to the
/// caller with their original type and value.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DiError {
	/// An operation of the richer reflective surface that the synthetic
	/// metadata deliberately does not implement.
	#[error(
		"Unsupported capability: `{operation}` is not available on synthetic {element}.\nUse the registry's build-time metadata instead."
	)]
	UnsupportedCapability {
		/// Name of the rejected operation
		operation: &'static str,
		/// Description of the view the operation was invoked on
		element: String,
	},

	/// No injection point is being resolved on the current execution context
	#[error("No injection point is currently being resolved")]
	NoActiveInjectionPoint,
}

impl DiError {
	pub(crate) fn unsupported(operation: &'static str, element: impl Into<String>) -> Self {
		Self::UnsupportedCapability {
			operation,
			element: element.into(),
		}
	}

	/// Returns `true` for [`DiError::UnsupportedCapability`].
	pub fn is_unsupported(&self) -> bool {
		matches!(self, Self::UnsupportedCapability { .. })
	}
}

/// Errors raised while loading [`ContextSettings`](crate::settings::ContextSettings).
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
	#[error("IO error reading {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("TOML error: {0}")]
	Toml(#[from] toml::de::Error),

	#[error("Invalid value for `{key}`: {value:?}")]
	InvalidValue { key: String, value: String },
}
