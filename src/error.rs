use crate::format::FormatError;
use std::path::PathBuf;

/// Library-level structured errors for cfgfile.
///
/// Use `thiserror` for structured errors that library consumers can match on.
/// The CLI binary wraps these with `anyhow` for rich context chains.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	/// Only produced by the file-access layer; `load` turns it into an empty document.
	#[error("Config file not found: {path}")]
	FileNotFound { path: PathBuf },

	#[error("I/O error on config file: {path}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to parse config file: {path}")]
	Parse {
		path: PathBuf,
		#[source]
		source: FormatError,
	},

	#[error("Failed to serialize config for: {path}")]
	Serialize {
		path: PathBuf,
		#[source]
		source: FormatError,
	},

	#[error("Invalid argument: {message}")]
	InvalidArgument { message: String },

	#[error("Failed to convert between document and typed value")]
	Convert {
		#[source]
		source: serde_json::Error,
	},
}

impl ConfigError {
	pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
		ConfigError::InvalidArgument {
			message: message.into(),
		}
	}
}

/// Result type alias using ConfigError.
pub type Result<T> = std::result::Result<T, ConfigError>;
