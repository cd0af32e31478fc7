//! Serialization backends.
//!
//! This module handles:
//! - The `Format` capability every backend implements
//! - JSON, YAML and TOML backends
//! - Routing a file path to a backend by extension

pub mod json;
pub mod toml;
pub mod yaml;

pub use self::json::JsonFormat;
pub use self::toml::TomlFormat;
pub use self::yaml::YamlFormat;

use crate::document::{Document, Value, empty_document};
use std::path::Path;

/// Opaque diagnostic from a format library.
pub type FormatError = Box<dyn std::error::Error + Send + Sync>;

/// Converts raw text to and from a [`Document`] for one serialization format.
pub trait Format {
	/// Parse non-empty text. Implementations report invalid input as an error.
	fn parse_text(&self, text: &str) -> Result<Document, FormatError>;

	/// Serialize a document. Values the format cannot represent are skipped.
	fn serialize(&self, doc: &Document) -> Result<String, FormatError>;

	/// File extension tag, including the leading dot.
	fn extension(&self) -> &'static str;

	/// Drop the values `serialize` would skip, so the result matches what a reload returns.
	fn normalize(&self, doc: Document) -> Document {
		doc
	}

	/// Parse text, treating empty or comment-only input as an empty mapping.
	fn parse(&self, text: &str) -> Result<Document, FormatError> {
		if text.trim().is_empty() {
			return Ok(empty_document());
		}

		match self.parse_text(text)? {
			Value::Null => Ok(empty_document()),
			doc => Ok(doc),
		}
	}
}

impl<F: Format + ?Sized> Format for Box<F> {
	fn parse_text(&self, text: &str) -> Result<Document, FormatError> {
		(**self).parse_text(text)
	}

	fn serialize(&self, doc: &Document) -> Result<String, FormatError> {
		(**self).serialize(doc)
	}

	fn extension(&self) -> &'static str {
		(**self).extension()
	}

	fn normalize(&self, doc: Document) -> Document {
		(**self).normalize(doc)
	}
}

/// The built-in backends, selectable at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatKind {
	Json,
	Yaml,
	Toml,
}

impl FormatKind {
	/// Look up the backend for a file extension (with or without the leading dot).
	pub fn from_extension(extension: &str) -> Option<Self> {
		let extension = extension.trim_start_matches('.').to_ascii_lowercase();
		match extension.as_str() {
			"json" => Some(FormatKind::Json),
			"yaml" | "yml" => Some(FormatKind::Yaml),
			"toml" => Some(FormatKind::Toml),
			_ => None,
		}
	}

	/// Look up the backend for a path by its extension.
	pub fn from_path(path: &Path) -> Option<Self> {
		path.extension()
			.and_then(|ext| ext.to_str())
			.and_then(Self::from_extension)
	}
}

impl Format for FormatKind {
	fn parse_text(&self, text: &str) -> Result<Document, FormatError> {
		match self {
			FormatKind::Json => JsonFormat::default().parse_text(text),
			FormatKind::Yaml => YamlFormat.parse_text(text),
			FormatKind::Toml => TomlFormat.parse_text(text),
		}
	}

	fn serialize(&self, doc: &Document) -> Result<String, FormatError> {
		match self {
			FormatKind::Json => JsonFormat::default().serialize(doc),
			FormatKind::Yaml => YamlFormat.serialize(doc),
			FormatKind::Toml => TomlFormat.serialize(doc),
		}
	}

	fn extension(&self) -> &'static str {
		match self {
			FormatKind::Json => JsonFormat::EXTENSION,
			FormatKind::Yaml => YamlFormat::EXTENSION,
			FormatKind::Toml => TomlFormat::EXTENSION,
		}
	}

	fn normalize(&self, doc: Document) -> Document {
		match self {
			FormatKind::Toml => TomlFormat.normalize(doc),
			_ => doc,
		}
	}
}

/// Build a float number, rejecting NaN and infinities which a document cannot hold.
pub(crate) fn finite_number(value: f64) -> Result<Value, FormatError> {
	serde_json::Number::from_f64(value)
		.map(Value::Number)
		.ok_or_else(|| format!("non-finite float {value} is not supported").into())
}
