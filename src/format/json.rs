use crate::document::Document;
use crate::format::{Format, FormatError};

/// JSON backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormat {
	pretty: bool,
}

impl JsonFormat {
	pub const EXTENSION: &'static str = ".json";

	/// Single-line output, the default.
	pub fn compact() -> Self {
		Self { pretty: false }
	}

	/// Indented, multi-line output.
	pub fn pretty() -> Self {
		Self { pretty: true }
	}
}

impl Format for JsonFormat {
	fn parse_text(&self, text: &str) -> Result<Document, FormatError> {
		Ok(serde_json::from_str(text)?)
	}

	fn serialize(&self, doc: &Document) -> Result<String, FormatError> {
		let text = if self.pretty {
			serde_json::to_string_pretty(doc)?
		} else {
			serde_json::to_string(doc)?
		};
		Ok(text)
	}

	fn extension(&self) -> &'static str {
		Self::EXTENSION
	}
}
