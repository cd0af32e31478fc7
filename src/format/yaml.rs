use crate::document::{Document, Map, Value};
use crate::format::{Format, FormatError, finite_number};

/// YAML backend.
///
/// Non-string mapping keys (numbers, booleans, null) are converted to their
/// string form; tags are dropped in favour of the tagged value.
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlFormat;

impl YamlFormat {
	pub const EXTENSION: &'static str = ".yaml";
}

impl Format for YamlFormat {
	fn parse_text(&self, text: &str) -> Result<Document, FormatError> {
		if is_comment_only(text) {
			return Ok(Value::Null);
		}
		let value: serde_yaml::Value = serde_yaml::from_str(text)?;
		from_yaml(value)
	}

	fn serialize(&self, doc: &Document) -> Result<String, FormatError> {
		Ok(serde_yaml::to_string(doc)?)
	}

	fn extension(&self) -> &'static str {
		Self::EXTENSION
	}
}

fn is_comment_only(text: &str) -> bool {
	text.lines().all(|line| {
		let line = line.trim();
		line.is_empty() || line.starts_with('#')
	})
}

fn from_yaml(value: serde_yaml::Value) -> Result<Value, FormatError> {
	let converted = match value {
		serde_yaml::Value::Null => Value::Null,
		serde_yaml::Value::Bool(b) => Value::Bool(b),
		serde_yaml::Value::Number(n) => {
			if let Some(i) = n.as_i64() {
				Value::from(i)
			} else if let Some(u) = n.as_u64() {
				Value::from(u)
			} else {
				finite_number(n.as_f64().unwrap_or(f64::NAN))?
			}
		}
		serde_yaml::Value::String(s) => Value::String(s),
		serde_yaml::Value::Sequence(items) => Value::Array(
			items
				.into_iter()
				.map(from_yaml)
				.collect::<Result<Vec<_>, _>>()?,
		),
		serde_yaml::Value::Mapping(mapping) => {
			let mut map = Map::new();
			for (key, value) in mapping {
				map.insert(key_to_string(key)?, from_yaml(value)?);
			}
			Value::Object(map)
		}
		serde_yaml::Value::Tagged(tagged) => from_yaml(tagged.value)?,
	};
	Ok(converted)
}

fn key_to_string(key: serde_yaml::Value) -> Result<String, FormatError> {
	match key {
		serde_yaml::Value::String(s) => Ok(s),
		serde_yaml::Value::Bool(b) => Ok(b.to_string()),
		serde_yaml::Value::Number(n) => Ok(n.to_string()),
		serde_yaml::Value::Null => Ok("null".to_string()),
		serde_yaml::Value::Tagged(tagged) => key_to_string(tagged.value),
		serde_yaml::Value::Sequence(_) | serde_yaml::Value::Mapping(_) => {
			Err("complex mapping keys are not supported".into())
		}
	}
}
