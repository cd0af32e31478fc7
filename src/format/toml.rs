use crate::document::{Document, Map, Value};
use crate::format::{Format, FormatError, finite_number};

/// TOML backend.
///
/// TOML has no null and only signed 64-bit integers: `null` values and
/// integers above `i64::MAX` are dropped by [`Format::normalize`] and skipped
/// on serialize, with a warning. A key set to `null` therefore disappears from
/// the file instead of being stored. Datetimes load as their canonical string
/// form.
#[derive(Debug, Clone, Copy, Default)]
pub struct TomlFormat;

impl TomlFormat {
	pub const EXTENSION: &'static str = ".toml";
}

impl Format for TomlFormat {
	fn parse_text(&self, text: &str) -> Result<Document, FormatError> {
		let table: ::toml::Table = ::toml::from_str(text)?;
		from_table(table)
	}

	fn serialize(&self, doc: &Document) -> Result<String, FormatError> {
		let Value::Object(map) = doc else {
			return Err("TOML documents require a table at the root".into());
		};
		let map = representable_map(map.clone());
		Ok(::toml::to_string(&to_table(&map))?)
	}

	fn extension(&self) -> &'static str {
		Self::EXTENSION
	}

	fn normalize(&self, doc: Document) -> Document {
		match doc {
			Value::Object(map) => Value::Object(representable_map(map)),
			other => other,
		}
	}
}

fn representable_map(map: Map<String, Value>) -> Map<String, Value> {
	map.into_iter()
		.filter_map(|(key, value)| representable(&key, value).map(|value| (key, value)))
		.collect()
}

fn representable(key: &str, value: Value) -> Option<Value> {
	match value {
		Value::Null => {
			tracing::warn!(key, "skipping null value, TOML cannot represent it");
			None
		}
		Value::Number(n) if n.as_i64().is_none() && n.is_u64() => {
			tracing::warn!(key, number = %n, "skipping integer outside the TOML range");
			None
		}
		Value::Array(items) => Some(Value::Array(
			items
				.into_iter()
				.filter_map(|item| representable(key, item))
				.collect(),
		)),
		Value::Object(map) => Some(Value::Object(representable_map(map))),
		other => Some(other),
	}
}

fn from_table(table: ::toml::Table) -> Result<Value, FormatError> {
	let mut map = Map::new();
	for (key, value) in table {
		map.insert(key, from_toml(value)?);
	}
	Ok(Value::Object(map))
}

fn from_toml(value: ::toml::Value) -> Result<Value, FormatError> {
	let converted = match value {
		::toml::Value::String(s) => Value::String(s),
		::toml::Value::Integer(i) => Value::from(i),
		::toml::Value::Float(f) => finite_number(f)?,
		::toml::Value::Boolean(b) => Value::Bool(b),
		::toml::Value::Datetime(dt) => Value::String(dt.to_string()),
		::toml::Value::Array(items) => Value::Array(
			items
				.into_iter()
				.map(from_toml)
				.collect::<Result<Vec<_>, _>>()?,
		),
		::toml::Value::Table(table) => from_table(table)?,
	};
	Ok(converted)
}

fn to_table(map: &Map<String, Value>) -> ::toml::Table {
	let mut table = ::toml::Table::new();
	for (key, value) in map {
		if let Some(converted) = to_toml(value) {
			table.insert(key.clone(), converted);
		}
	}
	table
}

/// Convert a value already passed through `representable`.
fn to_toml(value: &Value) -> Option<::toml::Value> {
	match value {
		Value::Null => None,
		Value::Bool(b) => Some(::toml::Value::Boolean(*b)),
		Value::Number(n) => match n.as_i64() {
			Some(i) => Some(::toml::Value::Integer(i)),
			None if n.is_u64() => None,
			None => n.as_f64().map(::toml::Value::Float),
		},
		Value::String(s) => Some(::toml::Value::String(s.clone())),
		Value::Array(items) => Some(::toml::Value::Array(
			items.iter().filter_map(to_toml).collect(),
		)),
		Value::Object(map) => Some(::toml::Value::Table(to_table(map))),
	}
}
