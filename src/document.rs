//! The in-memory document model and the merge rule used by `update`.
//!
//! A document is a `serde_json::Value`; `Map` keeps insertion order for
//! round-trip fidelity, but equality between maps ignores it.

use crate::error::{ConfigError, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
pub use serde_json::{Map, Value};

/// The tree representation of a configuration file's content.
pub type Document = Value;

/// Create an empty mapping document (`{}`).
pub fn empty_document() -> Document {
	Value::Object(Map::new())
}

/// Whether the document has a mapping at its root.
pub fn is_mapping(doc: &Document) -> bool {
	doc.is_object()
}

/// Merge `partial` over `base`, with `partial` taking precedence.
///
/// - When both sides hold a mapping at the same key, they are merged recursively
/// - Otherwise the partial value replaces the base value entirely
///   (sequences and scalars are never deep-merged)
/// - Keys only present in `base` are kept, keys only present in `partial` are added
///
/// # Example
/// ```
/// use serde_json::json;
/// use cfgfile::document::merge;
///
/// let base = json!({"a": 1, "b": {"x": 1, "y": 2}});
/// let partial = json!({"b": {"y": 99, "z": 3}, "c": 4});
/// assert_eq!(
///     merge(base, partial),
///     json!({"a": 1, "b": {"x": 1, "y": 99, "z": 3}, "c": 4})
/// );
/// ```
pub fn merge(base: Document, partial: Document) -> Document {
	match (base, partial) {
		(Value::Object(mut base_map), Value::Object(partial_map)) => {
			for (key, partial_value) in partial_map {
				let merged = match base_map.remove(&key) {
					Some(base_value) => merge(base_value, partial_value),
					None => partial_value,
				};
				base_map.insert(key, merged);
			}
			Value::Object(base_map)
		}
		(_, partial) => partial,
	}
}

/// Compare two documents the way a reader of the file would.
///
/// Same as `==`, except that numbers compare by value: `1` and `1.0` are equal.
pub fn same_content(a: &Document, b: &Document) -> bool {
	match (a, b) {
		(Value::Number(x), Value::Number(y)) if x.is_f64() || y.is_f64() => x.as_f64() == y.as_f64(),
		(Value::Array(xs), Value::Array(ys)) => {
			xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| same_content(x, y))
		}
		(Value::Object(xm), Value::Object(ym)) => {
			xm.len() == ym.len()
				&& xm
					.iter()
					.all(|(key, x)| ym.get(key).is_some_and(|y| same_content(x, y)))
		}
		_ => a == b,
	}
}

/// Serialize a typed value into a document, e.g. to build a partial configuration.
pub fn to_document<T: Serialize>(value: &T) -> Result<Document> {
	serde_json::to_value(value).map_err(|source| ConfigError::Convert { source })
}

/// Re-hydrate a typed value from a loaded document.
///
/// Richer scalar types (dates, paths) come back from every backend as strings;
/// their `Deserialize` impls restore them here.
pub fn from_document<T: DeserializeOwned>(doc: Document) -> Result<T> {
	serde_json::from_value(doc).map_err(|source| ConfigError::Convert { source })
}
