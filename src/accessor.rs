//! Load, save and update configuration files through a [`Format`] backend.

use crate::document::{Document, Value, empty_document, is_mapping, merge, same_content};
use crate::error::{ConfigError, Result};
use crate::format::Format;
use crate::fs::{read_text, write_text};
use crate::preprocess::{identity, resolve_placeholders};
use std::path::Path;

/// Reads and writes configuration files in one format.
///
/// Holds no document state: every call reads the file afresh.
#[derive(Debug, Clone, Default)]
pub struct FileConfig<F> {
	format: F,
}

impl<F: Format> FileConfig<F> {
	pub fn new(format: F) -> Self {
		Self { format }
	}

	/// The backend in use.
	pub fn format(&self) -> &F {
		&self.format
	}

	/// Extension tag of the backend, e.g. `.json`.
	pub fn extension(&self) -> &'static str {
		self.format.extension()
	}

	/// Load a document. A missing or empty file loads as `{}`.
	pub fn load(&self, path: &Path) -> Result<Document> {
		self.load_with_preprocess(path, identity)
	}

	/// Load a document, passing the trimmed file content through `preprocess` before parsing.
	pub fn load_with_preprocess<P>(&self, path: &Path, preprocess: P) -> Result<Document>
	where
		P: Fn(&str) -> String,
	{
		let text = match read_text(path) {
			Ok(text) => text,
			Err(ConfigError::FileNotFound { .. }) => {
				tracing::debug!(path = %path.display(), "config file not found, using empty document");
				return Ok(empty_document());
			}
			Err(e) => return Err(e),
		};

		let text = text.trim();
		if text.is_empty() {
			tracing::debug!(path = %path.display(), "config file is empty, using empty document");
			return Ok(empty_document());
		}

		let text = preprocess(text);
		self.format
			.parse(&text)
			.map_err(|source| ConfigError::Parse {
				path: path.to_path_buf(),
				source,
			})
	}

	/// Load a document, resolving `${dotted.path}` placeholders against `context`.
	///
	/// Placeholders without a scalar referent are left as literal text.
	pub fn load_with_resolve_placeholder(&self, path: &Path, context: &Value) -> Result<Document> {
		self.load_with_preprocess(path, |text| resolve_placeholders(text, context))
	}

	/// Serialize `doc` and write it to `path`. The parent directory must exist.
	pub fn save(&self, path: &Path, doc: &Document) -> Result<()> {
		let text = self
			.format
			.serialize(doc)
			.map_err(|source| ConfigError::Serialize {
				path: path.to_path_buf(),
				source,
			})?;
		write_text(path, &text)?;
		tracing::debug!(path = %path.display(), bytes = text.len(), "config file written");
		Ok(())
	}

	/// Merge `partial` into the file at `path` and return the resulting document.
	///
	/// Nothing is written when the merge would not change the file's content.
	pub fn update(&self, path: &Path, partial: &Document) -> Result<Document> {
		if !is_mapping(partial) {
			return Err(ConfigError::invalid_argument(
				"partial configuration must be a mapping",
			));
		}

		let current = self.load(path)?;
		if !is_mapping(&current) {
			return Err(ConfigError::invalid_argument(format!(
				"cannot update {}: document root is not a mapping",
				path.display()
			)));
		}

		if same_content(partial, &current) {
			tracing::debug!(path = %path.display(), "partial equals current config, skipping write");
			return Ok(current);
		}

		// what a reload would return, so values the backend drops never force a write
		let merged = self.format.normalize(merge(current.clone(), partial.clone()));
		if same_content(&merged, &current) {
			tracing::debug!(path = %path.display(), "merge produced no changes, skipping write");
			return Ok(current);
		}

		self.save(path, &merged)?;
		Ok(merged)
	}

	/// Update the file at `path` with the content of `reference_path`.
	///
	/// A missing reference file counts as an empty partial configuration.
	pub fn update_by_file(&self, path: &Path, reference_path: &Path) -> Result<Document> {
		let reference = self.load(reference_path)?;
		self.update(path, &reference)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::format::{FormatKind, JsonFormat, TomlFormat, YamlFormat};
	use serde_json::json;

	#[test]
	fn test_accessors_report_backend() {
		let config = FileConfig::new(FormatKind::Toml);
		assert_eq!(config.format(), &FormatKind::Toml);
		assert_eq!(config.extension(), ".toml");
	}

	#[test]
	fn test_load_missing_is_empty() {
		let dir = tempfile::tempdir().unwrap();
		let config = FileConfig::new(JsonFormat::default());
		let doc = config.load(&dir.path().join("missing.json")).unwrap();
		assert_eq!(doc, json!({}));
	}

	#[test]
	fn test_empty_file_skips_preprocess() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("empty.yaml");
		std::fs::write(&path, "   \n\n").unwrap();

		let config = FileConfig::new(YamlFormat);
		let doc = config
			.load_with_preprocess(&path, |_| panic!("preprocess must not run"))
			.unwrap();
		assert_eq!(doc, json!({}));
	}

	#[test]
	fn test_preprocess_sees_trimmed_text() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("c.json");
		std::fs::write(&path, "\n  {\"a\": 1}  \n").unwrap();

		let config = FileConfig::new(JsonFormat::default());
		let doc = config
			.load_with_preprocess(&path, |text| {
				assert_eq!(text, "{\"a\": 1}");
				text.replace('1', "2")
			})
			.unwrap();
		assert_eq!(doc, json!({"a": 2}));
	}

	#[test]
	fn test_parse_error_carries_path() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("bad.toml");
		std::fs::write(&path, "a = = 1").unwrap();

		let config = FileConfig::new(TomlFormat);
		match config.load(&path) {
			Err(ConfigError::Parse { path: p, source }) => {
				assert_eq!(p, path);
				assert!(!source.to_string().is_empty());
			}
			other => panic!("Expected Parse error, got {other:?}"),
		}
	}

	#[test]
	fn test_update_creates_missing_file() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("new.json");

		let config = FileConfig::new(JsonFormat::default());
		let merged = config.update(&path, &json!({"a": 1})).unwrap();
		assert_eq!(merged, json!({"a": 1}));
		assert_eq!(config.load(&path).unwrap(), json!({"a": 1}));
	}

	#[test]
	fn test_update_with_empty_partial_on_missing_file_writes_nothing() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("new.json");

		let config = FileConfig::new(JsonFormat::default());
		assert_eq!(config.update(&path, &json!({})).unwrap(), json!({}));
		assert!(!path.exists());
	}

	#[test]
	fn test_update_rejects_non_mapping_partial() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("c.json");

		let config = FileConfig::new(JsonFormat::default());
		for partial in [json!([1, 2, 3]), json!("text"), json!(7), json!(null)] {
			let result = config.update(&path, &partial);
			assert!(matches!(result, Err(ConfigError::InvalidArgument { .. })));
		}
		assert!(!path.exists());
	}

	#[test]
	fn test_update_rejects_sequence_root_target() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("list.json");
		std::fs::write(&path, "[1, 2]").unwrap();

		let config = FileConfig::new(JsonFormat::default());
		let result = config.update(&path, &json!({"a": 1}));
		assert!(matches!(result, Err(ConfigError::InvalidArgument { .. })));
		assert_eq!(std::fs::read_to_string(&path).unwrap(), "[1, 2]");
	}

	#[test]
	fn test_update_propagates_parse_error() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("bad.json");
		std::fs::write(&path, "{oops").unwrap();

		let config = FileConfig::new(JsonFormat::default());
		let result = config.update(&path, &json!({"a": 1}));
		assert!(matches!(result, Err(ConfigError::Parse { .. })));
		assert_eq!(std::fs::read_to_string(&path).unwrap(), "{oops");
	}

	#[test]
	fn test_update_subset_partial_is_noop() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("c.json");
		std::fs::write(&path, r#"{"a": 1, "b": {"c": 2}}"#).unwrap();

		let config = FileConfig::new(JsonFormat::default());
		let merged = config.update(&path, &json!({"b": {"c": 2}})).unwrap();
		assert_eq!(merged, json!({"a": 1, "b": {"c": 2}}));
		// untouched: a write would have compacted the whitespace
		assert_eq!(
			std::fs::read_to_string(&path).unwrap(),
			r#"{"a": 1, "b": {"c": 2}}"#
		);
	}

	#[test]
	fn test_update_integer_over_equal_float_is_noop() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("c.yaml");
		std::fs::write(&path, "a: 1.0\nb:\n  c: 2.0\n").unwrap();

		let config = FileConfig::new(YamlFormat);
		let merged = config.update(&path, &json!({"a": 1})).unwrap();
		assert_eq!(merged, json!({"a": 1.0, "b": {"c": 2.0}}));
		let merged = config.update(&path, &json!({"b": {"c": 2}})).unwrap();
		assert_eq!(merged, json!({"a": 1.0, "b": {"c": 2.0}}));
		assert_eq!(
			std::fs::read_to_string(&path).unwrap(),
			"a: 1.0\nb:\n  c: 2.0\n"
		);
	}

	#[test]
	fn test_update_toml_with_null_is_noop() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("c.toml");
		std::fs::write(&path, "a = 1\n").unwrap();

		let config = FileConfig::new(TomlFormat);
		let merged = config.update(&path, &json!({"b": null})).unwrap();
		assert_eq!(merged, json!({"a": 1}));
		assert_eq!(std::fs::read_to_string(&path).unwrap(), "a = 1\n");
	}

	#[test]
	fn test_update_toml_returns_what_reload_returns() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("c.toml");
		std::fs::write(&path, "a = 1\n").unwrap();

		let config = FileConfig::new(TomlFormat);
		let merged = config
			.update(&path, &json!({"a": null, "b": {"c": 2, "d": null}}))
			.unwrap();
		assert_eq!(merged, json!({"b": {"c": 2}}));
		assert_eq!(config.load(&path).unwrap(), merged);
	}

	#[test]
	fn test_load_invalid_utf8_is_parse_error() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("c.json");
		std::fs::write(&path, [0xff, 0xfe, b'{']).unwrap();

		let config = FileConfig::new(JsonFormat::default());
		assert!(matches!(config.load(&path), Err(ConfigError::Parse { .. })));
		let result = config.update(&path, &json!({"a": 1}));
		assert!(matches!(result, Err(ConfigError::Parse { .. })));
	}

	#[cfg(unix)]
	#[test]
	fn test_update_through_symlink_keeps_link_and_mode() {
		use std::os::unix::fs::PermissionsExt;

		let dir = tempfile::tempdir().unwrap();
		let real = dir.path().join("real.json");
		let link = dir.path().join("link.json");
		std::fs::write(&real, r#"{"a":1}"#).unwrap();
		std::fs::set_permissions(&real, std::fs::Permissions::from_mode(0o600)).unwrap();
		std::os::unix::fs::symlink(&real, &link).unwrap();

		let config = FileConfig::new(JsonFormat::default());
		config.update(&link, &json!({"a": 2})).unwrap();

		assert!(link.symlink_metadata().unwrap().file_type().is_symlink());
		assert_eq!(config.load(&real).unwrap(), json!({"a": 2}));
		let mode = std::fs::metadata(&real).unwrap().permissions().mode();
		assert_eq!(mode & 0o777, 0o600);
	}

	#[test]
	fn test_update_by_missing_reference_is_noop() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("c.yaml");
		std::fs::write(&path, "a: 1\n").unwrap();

		let config = FileConfig::new(YamlFormat);
		let merged = config
			.update_by_file(&path, &dir.path().join("missing.yaml"))
			.unwrap();
		assert_eq!(merged, json!({"a": 1}));
		assert_eq!(std::fs::read_to_string(&path).unwrap(), "a: 1\n");
	}

	#[test]
	fn test_save_missing_directory_is_io_error() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("missing").join("c.json");

		let config = FileConfig::new(JsonFormat::default());
		let result = config.save(&path, &json!({"a": 1}));
		assert!(matches!(result, Err(ConfigError::Io { .. })));
	}

	#[test]
	fn test_save_toml_sequence_root_is_serialize_error() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("c.toml");

		let config = FileConfig::new(TomlFormat);
		let result = config.save(&path, &json!([1, 2]));
		assert!(matches!(result, Err(ConfigError::Serialize { .. })));
		assert!(!path.exists());
	}

	#[test]
	fn test_save_sequence_root_json() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("list.json");

		let config = FileConfig::new(JsonFormat::default());
		config.save(&path, &json!([1, 2, 3])).unwrap();
		assert_eq!(config.load(&path).unwrap(), json!([1, 2, 3]));
	}
}
