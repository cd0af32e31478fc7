//! File access used by the accessors.

use crate::error::{ConfigError, Result};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Read a file as text, reporting absence as [`ConfigError::FileNotFound`].
///
/// Content that is not valid UTF-8 is malformed and surfaces as [`ConfigError::Parse`].
pub fn read_text(path: &Path) -> Result<String> {
	let bytes = std::fs::read(path).map_err(|source| {
		if source.kind() == ErrorKind::NotFound {
			ConfigError::FileNotFound {
				path: path.to_path_buf(),
			}
		} else {
			ConfigError::Io {
				path: path.to_path_buf(),
				source,
			}
		}
	})?;

	String::from_utf8(bytes).map_err(|e| ConfigError::Parse {
		path: path.to_path_buf(),
		source: Box::new(e),
	})
}

/// Write `text` to a uniquely named temporary file, then rename it over `path`.
///
/// A symlinked target is written through: the file it points at is replaced and
/// the link is kept. An existing file keeps its permissions. The parent directory
/// must already exist. On failure the target is left as it was.
pub fn write_text(path: &Path, text: &str) -> Result<()> {
	let io_error = |source| ConfigError::Io {
		path: path.to_path_buf(),
		source,
	};

	let target = resolve_target(path).map_err(io_error)?;
	let dir = match target.parent() {
		Some(parent) if !parent.as_os_str().is_empty() => parent,
		_ => Path::new("."),
	};

	let mut temp = NamedTempFile::new_in(dir).map_err(io_error)?;
	temp.write_all(text.as_bytes()).map_err(io_error)?;

	match std::fs::metadata(&target) {
		Ok(metadata) => temp
			.as_file()
			.set_permissions(metadata.permissions())
			.map_err(io_error)?,
		Err(e) if e.kind() == ErrorKind::NotFound => {}
		Err(e) => return Err(io_error(e)),
	}

	// the temp file is removed when `persist` fails
	temp.persist(&target).map_err(|e| io_error(e.error))?;
	Ok(())
}

/// Follow symlinks to the file that should be replaced. A missing file is its own target.
fn resolve_target(path: &Path) -> std::io::Result<PathBuf> {
	match std::fs::canonicalize(path) {
		Ok(target) => Ok(target),
		Err(e) if e.kind() == ErrorKind::NotFound => Ok(path.to_path_buf()),
		Err(e) => Err(e),
	}
}
