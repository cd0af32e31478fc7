//! Async wrapper around [`FileConfig`].
//!
//! Each call runs the blocking operation on tokio's blocking pool and
//! resolves with exactly what the sync call returned.

use crate::accessor::FileConfig;
use crate::document::{Document, Value};
use crate::error::{ConfigError, Result};
use crate::format::Format;
use std::path::PathBuf;
use std::sync::Arc;

/// Future-returning counterpart of [`FileConfig`]. Cheap to clone.
#[derive(Debug)]
pub struct AsyncFileConfig<F> {
	inner: Arc<FileConfig<F>>,
}

impl<F> Clone for AsyncFileConfig<F> {
	fn clone(&self) -> Self {
		Self {
			inner: Arc::clone(&self.inner),
		}
	}
}

impl<F> From<FileConfig<F>> for AsyncFileConfig<F> {
	fn from(config: FileConfig<F>) -> Self {
		Self {
			inner: Arc::new(config),
		}
	}
}

impl<F> AsyncFileConfig<F>
where
	F: Format + Send + Sync + 'static,
{
	pub fn new(format: F) -> Self {
		FileConfig::new(format).into()
	}

	/// The wrapped sync accessor.
	pub fn blocking(&self) -> &FileConfig<F> {
		&self.inner
	}

	pub async fn load(&self, path: impl Into<PathBuf>) -> Result<Document> {
		let path = path.into();
		self.run(path.clone(), move |config| config.load(&path)).await
	}

	pub async fn load_with_preprocess<P>(
		&self,
		path: impl Into<PathBuf>,
		preprocess: P,
	) -> Result<Document>
	where
		P: Fn(&str) -> String + Send + 'static,
	{
		let path = path.into();
		self.run(path.clone(), move |config| {
			config.load_with_preprocess(&path, preprocess)
		})
		.await
	}

	pub async fn load_with_resolve_placeholder(
		&self,
		path: impl Into<PathBuf>,
		context: Value,
	) -> Result<Document> {
		let path = path.into();
		self.run(path.clone(), move |config| {
			config.load_with_resolve_placeholder(&path, &context)
		})
		.await
	}

	pub async fn save(&self, path: impl Into<PathBuf>, doc: Document) -> Result<()> {
		let path = path.into();
		self.run(path.clone(), move |config| config.save(&path, &doc))
			.await
	}

	pub async fn update(&self, path: impl Into<PathBuf>, partial: Document) -> Result<Document> {
		let path = path.into();
		self.run(path.clone(), move |config| config.update(&path, &partial))
			.await
	}

	pub async fn update_by_file(
		&self,
		path: impl Into<PathBuf>,
		reference_path: impl Into<PathBuf>,
	) -> Result<Document> {
		let path = path.into();
		let reference_path = reference_path.into();
		self.run(path.clone(), move |config| {
			config.update_by_file(&path, &reference_path)
		})
		.await
	}

	async fn run<T, Op>(&self, path: PathBuf, op: Op) -> Result<T>
	where
		T: Send + 'static,
		Op: FnOnce(&FileConfig<F>) -> Result<T> + Send + 'static,
	{
		let config = Arc::clone(&self.inner);
		match tokio::task::spawn_blocking(move || op(config.as_ref())).await {
			Ok(result) => result,
			Err(join_error) if join_error.is_panic() => {
				std::panic::resume_unwind(join_error.into_panic())
			}
			// only reachable when the runtime is shutting down
			Err(join_error) => Err(ConfigError::Io {
				path,
				source: std::io::Error::other(join_error),
			}),
		}
	}
}
