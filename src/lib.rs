//! cfgfile - load, save and incrementally update configuration files.
//!
//! This library provides:
//! - JSON, YAML and TOML backends behind one `Format` trait
//! - A missing or empty file loading as an empty mapping
//! - Placeholder resolution before parsing
//! - Right-biased deep merge updates that skip the write when nothing changes
//! - An async wrapper running on tokio's blocking pool
//!
//! # Example
//!
//! ```no_run
//! use cfgfile::{FileConfig, format::YamlFormat};
//! use serde_json::json;
//! use std::path::Path;
//!
//! let config = FileConfig::new(YamlFormat);
//! let path = Path::new("settings.yaml");
//!
//! let merged = config.update(path, &json!({"window": {"width": 800}})).unwrap();
//! println!("width is now {}", merged["window"]["width"]);
//! ```

pub mod accessor;
pub mod async_config;
pub mod document;
pub mod error;
pub mod format;
pub mod fs;
pub mod locale;
pub mod preprocess;

pub use accessor::FileConfig;
pub use async_config::AsyncFileConfig;
pub use document::Document;
pub use error::{ConfigError, Result};
pub use format::{Format, FormatKind};
