//! Text transforms applied to raw file content before parsing.
//!
//! A preprocessing hook is any `Fn(&str) -> String`. The one shipped here
//! resolves `${dotted.path}` placeholders against a context document.

use crate::document::Value;
use regex::{Captures, Regex};
use std::sync::LazyLock;

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"\$\{\s*([^{}\s]+)\s*\}").expect("placeholder pattern is a valid regex")
});

/// The identity hook, used by a plain `load`.
pub fn identity(text: &str) -> String {
	text.to_string()
}

/// Replace every `${path}` in `text` with the value found at `path` in `context`.
///
/// Paths are dot-separated; a numeric segment indexes into a sequence.
/// Strings are inserted verbatim and numbers/booleans in their textual form.
/// Placeholders that do not resolve to a scalar stay in the text untouched.
///
/// # Example
/// ```
/// use serde_json::json;
/// use cfgfile::preprocess::resolve_placeholders;
///
/// let context = json!({"locale": {"title": "Title"}});
/// assert_eq!(
///     resolve_placeholders("name: ${locale.title} ${locale.missing}", &context),
///     "name: Title ${locale.missing}"
/// );
/// ```
pub fn resolve_placeholders(text: &str, context: &Value) -> String {
	PLACEHOLDER
		.replace_all(text, |caps: &Captures| {
			lookup(context, &caps[1])
				.and_then(scalar_text)
				.unwrap_or_else(|| caps[0].to_string())
		})
		.into_owned()
}

/// Build a hook that resolves placeholders against `context`.
pub fn placeholder_resolver(context: &Value) -> impl Fn(&str) -> String + '_ {
	move |text: &str| resolve_placeholders(text, context)
}

fn lookup<'a>(context: &'a Value, path: &str) -> Option<&'a Value> {
	path.split('.').try_fold(context, |current, segment| match current {
		Value::Object(map) => map.get(segment),
		Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
		_ => None,
	})
}

fn scalar_text(value: &Value) -> Option<String> {
	match value {
		Value::String(s) => Some(s.clone()),
		Value::Number(n) => Some(n.to_string()),
		Value::Bool(b) => Some(b.to_string()),
		Value::Null | Value::Array(_) | Value::Object(_) => None,
	}
}
