//! Localized properties such as `Comment[zh_CN]` stored next to a plain `Comment`.
//!
//! Locale codes accept either `-` or `_` as the separator (`zh-CN`, `zh_CN`).

use crate::document::{Map, Value};

/// Read `property` for `locale`, falling back to the language and then the plain key.
///
/// For `Comment` and `zh_HK` the lookup order is `Comment[zh_HK]`,
/// `Comment[zh]`, `Comment`.
pub fn localized_value<'a>(
	doc: &'a Map<String, Value>,
	property: &str,
	locale: &str,
) -> Option<&'a Value> {
	let locale = normalize_locale(locale);

	if let Some(value) = doc.get(&localized_key(property, &locale)) {
		return Some(value);
	}

	if let Some((language, _)) = locale.split_once('_')
		&& !language.is_empty()
		&& let Some(value) = doc.get(&localized_key(property, language))
	{
		return Some(value);
	}

	doc.get(property)
}

/// Write `property` for `locale`; `None` removes the localized entry.
pub fn set_localized_value(
	doc: &mut Map<String, Value>,
	property: &str,
	locale: &str,
	value: Option<Value>,
) {
	let key = localized_key(property, &normalize_locale(locale));
	match value {
		Some(value) => {
			doc.insert(key, value);
		}
		None => {
			doc.remove(&key);
		}
	}
}

fn normalize_locale(locale: &str) -> String {
	locale.replace('-', "_")
}

fn localized_key(property: &str, locale: &str) -> String {
	format!("{property}[{locale}]")
}
