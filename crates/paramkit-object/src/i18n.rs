//! Locale selection and message templating.
//!
//! A locale is a JSON object tree whose leaves are message templates, e.g.
//! `{"errors": {"not_found": "{item} was not found"}}`. Locales are keyed by
//! code (`"en"`, `"en-US"`, `"zh-TW"`).

use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde_json::{Map, Value};

use crate::object::get;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{(\w+)\}").expect("placeholder pattern compiles"));

/// Pick the locale for `code`.
///
/// Tries an exact match first, then the first locale (in map order) sharing
/// the two-letter language prefix, and finally `fallback`.
pub fn get_locale<'a>(locales: &'a Map<String, Value>, code: &str, fallback: &'a Value) -> &'a Value {
    if let Some(locale) = locales.get(code) {
        return locale;
    }

    let language = language_prefix(code);
    locales
        .iter()
        .find(|(key, _)| language_prefix(key) == language)
        .map(|(_, locale)| locale)
        .unwrap_or(fallback)
}

fn language_prefix(code: &str) -> &str {
    match code.char_indices().nth(2) {
        Some((end, _)) => &code[..end],
        None => code,
    }
}

/// Resolve `key` (dotted path) in `locale` and fill `{name}` placeholders.
///
/// A key that does not resolve to a string is returned as-is. Placeholders
/// without a matching parameter are left in place.
pub fn translate(locale: &Value, key: &str, params: Option<&Map<String, Value>>) -> String {
    let template = match get(locale, key) {
        Some(Value::String(template)) => template.as_str(),
        _ => key,
    };

    let Some(params) = params else {
        return template.to_string();
    };

    PLACEHOLDER
        .replace_all(template, |caps: &Captures<'_>| match params.get(&caps[1]) {
            Some(Value::String(text)) => text.clone(),
            Some(Value::Null) | None => caps[0].to_string(),
            Some(other) => other.to_string(),
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn locales() -> Map<String, Value> {
        match json!({
            "en-US": {"greet": "Hello {name}, you have {count} messages"},
            "zh-TW": {"greet": "你好 {name}"},
            "zh-CN": {"greet": "你好呀 {name}"},
        }) {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn exact_locale_wins() {
        let locales = locales();
        let fallback = json!({});
        assert_eq!(get_locale(&locales, "zh-CN", &fallback), &locales["zh-CN"]);
    }

    #[test]
    fn language_prefix_matches_first_in_order() {
        let locales = locales();
        let fallback = json!({});
        assert_eq!(get_locale(&locales, "zh-HK", &fallback), &locales["zh-TW"]);
        assert_eq!(get_locale(&locales, "en", &fallback), &locales["en-US"]);
    }

    #[test]
    fn unknown_language_falls_back() {
        let locales = locales();
        let fallback = json!({"greet": "hi"});
        assert_eq!(get_locale(&locales, "fr-FR", &fallback), &fallback);
        assert_eq!(get_locale(&locales, "", &fallback), &fallback);
    }

    #[test]
    fn translate_fills_placeholders() {
        let locale = json!({"inbox": {"greet": "Hello {name}, you have {count} messages"}});
        let params = json!({"name": "Ada", "count": 3});
        assert_eq!(
            translate(&locale, "inbox.greet", params.as_object()),
            "Hello Ada, you have 3 messages"
        );
    }

    #[test]
    fn translate_keeps_unknown_placeholders_and_keys() {
        let locale = json!({"greet": "Hello {name} {missing}", "nested": {"a": "b"}});
        let params = json!({"name": "Ada"});
        assert_eq!(
            translate(&locale, "greet", params.as_object()),
            "Hello Ada {missing}"
        );
        assert_eq!(translate(&locale, "greet", None), "Hello {name} {missing}");
        assert_eq!(translate(&locale, "nope.key", None), "nope.key");
        assert_eq!(translate(&locale, "nested", None), "nested");
    }
}
