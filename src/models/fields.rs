//! Field extraction helpers shared by the record parsers

use crate::decode::XmlElement;
use crate::error::{Error, Result};
use crate::types::OptionStringExt;
use chrono::NaiveDate;

/// Required numeric id attribute
pub(crate) fn required_id(element: &XmlElement, attr: &str) -> Result<u64> {
    element.attr_parse(attr).ok_or_else(|| {
        Error::malformed(format!(
            "<{}> is missing a numeric '{attr}' attribute",
            element.name
        ))
    })
}

/// Optional attribute, empty strings treated as absent
pub(crate) fn attr_string(element: &XmlElement, attr: &str) -> Option<String> {
    element.attr(attr).map(str::to_string).none_if_empty()
}

/// `value` attribute of a child, empty strings treated as absent
pub(crate) fn value_string(element: &XmlElement, child: &str) -> Option<String> {
    element.child_value(child).map(str::to_string).none_if_empty()
}

/// Text of a child, empty strings treated as absent
pub(crate) fn text_string(element: &XmlElement, child: &str) -> Option<String> {
    element.child_text(child).map(str::to_string).none_if_empty()
}

/// Boolean flag stored as `0`/`1` (or `true`/`false`)
pub(crate) fn flag(element: &XmlElement, attr: &str) -> bool {
    matches!(
        element.attr(attr).map(str::trim),
        Some("1" | "true" | "True")
    )
}

/// Date in `YYYY-MM-DD` form; placeholder dates like `0000-00-00` are absent
pub(crate) fn date(value: Option<&str>) -> Option<NaiveDate> {
    value.and_then(|v| NaiveDate::parse_from_str(v.trim(), "%Y-%m-%d").ok())
}

/// Years before the common era arrive as unsigned 32-bit wraparounds
pub(crate) fn signed_year(value: Option<i64>) -> Option<i64> {
    value.map(|year| {
        if year > i64::from(i32::MAX) {
            year - (1_i64 << 32)
        } else {
            year
        }
    })
}

/// Decode HTML entities left in free text after XML unescaping.
///
/// Text with an entity HTML5 does not know is returned unchanged.
pub(crate) fn unescape_html(text: &str) -> String {
    match quick_xml::escape::unescape_with(text, quick_xml::escape::resolve_html5_entity) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => text.to_string(),
    }
}
