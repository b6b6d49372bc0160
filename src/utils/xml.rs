//! Shared helpers for the XML readers and writers

use quick_xml::events::attributes::Attributes;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::BytesText;

use crate::core::grid::MAX_DIMENSION;
use crate::data::markup::HTML_ENTITIES;
use crate::utils::error::{ConversionError, ConversionResult};

/// Value of the attribute with local name `name`
pub fn find_attr(attrs: Attributes<'_>, name: &[u8]) -> ConversionResult<Option<String>> {
    for attr in attrs {
        let attr = attr?;
        if attr.key.local_name().as_ref() == name {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

/// Non-negative integer attribute, `None` when absent
pub fn count_attr(attrs: Attributes<'_>, name: &[u8]) -> ConversionResult<Option<usize>> {
    match find_attr(attrs, name)? {
        Some(value) => value.trim().parse::<usize>().map(Some).map_err(|_| {
            ConversionError::parse(format!(
                "attribute {}=\"{}\" is not a non-negative integer",
                String::from_utf8_lossy(name),
                value
            ))
        }),
        None => Ok(None),
    }
}

/// Span attribute: absent means 1, zero and values past
/// [`MAX_DIMENSION`] are rejected
pub fn span_attr(attrs: Attributes<'_>, name: &[u8]) -> ConversionResult<Option<usize>> {
    match count_attr(attrs, name)? {
        Some(0) => Err(ConversionError::parse(format!(
            "attribute {} must be at least 1",
            String::from_utf8_lossy(name)
        ))),
        Some(n) if n > MAX_DIMENSION => Err(ConversionError::parse(format!(
            "attribute {}=\"{}\" exceeds the limit of {}",
            String::from_utf8_lossy(name),
            n,
            MAX_DIMENSION
        ))),
        other => Ok(other),
    }
}

/// Unescaped text of an XML text node
pub fn xml_text(text: &BytesText<'_>) -> ConversionResult<String> {
    Ok(text.unescape()?.into_owned())
}

/// Unescaped text of an HTML text node.
///
/// The five XML entities and the named HTML entities of [`HTML_ENTITIES`]
/// resolve; text with an entity that still does not resolve is kept verbatim.
pub fn html_text(text: &BytesText<'_>) -> String {
    let resolve = |entity: &str| {
        HTML_ENTITIES
            .get(entity)
            .copied()
            .or_else(|| resolve_predefined_entity(entity))
    };
    match text.unescape_with(resolve) {
        Ok(s) => s.into_owned(),
        Err(err) => {
            log::warn!("keeping raw HTML text: {}", err);
            String::from_utf8_lossy(text).into_owned()
        }
    }
}

/// Escape cell content for element text
pub fn escape_text(text: &str) -> String {
    quick_xml::escape::escape(text).into_owned()
}
