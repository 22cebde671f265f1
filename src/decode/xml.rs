//! XML decoder
//!
//! Builds an [`XmlElement`] tree from a response body with quick-xml.
//! Bodies that are not XML at all (HTML error pages, plain text) are
//! reported as [`Error::NonXmlResponse`]; XML that fails to parse is
//! reported as [`Error::MalformedResponse`].

use super::types::{DocumentParser, XmlElement};
use crate::error::{Error, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// Default parser used by the HTTP client
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlParser;

impl XmlParser {
    /// Create a new XML parser
    pub fn new() -> Self {
        Self
    }
}

impl DocumentParser for XmlParser {
    fn parse(&self, body: &str) -> Result<XmlElement> {
        parse_document(body)
    }
}

/// Parse an XML document and return its root element
pub fn parse_document(body: &str) -> Result<XmlElement> {
    let trimmed = body.trim_start_matches('\u{feff}').trim();
    if !trimmed.starts_with('<') {
        return Err(Error::non_xml(body));
    }

    let mut reader = Reader::from_str(trimmed);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        let event = reader.read_event().map_err(|e| {
            Error::malformed(format!(
                "XML error at position {}: {e}",
                reader.buffer_position()
            ))
        })?;

        match event {
            Event::DocType(doctype) => {
                let doctype = String::from_utf8_lossy(&doctype).to_ascii_lowercase();
                if doctype.trim_start().starts_with("html") {
                    return Err(Error::non_xml(body));
                }
            }
            Event::Start(start) => {
                let element = element_from_start(&start)?;
                if stack.is_empty() && element.name.eq_ignore_ascii_case("html") {
                    return Err(Error::non_xml(body));
                }
                stack.push(element);
            }
            Event::Empty(start) => {
                let element = element_from_start(&start)?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| Error::malformed("closing tag without opening tag"))?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::Text(text) => {
                let value = match text.unescape() {
                    Ok(value) => value.into_owned(),
                    // Entities XML does not define (e.g. &nbsp;) are kept verbatim
                    Err(_) => String::from_utf8_lossy(&text).into_owned(),
                };
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&value);
                }
            }
            Event::CData(data) => {
                if let Some(current) = stack.last_mut() {
                    current
                        .text
                        .push_str(&String::from_utf8_lossy(&data.into_inner()));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(Error::malformed(format!(
            "unexpected end of document inside <{}>",
            open.name
        )));
    }

    root.ok_or_else(|| Error::malformed("document has no root element"))
}

fn element_from_start(start: &BytesStart<'_>) -> Result<XmlElement> {
    let mut element = XmlElement::new(String::from_utf8_lossy(start.name().as_ref()));

    for attr in start.attributes() {
        let attr = attr.map_err(|e| Error::malformed(format!("invalid attribute: {e}")))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = match attr.unescape_value() {
            Ok(value) => value.into_owned(),
            Err(_) => String::from_utf8_lossy(&attr.value).into_owned(),
        };
        element.attributes.push((key, value));
    }

    Ok(element)
}

fn attach(
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
    element: XmlElement,
) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => {
            parent.children.push(element);
            Ok(())
        }
        None if root.is_none() => {
            *root = Some(element);
            Ok(())
        }
        None => Err(Error::malformed(format!(
            "second root element <{}>",
            element.name
        ))),
    }
}
