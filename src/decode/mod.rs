//! Response decoder module
//!
//! Turns XML API response bodies into an element tree.
//!
//! # Overview
//!
//! The transport hands every successful body to a [`DocumentParser`]; the
//! default [`XmlParser`] distinguishes bodies that are not XML at all from
//! XML documents that are broken, so callers can treat the former as a
//! missing resource.

mod types;
mod xml;

pub use types::{DocumentParser, XmlElement};
pub use xml::{parse_document, XmlParser};

#[cfg(test)]
mod tests;
