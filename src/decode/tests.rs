//! Tests for decoder module

use super::*;
use crate::error::Error;
use pretty_assertions::assert_eq;

const PLAYS_PAGE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<plays username="alice" userid="42" total="2" page="1" termsofuse="https://boardgamegeek.com/xmlapi/termsofuse">
    <play id="1001" date="2024-01-05" quantity="1" length="45" incomplete="0" nowinstats="0" location="">
        <item name="Azul" objecttype="thing" objectid="230802"/>
        <comments>Close game &amp; fun</comments>
    </play>
    <play id="1002" date="2024-01-06" quantity="2" length="0" incomplete="0" nowinstats="0" location="">
        <item name="Patchwork" objecttype="thing" objectid="163412"/>
    </play>
</plays>"#;

// ============================================================================
// Tree Construction
// ============================================================================

#[test]
fn test_parse_root_and_attributes() {
    let root = parse_document(PLAYS_PAGE).unwrap();
    assert_eq!(root.name, "plays");
    assert_eq!(root.attr("username"), Some("alice"));
    assert_eq!(root.attr_parse::<u64>("total"), Some(2));
    assert_eq!(root.attr("missing"), None);
}

#[test]
fn test_parse_children_and_text() {
    let root = parse_document(PLAYS_PAGE).unwrap();
    let plays: Vec<_> = root.children_named("play").collect();
    assert_eq!(plays.len(), 2);
    assert_eq!(plays[0].child_text("comments"), Some("Close game & fun"));
    assert_eq!(
        plays[1].child("item").and_then(|i| i.attr("name")),
        Some("Patchwork")
    );
}

#[test]
fn test_descendants_and_find() {
    let root = parse_document(PLAYS_PAGE).unwrap();
    let items = root.descendants("item");
    assert_eq!(items.len(), 2);
    assert_eq!(root.find("comments").map(|c| c.text.as_str()), Some("Close game & fun"));

    let azul = root.descendants_where("item", "objectid", "230802");
    assert_eq!(azul.len(), 1);
}

#[test]
fn test_child_value_helpers() {
    let xml = r#"<item><yearpublished value="2017"/><minplayers value=" 2 "/><name value="Azul"/></item>"#;
    let root = parse_document(xml).unwrap();
    assert_eq!(root.child_value("name"), Some("Azul"));
    assert_eq!(root.child_value_parse::<i32>("yearpublished"), Some(2017));
    assert_eq!(root.child_value_parse::<u32>("minplayers"), Some(2));
    assert_eq!(root.child_value_parse::<u32>("maxplayers"), None);
}

#[test]
fn test_cdata_is_text() {
    let root = parse_document("<message><![CDATA[Invalid <username>]]></message>").unwrap();
    assert_eq!(root.text, "Invalid <username>");
}

#[test]
fn test_unknown_entities_kept_verbatim() {
    let root = parse_document("<description>Fast&nbsp;paced</description>").unwrap();
    assert!(root.text.contains("nbsp"));
}

#[test]
fn test_builder_helpers() {
    let element = XmlElement::new("members")
        .with_attr("count", "3")
        .with_child(XmlElement::new("member").with_attr("name", "bob"));
    assert_eq!(element.attr_parse::<u64>("count"), Some(3));
    assert_eq!(element.children_named("member").count(), 1);
}

// ============================================================================
// Failure Classification
// ============================================================================

#[test]
fn test_html_doctype_is_non_xml() {
    let body = "<!DOCTYPE html>\n<html><head><title>Error</title></head><body>Not here</body></html>";
    let err = parse_document(body).unwrap_err();
    assert!(matches!(err, Error::NonXmlResponse { .. }));
    assert!(err.is_missing_resource());
}

#[test]
fn test_html_root_is_non_xml() {
    let err = parse_document("<html><body>nope</body></html>").unwrap_err();
    assert!(matches!(err, Error::NonXmlResponse { .. }));
}

#[test]
fn test_plain_text_is_non_xml() {
    let err = parse_document("Rate limit exceeded").unwrap_err();
    assert!(matches!(err, Error::NonXmlResponse { .. }));

    let err = parse_document("   ").unwrap_err();
    assert!(matches!(err, Error::NonXmlResponse { .. }));
}

#[test]
fn test_truncated_xml_is_malformed() {
    let err = parse_document("<plays total=\"3\"><play id=\"1\">").unwrap_err();
    assert!(matches!(err, Error::MalformedResponse { .. }));
    assert!(!err.is_missing_resource());
}

#[test]
fn test_mismatched_tags_are_malformed() {
    let err = parse_document("<a><b></a></b>").unwrap_err();
    assert!(matches!(err, Error::MalformedResponse { .. }));
}

#[test]
fn test_parser_trait_object() {
    let parser: Box<dyn DocumentParser> = Box::new(XmlParser::new());
    let root = parser.parse("<items total=\"0\"/>").unwrap();
    assert_eq!(root.name, "items");
    assert!(root.children.is_empty());
}
