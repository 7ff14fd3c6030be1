//! HTML parsing via html5ever.
//!
//! The tree builder runs with scripting disabled so `<noscript>` content is
//! parsed as elements (the AMP boilerplate lives there). The resulting
//! `RcDom` is copied into the [`Document`] arena; `<template>` contents
//! become ordinary children of the template element.

use std::sync::LazyLock;

use html5ever::tendril::TendrilSink;
use html5ever::tree_builder::TreeBuilderOpts;
use html5ever::{ParseOpts, parse_document};
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use regex::Regex;

use super::{Document, DocumentError, Element, NodeId, NodeKind};
use crate::error::{ParseError, StructureError};

/// An explicit `<html>` start tag somewhere in the source.
static HTML_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<html[\s>/]").unwrap());

pub(super) fn parse_html(html: &str) -> Result<Document, DocumentError> {
    if html.trim().is_empty() {
        return Err(ParseError::Empty.into());
    }
    // The tree builder would synthesize one, but a page without its own
    // `<html>` is not an AMP document.
    if !HTML_TAG.is_match(html) {
        return Err(StructureError::Missing("html").into());
    }

    let dom = parse_rcdom(html);

    let mut doc = Document::empty();
    let document = doc.document();
    copy_children(&mut doc, &dom.document, document);

    doc.root = doc
        .child_element(document, "html")
        .ok_or(StructureError::Missing("html"))?;
    doc.check_structure()?;
    Ok(doc)
}

/// Parse an HTML string into an html5ever RcDom.
fn parse_rcdom(html: &str) -> RcDom {
    let opts = ParseOpts {
        tree_builder: TreeBuilderOpts {
            scripting_enabled: false,
            ..Default::default()
        },
        ..Default::default()
    };
    parse_document(RcDom::default(), opts)
        .from_utf8()
        .one(html.as_bytes())
}

/// Recursively copy the children of `handle` under `parent`.
fn copy_children(doc: &mut Document, handle: &Handle, parent: NodeId) {
    for child in handle.children.borrow().iter() {
        let id = match &child.data {
            NodeData::Doctype { name, .. } => doc.push(NodeKind::Doctype(name.to_string())),
            NodeData::Text { contents } => doc.create_text(contents.borrow().to_string()),
            NodeData::Comment { contents } => doc.create_comment(contents.to_string()),
            NodeData::Element {
                name,
                attrs,
                template_contents,
                ..
            } => {
                let mut element = Element::new(name.local.to_string());
                for attr in attrs.borrow().iter() {
                    let key = match &attr.name.prefix {
                        Some(prefix) => format!("{}:{}", prefix, attr.name.local),
                        None => attr.name.local.to_string(),
                    };
                    element.set_attr(key, attr.value.to_string());
                }
                let id = doc.create_element(element);
                if let Some(contents) = template_contents.borrow().as_ref() {
                    copy_children(doc, contents, id);
                }
                copy_children(doc, child, id);
                id
            }
            NodeData::Document | NodeData::ProcessingInstruction { .. } => continue,
        };
        doc.append_child(parent, id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParseError;

    #[test]
    fn test_blank_input_is_parse_error() {
        let err = Document::parse("   \n").unwrap_err();
        assert!(matches!(err, DocumentError::Parse(ParseError::Empty)));
    }

    #[test]
    fn test_missing_html_tag_is_structure_error() {
        let err = Document::parse("<p>just a fragment</p>").unwrap_err();
        assert!(matches!(
            err,
            DocumentError::Structure(StructureError::Missing("html"))
        ));
    }

    #[test]
    fn test_implied_head_and_body() {
        let doc = Document::parse("<html><p>x</p></html>").unwrap();
        let body = doc.body().unwrap();
        assert!(doc.child_element(body, "p").is_some());
        assert!(doc.head().is_ok());
    }

    #[test]
    fn test_noscript_content_is_parsed_as_elements() {
        let doc = Document::parse(
            "<html><head><noscript><style amp-boilerplate>body{}</style></noscript></head><body></body></html>",
        )
        .unwrap();
        let head = doc.head().unwrap();
        let noscript = doc.child_element(head, "noscript").unwrap();
        let style = doc.child_element(noscript, "style").unwrap();
        assert!(doc.has_attr(style, "amp-boilerplate"));
    }

    #[test]
    fn test_attribute_order_and_case() {
        let doc = Document::parse(
            r#"<html ⚡ lang="en"><body><amp-img SRC="a.png" Width="10" height="5" [text]="x"></amp-img></body></html>"#,
        )
        .unwrap();
        let names: Vec<_> = doc.element(doc.root()).unwrap().attrs.names().collect();
        assert_eq!(names, ["⚡", "lang"]);

        let img = doc.amp_elements()[0];
        let names: Vec<_> = doc.element(img).unwrap().attrs.names().collect();
        assert_eq!(names, ["src", "width", "height", "[text]"]);
    }

    #[test]
    fn test_template_contents_become_children() {
        let doc = Document::parse(
            "<html><body><template type=\"amp-mustache\"><amp-img layout=\"fill\"></amp-img></template></body></html>",
        )
        .unwrap();
        let img = doc.amp_elements()[0];
        assert!(doc.has_ancestor(img, "template"));
    }

    #[test]
    fn test_doctype_is_kept() {
        let doc = Document::parse("<!DOCTYPE html><html></html>").unwrap();
        let first = doc.children(doc.document())[0];
        assert_eq!(doc.kind(first), &NodeKind::Doctype("html".to_string()));
    }
}
