//! HTML serialization.
//!
//! Output is re-parseable to an equivalent tree but is not byte-identical
//! to the original input:
//! - attribute values are always double-quoted and escaped (`& < > " '`)
//! - empty attribute values are written as `name=""`
//! - void elements get no end tag, raw-text elements are written verbatim

use super::{Document, NodeId, NodeKind};
use crate::utils::html::{escape_attr, escape_text, is_raw_text_element, is_void_element};

/// Elements whose first newline the parser drops.
const LEADING_NEWLINE_ELEMENTS: &[&str] = &["pre", "textarea", "listing"];

pub(super) fn serialize_document(doc: &Document) -> String {
    let mut out = String::with_capacity(doc.nodes.len() * 32);
    for &child in doc.children(doc.document()) {
        write_node(doc, child, false, &mut out);
    }
    out
}

pub(super) fn serialize_node(doc: &Document, id: NodeId) -> String {
    let mut out = String::new();
    let raw = doc
        .parent(id)
        .and_then(|p| doc.tag_name(p))
        .is_some_and(is_raw_text_element);
    write_node(doc, id, raw, &mut out);
    out
}

/// Write one node. `raw` is true when the parent is a raw-text element.
fn write_node(doc: &Document, id: NodeId, raw: bool, out: &mut String) {
    match doc.kind(id) {
        NodeKind::Document => {
            for &child in doc.children(id) {
                write_node(doc, child, false, out);
            }
        }
        NodeKind::Doctype(name) => {
            out.push_str("<!DOCTYPE ");
            out.push_str(name);
            out.push('>');
        }
        NodeKind::Text(text) if raw => out.push_str(text),
        NodeKind::Text(text) => out.push_str(&escape_text(text)),
        NodeKind::Comment(text) => {
            out.push_str("<!--");
            out.push_str(text);
            out.push_str("-->");
        }
        NodeKind::Element(element) => {
            out.push('<');
            out.push_str(&element.name);
            for (name, value) in element.attrs.iter() {
                out.push(' ');
                out.push_str(name);
                out.push_str("=\"");
                out.push_str(&escape_attr(value));
                out.push('"');
            }
            out.push('>');

            if is_void_element(&element.name) {
                return;
            }

            if LEADING_NEWLINE_ELEMENTS.contains(&element.name.as_str())
                && doc
                    .children(id)
                    .first()
                    .and_then(|&first| doc.text(first))
                    .is_some_and(|text| text.starts_with('\n'))
            {
                out.push('\n');
            }

            let raw_children = is_raw_text_element(&element.name);
            for &child in doc.children(id) {
                write_node(doc, child, raw_children, out);
            }

            out.push_str("</");
            out.push_str(&element.name);
            out.push('>');
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::dom::{Document, Element};

    #[test]
    fn test_serialize_simple_document() {
        let doc = Document::parse(
            "<!doctype html><html><head></head><body><p class=x>a &amp; b</p><br></body></html>",
        )
        .unwrap();
        assert_eq!(
            doc.serialize(),
            "<!DOCTYPE html><html><head></head><body><p class=\"x\">a &amp; b</p><br></body></html>"
        );
    }

    #[test]
    fn test_raw_text_is_not_escaped() {
        let doc = Document::parse(
            "<html><head><style amp-custom>a > b { color: red }</style></head><body></body></html>",
        )
        .unwrap();
        let html = doc.serialize();
        assert!(html.contains("<style amp-custom=\"\">a > b { color: red }</style>"));
    }

    #[test]
    fn test_attribute_values_are_escaped() {
        let mut doc = Document::parse("<html><body></body></html>").unwrap();
        let body = doc.body().unwrap();
        let img = doc.create_element(
            Element::new("img").with_attr("src", "data:image/svg+xml,<svg a=\"1\"/>"),
        );
        doc.append_child(body, img);
        assert_eq!(
            doc.outer_html(img),
            "<img src=\"data:image/svg+xml,&lt;svg a=&quot;1&quot;/&gt;\">"
        );
    }

    #[test]
    fn test_round_trip_is_structurally_stable() {
        let source = "<!doctype html><html ⚡ lang=en><head><meta charset=utf-8>\
            <script async src=\"https://cdn.ampproject.org/v0.js\"></script>\
            <noscript><style amp-boilerplate>body{}</style></noscript></head>\
            <body><!-- c --><amp-img src=\"a.png\" width=1 height=1></amp-img>\
            <svg viewBox=\"0 0 1 1\"><path d=\"M0 0\"/></svg><template><p>x</p></template>\
            <p>it's \"quoted\" &lt;tag&gt;</p><pre>\n\nfoo</pre>\
            <textarea>\n\nbar</textarea></body></html>";
        let parsed = Document::parse(source).unwrap();
        let once = parsed.serialize();
        let reparsed = Document::parse(&once).unwrap();
        assert_eq!(once, reparsed.serialize());

        let body = reparsed.body().unwrap();
        let pre = reparsed
            .descendants(body)
            .into_iter()
            .find(|&id| reparsed.is_element(id, "pre"))
            .unwrap();
        assert_eq!(reparsed.text_content(pre), "\nfoo");
    }
}
