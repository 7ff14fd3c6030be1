//! Document model.
//!
//! A parsed HTML tree stored as an arena of nodes addressed by [`NodeId`].
//! Transformers receive `&mut Document` and mutate it in place; all
//! per-document state lives here, never in the transformers.
//!
//! # Structure
//!
//! ```text
//! Document (NodeId 0)
//! ├── Doctype            (optional)
//! └── <html>             root(), carries sentinel attributes
//!     ├── <head>         head()
//!     └── <body>         body()
//! ```
//!
//! Nodes removed from the tree stay in the arena but are unreachable from
//! the document node, so they are never serialized.

mod element;
mod parse;
mod serialize;

pub use element::{Attributes, Element};

use crate::error::{ParseError, StructureError};
use crate::utils::html::is_amp_element;

/// Index of a node inside its [`Document`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// Payload of a single node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Document,
    Doctype(String),
    Element(Element),
    Text(String),
    Comment(String),
}

#[derive(Debug, Clone)]
struct NodeSlot {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    kind: NodeKind,
}

/// A parsed HTML document.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<NodeSlot>,
    root: NodeId,
}

impl Document {
    const DOCUMENT: NodeId = NodeId(0);

    // ========================================================================
    // construction
    // ========================================================================

    /// Parse an HTML string.
    ///
    /// Recoverable markup problems are normalized by the HTML5 tree builder.
    /// Blank input fails with [`ParseError::Empty`].
    pub fn parse(html: &str) -> Result<Self, DocumentError> {
        parse::parse_html(html)
    }

    /// Parse raw bytes, which must be UTF-8.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DocumentError> {
        let html = std::str::from_utf8(bytes).map_err(ParseError::from)?;
        Self::parse(html)
    }

    /// Arena with only the document node; `root` is fixed up by the parser.
    fn empty() -> Self {
        Self {
            nodes: vec![NodeSlot {
                parent: None,
                children: Vec::new(),
                kind: NodeKind::Document,
            }],
            root: Self::DOCUMENT,
        }
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeSlot {
            parent: None,
            children: Vec::new(),
            kind,
        });
        id
    }

    /// Create a detached element.
    pub fn create_element(&mut self, element: Element) -> NodeId {
        self.push(NodeKind::Element(element))
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.push(NodeKind::Text(text.into()))
    }

    /// Create a detached comment node.
    pub fn create_comment(&mut self, text: impl Into<String>) -> NodeId {
        self.push(NodeKind::Comment(text.into()))
    }

    // ========================================================================
    // serialization
    // ========================================================================

    /// Render the document back to HTML.
    pub fn serialize(&self) -> String {
        serialize::serialize_document(self)
    }

    /// Render a single node (and its subtree).
    pub fn outer_html(&self, id: NodeId) -> String {
        serialize::serialize_node(self, id)
    }

    // ========================================================================
    // structural accessors
    // ========================================================================

    /// The document node (parent of doctype and `<html>`).
    #[inline]
    pub const fn document(&self) -> NodeId {
        Self::DOCUMENT
    }

    /// The `<html>` element.
    #[inline]
    pub const fn root(&self) -> NodeId {
        self.root
    }

    /// The `<head>` element.
    pub fn head(&self) -> Result<NodeId, StructureError> {
        self.child_element(self.root, "head")
            .ok_or(StructureError::Missing("head"))
    }

    /// The `<body>` element.
    pub fn body(&self) -> Result<NodeId, StructureError> {
        self.child_element(self.root, "body")
            .ok_or(StructureError::Missing("body"))
    }

    /// Verify `html`, `head` and `body` are all present.
    pub fn check_structure(&self) -> Result<(), StructureError> {
        if self.tag_name(self.root) != Some("html") {
            return Err(StructureError::Missing("html"));
        }
        self.head()?;
        self.body()?;
        Ok(())
    }

    /// All AMP custom elements (`amp-*`) in document order.
    ///
    /// Computed from the live tree on every call.
    pub fn amp_elements(&self) -> Vec<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .filter(|&id| self.tag_name(id).is_some_and(is_amp_element))
            .collect()
    }

    // ========================================================================
    // node access
    // ========================================================================

    #[inline]
    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.0].kind
    }

    #[inline]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    #[inline]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    pub fn element(&self, id: NodeId) -> Option<&Element> {
        match &self.nodes[id.0].kind {
            NodeKind::Element(el) => Some(el),
            _ => None,
        }
    }

    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        match &mut self.nodes[id.0].kind {
            NodeKind::Element(el) => Some(el),
            _ => None,
        }
    }

    #[inline]
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|el| el.name.as_str())
    }

    /// Check whether `id` is an element named `tag`.
    #[inline]
    pub fn is_element(&self, id: NodeId, tag: &str) -> bool {
        self.tag_name(id) == Some(tag)
    }

    /// Text of a text node, `None` for any other node.
    pub fn text(&self, id: NodeId) -> Option<&str> {
        match &self.nodes[id.0].kind {
            NodeKind::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Element children only.
    pub fn child_elements(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id)
            .iter()
            .copied()
            .filter(|&child| self.element(child).is_some())
    }

    /// First element child named `tag`.
    pub fn child_element(&self, id: NodeId, tag: &str) -> Option<NodeId> {
        self.child_elements(id).find(|&child| self.is_element(child, tag))
    }

    /// All descendants of `id` in document (pre-)order, excluding `id`.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }
        out
    }

    /// Check whether any ancestor of `id` is an element named `tag`.
    pub fn has_ancestor(&self, id: NodeId, tag: &str) -> bool {
        let mut current = self.parent(id);
        while let Some(node) = current {
            if self.is_element(node, tag) {
                return true;
            }
            current = self.parent(node);
        }
        false
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text_content(&self, id: NodeId) -> String {
        if let Some(text) = self.text(id) {
            return text.to_string();
        }
        self.descendants(id)
            .into_iter()
            .filter_map(|node| self.text(node))
            .collect()
    }

    // ========================================================================
    // attribute shortcuts
    // ========================================================================

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id).and_then(|el| el.attr(name))
    }

    pub fn has_attr(&self, id: NodeId, name: &str) -> bool {
        self.element(id).is_some_and(|el| el.has_attr(name))
    }

    /// Set an attribute; no-op on non-element nodes.
    pub fn set_attr(&mut self, id: NodeId, name: impl Into<String>, value: impl Into<String>) {
        if let Some(el) = self.element_mut(id) {
            el.set_attr(name, value);
        }
    }

    pub fn remove_attr(&mut self, id: NodeId, name: &str) -> Option<String> {
        self.element_mut(id).and_then(|el| el.remove_attr(name))
    }

    // ========================================================================
    // tree mutation
    // ========================================================================

    /// Detach `id` from its parent. The node stays usable for re-insertion.
    pub fn remove(&mut self, id: NodeId) {
        if let Some(parent) = self.nodes[id.0].parent.take() {
            self.nodes[parent.0].children.retain(|&child| child != id);
        }
    }

    /// Append `child` as the last child of `parent`.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.remove(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    /// Insert `child` as the first child of `parent`.
    pub fn prepend_child(&mut self, parent: NodeId, child: NodeId) {
        self.remove(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.insert(0, child);
    }

    /// Insert `child` before `reference`, which must be a child of `parent`.
    ///
    /// Falls back to appending when `reference` is not a child of `parent`.
    pub fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: NodeId) {
        self.remove(child);
        self.nodes[child.0].parent = Some(parent);
        let children = &mut self.nodes[parent.0].children;
        match children.iter().position(|&c| c == reference) {
            Some(index) => children.insert(index, child),
            None => children.push(child),
        }
    }

    /// Insert `child` right after `reference` under `parent`.
    pub fn insert_after(&mut self, parent: NodeId, child: NodeId, reference: NodeId) {
        self.remove(child);
        self.nodes[child.0].parent = Some(parent);
        let children = &mut self.nodes[parent.0].children;
        match children.iter().position(|&c| c == reference) {
            Some(index) => children.insert(index + 1, child),
            None => children.push(child),
        }
    }

    /// Put `new` where `old` is and detach `old`.
    pub fn replace_node(&mut self, old: NodeId, new: NodeId) {
        let Some(parent) = self.parent(old) else {
            return;
        };
        self.insert_before(parent, new, old);
        self.remove(old);
    }

    /// Replace the child list of `parent` with `children`, in order.
    pub fn set_children(&mut self, parent: NodeId, children: Vec<NodeId>) {
        for child in std::mem::take(&mut self.nodes[parent.0].children) {
            self.nodes[child.0].parent = None;
        }
        for child in children {
            self.append_child(parent, child);
        }
    }
}

/// Errors raised while building a [`Document`].
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Structure(#[from] StructureError),
}

impl From<DocumentError> for crate::error::OptimizeError {
    fn from(err: DocumentError) -> Self {
        match err {
            DocumentError::Parse(e) => Self::Parse(e),
            DocumentError::Structure(e) => Self::Structure(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = "<!doctype html><html><head><title>t</title></head>\
        <body><p>hi</p><amp-img width=\"1\" height=\"1\"></amp-img>\
        <div><amp-ad></amp-ad></div></body></html>";

    #[test]
    fn test_structural_accessors() {
        let doc = Document::parse(PAGE).unwrap();
        assert!(doc.is_element(doc.root(), "html"));
        assert!(doc.is_element(doc.head().unwrap(), "head"));
        assert!(doc.is_element(doc.body().unwrap(), "body"));
        assert!(doc.check_structure().is_ok());
    }

    #[test]
    fn test_amp_elements_in_document_order() {
        let doc = Document::parse(PAGE).unwrap();
        let tags: Vec<_> = doc
            .amp_elements()
            .into_iter()
            .filter_map(|id| doc.tag_name(id))
            .collect();
        assert_eq!(tags, ["amp-img", "amp-ad"]);
    }

    #[test]
    fn test_amp_elements_follow_mutation() {
        let mut doc = Document::parse(PAGE).unwrap();
        let body = doc.body().unwrap();
        let el = doc.create_element(Element::new("amp-list"));
        doc.append_child(body, el);
        assert_eq!(doc.amp_elements().len(), 3);

        let first = doc.amp_elements()[0];
        doc.remove(first);
        let tags: Vec<_> = doc
            .amp_elements()
            .into_iter()
            .filter_map(|id| doc.tag_name(id))
            .collect();
        assert_eq!(tags, ["amp-ad", "amp-list"]);
    }

    #[test]
    fn test_missing_body_is_structure_error() {
        let mut doc = Document::parse(PAGE).unwrap();
        let body = doc.body().unwrap();
        doc.remove(body);
        assert_eq!(doc.body(), Err(StructureError::Missing("body")));
        assert!(doc.check_structure().is_err());
    }

    #[test]
    fn test_insert_and_replace() {
        let mut doc = Document::parse(PAGE).unwrap();
        let head = doc.head().unwrap();
        let title = doc.child_element(head, "title").unwrap();

        let meta = doc.create_element(Element::new("meta").with_attr("charset", "utf-8"));
        doc.insert_before(head, meta, title);
        assert_eq!(doc.children(head), &[meta, title]);

        let style = doc.create_element(Element::new("style"));
        doc.replace_node(title, style);
        assert_eq!(doc.children(head), &[meta, style]);
        assert_eq!(doc.parent(title), None);

        let link = doc.create_element(Element::new("link"));
        doc.insert_after(head, link, meta);
        assert_eq!(doc.children(head), &[meta, link, style]);
    }

    #[test]
    fn test_append_moves_node() {
        let mut doc = Document::parse(PAGE).unwrap();
        let head = doc.head().unwrap();
        let body = doc.body().unwrap();
        let title = doc.child_element(head, "title").unwrap();
        doc.append_child(body, title);
        assert!(doc.child_element(head, "title").is_none());
        assert_eq!(doc.parent(title), Some(body));
        assert!(doc.has_ancestor(title, "body"));
    }

    #[test]
    fn test_text_content() {
        let doc = Document::parse(PAGE).unwrap();
        let head = doc.head().unwrap();
        assert_eq!(doc.text_content(head), "t");
    }

    #[test]
    fn test_from_bytes_rejects_invalid_utf8() {
        let err = Document::from_bytes(&[0x3c, 0xff, 0xfe]).unwrap_err();
        assert!(matches!(err, DocumentError::Parse(ParseError::Encoding(_))));
    }
}
