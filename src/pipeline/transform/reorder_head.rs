//! Reorder `<head>` into the order AMP recommends for fast first render.
//!
//! Children are bucketed by [`HeadSlot`] and re-emitted bucket by bucket;
//! order inside a bucket is kept. Whitespace-only text is dropped.

use crate::dom::{Document, NodeId, NodeKind};
use crate::error::{ErrorCollection, TransformError};
use crate::pipeline::{Transformer, TransformerId};

/// Extensions that delay first render until they load.
const RENDER_DELAYING: &[&str] = &["amp-dynamic-css-classes", "amp-experiment", "amp-story"];

const RESOURCE_HINTS: &[&str] = &["dns-prefetch", "preconnect", "prefetch", "preload", "modulepreload"];

/// Position class of a `<head>` child, in output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum HeadSlot {
    MetaCharset,
    RuntimeStyle,
    Meta,
    RuntimeScript,
    RenderDelayingScript,
    ExtensionScript,
    ResourceHint,
    Stylesheet,
    CustomStyle,
    Other,
    Boilerplate,
}

impl HeadSlot {
    const COUNT: usize = Self::Boilerplate as usize + 1;

    fn classify(doc: &Document, id: NodeId) -> Self {
        let Some(el) = doc.element(id) else {
            return Self::Other;
        };
        match el.name.as_str() {
            "meta" if el.has_attr("charset") => Self::MetaCharset,
            "meta" => Self::Meta,
            "style" if el.has_attr("amp-runtime") => Self::RuntimeStyle,
            "style" if el.has_attr("amp-custom") => Self::CustomStyle,
            "style" if el.has_attr("amp-boilerplate") => Self::Boilerplate,
            "noscript" => Self::Boilerplate,
            "script" => {
                let extension = el
                    .attr("custom-element")
                    .or_else(|| el.attr("custom-template"));
                match extension {
                    Some(name) if RENDER_DELAYING.contains(&name) => Self::RenderDelayingScript,
                    Some(_) => Self::ExtensionScript,
                    None if el.attr("src").is_some_and(is_runtime_src) => Self::RuntimeScript,
                    None => Self::Other,
                }
            }
            "link" if RESOURCE_HINTS.iter().any(|rel| el.attr_has_token("rel", rel)) => {
                Self::ResourceHint
            }
            "link" if el.attr_has_token("rel", "stylesheet") => Self::Stylesheet,
            _ => Self::Other,
        }
    }
}

/// `.../v0.js` or `.../v0.mjs`, on the CDN or a rewritten host.
fn is_runtime_src(src: &str) -> bool {
    let file = src.rsplit('/').next().unwrap_or(src);
    file == "v0.js" || file == "v0.mjs"
}

fn is_blank_text(doc: &Document, id: NodeId) -> bool {
    matches!(doc.kind(id), NodeKind::Text(text) if text.trim().is_empty())
}

pub struct ReorderHead;

impl Transformer for ReorderHead {
    fn id(&self) -> TransformerId {
        TransformerId::ReorderHead
    }

    fn transform(
        &self,
        doc: &mut Document,
        _errors: &mut ErrorCollection,
    ) -> Result<(), TransformError> {
        let head = doc.head()?;

        let mut buckets: [Vec<NodeId>; HeadSlot::COUNT] = Default::default();
        for &child in doc.children(head) {
            if is_blank_text(doc, child) {
                continue;
            }
            buckets[HeadSlot::classify(doc, child) as usize].push(child);
        }

        doc.set_children(head, buckets.concat());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::transform::test_util::{assert_idempotent, page, run};

    const MESSY_HEAD: &str = concat!(
        "<style amp-boilerplate>body{}</style>\n",
        "<noscript><style amp-boilerplate>body{}</style></noscript>\n",
        "<title>t</title>\n",
        r#"<link rel="stylesheet" href="https://fonts.googleapis.com/css">"#,
        "<style amp-custom>a{}</style>\n",
        r#"<script async custom-element="amp-bind" src="https://cdn.ampproject.org/v0/amp-bind-0.1.js"></script>"#,
        r#"<script async src="https://cdn.ampproject.org/v0.js"></script>"#,
        r#"<link rel="preconnect" href="https://fonts.gstatic.com">"#,
        r#"<script async custom-element="amp-story" src="https://cdn.ampproject.org/v0/amp-story-1.0.js"></script>"#,
        r#"<meta name="viewport" content="width=device-width">"#,
        "<!-- note -->",
        "<style amp-runtime>x{}</style>",
        "<meta charset=utf-8>",
    );

    fn head_order(doc: &Document) -> Vec<String> {
        let head = doc.head().unwrap();
        doc.children(head)
            .iter()
            .map(|&id| {
                let Some(el) = doc.element(id) else {
                    return "#node".to_string();
                };
                let detail = ["charset", "name", "rel", "custom-element", "amp-custom", "amp-runtime", "amp-boilerplate"]
                    .into_iter()
                    .find(|attr| el.has_attr(attr))
                    .unwrap_or("");
                format!("{}[{detail}]", el.name)
            })
            .collect()
    }

    #[test]
    fn test_recommended_order() {
        let mut doc = page(MESSY_HEAD, "");
        run(&ReorderHead, &mut doc);
        assert_eq!(
            head_order(&doc),
            [
                "meta[charset]",
                "style[amp-runtime]",
                "meta[name]",
                "script[]",
                "script[custom-element]",
                "script[custom-element]",
                "link[rel]",
                "link[rel]",
                "style[amp-custom]",
                "title[]",
                "#node",
                "style[amp-boilerplate]",
                "noscript[]",
            ]
        );
        let head = doc.head().unwrap();
        let children = doc.children(head);
        assert_eq!(doc.attr(children[4], "custom-element"), Some("amp-story"));
        assert_eq!(doc.attr(children[6], "rel"), Some("preconnect"));
    }

    #[test]
    fn test_runtime_detection() {
        assert!(is_runtime_src("https://cdn.ampproject.org/v0.js"));
        assert!(is_runtime_src("/amp/v0.mjs"));
        assert!(!is_runtime_src("https://cdn.ampproject.org/v0/amp-bind-0.1.js"));
    }

    #[test]
    fn test_idempotent() {
        let mut doc = page(MESSY_HEAD, "");
        assert_idempotent(&ReorderHead, &mut doc);
    }
}
