//! Preconnect hint for Google Fonts.
//!
//! A Google Fonts stylesheet pulls font files from a second origin; a
//! preconnect to it saves a round trip before text can render.

use crate::dom::{Document, Element, NodeId};
use crate::error::{ErrorCollection, TransformError};
use crate::pipeline::{Transformer, TransformerId};

const FONTS_CSS: &str = "https://fonts.googleapis.com/";
const FONTS_FILES: &str = "https://fonts.gstatic.com";

pub struct GoogleFontsPreconnect;

fn is_link_with(doc: &Document, id: NodeId, rel: &str) -> bool {
    doc.element(id)
        .is_some_and(|el| el.name == "link" && el.attr_has_token("rel", rel))
}

impl Transformer for GoogleFontsPreconnect {
    fn id(&self) -> TransformerId {
        TransformerId::GoogleFontsPreconnect
    }

    fn transform(
        &self,
        doc: &mut Document,
        _errors: &mut ErrorCollection,
    ) -> Result<(), TransformError> {
        let head = doc.head()?;
        let links: Vec<NodeId> = doc.child_elements(head).collect();

        let Some(stylesheet) = links.iter().copied().find(|&id| {
            is_link_with(doc, id, "stylesheet")
                && doc.attr(id, "href").is_some_and(|h| h.starts_with(FONTS_CSS))
        }) else {
            return Ok(());
        };

        let has_preconnect = links.iter().any(|&id| {
            is_link_with(doc, id, "preconnect")
                && doc
                    .attr(id, "href")
                    .is_some_and(|h| h.trim_end_matches('/') == FONTS_FILES)
        });
        if has_preconnect {
            return Ok(());
        }

        let preconnect = doc.create_element(
            Element::new("link")
                .with_attr("rel", "dns-prefetch preconnect")
                .with_attr("href", FONTS_FILES)
                .with_attr("crossorigin", ""),
        );
        doc.insert_before(head, preconnect, stylesheet);
        Ok(())
    }
}
