//! Inline the AMP runtime stylesheet.
//!
//! A server-side rendered page is visible before the runtime loads, so the
//! runtime's own CSS has to be present up front. Pages SSR did not mark are
//! left alone: the runtime will inject its CSS itself.

use super::ssr::LAYOUT_SENTINEL;
use crate::config::AmpRuntimeCssConfig;
use crate::dom::{Document, Element};
use crate::error::{ErrorCollection, TransformError};
use crate::pipeline::{Transformer, TransformerId};

pub struct AmpRuntimeCss {
    styles: String,
    version: String,
}

impl AmpRuntimeCss {
    pub fn new(config: &AmpRuntimeCssConfig) -> Self {
        Self {
            styles: config.styles.clone(),
            version: config.version.clone(),
        }
    }
}

impl Transformer for AmpRuntimeCss {
    fn id(&self) -> TransformerId {
        TransformerId::AmpRuntimeCss
    }

    fn transform(
        &self,
        doc: &mut Document,
        _errors: &mut ErrorCollection,
    ) -> Result<(), TransformError> {
        if self.styles.is_empty() || !doc.has_attr(doc.root(), LAYOUT_SENTINEL) {
            return Ok(());
        }
        let head = doc.head()?;
        let present = doc
            .descendants(head)
            .into_iter()
            .any(|id| doc.is_element(id, "style") && doc.has_attr(id, "amp-runtime"));
        if present {
            return Ok(());
        }

        let style = doc.create_element(
            Element::new("style")
                .with_attr("amp-runtime", "")
                .with_attr("i-amphtml-version", self.version.as_str()),
        );
        let css = doc.create_text(self.styles.as_str());
        doc.append_child(style, css);

        let charset = doc
            .child_elements(head)
            .find(|&id| doc.is_element(id, "meta") && doc.has_attr(id, "charset"));
        match charset {
            Some(meta) => doc.insert_after(head, style, meta),
            None => doc.prepend_child(head, style),
        }
        Ok(())
    }
}
