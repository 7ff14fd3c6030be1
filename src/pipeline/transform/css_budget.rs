//! Custom CSS budget check.
//!
//! Counts the UTF-8 bytes of every `<style amp-custom>` plus the trimmed
//! inline `style` attributes of body elements. Size declarations written by
//! SSR are not author CSS: they are subtracted from server-rendered
//! elements and sizers are skipped, so a document measures the same before
//! and after optimization.

use crate::debug;
use crate::dom::{Document, NodeId};
use crate::layout::{layout_styles, resolve_layout};
use crate::error::{ErrorCollection, TransformError};
use crate::pipeline::{Transformer, TransformerId};

pub struct CssBudget {
    max: usize,
}

impl CssBudget {
    pub fn new(max: usize) -> Self {
        Self { max }
    }

    /// Bytes of custom CSS in `doc`.
    pub fn measure(doc: &Document) -> Result<usize, TransformError> {
        let custom: usize = doc
            .descendants(doc.root())
            .into_iter()
            .filter(|&id| doc.is_element(id, "style") && doc.has_attr(id, "amp-custom"))
            .map(|id| doc.text_content(id).len())
            .sum();

        let body = doc.body()?;
        let inline: usize = doc
            .descendants(body)
            .into_iter()
            .filter(|&id| !doc.is_element(id, "i-amphtml-sizer"))
            .map(|id| author_style(doc, id).len())
            .sum();

        Ok(custom + inline)
    }
}

/// Inline style of `id` without the size prefix SSR may have added.
fn author_style(doc: &Document, id: NodeId) -> &str {
    let Some(style) = doc.attr(id, "style").map(str::trim) else {
        return "";
    };
    let Some(element) = doc.element(id).filter(|el| el.has_attr("i-amphtml-layout")) else {
        return style;
    };
    match resolve_layout(element) {
        Ok(resolved) => {
            let prefix = layout_styles(&resolved);
            style.strip_prefix(prefix.as_str()).unwrap_or(style)
        }
        Err(_) => style,
    }
}

impl Transformer for CssBudget {
    fn id(&self) -> TransformerId {
        TransformerId::CssBudget
    }

    fn transform(
        &self,
        doc: &mut Document,
        _errors: &mut ErrorCollection,
    ) -> Result<(), TransformError> {
        let used = Self::measure(doc)?;
        debug!("css"; "custom css: {} / {} bytes", used, self.max);
        if used > self.max {
            return Err(TransformError::CssBudgetExceeded {
                used,
                max: self.max,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::transform::ServerSideRendering;
    use crate::pipeline::transform::test_util::{page, run};

    #[test]
    fn test_measures_custom_and_inline_css() {
        let doc = page(
            "<style amp-custom>a{b:c}</style><style>ignored{}</style>",
            r#"<p style="color:red"></p><div><span style="x:y"></span></div>"#,
        );
        assert_eq!(CssBudget::measure(&doc).unwrap(), 6 + 9 + 3);
    }

    #[test]
    fn test_counts_bytes_not_chars() {
        let doc = page("<style amp-custom>a::before{content:\"é\"}</style>", "");
        assert_eq!(CssBudget::measure(&doc).unwrap(), 23);
    }

    #[test]
    fn test_within_budget() {
        let mut doc = page("<style amp-custom>a{b:c}</style>", "");
        let mut errors = ErrorCollection::new();
        assert!(CssBudget::new(6).transform(&mut doc, &mut errors).is_ok());
    }

    #[test]
    fn test_over_budget() {
        let mut doc = page("<style amp-custom>a{b:c}</style>", "");
        let mut errors = ErrorCollection::new();
        let err = CssBudget::new(5).transform(&mut doc, &mut errors).unwrap_err();
        assert!(matches!(
            err,
            TransformError::CssBudgetExceeded { used: 6, max: 5 }
        ));
    }

    #[test]
    fn test_skips_layout_styles() {
        let doc = page(
            "",
            r#"<amp-img width="1" height="1" i-amphtml-layout="fixed" style="width:1px;height:1px;"></amp-img>"#,
        );
        assert_eq!(CssBudget::measure(&doc).unwrap(), 0);
    }

    #[test]
    fn test_author_style_counted_after_ssr() {
        let mut doc = page(
            "",
            r#"<amp-img width="4" height="3" style=" color:red "></amp-img><amp-img layout="responsive" width="4" height="3"></amp-img>"#,
        );
        let before = CssBudget::measure(&doc).unwrap();
        assert_eq!(before, "color:red".len());

        run(&ServerSideRendering, &mut doc);
        assert!(doc.serialize().contains(r#"style="width:4px;height:3px;color:red""#));
        assert_eq!(CssBudget::measure(&doc).unwrap(), before);

        let mut errors = ErrorCollection::new();
        assert!(CssBudget::new(before - 1).transform(&mut doc, &mut errors).is_err());
    }
}
