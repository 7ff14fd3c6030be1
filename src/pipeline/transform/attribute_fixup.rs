//! `data-amp-bind-*` attribute fixup.
//!
//! Authoring tools that cannot emit `[attr]` names (not valid XML) write
//! `data-amp-bind-attr` instead. Both mean the same to amp-bind; the
//! bracket form is the canonical one, so rename in place.

use crate::dom::Document;
use crate::error::{ErrorCollection, TransformError};
use crate::pipeline::{Transformer, TransformerId};

const BIND_PREFIX: &str = "data-amp-bind-";

pub struct AttributeFixup;

impl Transformer for AttributeFixup {
    fn id(&self) -> TransformerId {
        TransformerId::AttributeFixup
    }

    fn transform(
        &self,
        doc: &mut Document,
        _errors: &mut ErrorCollection,
    ) -> Result<(), TransformError> {
        for id in doc.descendants(doc.root()) {
            let Some(element) = doc.element_mut(id) else {
                continue;
            };
            let renames: Vec<(String, String)> = element
                .attrs
                .names()
                .filter_map(|name| {
                    let bound = name.strip_prefix(BIND_PREFIX)?;
                    (!bound.is_empty()).then(|| (name.to_string(), format!("[{bound}]")))
                })
                .collect();
            for (from, to) in renames {
                element.rename_attr(&from, &to);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::transform::test_util::{assert_idempotent, page, run};

    #[test]
    fn test_renames_bind_attributes_in_place() {
        let mut doc = page(
            "",
            r#"<p id="x" data-amp-bind-text="foo" class="c"></p><amp-img data-amp-bind-src="s"></amp-img>"#,
        );
        run(&AttributeFixup, &mut doc);
        let body = doc.body().unwrap();
        assert_eq!(
            doc.outer_html(body),
            r#"<body><p id="x" [text]="foo" class="c"></p><amp-img [src]="s"></amp-img></body>"#
        );
    }

    #[test]
    fn test_leaves_bare_prefix_alone() {
        let mut doc = page("", r#"<p data-amp-bind-="x" data-amp-other="y"></p>"#);
        run(&AttributeFixup, &mut doc);
        let p = doc.child_element(doc.body().unwrap(), "p").unwrap();
        assert!(doc.has_attr(p, "data-amp-bind-"));
        assert!(doc.has_attr(p, "data-amp-other"));
    }

    #[test]
    fn test_idempotent() {
        let mut doc = page("", r#"<p data-amp-bind-class="c" [text]="t"></p>"#);
        assert_idempotent(&AttributeFixup, &mut doc);
    }
}
