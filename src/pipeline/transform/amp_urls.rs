//! Self-hosted AMP runtime.
//!
//! Rewrites runtime and extension URLs in `<head>` from the AMP CDN to the
//! configured prefix, then makes sure the runtime is preloaded and that a
//! `runtime-host` meta tells the runtime where its other parts live.

use super::AMP_CDN;
use crate::dom::{Document, Element, NodeId};
use crate::error::{ErrorCollection, TransformError};
use crate::pipeline::{Transformer, TransformerId};

pub struct RewriteAmpUrls {
    prefix: String,
}

impl RewriteAmpUrls {
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
        }
    }

    /// New URL for `url`, or `None` when it is not a CDN URL. A prefix
    /// below the CDN (e.g. `.../lts/`) must not be applied twice.
    fn rewrite(&self, url: &str) -> Option<String> {
        if url.starts_with(&self.prefix) {
            return None;
        }
        url.strip_prefix(AMP_CDN)
            .map(|path| format!("{}{path}", self.prefix))
    }

    fn runtime_src(&self) -> String {
        format!("{}v0.js", self.prefix)
    }
}

impl Transformer for RewriteAmpUrls {
    fn id(&self) -> TransformerId {
        TransformerId::RewriteAmpUrls
    }

    fn transform(
        &self,
        doc: &mut Document,
        _errors: &mut ErrorCollection,
    ) -> Result<(), TransformError> {
        if self.prefix.is_empty() || self.prefix == AMP_CDN {
            return Ok(());
        }
        let head = doc.head()?;
        let children: Vec<NodeId> = doc.child_elements(head).collect();

        for &id in &children {
            let url_attr = match doc.tag_name(id) {
                Some("script") => "src",
                Some("link") => "href",
                _ => continue,
            };
            if let Some(url) = doc.attr(id, url_attr).and_then(|url| self.rewrite(url)) {
                doc.set_attr(id, url_attr, url);
            }
        }

        let runtime_src = self.runtime_src();
        let Some(runtime) = children
            .iter()
            .copied()
            .find(|&id| doc.is_element(id, "script") && doc.attr(id, "src") == Some(runtime_src.as_str()))
        else {
            return Ok(());
        };

        let preloaded = children.iter().any(|&id| {
            doc.element(id).is_some_and(|el| {
                el.name == "link"
                    && el.attr_has_token("rel", "preload")
                    && el.attr("href") == Some(runtime_src.as_str())
            })
        });
        if !preloaded {
            let preload = doc.create_element(
                Element::new("link")
                    .with_attr("rel", "preload")
                    .with_attr("as", "script")
                    .with_attr("href", runtime_src.as_str()),
            );
            doc.insert_before(head, preload, runtime);
        }

        let has_runtime_host = children
            .iter()
            .any(|&id| doc.is_element(id, "meta") && doc.attr(id, "name") == Some("runtime-host"));
        if !has_runtime_host {
            let meta = doc.create_element(
                Element::new("meta")
                    .with_attr("name", "runtime-host")
                    .with_attr("content", self.prefix.trim_end_matches('/')),
            );
            doc.insert_before(head, meta, runtime);
        }
        Ok(())
    }
}
