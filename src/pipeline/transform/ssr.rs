//! Server-side rendering of AMP layouts.
//!
//! The outcome is recorded only as attributes on `<html>`:
//!
//! ```text
//! NotProcessed ──> MarkedInProgress ──┬──> BoilerplateRetained
//!  (no sentinel)   i-amphtml-layout   └──> BoilerplateRemovable
//!                                          + i-amphtml-no-boilerplate
//! ```
//!
//! The layout sentinel is written before any element is touched, so a
//! document that already carries it is left alone. That makes the
//! transformer idempotent and lets a single instance serve any number of
//! documents.

use crate::debug;
use crate::dom::{Document, NodeId};
use crate::error::{Diagnostic, ErrorCollection, TransformError};
use crate::layout::{LayoutError, apply_layout, resolve_layout};
use crate::pipeline::{Transformer, TransformerId};

/// Set on `<html>` once SSR has run.
pub const LAYOUT_SENTINEL: &str = "i-amphtml-layout";

/// Set on `<html>` when every element's layout was resolved statically.
pub const NO_BOILERPLATE_SENTINEL: &str = "i-amphtml-no-boilerplate";

/// Per-document SSR state, read back from the root element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SsrState {
    NotProcessed,
    BoilerplateRetained,
    BoilerplateRemovable,
}

impl SsrState {
    pub fn of(doc: &Document) -> Self {
        let root = doc.root();
        match (
            doc.has_attr(root, LAYOUT_SENTINEL),
            doc.has_attr(root, NO_BOILERPLATE_SENTINEL),
        ) {
            (false, _) => Self::NotProcessed,
            (true, false) => Self::BoilerplateRetained,
            (true, true) => Self::BoilerplateRemovable,
        }
    }
}

pub struct ServerSideRendering;

impl ServerSideRendering {
    /// Resolve and apply the layout of one element.
    ///
    /// Returns whether the element lets the boilerplate go.
    fn render_element(doc: &mut Document, id: NodeId, errors: &mut ErrorCollection) -> bool {
        let Some(element) = doc.element(id) else {
            return true;
        };
        // Already server-side rendered.
        if element.has_attr(LAYOUT_SENTINEL) {
            return true;
        }

        match resolve_layout(element) {
            Ok(resolved) => {
                apply_layout(doc, id, &resolved);
                true
            }
            Err(LayoutError::Malformed(reason)) => {
                let tag = element.name.clone();
                debug!("ssr"; "skipping <{}>: {}", tag, reason);
                errors.add(
                    Diagnostic::new(TransformerId::ServerSideRendering, reason).with_element(tag),
                );
                true
            }
            Err(LayoutError::Unresolvable(reason)) => {
                debug!("ssr"; "keeping boilerplate for <{}>: {}", element.name, reason);
                false
            }
        }
    }

    /// Drop `<style amp-boilerplate>` and the `<noscript>` wrapping it.
    fn remove_boilerplate(doc: &mut Document) -> Result<(), TransformError> {
        let head = doc.head()?;
        let is_boilerplate =
            |doc: &Document, id: NodeId| doc.is_element(id, "style") && doc.has_attr(id, "amp-boilerplate");

        let doomed: Vec<NodeId> = doc
            .child_elements(head)
            .filter(|&id| {
                is_boilerplate(doc, id)
                    || (doc.is_element(id, "noscript")
                        && doc.child_elements(id).any(|c| is_boilerplate(doc, c)))
            })
            .collect();
        for id in doomed {
            doc.remove(id);
        }
        Ok(())
    }
}

impl Transformer for ServerSideRendering {
    fn id(&self) -> TransformerId {
        TransformerId::ServerSideRendering
    }

    fn transform(
        &self,
        doc: &mut Document,
        errors: &mut ErrorCollection,
    ) -> Result<(), TransformError> {
        let root = doc.root();
        if SsrState::of(doc) != SsrState::NotProcessed {
            return Ok(());
        }
        doc.set_attr(root, LAYOUT_SENTINEL, "");
        // Only this pass decides whether the boilerplate may go.
        doc.remove_attr(root, NO_BOILERPLATE_SENTINEL);

        let mut removable = true;
        for id in doc.amp_elements() {
            // Template content is rendered client-side.
            if doc.has_ancestor(id, "template") {
                continue;
            }
            removable &= Self::render_element(doc, id, errors);
        }

        if removable {
            doc.set_attr(root, NO_BOILERPLATE_SENTINEL, "");
            Self::remove_boilerplate(doc)?;
        }
        Ok(())
    }
}
