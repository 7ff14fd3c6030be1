//! Optimization pipeline.
//!
//! # Architecture
//!
//! ```text
//! raw HTML ──parse──> Document ──transformers (in order)──> serialize ──tweaks──> HTML
//!                        ▲                 │
//!                        └─── &mut ────────┘  non-required failures -> ErrorCollection
//! ```
//!
//! - `optimize_html()`: full string-to-string pipeline
//! - `optimize_dom()`: transformers only, for callers that already hold a
//!   parsed [`Document`]
//!
//! An [`Optimizer`] owns its configuration and builds the transformer and
//! tweak lists once, on first use. It is `Send + Sync`: many documents may
//! be optimized concurrently through one instance since every call owns
//! its own `Document`.

pub mod registry;
pub mod transform;
pub mod tweak;


pub use registry::{Transformer, TransformerId, UnknownTransformer};
pub use transform::SsrState;
pub use tweak::{Tweak, TweakId, UnknownTweak};

use std::sync::{Arc, OnceLock};

use crate::config::Configuration;
use crate::debug;
use crate::dom::Document;
use crate::error::{Diagnostic, ErrorCollection, OptimizeError};

// =============================================================================
// Types
// =============================================================================

/// A transformer with the policy the configuration assigns to it.
struct Entry {
    id: TransformerId,
    required: bool,
    transformer: Box<dyn Transformer>,
}

/// Runs the configured transformers and tweaks.
pub struct Optimizer {
    config: Arc<Configuration>,
    transformers: OnceLock<Vec<Entry>>,
    tweaks: OnceLock<Vec<Box<dyn Tweak>>>,
}

impl Optimizer {
    pub fn new(config: Arc<Configuration>) -> Self {
        Self {
            config,
            transformers: OnceLock::new(),
            tweaks: OnceLock::new(),
        }
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    /// Transformer list, built once per optimizer.
    fn transformers(&self) -> &[Entry] {
        self.transformers.get_or_init(|| {
            debug!("optimize"; "building {} transformers", self.config.transformers().len());
            self.config
                .transformers()
                .iter()
                .map(|&id| Entry {
                    id,
                    required: self.config.is_required(id),
                    transformer: id.build(&self.config),
                })
                .collect()
        })
    }

    fn tweaks(&self) -> &[Box<dyn Tweak>] {
        self.tweaks
            .get_or_init(|| self.config.tweaks().iter().map(|id| id.build()).collect())
    }

    // =========================================================================
    // Entry points
    // =========================================================================

    /// Parse, transform, serialize and tweak.
    ///
    /// On `Err` no output exists; callers should serve the unoptimized
    /// markup instead.
    pub fn optimize_html(
        &self,
        html: &str,
        errors: &mut ErrorCollection,
    ) -> Result<String, OptimizeError> {
        let mut doc = Document::parse(html)?;
        self.optimize_dom(&mut doc, errors)?;
        Ok(self.apply_tweaks(doc.serialize()))
    }

    /// [`Self::optimize_html`] for raw bytes, which must be UTF-8.
    pub fn optimize_bytes(
        &self,
        bytes: &[u8],
        errors: &mut ErrorCollection,
    ) -> Result<String, OptimizeError> {
        let mut doc = Document::from_bytes(bytes)?;
        self.optimize_dom(&mut doc, errors)?;
        Ok(self.apply_tweaks(doc.serialize()))
    }

    /// Run every configured transformer on `doc`, in order.
    ///
    /// A failing non-required transformer is recorded in `errors` and the
    /// remaining transformers still run. A failing required transformer
    /// aborts with [`OptimizeError::Transform`].
    pub fn optimize_dom(
        &self,
        doc: &mut Document,
        errors: &mut ErrorCollection,
    ) -> Result<(), OptimizeError> {
        doc.check_structure()?;

        for entry in self.transformers() {
            match entry.transformer.transform(doc, errors) {
                Ok(()) => {}
                Err(source) if entry.required => {
                    return Err(OptimizeError::Transform {
                        transformer: entry.id,
                        source,
                    });
                }
                Err(err) => {
                    debug!("optimize"; "{} failed, continuing: {}", entry.id, err);
                    errors.add(Diagnostic::new(entry.id, err.to_string()));
                }
            }
        }
        Ok(())
    }

    /// Apply the configured tweaks to serialized HTML.
    pub fn apply_tweaks(&self, html: String) -> String {
        self.tweaks()
            .iter()
            .fold(html, |html, tweak| tweak.process(&html))
    }
}

/// One-shot optimization with a throwaway [`Optimizer`].
///
/// Diagnostics of non-required transformers are discarded; use an
/// `Optimizer` directly to collect them or to optimize many documents.
pub fn optimize_html(html: &str, config: &Configuration) -> Result<String, OptimizeError> {
    let optimizer = Optimizer::new(Arc::new(config.clone()));
    optimizer.optimize_html(html, &mut ErrorCollection::new())
}
