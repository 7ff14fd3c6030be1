//! Closed transformer registry.
//!
//! Every transformer is named by a [`TransformerId`]. Identifiers are
//! checked when the configuration is deserialized, so an unknown name never
//! reaches the engine; [`TransformerId::build`] is the only place concrete
//! transformer types are constructed.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::transform::{
    AmpRuntimeCss, AttributeFixup, CssBudget, GoogleFontsPreconnect, ReorderHead,
    RewriteAmpUrls, ServerSideRendering, TransformedIdentifier,
};
use crate::config::Configuration;
use crate::dom::Document;
use crate::error::{ErrorCollection, TransformError};

/// A single-purpose DOM rewrite.
///
/// Implementations hold only configuration captured at construction and
/// keep no per-document state, so one instance serves many documents,
/// possibly on several threads at once. Running a transformer twice on the
/// same document must leave it as running it once did.
pub trait Transformer: Send + Sync {
    fn id(&self) -> TransformerId;

    /// Mutate `doc` in place.
    ///
    /// Per-element problems go into `errors` and do not fail the call.
    fn transform(
        &self,
        doc: &mut Document,
        errors: &mut ErrorCollection,
    ) -> Result<(), TransformError>;
}

/// Identifier of a registered transformer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformerId {
    AttributeFixup,
    CssBudget,
    GoogleFontsPreconnect,
    RewriteAmpUrls,
    ServerSideRendering,
    AmpRuntimeCss,
    TransformedIdentifier,
    ReorderHead,
}

impl TransformerId {
    /// Every registered transformer.
    pub const ALL: &'static [Self] = Self::DEFAULT_ORDER;

    /// Documented run order. Dependencies it encodes:
    /// - `css_budget` measures author CSS before SSR adds size styles
    /// - `amp_runtime_css` only acts on documents SSR has marked
    /// - `reorder_head` sees everything the others inserted into `<head>`
    pub const DEFAULT_ORDER: &'static [Self] = &[
        Self::AttributeFixup,
        Self::CssBudget,
        Self::GoogleFontsPreconnect,
        Self::RewriteAmpUrls,
        Self::ServerSideRendering,
        Self::AmpRuntimeCss,
        Self::TransformedIdentifier,
        Self::ReorderHead,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AttributeFixup => "attribute_fixup",
            Self::CssBudget => "css_budget",
            Self::GoogleFontsPreconnect => "google_fonts_preconnect",
            Self::RewriteAmpUrls => "rewrite_amp_urls",
            Self::ServerSideRendering => "server_side_rendering",
            Self::AmpRuntimeCss => "amp_runtime_css",
            Self::TransformedIdentifier => "transformed_identifier",
            Self::ReorderHead => "reorder_head",
        }
    }

    /// Construct the transformer, capturing the options it reads.
    pub fn build(self, config: &Configuration) -> Box<dyn Transformer> {
        match self {
            Self::AttributeFixup => Box::new(AttributeFixup),
            Self::CssBudget => Box::new(CssBudget::new(config.max_css_byte_count())),
            Self::GoogleFontsPreconnect => Box::new(GoogleFontsPreconnect),
            Self::RewriteAmpUrls => Box::new(RewriteAmpUrls::new(
                &config.rewrite_amp_urls().amp_url_prefix,
            )),
            Self::ServerSideRendering => Box::new(ServerSideRendering),
            Self::AmpRuntimeCss => Box::new(AmpRuntimeCss::new(config.amp_runtime_css())),
            Self::TransformedIdentifier => Box::new(TransformedIdentifier::new(
                config.transformed_identifier(),
            )),
            Self::ReorderHead => Box::new(ReorderHead),
        }
    }
}

impl fmt::Display for TransformerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown transformer `{0}`")]
pub struct UnknownTransformer(pub String);

impl FromStr for TransformerId {
    type Err = UnknownTransformer;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|id| id.as_str() == s.trim())
            .ok_or_else(|| UnknownTransformer(s.to_string()))
    }
}
