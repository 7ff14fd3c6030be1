//! String-level fixups applied after serialization.
//!
//! Some serializer output is easier to correct as text than in the tree.
//! Each tweak matches a narrow, structurally anchored pattern so unrelated
//! markup is never touched.

mod amp_attr;
mod svg_sizer;

pub use amp_attr::AmpHtmlAttribute;
pub use svg_sizer::SvgSizerSource;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A pure `html -> html` rewrite.
pub trait Tweak: Send + Sync {
    fn id(&self) -> TweakId;
    fn process(&self, html: &str) -> String;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TweakId {
    SvgSizerSource,
    AmpHtmlAttribute,
}

impl TweakId {
    pub const ALL: &'static [Self] = &[Self::SvgSizerSource, Self::AmpHtmlAttribute];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SvgSizerSource => "svg_sizer_source",
            Self::AmpHtmlAttribute => "amp_html_attribute",
        }
    }

    pub fn build(self) -> Box<dyn Tweak> {
        match self {
            Self::SvgSizerSource => Box::new(SvgSizerSource),
            Self::AmpHtmlAttribute => Box::new(AmpHtmlAttribute),
        }
    }
}

impl fmt::Display for TweakId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown tweak `{0}`")]
pub struct UnknownTweak(pub String);

impl FromStr for TweakId {
    type Err = UnknownTweak;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|id| id.as_str() == s.trim())
            .ok_or_else(|| UnknownTweak(s.to_string()))
    }
}
