//! Config field path.

use owo_colors::{OwoColorize, Stream};
use std::fmt;

/// A dotted path into the configuration, e.g. `rewrite_amp_urls.amp_url_prefix`.
///
/// Section structs expose their paths as associated constants so
/// diagnostics never carry a misspelled key:
///
/// ```ignore
/// diag.error(RewriteAmpUrlsConfig::PREFIX, "must end with `/`");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldPath(pub &'static str);

impl FieldPath {
    #[inline]
    pub const fn new(path: &'static str) -> Self {
        Self(path)
    }

    #[inline]
    pub const fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let quoted = format!("`{}`", self.0);
        write!(
            f,
            "{}",
            quoted.if_supports_color(Stream::Stderr, |q| q.bright_blue())
        )
    }
}

impl AsRef<str> for FieldPath {
    fn as_ref(&self) -> &str {
        self.0
    }
}
