//! `[amp_runtime_css]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [amp_runtime_css]
//! styles = "html{overflow-x:hidden!important}..."   # contents of v0.css
//! version = "012345678901234"                      # runtime version it belongs to
//! ```
//!
//! Fetching the runtime CSS is the caller's job; the optimizer only inlines
//! what it is given. With `styles` empty the transformer does nothing.

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

/// Runtime CSS inlined into server-side rendered pages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AmpRuntimeCssConfig {
    /// Contents of the AMP runtime stylesheet.
    pub styles: String,
    /// Written to `i-amphtml-version` on the inserted `<style>`.
    pub version: String,
}

impl AmpRuntimeCssConfig {
    pub const VERSION: FieldPath = FieldPath::new("amp_runtime_css.version");

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if !self.styles.is_empty() && self.version.is_empty() {
            diag.warn(
                Self::VERSION,
                "runtime styles are set without a version; `i-amphtml-version` will be empty",
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::test_parse_config;

    #[test]
    fn test_runtime_css_defaults() {
        let config = test_parse_config("");
        assert!(config.amp_runtime_css().styles.is_empty());
        assert!(config.amp_runtime_css().version.is_empty());
    }

    #[test]
    fn test_runtime_css_config() {
        let config =
            test_parse_config("[amp_runtime_css]\nstyles = \"a{b:c}\"\nversion = \"0123\"");
        assert_eq!(config.amp_runtime_css().styles, "a{b:c}");
        assert_eq!(config.amp_runtime_css().version, "0123");
    }
}
