//! `[rewrite_amp_urls]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [rewrite_amp_urls]
//! amp_url_prefix = "https://example.com/amp/"   # self-hosted runtime
//! ```
//!
//! The prefix replaces `https://cdn.ampproject.org/` in runtime and
//! extension URLs. It may be an absolute URL or a root-relative path and
//! must end with `/`.

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

/// Where AMP runtime scripts are served from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewriteAmpUrlsConfig {
    /// Empty keeps the AMP CDN.
    pub amp_url_prefix: String,
}

impl RewriteAmpUrlsConfig {
    pub const PREFIX: FieldPath = FieldPath::new("rewrite_amp_urls.amp_url_prefix");

    /// `enabled` is whether `rewrite_amp_urls` is in the transformer list.
    pub fn validate(&self, enabled: bool, diag: &mut ConfigDiagnostics) {
        let prefix = self.amp_url_prefix.as_str();
        if prefix.is_empty() {
            if enabled {
                diag.warn(
                    Self::PREFIX,
                    "`rewrite_amp_urls` is enabled but no prefix is set; URLs are left unchanged",
                );
            }
            return;
        }

        if !prefix.starts_with('/') && url::Url::parse(prefix).is_err() {
            diag.error_with_hint(
                Self::PREFIX,
                format!("`{prefix}` is neither an absolute URL nor a root-relative path"),
                "use e.g. \"https://example.com/amp/\" or \"/amp/\"",
            );
        }
        if !prefix.ends_with('/') {
            diag.error_with_hint(
                Self::PREFIX,
                format!("`{prefix}` must end with `/`"),
                format!("use \"{prefix}/\""),
            );
        }
    }
}
