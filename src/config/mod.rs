//! Optimizer configuration (`amp-optimizer.toml`).
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Per-transformer sections
//! │   ├── amp_urls   # [rewrite_amp_urls]
//! │   ├── identifier # [transformed_identifier]
//! │   └── runtime_css# [amp_runtime_css]
//! ├── types/         # ConfigError, ConfigDiagnostics, FieldPath
//! └── mod.rs         # Configuration (this file)
//! ```
//!
//! # Example
//!
//! ```toml
//! transformers = ["attribute_fixup", "server_side_rendering", "reorder_head"]
//! required = ["server_side_rendering"]
//! max_css_byte_count = 75000
//! tweaks = ["svg_sizer_source", "amp_html_attribute"]
//!
//! [rewrite_amp_urls]
//! amp_url_prefix = "/amp/"
//! ```
//!
//! Every key has a default, so an empty file is a valid configuration. Keys
//! that are not registered are rejected with [`ConfigError::UnknownKey`].
//! A `Configuration` is never mutated once built; the `with_*` methods
//! consume it and return a new one.

mod section;
mod types;

pub use section::{AmpRuntimeCssConfig, RewriteAmpUrlsConfig, TransformedIdentifierConfig};
pub use types::{ConfigDiagnostic, ConfigDiagnostics, ConfigError, FieldPath, Severity};

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::pipeline::{TransformerId, TweakId};
use crate::utils::hash::content_hash;

/// Default ceiling for custom CSS, in bytes.
pub const DEFAULT_MAX_CSS_BYTE_COUNT: usize = 75_000;

// ============================================================================
// root configuration
// ============================================================================

/// Validated, immutable optimizer configuration.
///
/// Field order matters: plain values must precede tables for TOML output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    /// Transformers to run, in order.
    transformers: Vec<TransformerId>,

    /// Transformers whose failure aborts the optimize call.
    required: Vec<TransformerId>,

    /// Ceiling for `style[amp-custom]` plus inline styles.
    max_css_byte_count: usize,

    /// String-level fixups applied after serialization, in order.
    tweaks: Vec<TweakId>,

    amp_runtime_css: AmpRuntimeCssConfig,
    rewrite_amp_urls: RewriteAmpUrlsConfig,
    transformed_identifier: TransformedIdentifierConfig,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            transformers: TransformerId::DEFAULT_ORDER.to_vec(),
            required: Vec::new(),
            max_css_byte_count: DEFAULT_MAX_CSS_BYTE_COUNT,
            tweaks: TweakId::ALL.to_vec(),
            amp_runtime_css: AmpRuntimeCssConfig::default(),
            rewrite_amp_urls: RewriteAmpUrlsConfig::default(),
            transformed_identifier: TransformedIdentifierConfig::default(),
        }
    }
}

impl Configuration {
    // ========================================================================
    // construction
    // ========================================================================

    /// Parse and validate a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Self::parse_str(content)?.validated()
    }

    /// Read, parse and validate a config file.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        Self::parse_path(path)?.validated()
    }

    /// Parse a TOML string, rejecting unknown keys but not validating.
    ///
    /// For callers that apply overrides first and then call
    /// [`Self::validated`] once.
    pub fn parse_str(content: &str) -> Result<Self, ConfigError> {
        let (config, ignored) = Self::parse_with_ignored(content)?;
        if !ignored.is_empty() {
            return Err(ConfigError::UnknownKey(ignored.join(", ")));
        }
        Ok(config)
    }

    /// [`Self::parse_str`] on the contents of `path`.
    pub fn parse_path(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        Self::parse_str(&content)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Default configuration whose transformer list merges `transformers`
    /// into [`TransformerId::DEFAULT_ORDER`].
    ///
    /// The slots of the listed transformers are filled in caller order;
    /// every other transformer keeps its default position.
    ///
    /// ```text
    /// default: [a, b, c, d]    listed: [d, b]    result: [a, d, c, b]
    /// ```
    pub fn with_defaults(transformers: &[TransformerId]) -> Self {
        Self::default().with_transformer_order(transformers)
    }

    /// Reorder the current transformer list as [`Self::with_defaults`] does.
    pub fn with_transformer_order(mut self, listed: &[TransformerId]) -> Self {
        let mut listed_unique: Vec<TransformerId> = Vec::with_capacity(listed.len());
        for id in listed {
            if !listed_unique.contains(id) {
                listed_unique.push(*id);
            }
        }

        let (in_list, extra): (Vec<_>, Vec<_>) = listed_unique
            .into_iter()
            .partition(|id| self.transformers.contains(id));

        let mut caller_order = in_list.into_iter();
        for slot in self.transformers.iter_mut() {
            if listed.contains(slot)
                && let Some(id) = caller_order.next()
            {
                *slot = id;
            }
        }
        self.transformers.extend(extra);
        self
    }

    /// Replace the transformer list outright.
    pub fn with_transformers(mut self, transformers: Vec<TransformerId>) -> Self {
        self.transformers = transformers;
        self
    }

    pub fn with_required(mut self, required: Vec<TransformerId>) -> Self {
        self.required = required;
        self
    }

    pub fn with_max_css_byte_count(mut self, max: usize) -> Self {
        self.max_css_byte_count = max;
        self
    }

    pub fn with_tweaks(mut self, tweaks: Vec<TweakId>) -> Self {
        self.tweaks = tweaks;
        self
    }

    pub fn with_amp_runtime_css(mut self, section: AmpRuntimeCssConfig) -> Self {
        self.amp_runtime_css = section;
        self
    }

    pub fn with_amp_url_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.rewrite_amp_urls.amp_url_prefix = prefix.into();
        self
    }

    pub fn with_transformed_identifier(mut self, section: TransformedIdentifierConfig) -> Self {
        self.transformed_identifier = section;
        self
    }

    // ========================================================================
    // read-only views
    // ========================================================================

    pub fn transformers(&self) -> &[TransformerId] {
        &self.transformers
    }

    pub fn required(&self) -> &[TransformerId] {
        &self.required
    }

    pub fn is_required(&self, id: TransformerId) -> bool {
        self.required.contains(&id)
    }

    pub fn max_css_byte_count(&self) -> usize {
        self.max_css_byte_count
    }

    pub fn tweaks(&self) -> &[TweakId] {
        &self.tweaks
    }

    pub fn amp_runtime_css(&self) -> &AmpRuntimeCssConfig {
        &self.amp_runtime_css
    }

    pub fn rewrite_amp_urls(&self) -> &RewriteAmpUrlsConfig {
        &self.rewrite_amp_urls
    }

    pub fn transformed_identifier(&self) -> &TransformedIdentifierConfig {
        &self.transformed_identifier
    }

    /// Look up a value by dotted key, e.g. `rewrite_amp_urls.amp_url_prefix`.
    pub fn get(&self, key: &str) -> Result<toml::Value, ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let table = toml::Value::try_from(self)?;
        key.split('.')
            .try_fold(&table, |value, part| value.get(part).ok_or_else(unknown))
            .cloned()
    }

    /// Stable hash of the effective configuration, for caller-side caches
    /// keyed by (input hash, configuration hash).
    pub fn fingerprint(&self) -> Result<String, ConfigError> {
        let serialized = toml::to_string(self)?;
        Ok(content_hash(&serialized))
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Validate, consuming `self` so an invalid configuration is never used.
    pub fn validated(self) -> Result<Self, ConfigError> {
        self.validate()?;
        Ok(self)
    }

    /// Collect every validation error and return them at once.
    pub fn validate(&self) -> Result<(), ConfigError> {
        const TRANSFORMERS: FieldPath = FieldPath::new("transformers");
        const REQUIRED: FieldPath = FieldPath::new("required");
        const MAX_CSS: FieldPath = FieldPath::new("max_css_byte_count");
        const TWEAKS: FieldPath = FieldPath::new("tweaks");

        let mut diag = ConfigDiagnostics::new();

        for (i, id) in self.transformers.iter().enumerate() {
            if self.transformers[..i].contains(id) {
                diag.error(TRANSFORMERS, format!("`{id}` is listed more than once"));
            }
        }
        for id in &self.required {
            if !self.transformers.contains(id) {
                diag.error_with_hint(
                    REQUIRED,
                    format!("`{id}` is required but not in `transformers`"),
                    format!("add \"{id}\" to `transformers`"),
                );
            }
        }
        for (i, id) in self.tweaks.iter().enumerate() {
            if self.tweaks[..i].contains(id) {
                diag.error(TWEAKS, format!("`{id}` is listed more than once"));
            }
        }
        if self.max_css_byte_count == 0 {
            diag.error(MAX_CSS, "must be greater than 0");
        }

        self.amp_runtime_css.validate(&mut diag);
        self.rewrite_amp_urls.validate(
            self.transformers.contains(&TransformerId::RewriteAmpUrls),
            &mut diag,
        );
        self.transformed_identifier.validate(&mut diag);

        diag.print_warnings();
        diag.into_result().map_err(ConfigError::Diagnostics)
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse a config, panicking on unknown fields to catch typos in tests.
#[cfg(test)]
pub fn test_parse_config(content: &str) -> Configuration {
    let (parsed, ignored) = Configuration::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use TransformerId::*;

    #[test]
    fn test_defaults() {
        let config = test_parse_config("");
        assert_eq!(config, Configuration::default());
        assert_eq!(config.transformers(), TransformerId::DEFAULT_ORDER);
        assert_eq!(config.max_css_byte_count(), 75_000);
        assert!(config.required().is_empty());
        assert_eq!(config.tweaks(), TweakId::ALL);
    }

    #[test]
    fn test_from_toml_str() {
        let config = Configuration::from_toml_str(
            "transformers = [\"server_side_rendering\", \"reorder_head\"]\n\
             required = [\"server_side_rendering\"]\n\
             max_css_byte_count = 1000",
        )
        .unwrap();
        assert_eq!(config.transformers(), [ServerSideRendering, ReorderHead]);
        assert!(config.is_required(ServerSideRendering));
        assert!(!config.is_required(ReorderHead));
        assert_eq!(config.max_css_byte_count(), 1000);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = Configuration::from_toml_str("max_css_bytes = 10").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownKey(ref k) if k == "max_css_bytes"));

        let err =
            Configuration::from_toml_str("[rewrite_amp_urls]\nprefix = \"/amp/\"").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownKey(ref k) if k.contains("prefix")));
    }

    #[test]
    fn test_parse_str_defers_validation() {
        let parsed = Configuration::parse_str("max_css_byte_count = 0").unwrap();
        assert!(parsed.clone().validated().is_err());
        assert!(parsed.with_max_css_byte_count(10).validated().is_ok());

        let err = Configuration::parse_str("max_css_bytes = 10").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownKey(_)));
    }

    #[test]
    fn test_unknown_transformer_rejected_at_parse() {
        let err = Configuration::from_toml_str("transformers = [\"minify\"]").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn test_invalid_toml() {
        let err = Configuration::from_toml_str("[amp_runtime_css\nstyles = 1").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn test_get_by_dotted_key() {
        let config = Configuration::default().with_amp_url_prefix("/amp/");
        assert_eq!(
            config.get("rewrite_amp_urls.amp_url_prefix").unwrap(),
            toml::Value::String("/amp/".to_string())
        );
        assert_eq!(
            config.get("max_css_byte_count").unwrap(),
            toml::Value::Integer(75_000)
        );
        assert_eq!(
            config.get("transformed_identifier.version").unwrap(),
            toml::Value::Integer(1)
        );
        assert!(matches!(
            config.get("rewrite_amp_urls.nope"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(matches!(config.get("nope"), Err(ConfigError::UnknownKey(_))));
    }

    #[test]
    fn test_with_defaults_preserves_caller_order() {
        let config = Configuration::with_defaults(&[ReorderHead, AttributeFixup]);
        let order = config.transformers();

        assert_eq!(order.len(), TransformerId::DEFAULT_ORDER.len());
        // The two slots swap; everything else stays put.
        assert_eq!(order[0], ReorderHead);
        assert_eq!(*order.last().unwrap(), AttributeFixup);
        assert_eq!(&order[1..order.len() - 1], &TransformerId::DEFAULT_ORDER[1..order.len() - 1]);
    }

    #[test]
    fn test_with_defaults_already_in_order() {
        let config = Configuration::with_defaults(&[CssBudget, ServerSideRendering]);
        assert_eq!(config.transformers(), TransformerId::DEFAULT_ORDER);
    }

    #[test]
    fn test_with_defaults_ignores_duplicates() {
        let config = Configuration::with_defaults(&[ReorderHead, ReorderHead]);
        assert_eq!(config.transformers(), TransformerId::DEFAULT_ORDER);
    }

    #[test]
    fn test_with_transformer_order_appends_unlisted() {
        let config = Configuration::default()
            .with_transformers(vec![ServerSideRendering])
            .with_transformer_order(&[AttributeFixup, ServerSideRendering]);
        assert_eq!(config.transformers(), [ServerSideRendering, AttributeFixup]);
    }

    #[test]
    fn test_validation_collects_all_errors() {
        let config = Configuration::default()
            .with_transformers(vec![AttributeFixup, AttributeFixup])
            .with_required(vec![ServerSideRendering])
            .with_max_css_byte_count(0);
        let Err(ConfigError::Diagnostics(diag)) = config.validate() else {
            panic!("expected diagnostics");
        };
        assert_eq!(diag.len(), 3);
    }

    #[test]
    fn test_validation_rejects_bad_prefix() {
        let err = Configuration::from_toml_str("[rewrite_amp_urls]\namp_url_prefix = \"amp\"")
            .unwrap_err();
        assert!(matches!(err, ConfigError::Diagnostics(_)));
    }

    #[test]
    fn test_fingerprint() {
        let a = Configuration::default();
        let b = Configuration::default();
        let c = Configuration::default().with_max_css_byte_count(10);
        assert_eq!(a.fingerprint().unwrap(), b.fingerprint().unwrap());
        assert_ne!(a.fingerprint().unwrap(), c.fingerprint().unwrap());
        assert_eq!(a.fingerprint().unwrap().len(), 64);
    }

    #[test]
    fn test_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("amp-optimizer.toml");
        fs::write(&path, "tweaks = []").unwrap();
        let config = Configuration::from_path(&path).unwrap();
        assert!(config.tweaks().is_empty());

        let err = Configuration::from_path(&dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(..)));
    }
}
