//! `[transformed_identifier]` section configuration.
//!
//! ```toml
//! [transformed_identifier]
//! origin = "self"   # who transformed the page
//! version = 1       # transform version, 0 omits the `;v=` suffix
//! ```

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformedIdentifierConfig {
    pub origin: String,
    pub version: u32,
}

impl Default for TransformedIdentifierConfig {
    fn default() -> Self {
        Self {
            origin: "self".to_string(),
            version: 1,
        }
    }
}

impl TransformedIdentifierConfig {
    pub const ORIGIN: FieldPath = FieldPath::new("transformed_identifier.origin");

    /// Value of the `transformed` attribute.
    pub fn attribute_value(&self) -> String {
        match self.version {
            0 => self.origin.clone(),
            v => format!("{};v={v}", self.origin),
        }
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.origin.trim().is_empty() {
            diag.error(Self::ORIGIN, "origin must not be empty");
        } else if self.origin.contains(';') || self.origin.contains(char::is_whitespace) {
            diag.error(
                Self::ORIGIN,
                format!("`{}` must not contain `;` or whitespace", self.origin),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_value() {
        assert_eq!(
            TransformedIdentifierConfig::default().attribute_value(),
            "self;v=1"
        );
        let config = TransformedIdentifierConfig {
            origin: "google".to_string(),
            version: 0,
        };
        assert_eq!(config.attribute_value(), "google");
    }

    #[test]
    fn test_origin_validation() {
        let mut diag = ConfigDiagnostics::new();
        TransformedIdentifierConfig {
            origin: "my cache".to_string(),
            version: 1,
        }
        .validate(&mut diag);
        assert_eq!(diag.len(), 1);
    }
}
