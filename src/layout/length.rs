//! CSS length values as accepted by AMP `width` / `height` attributes.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

static LENGTH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+(?:\.\d+)?|\.\d+)(px|em|rem|vh|vw|vmin|vmax)?$").unwrap()
});

/// A parsed `width` or `height` attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum CssLength {
    /// Attribute absent.
    Unset,
    Auto,
    Fluid,
    Value {
        /// Numeral exactly as written (`"10"`, `"1.5"`), kept for output.
        numeral: String,
        value: f64,
        unit: &'static str,
    },
}

/// An attribute value that is not a valid length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidLength(pub String);

impl CssLength {
    /// Parse an attribute value. `allow_auto` / `allow_fluid` control
    /// whether the keywords are accepted for this attribute.
    pub fn parse(
        input: Option<&str>,
        allow_auto: bool,
        allow_fluid: bool,
    ) -> Result<Self, InvalidLength> {
        let Some(raw) = input else {
            return Ok(Self::Unset);
        };
        let trimmed = raw.trim();
        match trimmed {
            "auto" if allow_auto => return Ok(Self::Auto),
            "fluid" if allow_fluid => return Ok(Self::Fluid),
            _ => {}
        }

        let caps = LENGTH
            .captures(trimmed)
            .ok_or_else(|| InvalidLength(raw.to_string()))?;
        let numeral = caps[1].to_string();
        let value: f64 = numeral
            .parse()
            .map_err(|_| InvalidLength(raw.to_string()))?;
        let unit = match caps.get(2).map(|m| m.as_str()) {
            None | Some("px") => "px",
            Some("em") => "em",
            Some("rem") => "rem",
            Some("vh") => "vh",
            Some("vw") => "vw",
            Some("vmin") => "vmin",
            Some(_) => "vmax",
        };
        Ok(Self::Value {
            numeral,
            value,
            unit,
        })
    }

    /// Build a pixel length (used for default dimensions).
    pub fn px(numeral: &str) -> Self {
        Self::Value {
            numeral: numeral.to_string(),
            value: numeral.parse().unwrap_or_default(),
            unit: "px",
        }
    }

    #[inline]
    pub fn is_set(&self) -> bool {
        !matches!(self, Self::Unset)
    }

    #[inline]
    pub fn is_auto(&self) -> bool {
        matches!(self, Self::Auto)
    }

    #[inline]
    pub fn is_fluid(&self) -> bool {
        matches!(self, Self::Fluid)
    }

    /// Numeric value, `None` for keywords and unset.
    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Value { value, .. } => Some(*value),
            _ => None,
        }
    }

    pub fn unit(&self) -> Option<&'static str> {
        match self {
            Self::Value { unit, .. } => Some(unit),
            _ => None,
        }
    }

    pub fn numeral(&self) -> Option<&str> {
        match self {
            Self::Value { numeral, .. } => Some(numeral),
            _ => None,
        }
    }
}

impl fmt::Display for CssLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unset => Ok(()),
            Self::Auto => f.write_str("auto"),
            Self::Fluid => f.write_str("fluid"),
            Self::Value { numeral, unit, .. } => write!(f, "{numeral}{unit}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_values() {
        let len = CssLength::parse(Some("10"), false, false).unwrap();
        assert_eq!(len.to_string(), "10px");
        assert_eq!(len.value(), Some(10.0));

        let len = CssLength::parse(Some("1.5rem"), false, false).unwrap();
        assert_eq!(len.unit(), Some("rem"));
        assert_eq!(len.to_string(), "1.5rem");

        let len = CssLength::parse(Some(" 320vmax "), false, false).unwrap();
        assert_eq!(len.unit(), Some("vmax"));
    }

    #[test]
    fn test_parse_unset_and_keywords() {
        assert_eq!(CssLength::parse(None, false, false), Ok(CssLength::Unset));
        assert_eq!(CssLength::parse(Some("auto"), true, false), Ok(CssLength::Auto));
        assert_eq!(CssLength::parse(Some("fluid"), false, true), Ok(CssLength::Fluid));
        assert!(CssLength::parse(Some("auto"), false, false).is_err());
        assert!(CssLength::parse(Some("fluid"), true, false).is_err());
    }

    #[test]
    fn test_parse_invalid() {
        for bad in ["", "abc", "10%", "-5", "10 px", "1e3"] {
            assert!(
                CssLength::parse(Some(bad), true, true).is_err(),
                "`{bad}` should be invalid"
            );
        }
    }
}
