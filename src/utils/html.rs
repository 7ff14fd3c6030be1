//! HTML utility functions.
//!
//! Provides the character-level rules the serializer relies on:
//! - `escape_text()`, `escape_attr()` - HTML entity escaping
//! - `is_void_element()` - Elements without end tags (br, img, etc.)
//! - `is_raw_text_element()` - Elements whose text is written verbatim
//! - `is_amp_element()` - AMP custom elements (`amp-*`)

use std::borrow::Cow;

// =============================================================================
// HTML Escaping
// =============================================================================

/// Characters that require escaping in text content.
const TEXT_ESCAPE_CHARS: [char; 3] = ['<', '>', '&'];

/// Characters that require escaping in attribute values.
const ATTR_ESCAPE_CHARS: [char; 5] = ['<', '>', '&', '"', '\''];

/// Get the HTML entity for a special character.
#[inline]
fn escape_char(c: char) -> Option<&'static str> {
    match c {
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        '&' => Some("&amp;"),
        '"' => Some("&quot;"),
        '\'' => Some("&#39;"),
        _ => None,
    }
}

/// Escape HTML special characters in text content.
///
/// Uses `Cow` to avoid allocation when no escaping is needed.
///
/// # Example
/// ```ignore
/// assert_eq!(escape_text("a < b"), "a &lt; b");
/// assert_eq!(escape_text("hello"), "hello"); // No allocation
/// ```
#[inline]
pub fn escape_text(s: &str) -> Cow<'_, str> {
    escape_with(s, &TEXT_ESCAPE_CHARS)
}

/// Escape HTML attribute values.
///
/// Quotes are escaped too, so values are always safe inside `"..."`.
#[inline]
pub fn escape_attr(s: &str) -> Cow<'_, str> {
    escape_with(s, &ATTR_ESCAPE_CHARS)
}

/// Internal: escape with specified character set.
#[inline]
fn escape_with<'a>(s: &'a str, chars: &[char]) -> Cow<'a, str> {
    if !s.contains(chars) {
        return Cow::Borrowed(s);
    }

    let mut result = String::with_capacity(s.len() + 16);
    for c in s.chars() {
        match escape_char(c) {
            Some(entity) if chars.contains(&c) => result.push_str(entity),
            _ => result.push(c),
        }
    }
    Cow::Owned(result)
}

// =============================================================================
// Element Classification
// =============================================================================

/// Check if an HTML tag is a void element.
///
/// Void elements cannot have children and are rendered without an end tag.
#[inline]
pub fn is_void_element(tag: &str) -> bool {
    matches!(
        tag,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}

/// Check if tag is a raw text element (content must not be HTML-escaped).
#[inline]
pub fn is_raw_text_element(tag: &str) -> bool {
    matches!(
        tag,
        "script" | "style" | "xmp" | "iframe" | "noembed" | "noframes" | "plaintext"
    )
}

/// Check if tag names an AMP custom element.
#[inline]
pub fn is_amp_element(tag: &str) -> bool {
    tag.len() > 4 && tag.starts_with("amp-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_text_keeps_quotes() {
        assert_eq!(escape_text(r#"a < "b" & c"#), r#"a &lt; "b" &amp; c"#);
        assert!(matches!(escape_text("plain"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_escape_attr_escapes_quotes() {
        assert_eq!(escape_attr(r#"say "hi" 'x'"#), "say &quot;hi&quot; &#39;x&#39;");
        assert_eq!(escape_attr("<svg/>"), "&lt;svg/&gt;");
    }

    #[test]
    fn test_element_classification() {
        assert!(is_void_element("img"));
        assert!(!is_void_element("amp-img"));
        assert!(is_raw_text_element("style"));
        assert!(!is_raw_text_element("noscript"));
        assert!(is_amp_element("amp-img"));
        assert!(!is_amp_element("amp-"));
        assert!(!is_amp_element("img"));
    }
}
