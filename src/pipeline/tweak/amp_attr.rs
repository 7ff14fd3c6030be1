//! Bare AMP format attributes on `<html>`.
//!
//! The serializer writes every attribute as `name="value"`, so `<html ⚡>`
//! comes out as `<html ⚡="">`. Both are valid; AMP caches and validators
//! expect the bare form.

use std::sync::LazyLock;

use regex::Regex;

use super::{Tweak, TweakId};

/// The root start tag, after any leading doctype, comments and whitespace.
static HTML_START_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)\A(?:\s+|<!--.*?-->|<!doctype[^>]*>)*(<html\b[^>]*>)").unwrap()
});

static FORMAT_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(\s)(⚡4email|⚡4ads|⚡|amp4email|amp4ads|amp)="""#).unwrap()
});

pub struct AmpHtmlAttribute;

impl Tweak for AmpHtmlAttribute {
    fn id(&self) -> TweakId {
        TweakId::AmpHtmlAttribute
    }

    fn process(&self, html: &str) -> String {
        let Some(tag) = HTML_START_TAG.captures(html).and_then(|c| c.get(1)) else {
            return html.to_string();
        };
        let fixed = FORMAT_ATTR.replace_all(tag.as_str(), "$1$2");
        format!("{}{}{}", &html[..tag.start()], fixed, &html[tag.end()..])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_format_attributes() {
        assert_eq!(
            AmpHtmlAttribute.process(r#"<!DOCTYPE html><html ⚡="" lang="en"><body amp=""></body></html>"#),
            r#"<!DOCTYPE html><html ⚡ lang="en"><body amp=""></body></html>"#
        );
        assert_eq!(
            AmpHtmlAttribute.process(r#"<html amp4email="" data-amp="">"#),
            r#"<html amp4email data-amp="">"#
        );
    }

    #[test]
    fn test_valued_attribute_untouched() {
        let html = r#"<html amp="yes">"#;
        assert_eq!(AmpHtmlAttribute.process(html), html);
    }

    #[test]
    fn test_no_html_tag() {
        assert_eq!(AmpHtmlAttribute.process("<p>x</p>"), "<p>x</p>");
    }

    #[test]
    fn test_only_root_tag_is_rewritten() {
        let html = r#"<!DOCTYPE html><!-- <html amp=""> --><html ⚡="" lang="en"><body></body></html>"#;
        assert_eq!(
            AmpHtmlAttribute.process(html),
            r#"<!DOCTYPE html><!-- <html amp=""> --><html ⚡ lang="en"><body></body></html>"#
        );
    }

    #[test]
    fn test_html_tag_after_content_is_ignored() {
        let html = r#"<p>x</p><html amp="">"#;
        assert_eq!(AmpHtmlAttribute.process(html), html);
    }
}
