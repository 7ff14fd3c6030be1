//! Un-escape the SVG markup inside intrinsic sizer data URIs.
//!
//! The serializer escapes `<` and `>` in every attribute value, which turns
//! the sizer's `data:image/svg+xml` source into `&lt;svg ...&gt;`. Browsers
//! accept either, but the raw form is what AMP caches emit and compare
//! against. Only `src` values directly inside `<i-amphtml-sizer><img>` are
//! touched; `&quot;` stays escaped since the value is double-quoted.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::{Tweak, TweakId};

static SIZER_SRC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?s)(<i-amphtml-sizer\b[^>]*>\s*<img\b[^>]*?\bsrc=")(data:image/svg\+xml;charset=utf-8,[^"]*)(")"#,
    )
    .unwrap()
});

pub struct SvgSizerSource;

impl Tweak for SvgSizerSource {
    fn id(&self) -> TweakId {
        TweakId::SvgSizerSource
    }

    fn process(&self, html: &str) -> String {
        SIZER_SRC
            .replace_all(html, |caps: &Captures<'_>| {
                let uri = caps[2].replace("&lt;", "<").replace("&gt;", ">");
                format!("{}{}{}", &caps[1], uri, &caps[3])
            })
            .into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unescapes_sizer_svg() {
        let html = r#"<i-amphtml-sizer class="i-amphtml-sizer"><img alt="" src="data:image/svg+xml;charset=utf-8,&lt;svg height=&quot;1&quot;/&gt;"></i-amphtml-sizer>"#;
        assert_eq!(
            SvgSizerSource.process(html),
            r#"<i-amphtml-sizer class="i-amphtml-sizer"><img alt="" src="data:image/svg+xml;charset=utf-8,<svg height=&quot;1&quot;/>"></i-amphtml-sizer>"#
        );
    }

    #[test]
    fn test_other_images_untouched() {
        let html = r#"<div><img src="data:image/svg+xml;charset=utf-8,&lt;svg/&gt;"></div><p>&lt;b&gt;</p>"#;
        assert_eq!(SvgSizerSource.process(html), html);
    }

    #[test]
    fn test_idempotent() {
        let html = r#"<i-amphtml-sizer><img src="data:image/svg+xml;charset=utf-8,&lt;svg/&gt;"></i-amphtml-sizer>"#;
        let once = SvgSizerSource.process(html);
        assert_eq!(SvgSizerSource.process(&once), once);
    }
}
