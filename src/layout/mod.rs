//! Static layout resolution for AMP custom elements.
//!
//! [`resolve_layout`] is a pure function of an element's attributes. It
//! follows the AMP layout rules:
//!
//! ```text
//! layout attr set?  ── yes ──> use it
//!        │ no
//! no width, no height ───────> container
//! height == fluid ───────────> fluid
//! height, width unset/auto ──> fixed-height
//! width + height + sizes/heights ─> responsive
//! otherwise ─────────────────> fixed
//! ```
//!
//! [`apply_layout`] writes the resolved layout back as server-side-rendering
//! hints (`i-amphtml-layout`, layout classes, size styles, sizers).

mod length;

pub use length::{CssLength, InvalidLength};

use std::fmt;

use thiserror::Error;

use crate::dom::{Document, Element, NodeId};

// ============================================================================
// Types
// ============================================================================

/// AMP layout values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layout {
    Nodisplay,
    Fixed,
    FixedHeight,
    Responsive,
    Container,
    Fill,
    FlexItem,
    Fluid,
    Intrinsic,
}

impl Layout {
    /// Parse a `layout` attribute value (case-insensitive).
    pub fn parse(value: &str) -> Option<Self> {
        let layout = match value.trim().to_ascii_lowercase().as_str() {
            "nodisplay" => Self::Nodisplay,
            "fixed" => Self::Fixed,
            "fixed-height" => Self::FixedHeight,
            "responsive" => Self::Responsive,
            "container" => Self::Container,
            "fill" => Self::Fill,
            "flex-item" => Self::FlexItem,
            "fluid" => Self::Fluid,
            "intrinsic" => Self::Intrinsic,
            _ => return None,
        };
        Some(layout)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Nodisplay => "nodisplay",
            Self::Fixed => "fixed",
            Self::FixedHeight => "fixed-height",
            Self::Responsive => "responsive",
            Self::Container => "container",
            Self::Fill => "fill",
            Self::FlexItem => "flex-item",
            Self::Fluid => "fluid",
            Self::Intrinsic => "intrinsic",
        }
    }

    /// Layouts whose box size is known before the runtime loads.
    pub const fn is_size_defined(self) -> bool {
        matches!(
            self,
            Self::Fixed
                | Self::FixedHeight
                | Self::Responsive
                | Self::Fill
                | Self::FlexItem
                | Self::Fluid
                | Self::Intrinsic
        )
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A statically resolved layout with its effective dimensions.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutResult {
    pub layout: Layout,
    pub width: CssLength,
    pub height: CssLength,
}

/// Why a layout could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// An attribute value does not parse. The element is skipped.
    #[error("{0}")]
    Malformed(String),

    /// Attributes are well-formed but the layout needs the runtime.
    #[error("{0}")]
    Unresolvable(String),
}

// ============================================================================
// Element tables
// ============================================================================

/// Elements that are always laid out by the runtime.
const RUNTIME_LAYOUT_ELEMENTS: &[&str] = &["amp-audio", "amp-experiment", "amp-story"];

/// Attributes that need media queries evaluated by the runtime.
const RUNTIME_LAYOUT_ATTRS: &[&str] = &["media", "sizes", "heights"];

const MEDIA_LAYOUTS: &[Layout] = &[
    Layout::Fill,
    Layout::Fixed,
    Layout::FixedHeight,
    Layout::FlexItem,
    Layout::Intrinsic,
    Layout::Nodisplay,
    Layout::Responsive,
];

const CONTAINER_LAYOUTS: &[Layout] = &[
    Layout::Container,
    Layout::Fill,
    Layout::Fixed,
    Layout::FixedHeight,
    Layout::FlexItem,
    Layout::Intrinsic,
    Layout::Nodisplay,
    Layout::Responsive,
];

const INVISIBLE_LAYOUTS: &[Layout] = &[Layout::Fixed, Layout::Nodisplay];

const ANY_BUT_CONTAINER: &[Layout] = &[
    Layout::Fill,
    Layout::Fixed,
    Layout::FixedHeight,
    Layout::FlexItem,
    Layout::Fluid,
    Layout::Intrinsic,
    Layout::Nodisplay,
    Layout::Responsive,
];

fn supported_layouts(tag: &str) -> &'static [Layout] {
    match tag {
        "amp-img" | "amp-anim" | "amp-video" | "amp-iframe" | "amp-youtube" | "amp-vimeo"
        | "amp-instagram" | "amp-twitter" | "amp-carousel" => MEDIA_LAYOUTS,
        "amp-layout" | "amp-accordion" | "amp-selector" | "amp-script" | "amp-mega-menu"
        | "amp-nested-menu" => CONTAINER_LAYOUTS,
        "amp-pixel" | "amp-analytics" => INVISIBLE_LAYOUTS,
        _ => ANY_BUT_CONTAINER,
    }
}

/// Width and height used when the attributes are absent.
fn default_dimensions(tag: &str) -> Option<(&'static str, &'static str)> {
    match tag {
        "amp-pixel" | "amp-analytics" => Some(("1", "1")),
        "amp-social-share" => Some(("60", "44")),
        _ => None,
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve an element's layout from its `layout`, `width` and `height`.
pub fn resolve_layout(element: &Element) -> Result<LayoutResult, LayoutError> {
    let tag = element.name.as_str();

    let input_layout = match element.attr("layout") {
        Some(value) => Some(
            Layout::parse(value)
                .ok_or_else(|| LayoutError::Malformed(format!("invalid layout `{value}`")))?,
        ),
        None => None,
    };
    let mut width = CssLength::parse(element.attr("width"), true, false)
        .map_err(|e| LayoutError::Malformed(format!("invalid width `{}`", e.0)))?;
    let mut height = CssLength::parse(element.attr("height"), false, true)
        .map_err(|e| LayoutError::Malformed(format!("invalid height `{}`", e.0)))?;

    if RUNTIME_LAYOUT_ELEMENTS.contains(&tag) {
        return Err(LayoutError::Unresolvable(format!(
            "<{tag}> is laid out by the runtime"
        )));
    }
    if let Some(attr) = RUNTIME_LAYOUT_ATTRS
        .iter()
        .find(|attr| element.has_attr(attr))
    {
        return Err(LayoutError::Unresolvable(format!(
            "`{attr}` attribute needs the runtime"
        )));
    }

    if let Some((default_width, default_height)) = default_dimensions(tag) {
        if !width.is_set() && matches!(input_layout, None | Some(Layout::Fixed)) {
            width = CssLength::px(default_width);
        }
        if !height.is_set()
            && matches!(
                input_layout,
                None | Some(Layout::Fixed) | Some(Layout::FixedHeight)
            )
        {
            height = CssLength::px(default_height);
        }
    }

    let layout = input_layout.unwrap_or_else(|| infer_layout(element, &width, &height));
    check_dimensions(layout, &width, &height)?;

    if !supported_layouts(tag).contains(&layout) {
        return Err(LayoutError::Unresolvable(format!(
            "<{tag}> does not support layout `{layout}`"
        )));
    }

    Ok(LayoutResult {
        layout,
        width,
        height,
    })
}

fn infer_layout(element: &Element, width: &CssLength, height: &CssLength) -> Layout {
    if !width.is_set() && !height.is_set() {
        Layout::Container
    } else if height.is_fluid() {
        Layout::Fluid
    } else if height.is_set() && (!width.is_set() || width.is_auto()) {
        Layout::FixedHeight
    } else if height.is_set()
        && width.is_set()
        && (element.has_attr("sizes") || element.has_attr("heights"))
    {
        Layout::Responsive
    } else {
        Layout::Fixed
    }
}

/// Dimension requirements of each layout.
fn check_dimensions(
    layout: Layout,
    width: &CssLength,
    height: &CssLength,
) -> Result<(), LayoutError> {
    let unresolvable = |msg: &str| Err(LayoutError::Unresolvable(format!("layout `{layout}` {msg}")));

    if height.is_fluid() && layout != Layout::Fluid {
        return unresolvable("cannot use height `fluid`");
    }
    match layout {
        Layout::Fixed => {
            if width.value().is_none() || height.value().is_none() {
                return unresolvable("requires numeric width and height");
            }
        }
        Layout::FixedHeight => {
            if height.value().is_none() {
                return unresolvable("requires a numeric height");
            }
            if width.value().is_some() {
                return unresolvable("requires width to be unset or `auto`");
            }
        }
        Layout::Responsive | Layout::Intrinsic => {
            let (Some(w), Some(h)) = (width.value(), height.value()) else {
                return unresolvable("requires numeric width and height");
            };
            if width.unit() != height.unit() {
                return unresolvable("requires width and height in the same unit");
            }
            if w <= 0.0 || h <= 0.0 {
                return unresolvable("requires positive width and height");
            }
        }
        Layout::FlexItem | Layout::Fill | Layout::Container | Layout::Nodisplay => {
            if width.is_auto() {
                return unresolvable("cannot use width `auto`");
            }
        }
        Layout::Fluid => {}
    }
    Ok(())
}

// ============================================================================
// Application
// ============================================================================

/// Size declarations [`apply_layout`] puts in front of an element's own
/// `style`.
pub fn layout_styles(resolved: &LayoutResult) -> String {
    let LayoutResult {
        layout,
        width,
        height,
    } = resolved;
    match layout {
        Layout::Fixed => format!("width:{width};height:{height};"),
        Layout::FixedHeight => format!("height:{height};"),
        Layout::FlexItem => {
            let mut styles = String::new();
            if width.value().is_some() {
                styles.push_str(&format!("width:{width};"));
            }
            if height.value().is_some() {
                styles.push_str(&format!("height:{height};"));
            }
            styles
        }
        Layout::Fluid => "width:100%;height:0;".to_string(),
        _ => String::new(),
    }
}

/// Write the resolved layout onto element `id` as SSR hints.
pub fn apply_layout(doc: &mut Document, id: NodeId, resolved: &LayoutResult) {
    let LayoutResult {
        layout,
        width,
        height,
    } = resolved;
    let layout = *layout;

    let styles = layout_styles(resolved);
    let sizer = match layout {
        Layout::Nodisplay => {
            doc.set_attr(id, "hidden", "hidden");
            None
        }
        Layout::Responsive => Some(responsive_sizer(doc, width, height)),
        Layout::Intrinsic => Some(intrinsic_sizer(doc, width, height)),
        _ => None,
    };

    if let Some(element) = doc.element_mut(id) {
        element.add_class(&format!("i-amphtml-layout-{layout}"));
        if layout.is_size_defined() {
            element.add_class("i-amphtml-layout-size-defined");
        }
        if layout == Layout::Fluid {
            element.add_class("i-amphtml-layout-awaiting-size");
        }
        if !styles.is_empty() {
            let existing = element.attr("style").unwrap_or_default().trim();
            let style = format!("{styles}{existing}");
            element.set_attr("style", style);
        }
        element.set_attr("i-amphtml-layout", layout.as_str());
    }

    if let Some(sizer) = sizer {
        doc.prepend_child(id, sizer);
    }
}

fn responsive_sizer(doc: &mut Document, width: &CssLength, height: &CssLength) -> NodeId {
    let ratio = height.value().unwrap_or_default() / width.value().unwrap_or(1.0) * 100.0;
    doc.create_element(
        Element::new("i-amphtml-sizer")
            .with_attr("style", format!("display:block;padding-top:{ratio:.4}%")),
    )
}

fn intrinsic_sizer(doc: &mut Document, width: &CssLength, height: &CssLength) -> NodeId {
    let svg = format!(
        "data:image/svg+xml;charset=utf-8,<svg height=\"{}\" width=\"{}\" xmlns=\"http://www.w3.org/2000/svg\" version=\"1.1\"/>",
        height.numeral().unwrap_or_default(),
        width.numeral().unwrap_or_default(),
    );
    let img = doc.create_element(
        Element::new("img")
            .with_attr("alt", "")
            .with_attr("aria-hidden", "true")
            .with_attr("class", "i-amphtml-intrinsic-sizer")
            .with_attr("role", "presentation")
            .with_attr("src", svg),
    );
    let sizer = doc.create_element(Element::new("i-amphtml-sizer").with_attr("class", "i-amphtml-sizer"));
    doc.append_child(sizer, img);
    sizer
}
