//! Concrete transformers.
//!
//! # Modules
//!
//! - `attribute_fixup`: `data-amp-bind-x` → `[x]`
//! - `css_budget`: fails when custom CSS exceeds `max_css_byte_count`
//! - `fonts`: preconnect hint for Google Fonts
//! - `amp_urls`: self-hosted runtime URLs and preload
//! - `ssr`: layout hints and boilerplate removal
//! - `runtime_css`: inlines the runtime stylesheet into SSR'd pages
//! - `identifier`: `transformed` attribute on `<html>`
//! - `reorder_head`: recommended `<head>` order

mod amp_urls;
mod attribute_fixup;
mod css_budget;
mod fonts;
mod identifier;
mod reorder_head;
mod runtime_css;
mod ssr;

pub use amp_urls::RewriteAmpUrls;
pub use attribute_fixup::AttributeFixup;
pub use css_budget::CssBudget;
pub use fonts::GoogleFontsPreconnect;
pub use identifier::TransformedIdentifier;
pub use reorder_head::ReorderHead;
pub use runtime_css::AmpRuntimeCss;
pub use ssr::{LAYOUT_SENTINEL, NO_BOILERPLATE_SENTINEL, ServerSideRendering, SsrState};

/// Host of the official AMP runtime.
pub const AMP_CDN: &str = "https://cdn.ampproject.org/";
