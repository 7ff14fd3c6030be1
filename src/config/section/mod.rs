//! Per-transformer configuration sections.
//!
//! | Module        | TOML Section                 | Consumed by               |
//! |---------------|------------------------------|---------------------------|
//! | `runtime_css` | `[amp_runtime_css]`          | `amp_runtime_css`         |
//! | `amp_urls`    | `[rewrite_amp_urls]`         | `rewrite_amp_urls`        |
//! | `identifier`  | `[transformed_identifier]`   | `transformed_identifier`  |

mod amp_urls;
mod identifier;
mod runtime_css;

pub use amp_urls::RewriteAmpUrlsConfig;
pub use identifier::TransformedIdentifierConfig;
pub use runtime_css::AmpRuntimeCssConfig;
