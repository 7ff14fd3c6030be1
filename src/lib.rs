//! Server-side AMP HTML optimizer.
//!
//! Parses an AMP page, runs a configurable sequence of transformers over
//! the tree (layout hints, boilerplate removal, URL rewriting, head
//! ordering), serializes it and applies string-level tweaks.
//!
//! ```ignore
//! use std::sync::Arc;
//! use amp_optimizer::{Configuration, ErrorCollection, Optimizer};
//!
//! let optimizer = Optimizer::new(Arc::new(Configuration::default()));
//! let mut errors = ErrorCollection::new();
//! let html = optimizer.optimize_html(source, &mut errors)?;
//! ```
//!
//! # Modules
//!
//! | Module     | Purpose                                              |
//! |------------|------------------------------------------------------|
//! | `dom`      | Arena document model, html5ever parsing, serializer  |
//! | `layout`   | Static AMP layout resolution and SSR hints           |
//! | `config`   | `Configuration` loaded from `amp-optimizer.toml`     |
//! | `pipeline` | `Optimizer`, transformer registry, tweaks            |
//! | `error`    | Error taxonomy and `ErrorCollection`                 |

pub mod logger;

pub mod config;
pub mod dom;
pub mod error;
pub mod layout;
pub mod pipeline;
pub mod utils;

pub use config::{ConfigError, Configuration};
pub use dom::{Document, Element, NodeId};
pub use error::{
    Diagnostic, ErrorCollection, OptimizeError, ParseError, StructureError, TransformError,
};
pub use pipeline::{Optimizer, Transformer, TransformerId, Tweak, TweakId, optimize_html};
pub use utils::hash::content_hash;
