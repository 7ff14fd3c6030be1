//! Command-line interface module.

mod args;
pub mod optimize;

pub use args::Cli;
