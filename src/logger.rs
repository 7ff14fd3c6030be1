//! Logging utilities with colored output.
//!
//! This module provides:
//! - `log!` macro for formatted stderr output with colored prefixes
//! - `debug!` macro for output that only appears with `--verbose`
//!
//! Everything goes to stderr: stdout is reserved for optimized HTML.
//!
//! # Example
//!
//! ```ignore
//! log!("optimize"; "optimizing {} files", count);
//! debug!("ssr"; "skipping <{}>: {}", tag, reason);
//! ```

use owo_colors::{OwoColorize, Stream};
use std::{
    io::{Write, stderr},
    sync::atomic::{AtomicBool, Ordering},
};

/// Global verbose flag (set by --verbose CLI argument)
static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Set verbose mode globally
pub fn set_verbose(v: bool) {
    VERBOSE.store(v, Ordering::SeqCst);
}

/// Check if verbose mode is enabled
pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::SeqCst)
}

// ============================================================================
// Log Macro
// ============================================================================

/// Log a message with a colored module prefix
///
/// # Usage
/// ```ignore
/// log!("module"; "message with {} formatting", args);
/// ```
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

/// Log a debug message (only shown when --verbose is enabled)
///
/// # Usage
/// ```ignore
/// debug!("module"; "debug info: {}", value);
/// ```
#[macro_export]
macro_rules! debug {
    ($module:expr; $($arg:tt)*) => {{
        if $crate::logger::is_verbose() {
            $crate::logger::log($module, &format!($($arg)*))
        }
    }};
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Log a message with a colored module prefix
#[inline]
pub fn log(module: &str, message: &str) {
    let module_lower = module.to_ascii_lowercase();
    let prefix = colorize_prefix(module, &module_lower);

    let mut stderr = stderr().lock();
    writeln!(stderr, "{prefix} {message}").ok();
    stderr.flush().ok();
}

/// Apply color to a module prefix based on module type.
///
/// Honors `owo_colors::set_override` (`--color`) and whether stderr is a
/// terminal.
#[inline]
fn colorize_prefix(module: &str, module_lower: &str) -> String {
    let prefix = format!("[{module}]");
    let styled = |style: fn(&String) -> String| {
        prefix
            .if_supports_color(Stream::Stderr, |p| style(p))
            .to_string()
    };
    match module_lower {
        "optimize" => styled(|p: &String| p.bright_blue().bold().to_string()),
        "done" => styled(|p: &String| p.bright_green().bold().to_string()),
        "error" => styled(|p: &String| p.bright_red().bold().to_string()),
        "warning" => styled(|p: &String| p.bright_magenta().bold().to_string()),
        _ => styled(|p: &String| p.bright_yellow().bold().to_string()),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_contains_module_name() {
        assert!(colorize_prefix("ssr", "ssr").contains("[ssr]"));
        assert!(colorize_prefix("Error", "error").contains("[Error]"));
    }

    #[test]
    fn test_color_override_disables_ansi() {
        owo_colors::set_override(false);
        assert_eq!(colorize_prefix("ssr", "ssr"), "[ssr]");
        assert_eq!(colorize_prefix("warning", "warning"), "[warning]");
    }

    #[test]
    fn test_verbose_toggle() {
        set_verbose(true);
        assert!(is_verbose());
        set_verbose(false);
        assert!(!is_verbose());
    }
}
