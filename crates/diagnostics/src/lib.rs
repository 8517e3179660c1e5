//! Lightweight logging facade for the coldsnap workspace.
//!
//! Usage:
//! - Set COLDSNAP_LOG=off (default) - no logs
//! - Set COLDSNAP_LOG=info - basic operation logs
//! - Set COLDSNAP_LOG=debug - detailed diagnostic logs

use std::sync::Once;

// Re-export emit so macros can use it
pub use emit;

static INIT: Once = Once::new();

/// Initialize diagnostics based on the COLDSNAP_LOG environment variable.
///
/// Call once at process startup. Safe to call multiple times; subsequent
/// calls are ignored.
pub fn init_diagnostics() {
    INIT.call_once(|| {
        let log_level = std::env::var("COLDSNAP_LOG").unwrap_or_else(|_| "off".to_string());

        let rt = match log_level.as_str() {
            "off" => return,
            "debug" => emit::setup()
                .emit_to(emit_term::stderr())
                .emit_when(emit::level::min_filter(emit::Level::Debug))
                .init(),
            "info" => emit::setup()
                .emit_to(emit_term::stderr())
                .emit_when(emit::level::min_filter(emit::Level::Info))
                .init(),
            "warn" => emit::setup()
                .emit_to(emit_term::stderr())
                .emit_when(emit::level::min_filter(emit::Level::Warn))
                .init(),
            "error" => emit::setup()
                .emit_to(emit_term::stderr())
                .emit_when(emit::level::min_filter(emit::Level::Error))
                .init(),
            _ => {
                let rt = emit::setup()
                    .emit_to(emit_term::stderr())
                    .emit_when(emit::level::min_filter(emit::Level::Info))
                    .init();
                eprintln!(
                    "Warning: Unknown COLDSNAP_LOG value '{}', using 'info'",
                    log_level
                );
                rt
            }
        };

        // Runtime must outlive the process; there is no shutdown hook here.
        std::mem::forget(rt);
    });
}

/// Log basic operations (exports, queries, storage writes, etc.)
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        $crate::emit::info!($($arg)*)
    };
}

/// Log detailed diagnostics (record counts, rewritten SQL, internal state)
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        $crate::emit::debug!($($arg)*)
    };
}

/// Log warning conditions (config fallbacks, recoverable errors)
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        $crate::emit::warn!($($arg)*)
    };
}

/// Log critical error conditions
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        $crate::emit::error!($($arg)*)
    };
}

pub use init_diagnostics as init;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_safe_to_call_multiple_times() {
        init_diagnostics();
        init_diagnostics();
        init_diagnostics();
    }

    #[test]
    fn test_macros_compile() {
        log_info!("Test message");
        log_debug!("Debug message with {value}", value: 42);
        log_warn!("Warning message");
        log_error!("Error message");
    }
}
