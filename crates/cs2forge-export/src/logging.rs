//! Logging setup for cs2forge
//!
//! The library only emits `tracing` events. Applications install a
//! subscriber once, either with [`init_default`] or from a
//! [`TracingConfig`]. `RUST_LOG` overrides the configured level.

use std::sync::atomic::{AtomicBool, Ordering};

use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Whether a subscriber has been installed
static TRACING_INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Configuration for tracing initialization
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// Default filter directive (e.g. "info", "warn,cs2forge_export=debug")
    pub default_level: String,
    /// Show the target (module path) in log output
    pub show_target: bool,
    /// Show thread IDs in log output
    pub show_thread_ids: bool,
    /// Show source file in log output
    pub show_file: bool,
    /// Show line number in log output
    pub show_line_number: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            default_level: "warn,cs2forge_export=info".to_string(),
            show_target: true,
            show_thread_ids: false,
            show_file: false,
            show_line_number: false,
        }
    }
}

impl TracingConfig {
    /// Config for a `-v` count: 0 = warn, 1 = info, 2 = debug, 3+ = trace
    pub fn from_verbosity(verbosity: u8) -> Self {
        let level = match verbosity {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        };
        Self {
            default_level: level.as_str().to_lowercase(),
            show_target: verbosity >= 2,
            show_thread_ids: verbosity >= 3,
            show_file: verbosity >= 3,
            show_line_number: verbosity >= 3,
        }
    }
}

/// Install the default subscriber
///
/// Multiple calls are safe and ignored after the first.
pub fn init_default() {
    init_with_config(TracingConfig::default());
}

/// Install a subscriber built from `config`
///
/// Returns `false` if a subscriber was already installed.
pub fn init_with_config(config: TracingConfig) -> bool {
    if TRACING_INITIALIZED
        .compare_exchange(false, true, Ordering::SeqCst, Ordering::Relaxed)
        .is_err()
    {
        return false;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.default_level));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(config.show_target)
        .with_thread_ids(config.show_thread_ids)
        .with_file(config.show_file)
        .with_line_number(config.show_line_number);

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(filter)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracing_config_default() {
        let config = TracingConfig::default();
        assert!(config.default_level.contains("info"));
        assert!(config.show_target);
        assert!(!config.show_thread_ids);
    }

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(TracingConfig::from_verbosity(0).default_level, "warn");
        assert_eq!(TracingConfig::from_verbosity(1).default_level, "info");
        assert_eq!(TracingConfig::from_verbosity(2).default_level, "debug");
        assert_eq!(TracingConfig::from_verbosity(7).default_level, "trace");
        assert!(!TracingConfig::from_verbosity(1).show_target);
        assert!(TracingConfig::from_verbosity(3).show_line_number);
    }

    #[test]
    fn test_second_init_is_ignored() {
        init_default();
        assert!(!init_with_config(TracingConfig::from_verbosity(2)));
    }
}
