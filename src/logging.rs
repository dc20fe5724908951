//! Logger setup for the binary and tests.

use env_logger::{Builder, Env};
use log::LevelFilter;

/// Installs the global logger for the process.
///
/// The default filter is info, or debug when `verbose` is set; `RUST_LOG`
/// overrides either. Repeated calls are harmless, so test binaries can
/// initialise logging without coordinating with each other.
pub fn init(verbose: bool) {
    let default = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let env = Env::default().default_filter_or(default.to_string());
    // Already-installed loggers are fine; keep whichever came first.
    let _ = Builder::from_env(env).try_init();
}
