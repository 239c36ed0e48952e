//! stderr logging for the `sbiectl` binary.
//!
//! The library only emits `tracing` events; installing a subscriber is left
//! to the binary so embedding programs keep control of their own output.

use tracing_subscriber::EnvFilter;

/// Maps `-v` repetitions onto a level for the crate's own target.
pub fn level_for_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Builds the filter: `RUST_LOG` wins when set, otherwise `-v` decides.
pub fn build_filter(verbose: u8) -> EnvFilter {
    let filter_str = format!("sbiectl={}", level_for_verbosity(verbose));
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_str))
}

/// Installs the global subscriber. Safe to call more than once; later calls
/// are ignored.
pub fn init(verbose: u8) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(build_filter(verbose))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_for_verbosity() {
        assert_eq!(level_for_verbosity(0), "warn");
        assert_eq!(level_for_verbosity(1), "info");
        assert_eq!(level_for_verbosity(2), "debug");
        assert_eq!(level_for_verbosity(9), "trace");
    }

    #[test]
    fn test_init_twice_does_not_panic() {
        init(0);
        init(3);
    }
}
