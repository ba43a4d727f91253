//! Diagnostic logging setup.
//!
//! Library code emits `tracing` events; the binary installs one stderr
//! subscriber. `RUST_LOG` always wins over the `-v` count.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Default filter directive for a `-v` count.
pub fn filter_for_verbosity(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "ocrfix=debug,warn",
        _ => "ocrfix=trace,info",
    }
}

/// Install the global subscriber. Safe to call more than once; only the
/// first call takes effect.
pub fn init(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_for_verbosity(verbosity)));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(verbosity > 1)
        .compact();

    if let Err(e) = tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .try_init()
    {
        eprintln!("Failed to initialize logging: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_levels_map_to_filters() {
        assert_eq!(filter_for_verbosity(0), "warn");
        assert!(filter_for_verbosity(1).contains("debug"));
        assert!(filter_for_verbosity(2).contains("trace"));
        assert_eq!(filter_for_verbosity(9), filter_for_verbosity(2));
    }

    #[test]
    fn filters_parse() {
        for v in 0..3 {
            assert!(EnvFilter::try_new(filter_for_verbosity(v)).is_ok());
        }
    }

    #[test]
    fn init_twice_does_not_panic() {
        init(0);
        init(2);
    }
}
