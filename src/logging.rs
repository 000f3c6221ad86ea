use std::sync::Once;

use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt;

static INIT: Once = Once::new();
static INIT_TESTS: Once = Once::new();

/// Install the process-wide `fmt` subscriber. `RUST_LOG` wins over `default_filter`
/// when it is set and parses. Later calls are no-ops, as is a call made after some
/// other subscriber was already installed.
pub fn init(default_filter: &str) {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(default_filter))
            .unwrap_or_else(|_| EnvFilter::new("info"));
        let _ = fmt().with_env_filter(filter).with_target(false).try_init();
    });
}

/// Initialize tracing for test binaries. Safe to call multiple times.
pub fn init_for_tests() {
    INIT_TESTS.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        let _ = fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_test_writer()
            .try_init();
    });
}
