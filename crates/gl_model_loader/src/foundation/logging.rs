//! Logging setup
//!
//! The library itself only writes through the `log` facade. Binaries and
//! tests choose the backend with these helpers.

use log::LevelFilter;

/// Install `env_logger`, showing `default_level` and above unless `RUST_LOG`
/// overrides it
pub fn init(default_level: LevelFilter) {
    env_logger::Builder::new()
        .filter_level(default_level)
        .parse_default_env()
        .init();
}

/// Install a test-friendly logger; repeated calls are ignored
pub fn init_for_tests() {
    let _ = env_logger::builder()
        .is_test(true)
        .filter_level(LevelFilter::Debug)
        .try_init();
}
