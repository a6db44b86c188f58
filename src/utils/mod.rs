mod single_flight;
pub use single_flight::*;

/// Installs the `env_logger` backend for the `log` facade.
///
/// `RUST_LOG` takes precedence over `default_filter`. Calling this more than
/// once is harmless, only the first installation wins.
pub fn init_logging(default_filter: &str) {
    let env = env_logger::Env::default().default_filter_or(default_filter);
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp_millis()
        .is_test(cfg!(test))
        .try_init();
}
