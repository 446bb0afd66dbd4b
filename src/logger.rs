use log::LevelFilter;

/// Initialize the logger with the specified level.
///
/// `RUST_LOG` still applies on top of the default filter. Worker thread names
/// show up in records, which helps when per-frame timing is logged.
pub fn init_logger(level: LevelFilter) {
    let result = env_logger::Builder::from_default_env()
        .filter_level(level)
        .format_timestamp_millis()
        .try_init();
    if let Err(e) = result {
        eprintln!("Logger already initialized: {}", e);
    }
}
