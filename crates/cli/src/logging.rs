use std::str::FromStr;

use shelf_core::config::{LogFormat, LoggingConfig};
use tracing_subscriber::filter::LevelFilter;

/// Installs the global subscriber. Events go to stderr so prompts on stdout stay clean.
pub fn init_logging(config: &LoggingConfig) {
    let level = LevelFilter::from_str(config.level.trim()).unwrap_or(LevelFilter::WARN);
    let builder = tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(level)
        .with_writer(std::io::stderr);

    // a subscriber may already be installed (tests, embedding); keep it
    let _ = match config.format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
}
