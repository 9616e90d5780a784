//! Console logging setup

use tracing::level_filters::LevelFilter;
use wifi_hal_core::LoggingConfig;

/// Install a global fmt subscriber for `config`.
///
/// Returns `false` if a subscriber was already installed, which is expected
/// when several tests build runtimes in one process.
pub fn init(config: &LoggingConfig) -> bool {
    let builder = tracing_subscriber::fmt()
        .with_max_level(LevelFilter::from(config.level))
        .with_target(false)
        .with_thread_ids(false);

    let result = if config.show_timestamp {
        builder.try_init()
    } else {
        builder.without_time().try_init()
    };
    result.is_ok()
}
