use std::fs;
use tracing::Subscriber;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::LoggingConfig;

/// Build the subscriber: console output plus, optionally, a JSON log file.
fn build_subscriber(
    config: &LoggingConfig,
) -> (impl Subscriber + Send + Sync + 'static, Option<WorkerGuard>) {
    let (file_layer, guard) = if config.json_file {
        let _ = fs::create_dir_all(&config.directory);
        let file_appender = tracing_appender::rolling::daily(&config.directory, &config.file_name);
        let (non_blocking_writer, guard) = tracing_appender::non_blocking(file_appender);
        (Some(fmt::layer().json().with_writer(non_blocking_writer)), Some(guard))
    } else {
        (None, None)
    };

    // Console output goes to stderr so stdout stays clean for reports
    let console_layer = fmt::layer().with_writer(std::io::stderr);

    let subscriber = tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("vip_orders_etl=info")),
        )
        .with(file_layer)
        .with(console_layer);

    (subscriber, guard)
}

/// Initializes the logging system as the global default.
///
/// The returned guard must be held until exit so buffered file logs are flushed.
pub fn init_logging(config: &LoggingConfig) -> Option<WorkerGuard> {
    let (subscriber, guard) = build_subscriber(config);
    subscriber.init();
    guard
}
