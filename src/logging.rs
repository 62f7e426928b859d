use std::io;
use tracing_appender::rolling;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Install stdout and daily-rolling file logging.
///
/// `RUST_LOG` overrides the stdout filter. Matching decisions are chatty at
/// debug level, so they only go to the file by default.
pub fn configure_logging() {
    let stdout_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,matching=warn,recovery=info,llm_request=info,web_request=info"));

    let stdout_log = fmt::layer()
        .with_writer(io::stdout)
        .with_filter(stdout_filter);

    let file_appender = rolling::daily("logs", "specmatch.log");
    let file_log = fmt::layer()
        .with_ansi(false)
        .with_writer(file_appender)
        .with_filter(EnvFilter::new("info,matching=debug,recovery=debug,llm_request=debug,web_request=debug,parser=debug"));

    // A subscriber may already be installed by the embedding application
    let _ = tracing_subscriber::Registry::default()
        .with(stdout_log)
        .with(file_log)
        .try_init();
}
