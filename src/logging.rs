use std::io;
use tracing_appender::rolling;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

const STDOUT_FILTER: &str = "info,clustering=info,text=warn,db_query=warn,sqlx=off";
const FILE_FILTER: &str = "info,clustering=debug,text=info,db_query=info,sqlx=warn";

/// Installs the global subscriber: stdout (overridable through `RUST_LOG`) and
/// a daily rolling file under `log_dir`.
///
/// Stdout goes to stderr when `stdout_is_data` is set, for binaries that print
/// their results on stdout.
pub fn configure_logging(log_dir: &str, file_name: &str, stdout_is_data: bool) {
    let stdout_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(STDOUT_FILTER));

    let console_log = if stdout_is_data {
        fmt::layer()
            .with_writer(io::stderr)
            .with_filter(stdout_filter)
            .boxed()
    } else {
        fmt::layer()
            .with_writer(io::stdout)
            .with_filter(stdout_filter)
            .boxed()
    };

    let file_appender = rolling::daily(log_dir, file_name);
    let file_log = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false)
        .with_filter(EnvFilter::new(FILE_FILTER));

    tracing_subscriber::Registry::default()
        .with(console_log)
        .with(file_log)
        .init();
}
