use std::fs;
use tracing_appender::{non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Installs the global tracing subscriber.
///
/// Events go to a daily rolling file under `log_dir` and, when `log_to_stdout` is set, to
/// stderr as well (stdout is reserved for report output). `log_level` accepts any
/// `EnvFilter` directive such as `info` or `grader=debug`.
///
/// The returned guard flushes the file writer on drop and must be held for the lifetime of
/// the program.
pub fn init_logger(log_level: &str, log_dir: &str, log_file: &str, log_to_stdout: bool) -> WorkerGuard {
    fs::create_dir_all(log_dir).ok();

    let file_appender = rolling::daily(log_dir, log_file);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(file_writer)
        .with_ansi(false)
        .with_target(true);

    let env_filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter).with(file_layer);

    if log_to_stdout {
        let console_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(true)
            .with_target(true);
        registry.with(console_layer).init();
    } else {
        registry.init();
    }

    guard
}
