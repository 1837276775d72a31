use std::path::Path;

use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Registry};

pub struct TracingGuards {
    _file_guard: Option<WorkerGuard>,
}

pub fn init_tracing(
    service_name: &str,
    log_dir: Option<&Path>,
    retention_days: usize,
) -> TracingGuards {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stdout_layer = fmt::layer().with_writer(std::io::stdout);

    let mut file_guard = None;
    let file_layer = log_dir
        .and_then(|dir| rolling_appender(service_name, dir, retention_days))
        .map(|appender| {
            let (writer, guard) = tracing_appender::non_blocking(appender);
            file_guard = Some(guard);
            fmt::layer().with_ansi(false).with_writer(writer)
        });

    let subscriber = Registry::default()
        .with(filter)
        .with(stdout_layer)
        .with(file_layer);
    let _ = tracing::subscriber::set_global_default(subscriber);

    TracingGuards {
        _file_guard: file_guard,
    }
}

fn rolling_appender(
    service_name: &str,
    dir: &Path,
    retention_days: usize,
) -> Option<RollingFileAppender> {
    let mut builder = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(service_name)
        .filename_suffix("log");
    if retention_days > 0 {
        builder = builder.max_log_files(retention_days);
    }
    match builder.build(dir) {
        Ok(appender) => Some(appender),
        Err(err) => {
            // Subscriber is not installed yet, so stderr is the only sink.
            eprintln!("file logging disabled: {err}");
            None
        }
    }
}
