use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, EnvFilter, FmtSubscriber, Layer, Registry};

use crate::app_config::env::env_is_true;
use crate::app_config::settings::AppSettings;

fn stdout_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(Level::INFO.as_str()))
}

// 设置日志
//
// LOCAL 输出到终端；其他环境按天滚动写入 info.log / error.log。
// The returned guards must stay alive until exit or buffered lines are lost.
pub fn setup_logging(settings: &AppSettings) -> anyhow::Result<Vec<WorkerGuard>> {
    if settings.is_local() {
        if env_is_true("LOG_JSON", false) {
            let subscriber = FmtSubscriber::builder()
                .json()
                .with_env_filter(stdout_filter())
                .with_writer(std::io::stdout)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        } else {
            let subscriber = FmtSubscriber::builder()
                .with_env_filter(stdout_filter())
                .with_ansi(true)
                .with_target(false)
                .with_file(true)
                .with_line_number(true)
                .with_level(true)
                .with_writer(std::io::stdout)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        return Ok(Vec::new());
    }

    let info_file = RollingFileAppender::new(Rotation::DAILY, &settings.log_dir, "info.log");
    let error_file = RollingFileAppender::new(Rotation::DAILY, &settings.log_dir, "error.log");

    let (info_non_blocking, info_guard) = tracing_appender::non_blocking(info_file);
    let (error_non_blocking, error_guard) = tracing_appender::non_blocking(error_file);

    let subscriber = Registry::default()
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_target(false)
                .with_file(true)
                .with_line_number(true)
                .with_level(true)
                .with_writer(info_non_blocking)
                .with_filter(EnvFilter::new("info")),
        )
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_target(false)
                .with_file(true)
                .with_line_number(true)
                .with_level(true)
                .with_writer(error_non_blocking)
                .with_filter(EnvFilter::new("error")),
        );

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(vec![info_guard, error_guard])
}
