use std::process::ExitCode;

use clap::Parser;
use dotenv::dotenv;
use tracing::info;

use ai_stocks::app::bootstrap;
use ai_stocks::app::cli::Cli;
use ai_stocks::app_config::log::setup_logging;
use ai_stocks::app_config::AppSettings;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    // 加载 .env
    dotenv().ok();
    let settings = AppSettings::from_env()?;
    let _guards = setup_logging(&settings)?;
    info!("ai_stocks starting, env {}", settings.app_env);

    bootstrap::run(&cli, &settings).await
}
