use std::fmt::Write;
use std::process::ExitCode;

use tracing::error;

use crate::app::cli::Cli;
use crate::app_config::AppSettings;
use crate::error::AppError;
use crate::trading::services::pipeline_service::{run_pipeline, PipelineRequest, PipelineResult};
use crate::trading::yahoo::YahooChartClient;

pub const NO_DATA_MESSAGE: &str = "No data returned. Check ticker or try another period.";

/// 文本输出
pub fn render_text(result: &PipelineResult, tail: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", result.ticker, result.period);
    let _ = writeln!(out, "Educational demo only, not investment advice.\n");

    let _ = writeln!(out, "Latest indicators");
    let _ = writeln!(out, "{:<12}{:>12}{:>12}{:>12}", "Date", "Close", "SMA_10", "SMA_20");
    for row in result.indicators.last_rows(tail) {
        let _ = writeln!(
            out,
            "{:<12}{:>12.2}{:>12.2}{:>12.2}",
            row.date, row.close, row.sma_10, row.sma_20
        );
    }

    let _ = writeln!(out, "\nValidation metrics");
    let _ = writeln!(out, "accuracy: {:.4}", result.metrics.accuracy);
    match result.metrics.roc_auc {
        Some(auc) => {
            let _ = writeln!(out, "roc_auc:  {:.4}", auc);
        }
        None => {
            let _ = writeln!(out, "roc_auc:  n/a (single class in test labels)");
        }
    }
    let _ = writeln!(out, "\n{}", result.metrics.report);

    let r = &result.report;
    let _ = writeln!(out, "Backtest (long/flat, no fees)");
    let _ = writeln!(out, "total return: {:>8.2}%", r.total_return * 100.0);
    let _ = writeln!(out, "max drawdown: {:>8.2}%", r.max_drawdown * 100.0);
    let _ = writeln!(out, "sharpe:       {:>8.3}", r.sharpe);
    let _ = writeln!(out, "exposure:     {:>8.2}%\n", r.exposure * 100.0);

    let _ = writeln!(out, "{:<12}{:>8}{:>14}", "Date", "Signal", "Equity");
    for row in result.backtest.tail(tail) {
        let _ = writeln!(out, "{:<12}{:>8}{:>14.4}", row.date, row.signal, row.equity_curve);
    }
    out
}

/// 运行一次命令行请求
pub async fn run(cli: &Cli, settings: &AppSettings) -> anyhow::Result<ExitCode> {
    let request = PipelineRequest::new(cli.ticker.clone(), cli.period, cli.train_ratio)?;
    let provider = YahooChartClient::from_settings(settings)?;

    match run_pipeline(&provider, &request, settings).await {
        Ok(result) => {
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print!("{}", render_text(&result, cli.tail));
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(AppError::Data(e)) => {
            error!("no data for {}: {}", request.ticker, e);
            eprintln!("{}", NO_DATA_MESSAGE);
            Ok(ExitCode::FAILURE)
        }
        Err(e) => Err(e.into()),
    }
}
