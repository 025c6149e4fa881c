mod common;

use ai_stocks::app::bootstrap::render_text;
use ai_stocks::app_config::AppSettings;
use ai_stocks::error::{AppError, DataUnavailable};
use ai_stocks::trading::indicator::basic_indicators::SMA_LONG;
use ai_stocks::trading::model::{Period, RawBarTable};
use ai_stocks::{run_pipeline, PipelineRequest};
use common::{flat_table, yahoo_like_table, StaticFixtureProvider};

#[tokio::test]
async fn test_end_to_end_with_fixture() -> anyhow::Result<()> {
    let n = 120;
    let provider = StaticFixtureProvider::new(yahoo_like_table(n));
    let request = PipelineRequest::new("test", Period::OneYear, 0.8)?;
    assert_eq!(request.ticker, "test");

    let result = run_pipeline(&provider, &request, &AppSettings::default()).await?;

    let rows = n - (SMA_LONG - 1);
    assert_eq!(result.indicators.len(), rows);
    let labelled = rows - 1;
    assert_eq!(result.split_idx, (labelled as f64 * 0.8) as usize);
    // validation slice keeps the unlabelled last bar, which stays flat
    assert_eq!(result.backtest.len(), rows - result.split_idx);
    assert_eq!(result.backtest.rows().last().map(|r| r.signal), Some(0));
    assert_eq!(
        result.backtest.rows()[0].date,
        result.indicators.rows()[result.split_idx].date
    );

    assert!((0.0..=1.0).contains(&result.metrics.accuracy));
    assert!(result.metrics.report.contains("weighted avg"));
    assert!(result.report.max_drawdown >= 0.0);

    let text = render_text(&result, 5);
    assert!(text.contains("SMA_20"));
    assert!(text.contains("total return"));

    let json = serde_json::to_value(&result)?;
    assert_eq!(json["period"], "1y");
    assert!(json["indicators"]["rows"][0]["SMA_10"].is_number());
    Ok(())
}

#[tokio::test]
async fn test_no_volume_is_no_complete_rows() {
    let provider = StaticFixtureProvider::new(flat_table(&[("Close", vec![1.0; 30])]));
    let request = PipelineRequest::new("TEST", Period::OneYear, 0.8).unwrap();

    let err = run_pipeline(&provider, &request, &AppSettings::default())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Data(DataUnavailable::NoCompleteRows)));
}

#[tokio::test]
async fn test_empty_response_is_data_error() {
    let provider = StaticFixtureProvider::new(RawBarTable::empty());
    let request = PipelineRequest::new("TEST", Period::TwoYears, 0.8).unwrap();

    let err = run_pipeline(&provider, &request, &AppSettings::default())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Data(DataUnavailable::EmptyResponse)));
}

#[tokio::test]
async fn test_short_history_has_empty_partition() {
    let provider = StaticFixtureProvider::new(yahoo_like_table(21));
    let request = PipelineRequest::new("TEST", Period::OneYear, 0.5).unwrap();

    let err = run_pipeline(&provider, &request, &AppSettings::default())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Model(_)));
}

#[test]
fn test_request_validation() {
    assert!(PipelineRequest::new("AAPL", Period::OneYear, 0.49).is_err());
    assert!(PipelineRequest::new("AAPL", Period::OneYear, 0.951).is_err());
    assert!(PipelineRequest::new("  ", Period::OneYear, 0.8).is_err());
    assert!(PipelineRequest::new("AAPL", Period::OneYear, 0.95).is_ok());
}
