use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use tracing::{debug, info};

use crate::app_config::AppSettings;
use crate::error::DataUnavailable;
use crate::trading::model::{Period, RawBarTable};
use crate::trading::yahoo::chart::ChartResponse;
use crate::trading::yahoo::MarketDataProvider;

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko)";

fn provider_err(e: impl std::fmt::Display) -> DataUnavailable {
    DataUnavailable::Provider(e.to_string())
}

/// Daily bars from the Yahoo Finance v8 chart endpoint.
pub struct YahooChartClient {
    client: Client,
    base_url: Url,
    timeout: Duration,
}

impl YahooChartClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, DataUnavailable> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(provider_err)?;
        let base_url = Url::parse(base_url).map_err(provider_err)?;
        Ok(Self {
            client,
            base_url,
            timeout,
        })
    }

    pub fn from_settings(settings: &AppSettings) -> Result<Self, DataUnavailable> {
        Self::new(&settings.yahoo_base_url, settings.fetch_timeout)
    }

    /// `{base}/v8/finance/chart/{ticker}?range=..&interval=1d&events=div,splits`
    pub fn chart_url(&self, ticker: &str, period: Period) -> Result<Url, DataUnavailable> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| provider_err(format!("base url cannot carry a path: {}", self.base_url)))?
            .pop_if_empty()
            .extend(["v8", "finance", "chart", ticker]);
        url.query_pairs_mut()
            .append_pair("range", period.as_str())
            .append_pair("interval", "1d")
            .append_pair("events", "div,splits");
        Ok(url)
    }
}

#[async_trait]
impl MarketDataProvider for YahooChartClient {
    async fn fetch_daily(
        &self,
        ticker: &str,
        period: Period,
        auto_adjust: bool,
    ) -> Result<RawBarTable, DataUnavailable> {
        let ticker = ticker.trim();
        if ticker.is_empty() {
            return Err(provider_err("empty ticker"));
        }
        let url = self.chart_url(ticker, period)?;
        debug!("GET {}", url);

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                provider_err(format!("request timed out after {:?}", self.timeout))
            } else {
                provider_err(e)
            }
        })?;
        let status_code = response.status();
        let response_body = response.text().await.map_err(provider_err)?;
        info!("ticker:{}, period:{}, status:{}, bytes:{}", ticker, period, status_code, response_body.len());

        let parsed = serde_json::from_str::<ChartResponse>(&response_body);
        if status_code != StatusCode::OK {
            // 404 等错误码通常仍带有 chart.error 描述
            return match parsed {
                Ok(body) => match body.into_data() {
                    Err(e) => Err(e),
                    Ok(_) => Err(provider_err(format!("http status {}", status_code))),
                },
                Err(_) => Err(provider_err(format!("http status {}", status_code))),
            };
        }

        match parsed.map_err(provider_err)?.into_data()? {
            Some(data) => data.into_raw_table(ticker, auto_adjust),
            None => Ok(RawBarTable::empty()),
        }
    }
}
