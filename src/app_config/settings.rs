use std::time::Duration;

use crate::app_config::env::{env_or_default, env_parse_or};
use crate::error::AppError;

pub const DEFAULT_YAHOO_BASE_URL: &str = "https://query1.finance.yahoo.com";

/// 运行配置，全部来自环境变量（.env 已由 dotenv 预先加载）
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub app_env: String,
    pub log_dir: String,
    pub yahoo_base_url: String,
    pub fetch_timeout: Duration,
    /// probability above which the backtest goes long
    pub prob_threshold: f64,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            app_env: "LOCAL".to_string(),
            log_dir: "log_files".to_string(),
            yahoo_base_url: DEFAULT_YAHOO_BASE_URL.to_string(),
            fetch_timeout: Duration::from_secs(30),
            prob_threshold: 0.5,
        }
    }
}

impl AppSettings {
    pub fn from_env() -> Result<Self, AppError> {
        let defaults = Self::default();
        let timeout_secs: u64 = env_parse_or("FETCH_TIMEOUT_SECS", defaults.fetch_timeout.as_secs())?;
        let prob_threshold: f64 = env_parse_or("PROB_THRESHOLD", defaults.prob_threshold)?;
        if !(0.0..=1.0).contains(&prob_threshold) {
            return Err(AppError::Config(format!(
                "PROB_THRESHOLD must lie in [0, 1], got {}",
                prob_threshold
            )));
        }
        if timeout_secs == 0 {
            return Err(AppError::Config("FETCH_TIMEOUT_SECS must be positive".to_string()));
        }

        Ok(Self {
            app_env: env_or_default("APP_ENV", &defaults.app_env),
            log_dir: env_or_default("LOG_DIR", &defaults.log_dir),
            yahoo_base_url: env_or_default("YAHOO_BASE_URL", &defaults.yahoo_base_url),
            fetch_timeout: Duration::from_secs(timeout_secs),
            prob_threshold,
        })
    }

    pub fn is_local(&self) -> bool {
        self.app_env.eq_ignore_ascii_case("LOCAL")
    }
}
