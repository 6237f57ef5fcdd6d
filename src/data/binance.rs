use std::time::Duration;

use serde_json::Value;
use tracing::{debug, info};

use crate::core::Candle;
use crate::data::{KlineRequest, parse_kline_rows};
use crate::error::{ChartError, ChartResult};

pub const DEFAULT_KLINES_ENDPOINT: &str = "https://api.binance.com/api/v3/klines";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(12);

/// Async client for a Binance-compatible `/klines` endpoint.
#[derive(Debug, Clone)]
pub struct KlineClient {
    http: reqwest::Client,
    endpoint: String,
}

impl KlineClient {
    pub fn new() -> ChartResult<Self> {
        Self::with_settings(DEFAULT_KLINES_ENDPOINT, DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn with_settings(endpoint: impl Into<String>, timeout: Duration) -> ChartResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ChartError::Fetch(format!("http client error: {e}")))?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
        })
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Fetches and normalizes one batch. No retries.
    pub async fn fetch(&self, request: &KlineRequest) -> ChartResult<Vec<Candle>> {
        request.validate()?;
        info!(
            symbol = %request.symbol,
            interval = %request.interval,
            limit = request.limit,
            "fetching klines"
        );

        let limit = request.limit.to_string();
        let response = self
            .http
            .get(&self.endpoint)
            .query(&[
                ("symbol", request.symbol.as_str()),
                ("interval", request.interval.as_str()),
                ("limit", limit.as_str()),
            ])
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| ChartError::Fetch(format!("kline request error: {e}")))?;
        let rows: Vec<Vec<Value>> = response
            .json()
            .await
            .map_err(|e| ChartError::Fetch(format!("kline decode error: {e}")))?;

        let candles = parse_kline_rows(&rows)?;
        debug!(rows = candles.len(), "klines normalized");
        Ok(candles)
    }
}
