//! Kline acquisition: request validation, row normalization and the HTTP
//! client.

mod binance;

pub use binance::{DEFAULT_KLINES_ENDPOINT, DEFAULT_REQUEST_TIMEOUT, KlineClient};

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::Candle;
use crate::core::primitives::unix_millis_to_date;
use crate::error::{ChartError, ChartResult};

/// One user-triggered kline query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KlineRequest {
    pub symbol: String,
    pub interval: String,
    pub limit: u32,
}

impl KlineRequest {
    #[must_use]
    pub fn new(symbol: impl Into<String>, interval: impl Into<String>, limit: u32) -> Self {
        Self {
            symbol: symbol.into(),
            interval: interval.into(),
            limit,
        }
    }

    pub fn validate(&self) -> ChartResult<()> {
        if self.symbol.trim().is_empty() {
            return Err(ChartError::Validation("symbol must not be empty".to_owned()));
        }
        if self.interval.trim().is_empty() {
            return Err(ChartError::Validation(
                "interval must not be empty".to_owned(),
            ));
        }
        if self.limit == 0 {
            return Err(ChartError::Validation("limit must be > 0".to_owned()));
        }
        Ok(())
    }
}

/// Normalizes raw kline rows into candles, preserving row order.
///
/// Element 0 is the open time in epoch milliseconds, elements 1..=4 are
/// open/high/low/close as numbers or numeric strings. Any malformed row
/// fails the whole batch.
pub fn parse_kline_rows(rows: &[Vec<Value>]) -> ChartResult<Vec<Candle>> {
    rows.iter()
        .enumerate()
        .map(|(index, row)| parse_kline_row(index, row))
        .collect()
}

fn parse_kline_row(index: usize, row: &[Value]) -> ChartResult<Candle> {
    if row.len() < 5 {
        return Err(ChartError::Fetch(format!(
            "kline row {index}: expected at least 5 fields, got {}",
            row.len()
        )));
    }

    let open_time_ms = row[0]
        .as_i64()
        .or_else(|| row[0].as_f64().filter(|v| v.is_finite()).map(|v| v as i64))
        .ok_or_else(|| {
            ChartError::Fetch(format!("kline row {index}: invalid open time `{}`", row[0]))
        })?;
    let time = unix_millis_to_date(open_time_ms)
        .map_err(|e| ChartError::Fetch(format!("kline row {index}: {e}")))?;

    let open = parse_kline_num(index, "open", &row[1])?;
    let high = parse_kline_num(index, "high", &row[2])?;
    let low = parse_kline_num(index, "low", &row[3])?;
    let close = parse_kline_num(index, "close", &row[4])?;

    Candle::new(time, open, high, low, close)
        .map_err(|e| ChartError::Fetch(format!("kline row {index}: {e}")))
}

fn parse_kline_num(index: usize, field: &str, value: &Value) -> ChartResult<Decimal> {
    let invalid = || ChartError::Fetch(format!("kline row {index}: invalid {field} `{value}`"));
    match value {
        Value::String(text) => Decimal::from_str(text)
            .or_else(|_| Decimal::from_scientific(text))
            .map_err(|_| invalid()),
        Value::Number(number) => {
            if let Some(v) = number.as_i64() {
                return Ok(Decimal::from(v));
            }
            number
                .as_f64()
                .and_then(|v| Decimal::try_from(v).ok())
                .ok_or_else(invalid)
        }
        _ => Err(invalid()),
    }
}
