use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[cfg(feature = "parallel-projection")]
use rayon::prelude::*;

use crate::core::primitives::{date_to_unix_seconds, decimal_to_f64};
use crate::core::{PriceScale, TimeScale, Viewport};
use crate::error::{ChartError, ChartResult};

/// One day-bucketed OHLC row as served by the kline adapter.
///
/// Serializes as `{"time":"2025-06-02","open":105.0,...}`. Deserializing
/// goes through [`Candle::new`], so stored rows obey the same invariants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CandleRecord")]
pub struct Candle {
    pub time: NaiveDate,
    #[serde(with = "rust_decimal::serde::float")]
    pub open: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub high: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub low: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub close: Decimal,
}

/// Unchecked wire shape of a [`Candle`].
#[derive(Deserialize)]
struct CandleRecord {
    time: NaiveDate,
    #[serde(with = "rust_decimal::serde::float")]
    open: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    high: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    low: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    close: Decimal,
}

impl TryFrom<CandleRecord> for Candle {
    type Error = ChartError;

    fn try_from(record: CandleRecord) -> ChartResult<Self> {
        Self::new(record.time, record.open, record.high, record.low, record.close)
    }
}

impl Candle {
    /// Builds a validated candle.
    ///
    /// Invariants:
    /// - `low <= high`
    /// - `open` and `close` are within `[low, high]`
    pub fn new(
        time: NaiveDate,
        open: Decimal,
        high: Decimal,
        low: Decimal,
        close: Decimal,
    ) -> ChartResult<Self> {
        if low > high {
            return Err(ChartError::InvalidData(format!(
                "candle {time}: low must be <= high"
            )));
        }

        if open < low || open > high || close < low || close > high {
            return Err(ChartError::InvalidData(format!(
                "candle {time}: open/close must be within low/high range"
            )));
        }

        Ok(Self {
            time,
            open,
            high,
            low,
            close,
        })
    }

    /// Returns `true` when close price is greater than or equal to open price.
    #[must_use]
    pub fn is_bullish(self) -> bool {
        self.close >= self.open
    }

    /// Unix seconds of the candle's UTC open day.
    #[must_use]
    pub fn time_seconds(self) -> f64 {
        date_to_unix_seconds(self.time)
    }
}

/// The four-candle sample set the viewer ships for offline use.
#[must_use]
pub fn mock_candles() -> Vec<Candle> {
    [
        ((2025, 6, 1), 100, 110, 90, 105),
        ((2025, 6, 2), 105, 120, 100, 115),
        ((2025, 6, 3), 115, 125, 110, 112),
        ((2025, 6, 4), 112, 118, 108, 110),
    ]
    .into_iter()
    .filter_map(|((year, month, day), open, high, low, close)| {
        Some(Candle {
            time: NaiveDate::from_ymd_opt(year, month, day)?,
            open: Decimal::from(open),
            high: Decimal::from(high),
            low: Decimal::from(low),
            close: Decimal::from(close),
        })
    })
    .collect()
}

/// Projected candle geometry in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CandleGeometry {
    pub center_x: f64,
    pub body_left: f64,
    pub body_right: f64,
    pub body_top: f64,
    pub body_bottom: f64,
    pub wick_top: f64,
    pub wick_bottom: f64,
    pub is_bullish: bool,
}

/// Projects candles into deterministic render geometry.
pub fn project_candles(
    candles: &[Candle],
    time_scale: TimeScale,
    price_scale: PriceScale,
    viewport: Viewport,
    body_width_px: f64,
) -> ChartResult<Vec<CandleGeometry>> {
    if !body_width_px.is_finite() || body_width_px <= 0.0 {
        return Err(ChartError::InvalidData(
            "body width must be finite and > 0".to_owned(),
        ));
    }

    #[cfg(feature = "parallel-projection")]
    {
        candles
            .par_iter()
            .map(|candle| {
                project_single_candle(*candle, time_scale, price_scale, viewport, body_width_px)
            })
            .collect()
    }

    #[cfg(not(feature = "parallel-projection"))]
    {
        candles
            .iter()
            .map(|candle| {
                project_single_candle(*candle, time_scale, price_scale, viewport, body_width_px)
            })
            .collect()
    }
}

fn project_single_candle(
    candle: Candle,
    time_scale: TimeScale,
    price_scale: PriceScale,
    viewport: Viewport,
    body_width_px: f64,
) -> ChartResult<CandleGeometry> {
    let half = body_width_px / 2.0;
    let center_x = time_scale.time_to_pixel(candle.time_seconds(), viewport)?;
    let open_y = price_scale.price_to_pixel(decimal_to_f64(candle.open, "open")?, viewport)?;
    let close_y = price_scale.price_to_pixel(decimal_to_f64(candle.close, "close")?, viewport)?;
    let wick_top = price_scale.price_to_pixel(decimal_to_f64(candle.high, "high")?, viewport)?;
    let wick_bottom = price_scale.price_to_pixel(decimal_to_f64(candle.low, "low")?, viewport)?;

    Ok(CandleGeometry {
        center_x,
        body_left: center_x - half,
        body_right: center_x + half,
        body_top: open_y.min(close_y),
        body_bottom: open_y.max(close_y),
        wick_top,
        wick_bottom,
        is_bullish: candle.is_bullish(),
    })
}
