use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::core::primitives::decimal_to_f64;
use crate::core::time_scale::{ensure_viewport, normalize_range};
use crate::core::{Candle, LinearScale, Viewport};
use crate::error::{ChartError, ChartResult};

/// Tuning controls for price-domain autoscaling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceScaleTuning {
    pub top_padding_ratio: f64,
    pub bottom_padding_ratio: f64,
    pub min_span_absolute: f64,
}

impl Default for PriceScaleTuning {
    fn default() -> Self {
        Self {
            top_padding_ratio: 0.10,
            bottom_padding_ratio: 0.10,
            min_span_absolute: 0.000_001,
        }
    }
}

impl PriceScaleTuning {
    pub(crate) fn validate(self) -> ChartResult<Self> {
        if !self.top_padding_ratio.is_finite()
            || !self.bottom_padding_ratio.is_finite()
            || self.top_padding_ratio < 0.0
            || self.bottom_padding_ratio < 0.0
        {
            return Err(ChartError::InvalidData(
                "price scale padding ratios must be finite and >= 0".to_owned(),
            ));
        }

        if !self.min_span_absolute.is_finite() || self.min_span_absolute <= 0.0 {
            return Err(ChartError::InvalidData(
                "price scale min span must be finite and > 0".to_owned(),
            ));
        }

        Ok(self)
    }
}

/// Price axis model mapped to an inverted Y pixel axis.
///
/// `domain_start` lands on the bottom edge of the viewport, `domain_end` on
/// the top edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceScale {
    domain_start: f64,
    domain_end: f64,
}

impl PriceScale {
    /// Creates a price scale from explicit min/max values.
    pub fn new(price_min: f64, price_max: f64) -> ChartResult<Self> {
        if !price_min.is_finite() || !price_max.is_finite() || price_min == price_max {
            return Err(ChartError::InvalidData(
                "scale domain must be finite and non-zero".to_owned(),
            ));
        }

        Ok(Self {
            domain_start: price_min.min(price_max),
            domain_end: price_min.max(price_max),
        })
    }

    pub fn from_candles(candles: &[Candle]) -> ChartResult<Self> {
        Self::from_candles_tuned(candles, PriceScaleTuning::default())
    }

    /// Computes a tuned price domain from the low/high envelope of `candles`.
    pub fn from_candles_tuned(candles: &[Candle], tuning: PriceScaleTuning) -> ChartResult<Self> {
        let tuning = tuning.validate()?;

        let mut lows = Vec::with_capacity(candles.len());
        let mut highs = Vec::with_capacity(candles.len());
        for candle in candles {
            lows.push(OrderedFloat(decimal_to_f64(candle.low, "low")?));
            highs.push(OrderedFloat(decimal_to_f64(candle.high, "high")?));
        }

        let (Some(min), Some(max)) = (lows.into_iter().min(), highs.into_iter().max()) else {
            return Err(ChartError::InvalidData(
                "price scale cannot be built from empty data".to_owned(),
            ));
        };

        let (low, high) = normalize_range(min.0, max.0, tuning.min_span_absolute)?;
        let span = high - low;
        Self::new(
            low - span * tuning.bottom_padding_ratio,
            high + span * tuning.top_padding_ratio,
        )
    }

    /// Returns the raw price domain kept by the scale.
    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        (self.domain_start, self.domain_end)
    }

    /// Maps a raw price to pixel Y (larger prices map to smaller Y).
    pub fn price_to_pixel(self, price: f64, viewport: Viewport) -> ChartResult<f64> {
        ensure_viewport(viewport)?;
        let height = f64::from(viewport.height);
        let from_bottom = self.linear()?.domain_to_pixel(price, height)?;
        Ok(height - from_bottom)
    }

    pub fn pixel_to_price(self, pixel: f64, viewport: Viewport) -> ChartResult<f64> {
        ensure_viewport(viewport)?;
        if !pixel.is_finite() {
            return Err(ChartError::InvalidData("pixel must be finite".to_owned()));
        }
        let height = f64::from(viewport.height);
        self.linear()?.pixel_to_domain(height - pixel, height)
    }

    fn linear(self) -> ChartResult<LinearScale> {
        LinearScale::new(self.domain_start, self.domain_end)
    }
}
