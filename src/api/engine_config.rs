use serde::{Deserialize, Serialize};

use crate::core::{PriceScaleTuning, TimeScaleTuning, Viewport};
use crate::error::{ChartError, ChartResult};
use crate::render::Color;

/// Candle body/wick styling used by the candlestick frame builder.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CandleStyle {
    pub up_color: Color,
    pub down_color: Color,
    pub wick_width_px: f64,
    /// Fraction of the spacing between neighbouring candles taken by a body.
    pub body_width_ratio: f64,
    pub max_body_width_px: f64,
}

impl Default for CandleStyle {
    fn default() -> Self {
        Self {
            up_color: Color::rgb(0.149, 0.651, 0.604),
            down_color: Color::rgb(0.937, 0.325, 0.314),
            wick_width_px: 1.0,
            body_width_ratio: 0.7,
            max_body_width_px: 24.0,
        }
    }
}

impl CandleStyle {
    pub fn validate(self) -> ChartResult<Self> {
        self.up_color.validate()?;
        self.down_color.validate()?;
        if !self.wick_width_px.is_finite() || self.wick_width_px <= 0.0 {
            return Err(ChartError::InvalidData(
                "candle wick width must be finite and > 0".to_owned(),
            ));
        }
        if !self.body_width_ratio.is_finite()
            || self.body_width_ratio <= 0.0
            || self.body_width_ratio > 1.0
        {
            return Err(ChartError::InvalidData(
                "candle body width ratio must be in (0, 1]".to_owned(),
            ));
        }
        if !self.max_body_width_px.is_finite() || self.max_body_width_px < 1.0 {
            return Err(ChartError::InvalidData(
                "candle max body width must be finite and >= 1".to_owned(),
            ));
        }
        Ok(self)
    }
}

/// Tick labels, tick marks and titles drawn along the chart edges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisStyle {
    pub visible: bool,
    pub label_color: Color,
    pub title_color: Color,
    pub tick_color: Color,
    pub label_font_size_px: f64,
    pub title_font_size_px: f64,
    pub tick_length_px: f64,
    pub tick_width_px: f64,
    /// Time labels closer than this are dropped, keeping the last one.
    pub time_label_min_spacing_px: f64,
    pub price_label_target_spacing_px: f64,
}

impl Default for AxisStyle {
    fn default() -> Self {
        Self {
            visible: true,
            label_color: Color::rgb(0.25, 0.25, 0.25),
            title_color: Color::rgb(0.1, 0.1, 0.1),
            tick_color: Color::rgb(0.6, 0.6, 0.6),
            label_font_size_px: 11.0,
            title_font_size_px: 12.0,
            tick_length_px: 5.0,
            tick_width_px: 1.0,
            time_label_min_spacing_px: 56.0,
            price_label_target_spacing_px: 60.0,
        }
    }
}

impl AxisStyle {
    pub fn validate(self) -> ChartResult<Self> {
        self.label_color.validate()?;
        self.title_color.validate()?;
        self.tick_color.validate()?;
        for (name, value) in [
            ("label font size", self.label_font_size_px),
            ("title font size", self.title_font_size_px),
            ("tick width", self.tick_width_px),
            ("time label spacing", self.time_label_min_spacing_px),
            ("price label spacing", self.price_label_target_spacing_px),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ChartError::InvalidData(format!(
                    "axis {name} must be finite and > 0"
                )));
            }
        }
        if !self.tick_length_px.is_finite() || self.tick_length_px < 0.0 {
            return Err(ChartError::InvalidData(
                "axis tick length must be finite and >= 0".to_owned(),
            ));
        }
        Ok(self)
    }
}

/// Public engine bootstrap configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartEngineConfig {
    pub viewport: Viewport,
    #[serde(default)]
    pub time_scale_tuning: TimeScaleTuning,
    #[serde(default)]
    pub price_scale_tuning: PriceScaleTuning,
    #[serde(default)]
    pub candle_style: CandleStyle,
    #[serde(default)]
    pub axis_style: AxisStyle,
}

impl Default for ChartEngineConfig {
    fn default() -> Self {
        Self::new(Viewport::new(1280, 760))
    }
}

impl ChartEngineConfig {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            time_scale_tuning: TimeScaleTuning::default(),
            price_scale_tuning: PriceScaleTuning::default(),
            candle_style: CandleStyle::default(),
            axis_style: AxisStyle::default(),
        }
    }

    #[must_use]
    pub fn with_time_scale_tuning(mut self, tuning: TimeScaleTuning) -> Self {
        self.time_scale_tuning = tuning;
        self
    }

    #[must_use]
    pub fn with_price_scale_tuning(mut self, tuning: PriceScaleTuning) -> Self {
        self.price_scale_tuning = tuning;
        self
    }

    #[must_use]
    pub fn with_candle_style(mut self, style: CandleStyle) -> Self {
        self.candle_style = style;
        self
    }

    #[must_use]
    pub fn with_axis_style(mut self, style: AxisStyle) -> Self {
        self.axis_style = style;
        self
    }

    /// Checks everything the engine would otherwise reject lazily.
    pub fn validate(self) -> ChartResult<Self> {
        if !self.viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: self.viewport.width,
                height: self.viewport.height,
            });
        }
        self.time_scale_tuning.validate()?;
        self.price_scale_tuning.validate()?;
        self.candle_style.validate()?;
        self.axis_style.validate()?;
        Ok(self)
    }

    /// Serializes config to pretty JSON.
    pub fn to_json_pretty(self) -> ChartResult<String> {
        serde_json::to_string_pretty(&self)
            .map_err(|e| ChartError::InvalidData(format!("failed to serialize config: {e}")))
    }

    /// Deserializes config from JSON.
    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidData(format!("failed to parse config: {e}")))
    }
}
