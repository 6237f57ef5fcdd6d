use crate::core::{PlotTransform, project_candles};
use crate::error::ChartResult;
use crate::render::{LinePrimitive, RectPrimitive, RenderFrame, Renderer};

use super::ChartEngine;

const SECONDS_PER_DAY: f64 = 86_400.0;

impl<R: Renderer> ChartEngine<R> {
    pub(super) fn append_candlestick_primitives(
        &self,
        frame: &mut RenderFrame,
        transform: PlotTransform,
    ) -> ChartResult<()> {
        let style = self.config().candle_style;
        let body_width = self.resolve_candle_body_width_px(transform)?;
        let geometries = project_candles(
            self.candles(),
            transform.time_scale,
            transform.price_scale,
            transform.viewport,
            body_width,
        )?;

        for candle in geometries {
            let color = if candle.is_bullish {
                style.up_color
            } else {
                style.down_color
            };
            frame.lines.push(LinePrimitive::new(
                candle.center_x,
                candle.wick_top,
                candle.center_x,
                candle.wick_bottom,
                style.wick_width_px,
                color,
            ));
            // Doji candles still get a visible one pixel body.
            let body_height = (candle.body_bottom - candle.body_top).max(1.0);
            frame.rects.push(RectPrimitive::new(
                candle.body_left,
                candle.body_top,
                candle.body_right - candle.body_left,
                body_height,
                color,
            ));
        }
        Ok(())
    }

    /// Body width follows the tightest gap between distinct candle days.
    fn resolve_candle_body_width_px(&self, transform: PlotTransform) -> ChartResult<f64> {
        let style = self.config().candle_style;
        let min_gap = self
            .candles()
            .windows(2)
            .map(|pair| (pair[1].time_seconds() - pair[0].time_seconds()).abs())
            .filter(|gap| *gap > 0.0)
            .fold(f64::INFINITY, f64::min);
        let gap = if min_gap.is_finite() {
            min_gap
        } else {
            SECONDS_PER_DAY
        };
        let spacing_px = gap * transform.time_scale.pixels_per_time_unit(transform.viewport)?;
        Ok((spacing_px * style.body_width_ratio).clamp(1.0, style.max_body_width_px))
    }
}
