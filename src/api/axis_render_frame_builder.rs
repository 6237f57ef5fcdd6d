use chrono::NaiveDate;

use crate::core::PlotTransform;
use crate::core::primitives::date_to_unix_seconds;
use crate::error::ChartResult;
use crate::render::{LinePrimitive, RenderFrame, Renderer, TextHAlign, TextPrimitive};

use super::ChartEngine;
use super::axis_ticks::{
    AXIS_MAX_PRICE_TICKS, AXIS_MIN_PRICE_TICKS, axis_tick_target_count, price_label_decimals,
    price_ticks, select_ticks_with_min_spacing,
};

pub const TIME_AXIS_TITLE: &str = "Date";
pub const PRICE_AXIS_TITLE: &str = "Price (USDT)";

const EDGE_INSET_PX: f64 = 4.0;

impl<R: Renderer> ChartEngine<R> {
    /// Day labels along the bottom edge, price labels along the left edge,
    /// both axis titles and the series label.
    ///
    /// Labels sit inside the plot so the data transform keeps spanning the
    /// whole viewport.
    pub(super) fn append_axis_primitives(
        &self,
        frame: &mut RenderFrame,
        transform: PlotTransform,
    ) -> ChartResult<()> {
        let style = self.config().axis_style;
        if !style.visible {
            return Ok(());
        }
        let width = f64::from(transform.viewport.width);
        let height = f64::from(transform.viewport.height);

        let title_y = height - style.title_font_size_px - EDGE_INSET_PX;
        let time_label_y = title_y - style.label_font_size_px - EDGE_INSET_PX;

        let mut days: Vec<NaiveDate> = self.candles().iter().map(|candle| candle.time).collect();
        days.sort_unstable();
        days.dedup();
        let mut time_ticks = Vec::with_capacity(days.len());
        for day in days {
            let px = transform
                .time_scale
                .time_to_pixel(date_to_unix_seconds(day), transform.viewport)?;
            if (0.0..=width).contains(&px) {
                time_ticks.push((day, px));
            }
        }
        for (day, px) in select_ticks_with_min_spacing(time_ticks, style.time_label_min_spacing_px)
        {
            frame.lines.push(LinePrimitive::new(
                px,
                height,
                px,
                height - style.tick_length_px,
                style.tick_width_px,
                style.tick_color,
            ));
            frame.texts.push(TextPrimitive::new(
                day.format("%b %-d").to_string(),
                px,
                time_label_y,
                style.label_font_size_px,
                style.label_color,
                TextHAlign::Center,
            ));
        }

        let tick_count = axis_tick_target_count(
            height,
            style.price_label_target_spacing_px,
            AXIS_MIN_PRICE_TICKS,
            AXIS_MAX_PRICE_TICKS,
        );
        let (prices, step) = price_ticks(transform.price_scale.domain(), tick_count);
        let decimals = price_label_decimals(step);
        for price in prices {
            let py = transform.price_scale.price_to_pixel(price, transform.viewport)?;
            frame.lines.push(LinePrimitive::new(
                0.0,
                py,
                style.tick_length_px,
                py,
                style.tick_width_px,
                style.tick_color,
            ));
            frame.texts.push(TextPrimitive::new(
                format!("{price:.decimals$}"),
                style.tick_length_px + 2.0,
                py - style.label_font_size_px / 2.0,
                style.label_font_size_px,
                style.label_color,
                TextHAlign::Left,
            ));
        }

        frame.texts.push(TextPrimitive::new(
            TIME_AXIS_TITLE,
            width / 2.0,
            title_y,
            style.title_font_size_px,
            style.title_color,
            TextHAlign::Center,
        ));
        frame.texts.push(TextPrimitive::new(
            PRICE_AXIS_TITLE,
            EDGE_INSET_PX,
            EDGE_INSET_PX,
            style.title_font_size_px,
            style.title_color,
            TextHAlign::Left,
        ));
        if let Some(label) = self.series_label().filter(|label| !label.is_empty()) {
            frame.texts.push(TextPrimitive::new(
                label,
                width / 2.0,
                EDGE_INSET_PX,
                style.title_font_size_px,
                style.title_color,
                TextHAlign::Center,
            ));
        }
        Ok(())
    }
}
