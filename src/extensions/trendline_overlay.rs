use serde::{Deserialize, Serialize};

use crate::core::Trendline;
use crate::error::ChartResult;
use crate::extensions::{PluginContext, PostDrawHook};
use crate::render::{CirclePrimitive, Color, LinePrimitive, RenderFrame};

/// Visual style of committed trendlines.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverlayStyle {
    pub stroke_color: Color,
    pub stroke_width_px: f64,
    pub handle_color: Color,
    pub handle_radius_px: f64,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            stroke_color: Color::rgb(0.0, 0.0, 0.0),
            stroke_width_px: 2.0,
            handle_color: Color::rgba(0.0, 0.0, 0.0, 0.5),
            handle_radius_px: 6.0,
        }
    }
}

/// Draws each trendline as a segment plus a round handle on both endpoints.
#[derive(Debug, Clone, Copy)]
pub struct TrendlineOverlay<'a> {
    lines: &'a [Trendline],
    style: OverlayStyle,
}

impl<'a> TrendlineOverlay<'a> {
    #[must_use]
    pub fn new(lines: &'a [Trendline], style: OverlayStyle) -> Self {
        Self { lines, style }
    }
}

impl PostDrawHook for TrendlineOverlay<'_> {
    fn id(&self) -> &str {
        "trendline-overlay"
    }

    fn after_draw(&self, context: &PluginContext, frame: &mut RenderFrame) -> ChartResult<()> {
        let Some(transform) = context.transform else {
            return Ok(());
        };

        for line in self.lines {
            let start = transform.data_to_pixel(line.start)?;
            let end = transform.data_to_pixel(line.end)?;
            frame.lines.push(LinePrimitive::new(
                start.x,
                start.y,
                end.x,
                end.y,
                self.style.stroke_width_px,
                self.style.stroke_color,
            ));
            for handle in [start, end] {
                frame.circles.push(CirclePrimitive::new(
                    handle.x,
                    handle.y,
                    self.style.handle_radius_px,
                    self.style.handle_color,
                ));
            }
        }
        Ok(())
    }
}
