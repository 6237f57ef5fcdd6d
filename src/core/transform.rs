use crate::core::{DataPoint, PixelPoint, PriceScale, TimeScale, Viewport};
use crate::error::ChartResult;

/// The chart's view transform at one instant: both axis scales plus the
/// surface size they map onto.
///
/// Values are copied out of the engine on demand and never kept across
/// events, so a resize or refit between two events is always observed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotTransform {
    pub viewport: Viewport,
    pub time_scale: TimeScale,
    pub price_scale: PriceScale,
}

impl PlotTransform {
    #[must_use]
    pub fn new(viewport: Viewport, time_scale: TimeScale, price_scale: PriceScale) -> Self {
        Self {
            viewport,
            time_scale,
            price_scale,
        }
    }

    /// Forward mapping, data space to surface pixels.
    pub fn data_to_pixel(self, point: DataPoint) -> ChartResult<PixelPoint> {
        Ok(PixelPoint::new(
            self.time_scale.time_to_pixel(point.x, self.viewport)?,
            self.price_scale.price_to_pixel(point.y, self.viewport)?,
        ))
    }

    /// Inverse mapping; each axis is inverted independently.
    pub fn pixel_to_data(self, pixel: PixelPoint) -> ChartResult<DataPoint> {
        Ok(DataPoint::new(
            self.time_scale.pixel_to_time(pixel.x, self.viewport)?,
            self.price_scale.pixel_to_price(pixel.y, self.viewport)?,
        ))
    }
}
