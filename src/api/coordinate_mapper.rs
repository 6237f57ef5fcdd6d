use serde::{Deserialize, Serialize};

use crate::api::ChartEngine;
use crate::core::{DataPoint, PixelPoint, PlotTransform};
use crate::render::Renderer;

/// Absolute pointer position as reported by the host windowing layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerPosition {
    pub client_x: f64,
    pub client_y: f64,
}

impl PointerPosition {
    #[must_use]
    pub fn new(client_x: f64, client_y: f64) -> Self {
        Self { client_x, client_y }
    }
}

/// Screen offset of the chart surface's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SurfaceOffset {
    pub left: f64,
    pub top: f64,
}

impl SurfaceOffset {
    #[must_use]
    pub fn new(left: f64, top: f64) -> Self {
        Self { left, top }
    }
}

/// A pointer event resolved into data space.
///
/// The transform that produced `point` travels with it so hit-testing the
/// same event uses the same view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSample {
    pub point: DataPoint,
    pub pixel: PixelPoint,
    pub transform: PlotTransform,
}

/// Converts pointer positions to chart data coordinates.
#[derive(Debug, Clone, Copy, Default)]
pub struct CoordinateMapper;

impl CoordinateMapper {
    /// Maps against the engine's current transform.
    ///
    /// Returns `None` while no data is loaded; such events are ignored.
    #[must_use]
    pub fn map<R: Renderer>(
        engine: &ChartEngine<R>,
        pointer: PointerPosition,
        offset: SurfaceOffset,
    ) -> Option<PointerSample> {
        Self::map_with_transform(engine.plot_transform()?, pointer, offset)
    }

    #[must_use]
    pub fn map_with_transform(
        transform: PlotTransform,
        pointer: PointerPosition,
        offset: SurfaceOffset,
    ) -> Option<PointerSample> {
        let pixel = PixelPoint::new(pointer.client_x - offset.left, pointer.client_y - offset.top);
        let point = transform.pixel_to_data(pixel).ok()?;
        if !point.is_finite() {
            return None;
        }
        Some(PointerSample {
            point,
            pixel,
            transform,
        })
    }
}
