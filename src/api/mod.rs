mod axis_render_frame_builder;
mod axis_ticks;
mod candlestick_render_frame_builder;
mod coordinate_mapper;
mod engine;
mod engine_config;

pub use axis_render_frame_builder::{PRICE_AXIS_TITLE, TIME_AXIS_TITLE};
pub use coordinate_mapper::{CoordinateMapper, PointerPosition, PointerSample, SurfaceOffset};
pub use engine::ChartEngine;
pub use engine_config::{AxisStyle, CandleStyle, ChartEngineConfig};
