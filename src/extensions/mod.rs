//! Annotation layers drawn on top of the engine's own output.

mod plugins;
mod trendline_overlay;

pub use plugins::{PluginContext, PostDrawHook};
pub use trendline_overlay::{OverlayStyle, TrendlineOverlay};
