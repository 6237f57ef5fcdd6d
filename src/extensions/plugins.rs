use crate::core::{PlotTransform, Viewport};
use crate::error::ChartResult;
use crate::render::RenderFrame;

/// Read-only state snapshot passed to post-draw hooks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PluginContext {
    pub viewport: Viewport,
    /// `None` while the engine has no candles.
    pub transform: Option<PlotTransform>,
    pub candles_len: usize,
}

/// Extension hook run after the engine has laid out its own primitives.
///
/// Hooks append to the frame; they can't reach the engine's dataset or
/// scales other than through `PluginContext`.
pub trait PostDrawHook {
    fn id(&self) -> &str;
    fn after_draw(&self, context: &PluginContext, frame: &mut RenderFrame) -> ChartResult<()>;
}
