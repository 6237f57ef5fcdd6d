use tracing::debug;

use crate::api::ChartEngineConfig;
use crate::core::{Candle, PlotTransform, PriceScale, TimeScale, Viewport};
use crate::error::{ChartError, ChartResult};
use crate::extensions::{PluginContext, PostDrawHook};
use crate::render::{RenderFrame, Renderer};

/// Candlestick chart engine.
///
/// Owns the candle set and the fitted scales, builds one `RenderFrame` per
/// draw pass and hands it to the renderer. Annotation layers attach through
/// post-draw hooks and never see engine internals beyond `PluginContext`.
pub struct ChartEngine<R: Renderer> {
    renderer: R,
    config: ChartEngineConfig,
    viewport: Viewport,
    candles: Vec<Candle>,
    scales: Option<(TimeScale, PriceScale)>,
    series_label: Option<String>,
}

impl<R: Renderer> ChartEngine<R> {
    pub fn new(renderer: R, config: ChartEngineConfig) -> ChartResult<Self> {
        let config = config.validate()?;
        Ok(Self {
            renderer,
            viewport: config.viewport,
            config,
            candles: Vec::new(),
            scales: None,
            series_label: None,
        })
    }

    /// Replaces the dataset and refits both scales.
    ///
    /// An empty set behaves like `clear`.
    pub fn set_candles(&mut self, candles: Vec<Candle>) -> ChartResult<()> {
        if candles.is_empty() {
            self.clear();
            return Ok(());
        }

        let time_scale = TimeScale::from_candles_tuned(&candles, self.config.time_scale_tuning)?;
        let price_scale =
            PriceScale::from_candles_tuned(&candles, self.config.price_scale_tuning)?;
        debug!(
            candles = candles.len(),
            time_range = ?time_scale.visible_range(),
            price_domain = ?price_scale.domain(),
            "fitted chart scales"
        );
        self.candles = candles;
        self.scales = Some((time_scale, price_scale));
        Ok(())
    }

    pub fn clear(&mut self) {
        self.candles.clear();
        self.scales = None;
    }

    #[must_use]
    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    /// Caption drawn above the candles, e.g. `BTCUSDT Price`.
    #[must_use]
    pub fn series_label(&self) -> Option<&str> {
        self.series_label.as_deref()
    }

    pub fn set_series_label(&mut self, label: Option<String>) {
        self.series_label = label;
    }

    #[must_use]
    pub fn config(&self) -> ChartEngineConfig {
        self.config
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) -> ChartResult<()> {
        if !viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }
        self.viewport = viewport;
        Ok(())
    }

    /// Current view transform, or `None` while no candles are loaded.
    #[must_use]
    pub fn plot_transform(&self) -> Option<PlotTransform> {
        self.scales.map(|(time_scale, price_scale)| {
            PlotTransform::new(self.viewport, time_scale, price_scale)
        })
    }

    /// Builds the candle and axis frame without running hooks or the renderer.
    pub fn build_render_frame(&self) -> ChartResult<RenderFrame> {
        let mut frame = RenderFrame::new(self.viewport);
        if let Some(transform) = self.plot_transform() {
            self.append_candlestick_primitives(&mut frame, transform)?;
            self.append_axis_primitives(&mut frame, transform)?;
        }
        Ok(frame)
    }

    /// Candle frame followed by every hook, in order, on the same frame.
    pub fn build_render_frame_with_hooks(
        &self,
        hooks: &[&dyn PostDrawHook],
    ) -> ChartResult<RenderFrame> {
        let mut frame = self.build_render_frame()?;
        let context = PluginContext {
            viewport: self.viewport,
            transform: self.plot_transform(),
            candles_len: self.candles.len(),
        };
        for hook in hooks {
            hook.after_draw(&context, &mut frame)?;
        }
        Ok(frame)
    }

    pub fn render(&mut self) -> ChartResult<()> {
        self.render_with_hooks(&[])
    }

    /// Runs one draw pass through the renderer.
    pub fn render_with_hooks(&mut self, hooks: &[&dyn PostDrawHook]) -> ChartResult<()> {
        let frame = self.build_render_frame_with_hooks(hooks)?;
        self.renderer.render(&frame)
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    #[must_use]
    pub fn into_renderer(self) -> R {
        self.renderer
    }
}
