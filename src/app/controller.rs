use tracing::{info, warn};

use crate::api::{ChartEngine, CoordinateMapper, PointerPosition, PointerSample, SurfaceOffset};
use crate::app::{AppConfig, AppState, FetchOutcome, FetchTicket, TableRow, ViewMode};
use crate::core::{Candle, Trendline, Viewport, mock_candles};
use crate::error::ChartResult;
use crate::extensions::{OverlayStyle, TrendlineOverlay};
use crate::interaction::{CursorAffordance, GestureOutcome, TrendlineGestures};
use crate::render::{RenderFrame, Renderer};
use crate::storage::{KeyValueStore, TrendlineStore};

/// Single owner of everything a viewer session mutates.
///
/// Hosts bind their inputs once and call into the controller at dispatch
/// time; every handler runs on the host's UI thread.
pub struct ChartController<R: Renderer, S: KeyValueStore> {
    state: AppState,
    engine: ChartEngine<R>,
    store: TrendlineStore<S>,
    gestures: TrendlineGestures,
    overlay_style: OverlayStyle,
    surface_offset: SurfaceOffset,
}

impl<R: Renderer, S: KeyValueStore> ChartController<R, S> {
    /// Opens the trendline slot and starts with no candles loaded.
    pub fn new(renderer: R, slot: S, config: &AppConfig) -> ChartResult<Self> {
        let engine = ChartEngine::new(renderer, config.engine_config())?;
        let store = TrendlineStore::open_with_key(slot, config.storage_key.clone());
        Ok(Self {
            state: AppState::from_config(config),
            engine,
            store,
            gestures: TrendlineGestures::new(config.hit_tolerance),
            overlay_style: config.overlay,
            surface_offset: SurfaceOffset::default(),
        })
    }

    #[must_use]
    pub fn state(&self) -> &AppState {
        &self.state
    }

    #[must_use]
    pub fn engine(&self) -> &ChartEngine<R> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut ChartEngine<R> {
        &mut self.engine
    }

    #[must_use]
    pub fn candles(&self) -> &[Candle] {
        self.engine.candles()
    }

    #[must_use]
    pub fn trendlines(&self) -> &[Trendline] {
        self.store.lines()
    }

    #[must_use]
    pub fn store(&self) -> &TrendlineStore<S> {
        &self.store
    }

    #[must_use]
    pub fn gestures(&self) -> TrendlineGestures {
        self.gestures
    }

    #[must_use]
    pub fn cursor(&self) -> CursorAffordance {
        self.gestures.cursor()
    }

    #[must_use]
    pub fn view_mode(&self) -> ViewMode {
        self.state.view_mode
    }

    pub fn set_symbol(&mut self, symbol: impl Into<String>) {
        self.state.symbol = symbol.into();
    }

    pub fn set_interval(&mut self, interval: impl Into<String>) {
        self.state.interval = interval.into();
    }

    pub fn set_limit_input(&mut self, limit: impl Into<String>) {
        self.state.limit_input = limit.into();
    }

    /// Validates the form and starts a new fetch.
    ///
    /// On success the dataset and the trendline collection are cleared
    /// before the caller issues the request. On error nothing changes.
    pub fn go(&mut self) -> ChartResult<FetchTicket> {
        let request = self.state.kline_request()?;
        self.engine.clear();
        self.gestures.reset();
        if let Err(err) = self.store.remove_all() {
            warn!(error = %err, "failed to persist cleared trendlines");
        }
        let seq = self.state.next_fetch_seq();
        info!(
            seq,
            symbol = %request.symbol,
            interval = %request.interval,
            limit = request.limit,
            "fetch requested"
        );
        Ok(FetchTicket { seq, request })
    }

    /// Applies the result of a fetch unless a newer one has been issued.
    pub fn complete_fetch(
        &mut self,
        ticket: &FetchTicket,
        result: ChartResult<Vec<Candle>>,
    ) -> FetchOutcome {
        if ticket.seq != self.state.fetch_seq() {
            warn!(
                seq = ticket.seq,
                latest = self.state.fetch_seq(),
                "dropping stale fetch response"
            );
            return FetchOutcome::Stale;
        }

        let candles = match result {
            Ok(candles) => candles,
            Err(err) => {
                warn!(seq = ticket.seq, error = %err, "fetch failed");
                return FetchOutcome::Failed {
                    reason: err.to_string(),
                };
            }
        };
        let rows = candles.len();
        if let Err(err) = self.engine.set_candles(candles) {
            warn!(seq = ticket.seq, error = %err, "fetched candles rejected");
            return FetchOutcome::Failed {
                reason: err.to_string(),
            };
        }
        self.engine
            .set_series_label(Some(series_label(&ticket.request.symbol)));
        info!(seq = ticket.seq, rows, "fetch applied");
        FetchOutcome::Applied { rows }
    }

    /// Installs candles directly, without the clearing side effects of `go`.
    ///
    /// Used by hosts that restore a view over the persisted trendlines.
    pub fn load_candles(&mut self, candles: Vec<Candle>) -> ChartResult<()> {
        self.engine.set_candles(candles)?;
        self.engine
            .set_series_label(Some(series_label(self.state.symbol.trim())));
        Ok(())
    }

    /// Installs the built-in sample candles without touching the network.
    pub fn load_mock_candles(&mut self) -> ChartResult<()> {
        self.load_candles(mock_candles())
    }

    pub fn toggle_view(&mut self) -> ViewMode {
        self.state.view_mode = self.state.view_mode.toggled();
        self.state.view_mode
    }

    pub fn reset_trendlines(&mut self) {
        self.gestures.reset();
        if let Err(err) = self.store.remove_all() {
            warn!(error = %err, "failed to persist cleared trendlines");
        }
    }

    pub fn remove_last_trendline(&mut self) -> Option<Trendline> {
        self.gestures.reset();
        match self.store.remove_last() {
            Ok(removed) => removed,
            Err(err) => {
                warn!(error = %err, "failed to persist trendline removal");
                None
            }
        }
    }

    pub fn set_viewport(&mut self, viewport: Viewport) -> ChartResult<()> {
        self.engine.set_viewport(viewport)
    }

    pub fn set_surface_offset(&mut self, offset: SurfaceOffset) {
        self.surface_offset = offset;
    }

    #[must_use]
    pub fn surface_offset(&self) -> SurfaceOffset {
        self.surface_offset
    }

    pub fn pointer_down(&mut self, pointer: PointerPosition) -> GestureOutcome {
        let Some(sample) = self.sample(pointer) else {
            return GestureOutcome::Ignored;
        };
        self.gestures.pointer_down(sample, &self.store)
    }

    pub fn pointer_move(&mut self, pointer: PointerPosition) -> GestureOutcome {
        let Some(sample) = self.sample(pointer) else {
            return GestureOutcome::Ignored;
        };
        settle(self.gestures.pointer_move(sample, &mut self.store))
    }

    pub fn pointer_up(&mut self) -> GestureOutcome {
        self.gestures.pointer_up()
    }

    pub fn click(&mut self, pointer: PointerPosition) -> GestureOutcome {
        let Some(sample) = self.sample(pointer) else {
            return GestureOutcome::Ignored;
        };
        settle(self.gestures.click(sample, &mut self.store))
    }

    pub fn double_click(&mut self, pointer: PointerPosition) -> GestureOutcome {
        let Some(sample) = self.sample(pointer) else {
            return GestureOutcome::Ignored;
        };
        settle(self.gestures.double_click(sample, &mut self.store))
    }

    pub fn pointer_leave(&mut self) -> GestureOutcome {
        self.gestures.pointer_leave()
    }

    /// Candles plus the trendline overlay, without drawing.
    pub fn build_frame(&self) -> ChartResult<RenderFrame> {
        let overlay = TrendlineOverlay::new(self.store.lines(), self.overlay_style);
        self.engine.build_render_frame_with_hooks(&[&overlay])
    }

    pub fn render(&mut self) -> ChartResult<()> {
        let overlay = TrendlineOverlay::new(self.store.lines(), self.overlay_style);
        self.engine.render_with_hooks(&[&overlay])
    }

    #[must_use]
    pub fn table_rows(&self) -> Vec<TableRow> {
        self.engine.candles().iter().map(TableRow::from).collect()
    }

    /// Chart pointer events are inert while the table view is shown.
    fn sample(&self, pointer: PointerPosition) -> Option<PointerSample> {
        if self.state.view_mode != ViewMode::Chart {
            return None;
        }
        CoordinateMapper::map(&self.engine, pointer, self.surface_offset)
    }
}

fn series_label(symbol: &str) -> String {
    format!("{symbol} Price")
}

fn settle(result: ChartResult<GestureOutcome>) -> GestureOutcome {
    result.unwrap_or_else(|err| {
        warn!(error = %err, "failed to persist trendline change");
        GestureOutcome::PersistFailed
    })
}
