use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::PointerSample;
use crate::core::{DataPoint, Trendline};
use crate::error::ChartResult;
use crate::interaction::{EndpointHit, HitTolerance, hit_test};
use crate::storage::{KeyValueStore, TrendlineStore};

/// Drawing/editing state. A pending first click and an active drag can't
/// coexist.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum GestureState {
    #[default]
    Idle,
    AwaitingSecondClick {
        first: DataPoint,
    },
    Dragging {
        target: EndpointHit,
    },
}

/// Pointer shape hosts should show over the chart surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CursorAffordance {
    #[default]
    Default,
    Grab,
    Grabbing,
}

/// What a single pointer event did.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GestureOutcome {
    Ignored,
    LineStarted { point: DataPoint },
    LineCompleted { index: usize },
    DragStarted { target: EndpointHit },
    EndpointMoved { target: EndpointHit },
    DragEnded { target: EndpointHit },
    LineRemoved { index: usize },
    HoverChanged { hover: Option<EndpointHit> },
    /// The collection changed in memory but writing it through failed.
    PersistFailed,
}

impl GestureOutcome {
    /// `true` when the drawn overlay differs from the previous frame.
    #[must_use]
    pub fn needs_redraw(self) -> bool {
        matches!(
            self,
            Self::LineCompleted { .. }
                | Self::EndpointMoved { .. }
                | Self::LineRemoved { .. }
                | Self::PersistFailed
        )
    }
}

/// Two-click drawing, endpoint dragging and double-click removal over a
/// `TrendlineStore`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TrendlineGestures {
    state: GestureState,
    hover: Option<EndpointHit>,
    cursor: CursorAffordance,
    tolerance: HitTolerance,
}

impl TrendlineGestures {
    #[must_use]
    pub fn new(tolerance: HitTolerance) -> Self {
        Self {
            tolerance,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn state(self) -> GestureState {
        self.state
    }

    #[must_use]
    pub fn hover(self) -> Option<EndpointHit> {
        self.hover
    }

    #[must_use]
    pub fn cursor(self) -> CursorAffordance {
        self.cursor
    }

    #[must_use]
    pub fn tolerance(self) -> HitTolerance {
        self.tolerance
    }

    /// Back to `Idle` with no hover, used whenever the collection is cleared.
    pub fn reset(&mut self) {
        *self = Self::new(self.tolerance);
    }

    pub fn pointer_down<S: KeyValueStore>(
        &mut self,
        sample: PointerSample,
        store: &TrendlineStore<S>,
    ) -> GestureOutcome {
        if matches!(self.state, GestureState::Dragging { .. }) {
            return GestureOutcome::Ignored;
        }
        let Some(target) = self.hit(sample, store) else {
            return GestureOutcome::Ignored;
        };
        debug!(index = target.index, endpoint = target.endpoint.as_str(), "drag started");
        self.state = GestureState::Dragging { target };
        self.hover = Some(target);
        self.cursor = CursorAffordance::Grabbing;
        GestureOutcome::DragStarted { target }
    }

    pub fn pointer_move<S: KeyValueStore>(
        &mut self,
        sample: PointerSample,
        store: &mut TrendlineStore<S>,
    ) -> ChartResult<GestureOutcome> {
        if let GestureState::Dragging { target } = self.state {
            if !store.update_endpoint(target.index, target.endpoint, sample.point)? {
                self.reset();
                return Ok(GestureOutcome::Ignored);
            }
            return Ok(GestureOutcome::EndpointMoved { target });
        }

        let hover = self.hit(sample, store);
        Ok(self.set_hover(hover))
    }

    pub fn pointer_up(&mut self) -> GestureOutcome {
        let GestureState::Dragging { target } = self.state else {
            return GestureOutcome::Ignored;
        };
        debug!(index = target.index, endpoint = target.endpoint.as_str(), "drag ended");
        self.state = GestureState::Idle;
        self.hover = Some(target);
        self.cursor = CursorAffordance::Grab;
        GestureOutcome::DragEnded { target }
    }

    pub fn click<S: KeyValueStore>(
        &mut self,
        sample: PointerSample,
        store: &mut TrendlineStore<S>,
    ) -> ChartResult<GestureOutcome> {
        match self.state {
            GestureState::Dragging { .. } => Ok(GestureOutcome::Ignored),
            GestureState::Idle => {
                // The click that closes a press on a handle must not start a line.
                if self.hit(sample, store).is_some() {
                    return Ok(GestureOutcome::Ignored);
                }
                debug!(x = sample.point.x, y = sample.point.y, "first trendline point captured");
                self.state = GestureState::AwaitingSecondClick {
                    first: sample.point,
                };
                Ok(GestureOutcome::LineStarted {
                    point: sample.point,
                })
            }
            GestureState::AwaitingSecondClick { first } => {
                self.state = GestureState::Idle;
                let line = Trendline::new(first, sample.point);
                let index = store.add(line)?;
                debug!(index, start = ?line.start, end = ?line.end, "trendline completed");
                Ok(GestureOutcome::LineCompleted { index })
            }
        }
    }

    pub fn double_click<S: KeyValueStore>(
        &mut self,
        sample: PointerSample,
        store: &mut TrendlineStore<S>,
    ) -> ChartResult<GestureOutcome> {
        let Some(target) = self.hit(sample, store) else {
            return Ok(GestureOutcome::Ignored);
        };
        self.state = GestureState::Idle;
        self.hover = None;
        self.cursor = CursorAffordance::Default;
        if let Some(line) = store.remove_at(target.index)? {
            debug!(
                index = target.index,
                start = ?line.start,
                end = ?line.end,
                "trendline removed"
            );
        }
        Ok(GestureOutcome::LineRemoved {
            index: target.index,
        })
    }

    pub fn pointer_leave(&mut self) -> GestureOutcome {
        if matches!(self.state, GestureState::Dragging { .. }) {
            return GestureOutcome::Ignored;
        }
        self.set_hover(None)
    }

    fn hit<S: KeyValueStore>(
        &self,
        sample: PointerSample,
        store: &TrendlineStore<S>,
    ) -> Option<EndpointHit> {
        hit_test(
            sample.point,
            store.lines(),
            self.tolerance,
            Some(sample.transform),
        )
    }

    fn set_hover(&mut self, hover: Option<EndpointHit>) -> GestureOutcome {
        let cursor = if hover.is_some() {
            CursorAffordance::Grab
        } else {
            CursorAffordance::Default
        };
        if hover == self.hover && cursor == self.cursor {
            return GestureOutcome::Ignored;
        }
        self.hover = hover;
        self.cursor = cursor;
        GestureOutcome::HoverChanged { hover }
    }
}
