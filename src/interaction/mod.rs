//! Pointer-driven trendline editing.

mod gesture;

pub use gesture::{CursorAffordance, GestureOutcome, GestureState, TrendlineGestures};
pub use hit_test::{EndpointHit, HitTolerance, hit_test};
