use serde::{Deserialize, Serialize};

use crate::core::DataPoint;

/// Which end of a trendline an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Endpoint {
    Start,
    End,
}

impl Endpoint {
    /// Test order used by hit-testing: `start` before `end`.
    pub const ALL: [Endpoint; 2] = [Endpoint::Start, Endpoint::End];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Endpoint::Start => "start",
            Endpoint::End => "end",
        }
    }
}

/// A user-drawn two-point annotation in data space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Trendline {
    pub start: DataPoint,
    pub end: DataPoint,
}

impl Trendline {
    #[must_use]
    pub fn new(start: DataPoint, end: DataPoint) -> Self {
        Self { start, end }
    }

    #[must_use]
    pub fn endpoint(&self, which: Endpoint) -> DataPoint {
        match which {
            Endpoint::Start => self.start,
            Endpoint::End => self.end,
        }
    }

    pub fn set_endpoint(&mut self, which: Endpoint, point: DataPoint) {
        match which {
            Endpoint::Start => self.start = point,
            Endpoint::End => self.end = point,
        }
    }

    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.start.is_finite() && self.end.is_finite()
    }
}
