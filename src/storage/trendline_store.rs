use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::core::{DataPoint, Endpoint, Trendline};
use crate::error::{ChartError, ChartResult};
use crate::storage::KeyValueStore;

pub const DEFAULT_TRENDLINES_KEY: &str = "trendlines";
pub const TRENDLINES_JSON_SCHEMA_V1: u32 = 1;

/// Bare-array payloads carry chart.js time values in epoch milliseconds.
const LEGACY_TIME_UNITS_PER_SECOND: f64 = 1_000.0;

/// Persisted shape of the trendline collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendlinesJsonContractV1 {
    pub schema_version: u32,
    pub trendlines: Vec<Trendline>,
}

impl TrendlinesJsonContractV1 {
    #[must_use]
    pub fn new(trendlines: Vec<Trendline>) -> Self {
        Self {
            schema_version: TRENDLINES_JSON_SCHEMA_V1,
            trendlines,
        }
    }

    pub fn to_json_string(&self) -> ChartResult<String> {
        serde_json::to_string(self).map_err(|e| {
            ChartError::InvalidData(format!("failed to serialize trendlines contract v1: {e}"))
        })
    }

    /// Accepts the versioned payload as well as the legacy bare array of
    /// lines, whose `x` values are converted from milliseconds to seconds.
    pub fn from_json_compat_str(input: &str) -> ChartResult<Vec<Trendline>> {
        Self::decode(input).map(|(lines, _)| lines)
    }

    /// Decoded lines plus whether the payload was the legacy shape.
    fn decode(input: &str) -> ChartResult<(Vec<Trendline>, bool)> {
        if let Ok(lines) = serde_json::from_str::<Vec<Trendline>>(input) {
            let lines: Vec<Trendline> = lines.into_iter().map(from_legacy_millis).collect();
            if let Some(line) = lines.iter().find(|line| !line.is_finite()) {
                return Err(ChartError::InvalidData(format!(
                    "legacy trendline has non-finite coordinates: {line:?}"
                )));
            }
            return Ok((lines, true));
        }
        let payload: Self = serde_json::from_str(input).map_err(|e| {
            ChartError::InvalidData(format!("failed to parse trendlines json payload: {e}"))
        })?;
        if payload.schema_version != TRENDLINES_JSON_SCHEMA_V1 {
            return Err(ChartError::InvalidData(format!(
                "unsupported trendlines schema version: {}",
                payload.schema_version
            )));
        }
        Ok((payload.trendlines, false))
    }
}

fn from_legacy_millis(line: Trendline) -> Trendline {
    let convert = |point: DataPoint| {
        DataPoint::new(point.x / LEGACY_TIME_UNITS_PER_SECOND, point.y)
    };
    Trendline::new(convert(line.start), convert(line.end))
}

/// Ordered trendline collection mirrored into a key-value slot.
///
/// Every mutation is written through immediately. When the write fails the
/// in-memory change stays applied and the error is returned to the caller.
#[derive(Debug)]
pub struct TrendlineStore<S: KeyValueStore> {
    slot: S,
    key: String,
    lines: Vec<Trendline>,
}

impl<S: KeyValueStore> TrendlineStore<S> {
    pub fn open(slot: S) -> Self {
        Self::open_with_key(slot, DEFAULT_TRENDLINES_KEY)
    }

    /// Loads the collection stored under `key`.
    ///
    /// A missing slot yields an empty collection. An unreadable or corrupt
    /// payload is logged, moved aside and also yields an empty collection.
    pub fn open_with_key(mut slot: S, key: impl Into<String>) -> Self {
        let key = key.into();
        let mut legacy = false;
        let lines = match slot.read(&key) {
            Ok(None) => Vec::new(),
            Ok(Some(payload)) => match TrendlinesJsonContractV1::decode(&payload) {
                Ok((lines, was_legacy)) => {
                    legacy = was_legacy;
                    lines
                }
                Err(err) => {
                    warn!(key = %key, error = %err, "discarding corrupt trendline state");
                    if let Err(err) = slot.quarantine(&key) {
                        warn!(key = %key, error = %err, "failed to move corrupt trendline state aside");
                    }
                    Vec::new()
                }
            },
            Err(err) => {
                warn!(key = %key, error = %err, "failed to read trendline state");
                Vec::new()
            }
        };
        debug!(key = %key, count = lines.len(), "loaded trendlines");
        let mut store = Self { slot, key, lines };
        if legacy {
            match store.persist() {
                Ok(()) => info!(
                    key = %store.key,
                    count = store.lines.len(),
                    "migrated legacy trendline array to schema v1"
                ),
                Err(err) => {
                    warn!(key = %store.key, error = %err, "failed to rewrite legacy trendline state");
                }
            }
        }
        store
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub fn lines(&self) -> &[Trendline] {
        &self.lines
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Trendline> {
        self.lines.get(index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    #[must_use]
    pub fn slot(&self) -> &S {
        &self.slot
    }

    #[must_use]
    pub fn into_slot(self) -> S {
        self.slot
    }

    /// Appends a line and returns its index.
    pub fn add(&mut self, line: Trendline) -> ChartResult<usize> {
        if !line.is_finite() {
            return Err(ChartError::InvalidData(
                "trendline endpoints must be finite".to_owned(),
            ));
        }
        self.lines.push(line);
        let index = self.lines.len() - 1;
        self.persist()?;
        Ok(index)
    }

    /// Removes one line; an out-of-range index leaves the collection as is.
    pub fn remove_at(&mut self, index: usize) -> ChartResult<Option<Trendline>> {
        if index >= self.lines.len() {
            return Ok(None);
        }
        let removed = self.lines.remove(index);
        self.persist()?;
        Ok(Some(removed))
    }

    pub fn remove_all(&mut self) -> ChartResult<()> {
        self.lines.clear();
        self.persist()
    }

    pub fn remove_last(&mut self) -> ChartResult<Option<Trendline>> {
        let Some(removed) = self.lines.pop() else {
            return Ok(None);
        };
        self.persist()?;
        Ok(Some(removed))
    }

    /// Replaces one endpoint of the line at `index`.
    ///
    /// Returns `false` without touching the slot when `index` is out of range.
    pub fn update_endpoint(
        &mut self,
        index: usize,
        which: Endpoint,
        point: DataPoint,
    ) -> ChartResult<bool> {
        if !point.is_finite() {
            return Err(ChartError::InvalidData(
                "trendline endpoints must be finite".to_owned(),
            ));
        }
        let Some(line) = self.lines.get_mut(index) else {
            return Ok(false);
        };
        line.set_endpoint(which, point);
        self.persist()?;
        Ok(true)
    }

    fn persist(&mut self) -> ChartResult<()> {
        let payload = TrendlinesJsonContractV1::new(self.lines.clone()).to_json_string()?;
        self.slot.write(&self.key, &payload)
    }
}
