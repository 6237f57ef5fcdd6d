use serde::{Deserialize, Serialize};

use crate::app::AppConfig;
use crate::data::KlineRequest;
use crate::error::{ChartError, ChartResult};

/// Rejection text shown when the interval or limit input is blank.
pub const MISSING_FIELDS_MESSAGE: &str = "Please fill in all fields.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ViewMode {
    #[default]
    Chart,
    Table,
}

impl ViewMode {
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Chart => Self::Table,
            Self::Table => Self::Chart,
        }
    }
}

/// Form inputs and view selection owned by the controller.
///
/// `limit_input` stays raw text until `Go` so hosts can bind it directly to
/// an entry widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppState {
    pub symbol: String,
    pub interval: String,
    pub limit_input: String,
    pub view_mode: ViewMode,
    fetch_seq: u64,
}

impl AppState {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            symbol: config.symbol.clone(),
            interval: config.interval.clone(),
            limit_input: config.limit.to_string(),
            view_mode: ViewMode::Chart,
            fetch_seq: 0,
        }
    }

    /// Sequence number of the most recently issued fetch.
    #[must_use]
    pub fn fetch_seq(&self) -> u64 {
        self.fetch_seq
    }

    /// Builds the request the current inputs describe.
    pub fn kline_request(&self) -> ChartResult<KlineRequest> {
        let interval = self.interval.trim();
        let limit = self.limit_input.trim();
        if interval.is_empty() || limit.is_empty() {
            return Err(ChartError::Validation(MISSING_FIELDS_MESSAGE.to_owned()));
        }
        let limit = limit.parse::<u32>().map_err(|_| {
            ChartError::Validation(format!("limit `{limit}` is not a positive integer"))
        })?;
        let request = KlineRequest::new(self.symbol.trim(), interval, limit);
        request.validate()?;
        Ok(request)
    }

    pub(crate) fn next_fetch_seq(&mut self) -> u64 {
        self.fetch_seq += 1;
        self.fetch_seq
    }
}

/// Handle for one in-flight fetch. Only the latest ticket's result applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub seq: u64,
    pub request: KlineRequest,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Applied { rows: usize },
    Stale,
    Failed { reason: String },
}
