use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::api::ChartEngineConfig;
use crate::core::Viewport;
use crate::data::{DEFAULT_KLINES_ENDPOINT, KlineClient};
use crate::error::{ChartError, ChartResult};
use crate::extensions::OverlayStyle;
use crate::interaction::HitTolerance;
use crate::storage::{DEFAULT_TRENDLINES_KEY, resolve_data_dir};

/// Host-level settings. Every field has a default so partial JSON files load.
///
/// Hosts hit-test in screen pixels by default; `HitTolerance::DataUnits` is
/// opt-in through `hit_tolerance`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub symbol: String,
    pub interval: String,
    pub limit: u32,
    pub klines_endpoint: String,
    pub request_timeout_secs: u64,
    pub data_dir: Option<PathBuf>,
    pub storage_key: String,
    pub hit_tolerance: HitTolerance,
    pub overlay: OverlayStyle,
    pub viewport: Viewport,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            symbol: "BTCUSDT".to_owned(),
            interval: "1d".to_owned(),
            limit: 20,
            klines_endpoint: DEFAULT_KLINES_ENDPOINT.to_owned(),
            request_timeout_secs: 12,
            data_dir: None,
            storage_key: DEFAULT_TRENDLINES_KEY.to_owned(),
            hit_tolerance: HitTolerance::ScreenPixels(10.0),
            overlay: OverlayStyle::default(),
            viewport: Viewport::new(1280, 760),
        }
    }
}

impl AppConfig {
    #[must_use]
    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = symbol.into();
        self
    }

    #[must_use]
    pub fn with_interval(mut self, interval: impl Into<String>) -> Self {
        self.interval = interval.into();
        self
    }

    #[must_use]
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    #[must_use]
    pub fn with_klines_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.klines_endpoint = endpoint.into();
        self
    }

    #[must_use]
    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(data_dir.into());
        self
    }

    #[must_use]
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    #[must_use]
    pub fn with_hit_tolerance(mut self, tolerance: HitTolerance) -> Self {
        self.hit_tolerance = tolerance;
        self
    }

    #[must_use]
    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = viewport;
        self
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Directory the file slot lives in after env/platform fallbacks.
    #[must_use]
    pub fn resolved_data_dir(&self) -> PathBuf {
        resolve_data_dir(self.data_dir.as_deref())
    }

    #[must_use]
    pub fn engine_config(&self) -> ChartEngineConfig {
        ChartEngineConfig::new(self.viewport)
    }

    pub fn kline_client(&self) -> ChartResult<KlineClient> {
        KlineClient::with_settings(self.klines_endpoint.clone(), self.request_timeout())
    }

    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ChartError::InvalidData(format!("failed to serialize app config: {e}")))
    }

    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidData(format!("failed to parse app config: {e}")))
    }

    pub fn load(path: &Path) -> ChartResult<Self> {
        Self::from_json_str(&fs::read_to_string(path)?)
    }
}
