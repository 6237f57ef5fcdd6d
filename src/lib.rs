//! chart-trendlines: candlestick chart viewer with persistent, draggable
//! trendline annotations.
//!
//! The engine draws candles, `extensions::TrendlineOverlay` draws the
//! annotations on top, and `app::ChartController` ties pointer input, the
//! kline fetch lifecycle and the persisted collection together for hosts.

pub mod api;
pub mod app;
pub mod core;
pub mod data;
pub mod error;
pub mod extensions;
pub mod interaction;
pub mod render;
pub mod storage;
pub mod telemetry;

#[cfg(feature = "gtk4-adapter")]
pub mod platform_gtk;

pub use api::{ChartEngine, ChartEngineConfig};
pub use app::{AppConfig, ChartController};
pub use error::{ChartError, ChartResult};
