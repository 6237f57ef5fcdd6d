pub mod candle;
pub mod price_scale;
pub mod primitives;
pub mod scale;
pub mod time_scale;
pub mod transform;
pub mod trendline;
pub mod types;

pub use candle::{Candle, CandleGeometry, mock_candles, project_candles};
pub use price_scale::{PriceScale, PriceScaleTuning};
pub use scale::LinearScale;
pub use time_scale::{TimeScale, TimeScaleTuning};
pub use transform::PlotTransform;
pub use trendline::{Endpoint, Trendline};
pub use types::{DataPoint, PixelPoint, Viewport};
