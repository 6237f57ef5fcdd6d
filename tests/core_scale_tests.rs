use approx::assert_relative_eq;
use chart_trendlines::core::{
    DataPoint, LinearScale, PixelPoint, PlotTransform, PriceScale, PriceScaleTuning, TimeScale,
    TimeScaleTuning, Viewport, mock_candles,
};

const JUNE_1: f64 = 1_748_736_000.0;
const JUNE_4: f64 = 1_748_995_200.0;

#[test]
fn scale_round_trip_within_tolerance() {
    let scale = LinearScale::new(10.0, 110.0).expect("valid scale");

    let original = 42.5;
    let px = scale.domain_to_pixel(original, 1000.0).expect("to pixel");
    let recovered = scale.pixel_to_domain(px, 1000.0).expect("from pixel");

    assert_relative_eq!(recovered, original, epsilon = 1e-9);
}

#[test]
fn zero_extent_is_rejected() {
    let scale = LinearScale::new(0.0, 1.0).expect("valid scale");
    assert!(scale.domain_to_pixel(0.5, 0.0).is_err());
}

#[test]
fn invalid_viewport_is_rejected_by_axis_scales() {
    let time_scale = TimeScale::new(0.0, 10.0).expect("valid scale");
    let price_scale = PriceScale::new(0.0, 10.0).expect("valid scale");
    assert!(time_scale.time_to_pixel(5.0, Viewport::new(0, 100)).is_err());
    assert!(price_scale.pixel_to_price(5.0, Viewport::new(100, 0)).is_err());
}

#[test]
fn time_scale_fits_candle_days_with_padding() {
    let scale = TimeScale::from_candles_tuned(&mock_candles(), TimeScaleTuning::default())
        .expect("fit time scale");

    assert_eq!(scale.full_range(), (JUNE_1, JUNE_4));
    let (start, end) = scale.visible_range();
    let span = JUNE_4 - JUNE_1;
    assert_relative_eq!(start, JUNE_1 - span * 0.05);
    assert_relative_eq!(end, JUNE_4 + span * 0.05);
}

#[test]
fn single_candle_gets_one_day_span() {
    let candles = &mock_candles()[..1];
    let tuning = TimeScaleTuning {
        left_padding_ratio: 0.0,
        right_padding_ratio: 0.0,
        ..TimeScaleTuning::default()
    };
    let scale = TimeScale::from_candles_tuned(candles, tuning).expect("fit time scale");
    let (start, end) = scale.visible_range();
    assert_relative_eq!(end - start, 86_400.0);
}

#[test]
fn time_scale_maps_the_padded_range_onto_the_viewport() {
    let viewport = Viewport::new(1100, 600);
    let scale = TimeScale::from_candles_tuned(&mock_candles(), TimeScaleTuning::default())
        .expect("fit time scale");

    let (start, end) = scale.visible_range();
    assert_relative_eq!(scale.time_to_pixel(start, viewport).expect("left"), 0.0);
    assert_relative_eq!(scale.time_to_pixel(end, viewport).expect("right"), 1100.0);
    assert_relative_eq!(scale.time_to_pixel(JUNE_1, viewport).expect("first day"), 50.0);
    assert_relative_eq!(scale.time_to_pixel(JUNE_4, viewport).expect("last day"), 1050.0);
}

#[test]
fn price_scale_maps_higher_prices_upwards() {
    let viewport = Viewport::new(800, 400);
    let scale = PriceScale::new(100.0, 200.0).expect("valid scale");

    assert_eq!(scale.price_to_pixel(200.0, viewport).expect("top"), 0.0);
    assert_eq!(scale.price_to_pixel(100.0, viewport).expect("bottom"), 400.0);
    assert_relative_eq!(scale.pixel_to_price(100.0, viewport).expect("inverse"), 175.0);
}

#[test]
fn price_scale_envelope_uses_lows_and_highs() {
    let scale = PriceScale::from_candles_tuned(&mock_candles(), PriceScaleTuning::default())
        .expect("fit price scale");
    let (low, high) = scale.domain();
    assert_relative_eq!(low, 90.0 - 35.0 * 0.1);
    assert_relative_eq!(high, 125.0 + 35.0 * 0.1);
}

#[test]
fn plot_transform_round_trips_each_axis_independently() {
    let candles = mock_candles();
    let transform = PlotTransform::new(
        Viewport::new(1280, 760),
        TimeScale::from_candles_tuned(&candles, TimeScaleTuning::default()).expect("time"),
        PriceScale::from_candles(&candles).expect("price"),
    );

    let point = DataPoint::new(1_748_822_400.0, 115.0);
    let pixel = transform.data_to_pixel(point).expect("forward");
    let recovered = transform.pixel_to_data(pixel).expect("inverse");
    assert_relative_eq!(recovered.x, point.x, max_relative = 1e-12);
    assert_relative_eq!(recovered.y, point.y, max_relative = 1e-12);

    let top_left = transform
        .pixel_to_data(PixelPoint::new(0.0, 0.0))
        .expect("corner");
    assert_relative_eq!(top_left.x, transform.time_scale.visible_range().0);
    assert_relative_eq!(top_left.y, transform.price_scale.domain().1);
}
