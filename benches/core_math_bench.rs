use chart_trendlines::api::{ChartEngine, ChartEngineConfig};
use chart_trendlines::core::{
    Candle, DataPoint, PlotTransform, PriceScale, TimeScale, TimeScaleTuning, Trendline, Viewport,
    project_candles,
};
use chart_trendlines::extensions::{OverlayStyle, TrendlineOverlay};
use chart_trendlines::interaction::{HitTolerance, hit_test};
use chart_trendlines::render::NullRenderer;
use chrono::{Days, NaiveDate};
use criterion::{Criterion, criterion_group, criterion_main};
use rust_decimal::Decimal;
use std::hint::black_box;

fn daily_candles(count: u64) -> Vec<Candle> {
    let first = NaiveDate::from_ymd_opt(2020, 1, 1).expect("valid date");
    (0..count)
        .map(|i| {
            let base = Decimal::from(100 + i % 50);
            let (open, close) = if i % 2 == 0 {
                (base, base + Decimal::ONE)
            } else {
                (base + Decimal::ONE, base)
            };
            Candle::new(
                first + Days::new(i),
                open,
                base + Decimal::TWO,
                base - Decimal::ONE,
                close,
            )
            .expect("valid generated candle")
        })
        .collect()
}

fn fan_of_lines(candles: &[Candle], count: usize) -> Vec<Trendline> {
    let first = candles[0].time_seconds();
    let last = candles[candles.len() - 1].time_seconds();
    (0..count)
        .map(|i| {
            let offset = i as f64;
            Trendline::new(
                DataPoint::new(first + offset * 3_600.0, 100.0 + offset * 0.01),
                DataPoint::new(last - offset * 3_600.0, 150.0 - offset * 0.01),
            )
        })
        .collect()
}

fn transform_for(candles: &[Candle]) -> PlotTransform {
    PlotTransform::new(
        Viewport::new(1920, 1080),
        TimeScale::from_candles_tuned(candles, TimeScaleTuning::default()).expect("time scale"),
        PriceScale::from_candles(candles).expect("price scale"),
    )
}

fn bench_candle_projection_2k(c: &mut Criterion) {
    let candles = daily_candles(2_000);
    let transform = transform_for(&candles);

    c.bench_function("candle_projection_2k", |b| {
        b.iter(|| {
            let _ = project_candles(
                black_box(&candles),
                transform.time_scale,
                transform.price_scale,
                transform.viewport,
                5.0,
            )
            .expect("projection");
        })
    });
}

fn bench_hit_test_miss_1k_lines(c: &mut Criterion) {
    let candles = daily_candles(500);
    let lines = fan_of_lines(&candles, 1_000);
    let transform = transform_for(&candles);
    let far = DataPoint::new(candles[250].time_seconds(), 10_000.0);

    c.bench_function("hit_test_miss_1k_lines_data_units", |b| {
        b.iter(|| {
            hit_test(
                black_box(far),
                &lines,
                HitTolerance::DataUnits(10.0),
                None,
            )
        })
    });
    c.bench_function("hit_test_miss_1k_lines_screen_pixels", |b| {
        b.iter(|| {
            hit_test(
                black_box(far),
                &lines,
                HitTolerance::ScreenPixels(6.0),
                Some(transform),
            )
        })
    });
}

fn bench_frame_with_overlay(c: &mut Criterion) {
    let candles = daily_candles(500);
    let lines = fan_of_lines(&candles, 200);
    let mut engine = ChartEngine::new(NullRenderer::default(), ChartEngineConfig::default())
        .expect("engine init");
    engine.set_candles(candles).expect("set candles");
    let overlay = TrendlineOverlay::new(&lines, OverlayStyle::default());

    c.bench_function("frame_500_candles_200_lines", |b| {
        b.iter(|| {
            let _ = engine
                .build_render_frame_with_hooks(&[&overlay])
                .expect("frame");
        })
    });
}

criterion_group!(
    benches,
    bench_candle_projection_2k,
    bench_hit_test_miss_1k_lines,
    bench_frame_with_overlay
);
criterion_main!(benches);
