use chart_trendlines::api::{ChartEngine, ChartEngineConfig};
use chart_trendlines::core::{Viewport, mock_candles};
use chart_trendlines::error::ChartError;
use chart_trendlines::render::{CirclePrimitive, Color, LinePrimitive, NullRenderer, RenderFrame};

#[test]
fn empty_engine_builds_an_empty_frame() {
    let engine =
        ChartEngine::new(NullRenderer::default(), ChartEngineConfig::default()).expect("init");

    let frame = engine.build_render_frame().expect("frame");
    frame.validate().expect("valid frame");
    assert!(frame.is_empty());
    assert_eq!(frame.viewport, Viewport::new(1280, 760));
}

#[test]
fn null_renderer_receives_computed_frame_counts() {
    let mut engine =
        ChartEngine::new(NullRenderer::default(), ChartEngineConfig::default()).expect("init");
    engine.set_candles(mock_candles()).expect("candles");

    engine.render().expect("render");
    let renderer = engine.into_renderer();

    assert_eq!(renderer.frames_rendered, 1);
    assert_eq!(renderer.last_rect_count, 4);
    // 4 wicks, 4 day ticks, 8 price ticks
    assert_eq!(renderer.last_line_count, 16);
    assert_eq!(renderer.last_circle_count, 0);
    // day and price labels plus the two axis titles
    assert_eq!(renderer.last_text_count, 4 + 8 + 2);
}

#[test]
fn candle_bodies_stay_inside_the_viewport() {
    let mut engine =
        ChartEngine::new(NullRenderer::default(), ChartEngineConfig::default()).expect("init");
    engine.set_candles(mock_candles()).expect("candles");

    let frame = engine.build_render_frame().expect("frame");
    for rect in &frame.rects {
        assert!(rect.x >= 0.0 && rect.x + rect.width <= 1280.0);
        assert!(rect.y >= 0.0 && rect.y + rect.height <= 760.0);
        assert!(rect.height >= 1.0);
    }
}

#[test]
fn validate_rejects_degenerate_primitives() {
    let black = Color::rgb(0.0, 0.0, 0.0);

    let zero_radius = RenderFrame::new(Viewport::new(100, 100))
        .with_circle(CirclePrimitive::new(10.0, 10.0, 0.0, black));
    assert!(matches!(
        zero_radius.validate(),
        Err(ChartError::InvalidData(_))
    ));

    let nan_line = RenderFrame::new(Viewport::new(100, 100))
        .with_line(LinePrimitive::new(0.0, f64::NAN, 10.0, 10.0, 1.0, black));
    assert!(nan_line.validate().is_err());

    let bad_alpha = RenderFrame::new(Viewport::new(100, 100)).with_circle(CirclePrimitive::new(
        5.0,
        5.0,
        2.0,
        Color::rgba(0.0, 0.0, 0.0, 1.5),
    ));
    assert!(bad_alpha.validate().is_err());
}
