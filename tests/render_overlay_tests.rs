use chart_trendlines::api::{AxisStyle, ChartEngine, ChartEngineConfig};
use chart_trendlines::core::{DataPoint, Trendline, Viewport, mock_candles};
use chart_trendlines::error::ChartResult;
use chart_trendlines::extensions::{OverlayStyle, PluginContext, PostDrawHook, TrendlineOverlay};
use chart_trendlines::render::{Color, NullRenderer, RenderFrame, TextHAlign, TextPrimitive};

fn engine() -> ChartEngine<NullRenderer> {
    let config = ChartEngineConfig::new(Viewport::new(1280, 760));
    let mut engine = ChartEngine::new(NullRenderer::default(), config).expect("engine init");
    engine.set_candles(mock_candles()).expect("candles");
    engine
}

fn june_line() -> Trendline {
    Trendline::new(
        DataPoint::new(1_748_822_400.0, 115.0),
        DataPoint::new(1_748_908_800.0, 112.0),
    )
}

#[test]
fn engine_draws_one_body_and_one_wick_per_candle() {
    let config = ChartEngineConfig::new(Viewport::new(1280, 760)).with_axis_style(AxisStyle {
        visible: false,
        ..AxisStyle::default()
    });
    let mut engine = ChartEngine::new(NullRenderer::default(), config).expect("engine init");
    engine.set_candles(mock_candles()).expect("candles");
    engine.render().expect("render");

    let renderer = engine.renderer();
    assert_eq!(renderer.frames_rendered, 1);
    assert_eq!(renderer.last_rect_count, 4);
    assert_eq!(renderer.last_line_count, 4);
    assert_eq!(renderer.last_circle_count, 0);
}

#[test]
fn empty_engine_renders_an_empty_frame() {
    let mut engine =
        ChartEngine::new(NullRenderer::default(), ChartEngineConfig::default()).expect("init");
    engine.render().expect("render");
    let frame = engine.renderer().last_frame.as_ref().expect("frame");
    assert!(frame.is_empty());
}

#[test]
fn overlay_adds_segment_and_two_handles_per_line() {
    let mut engine = engine();
    let base_lines = engine.build_render_frame().expect("base frame").lines.len();
    let lines = [june_line(), june_line()];
    let style = OverlayStyle::default();
    let overlay = TrendlineOverlay::new(&lines, style);
    engine.render_with_hooks(&[&overlay]).expect("render");

    let frame = engine.renderer().last_frame.clone().expect("frame");
    assert_eq!(frame.lines.len(), base_lines + 2);
    assert_eq!(frame.circles.len(), 4);

    let transform = engine.plot_transform().expect("transform");
    let start = transform.data_to_pixel(lines[0].start).expect("start");
    let end = transform.data_to_pixel(lines[0].end).expect("end");
    let segment = frame.lines[base_lines];
    assert_eq!((segment.x1, segment.y1, segment.x2, segment.y2), (start.x, start.y, end.x, end.y));
    assert_eq!(segment.stroke_width, 2.0);
    assert_eq!(segment.color, Color::rgb(0.0, 0.0, 0.0));

    let handle = frame.circles[0];
    assert_eq!((handle.center_x, handle.center_y), (start.x, start.y));
    assert_eq!(handle.radius, 6.0);
    assert_eq!(handle.fill_color, Color::rgba(0.0, 0.0, 0.0, 0.5));
}

#[test]
fn overlay_is_skipped_while_no_data_is_loaded() {
    let mut engine =
        ChartEngine::new(NullRenderer::default(), ChartEngineConfig::default()).expect("init");
    let lines = [june_line()];
    let overlay = TrendlineOverlay::new(&lines, OverlayStyle::default());
    engine.render_with_hooks(&[&overlay]).expect("render");
    assert_eq!(engine.renderer().last_line_count, 0);
}

struct CaptionHook;

impl PostDrawHook for CaptionHook {
    fn id(&self) -> &str {
        "caption"
    }

    fn after_draw(&self, context: &PluginContext, frame: &mut RenderFrame) -> ChartResult<()> {
        frame.texts.push(TextPrimitive::new(
            format!("{} candles", context.candles_len),
            8.0,
            8.0,
            12.0,
            Color::rgb(0.2, 0.2, 0.2),
            TextHAlign::Left,
        ));
        Ok(())
    }
}

#[test]
fn hooks_run_in_order_on_the_same_frame() {
    let engine = engine();
    let base_texts = engine.build_render_frame().expect("base frame").texts.len();
    let lines = [june_line()];
    let overlay = TrendlineOverlay::new(&lines, OverlayStyle::default());
    let caption = CaptionHook;
    assert_eq!(caption.id(), "caption");
    assert_eq!(overlay.id(), "trendline-overlay");

    let frame = engine
        .build_render_frame_with_hooks(&[&overlay, &caption])
        .expect("frame");
    assert_eq!(frame.circles.len(), 2);
    assert_eq!(frame.texts.len(), base_texts + 1);
    assert_eq!(frame.texts[base_texts].text, "4 candles");
}

#[test]
fn overlay_does_not_touch_the_collection() {
    let engine = engine();
    let lines = vec![june_line()];
    let overlay = TrendlineOverlay::new(&lines, OverlayStyle::default());
    engine.build_render_frame_with_hooks(&[&overlay]).expect("frame");
    engine.build_render_frame_with_hooks(&[&overlay]).expect("frame");
    assert_eq!(lines, vec![june_line()]);
}
