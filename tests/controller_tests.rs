use approx::assert_relative_eq;
use chart_trendlines::api::{PointerPosition, SurfaceOffset};
use chart_trendlines::app::{
    AppConfig, ChartController, FetchOutcome, MISSING_FIELDS_MESSAGE, ViewMode, render_table,
};
use chart_trendlines::core::{DataPoint, Trendline, mock_candles};
use chart_trendlines::error::{ChartError, ChartResult};
use chart_trendlines::interaction::{CursorAffordance, GestureOutcome};
use chart_trendlines::render::NullRenderer;
use chart_trendlines::storage::{KeyValueStore, MemoryStore};

const JUNE_2: f64 = 1_748_822_400.0;
const JUNE_3: f64 = 1_748_908_800.0;

fn controller() -> ChartController<NullRenderer, MemoryStore> {
    ChartController::new(NullRenderer::default(), MemoryStore::new(), &AppConfig::default())
        .expect("controller init")
}

fn loaded<S: KeyValueStore>(controller: &mut ChartController<NullRenderer, S>) {
    let ticket = controller.go().expect("ticket");
    let outcome = controller.complete_fetch(&ticket, Ok(mock_candles()));
    assert_eq!(outcome, FetchOutcome::Applied { rows: 4 });
}

fn pointer_at<S: KeyValueStore>(
    controller: &ChartController<NullRenderer, S>,
    point: DataPoint,
) -> PointerPosition {
    let transform = controller.engine().plot_transform().expect("transform");
    let local = transform.data_to_pixel(point).expect("pixel");
    let offset = controller.surface_offset();
    PointerPosition::new(local.x + offset.left, local.y + offset.top)
}

#[test]
fn clicking_two_days_draws_that_trendline() {
    let mut controller = controller();
    loaded(&mut controller);
    controller.set_surface_offset(SurfaceOffset::new(16.0, 72.0));

    let first = pointer_at(&controller, DataPoint::new(JUNE_2, 115.0));
    let second = pointer_at(&controller, DataPoint::new(JUNE_3, 112.0));
    assert!(matches!(
        controller.click(first),
        GestureOutcome::LineStarted { .. }
    ));
    assert_eq!(
        controller.click(second),
        GestureOutcome::LineCompleted { index: 0 }
    );

    let lines = controller.trendlines();
    assert_eq!(lines.len(), 1);
    assert_relative_eq!(lines[0].start.x, JUNE_2, max_relative = 1e-12);
    assert_relative_eq!(lines[0].start.y, 115.0, max_relative = 1e-12);
    assert_relative_eq!(lines[0].end.x, JUNE_3, max_relative = 1e-12);
    assert_relative_eq!(lines[0].end.y, 112.0, max_relative = 1e-12);
}

#[test]
fn go_with_empty_interval_issues_no_ticket() {
    let mut controller = controller();
    loaded(&mut controller);
    controller.click(pointer_at(&controller, DataPoint::new(JUNE_2, 115.0)));
    controller.click(pointer_at(&controller, DataPoint::new(JUNE_3, 112.0)));
    let seq = controller.state().fetch_seq();

    controller.set_interval("");
    let err = controller.go().expect_err("validation");
    assert!(matches!(&err, ChartError::Validation(message) if message == MISSING_FIELDS_MESSAGE));
    assert_eq!(controller.state().fetch_seq(), seq);
    assert_eq!(controller.trendlines().len(), 1);
    assert_eq!(controller.candles().len(), 4);
}

#[test]
fn go_with_non_numeric_limit_is_rejected() {
    let mut controller = controller();
    controller.set_limit_input("ten");
    assert!(matches!(controller.go(), Err(ChartError::Validation(_))));
    controller.set_limit_input("");
    assert!(matches!(controller.go(), Err(ChartError::Validation(_))));
}

#[test]
fn go_clears_dataset_and_trendlines_before_fetching() {
    let mut controller = controller();
    loaded(&mut controller);
    controller.click(pointer_at(&controller, DataPoint::new(JUNE_2, 115.0)));
    controller.click(pointer_at(&controller, DataPoint::new(JUNE_3, 112.0)));

    let ticket = controller.go().expect("ticket");
    assert_eq!(ticket.request.symbol, "BTCUSDT");
    assert_eq!(ticket.request.interval, "1d");
    assert_eq!(ticket.request.limit, 20);
    assert!(controller.candles().is_empty());
    assert!(controller.trendlines().is_empty());
    assert!(controller.engine().plot_transform().is_none());
}

#[test]
fn only_the_latest_fetch_applies() {
    let mut controller = controller();
    let stale = controller.go().expect("first");
    let latest = controller.go().expect("second");

    assert_eq!(
        controller.complete_fetch(&latest, Ok(mock_candles())),
        FetchOutcome::Applied { rows: 4 }
    );
    assert_eq!(
        controller.complete_fetch(&stale, Ok(mock_candles()[..2].to_vec())),
        FetchOutcome::Stale
    );
    assert_eq!(controller.candles().len(), 4);
}

#[test]
fn failed_fetch_leaves_dataset_empty() {
    let mut controller = controller();
    let ticket = controller.go().expect("ticket");
    let outcome = controller.complete_fetch(
        &ticket,
        Err(ChartError::Fetch("HTTP status server error (503)".to_owned())),
    );
    assert!(matches!(outcome, FetchOutcome::Failed { .. }));
    assert!(controller.candles().is_empty());
    assert_eq!(controller.click(PointerPosition::new(10.0, 10.0)), GestureOutcome::Ignored);
}

#[test]
fn table_rows_match_the_fetched_candles() {
    let mut controller = controller();
    loaded(&mut controller);

    let rows = controller.table_rows();
    assert_eq!(rows.len(), 4);
    let dates: Vec<&str> = rows.iter().map(|row| row.date.as_str()).collect();
    assert_eq!(dates, ["2025-06-01", "2025-06-02", "2025-06-03", "2025-06-04"]);
    assert_eq!(
        (
            rows[1].open.as_str(),
            rows[1].high.as_str(),
            rows[1].low.as_str(),
            rows[1].close.as_str()
        ),
        ("105", "120", "100", "115")
    );

    let text = render_table(&rows);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2 + 4);
    assert!(lines[0].starts_with("Date"));
    assert!(lines[0].ends_with("Close"));
    assert!(lines[2].starts_with("2025-06-01"));
}

#[test]
fn table_view_makes_chart_pointer_events_inert() {
    let mut controller = controller();
    loaded(&mut controller);
    assert_eq!(controller.toggle_view(), ViewMode::Table);

    let outcome = controller.click(pointer_at(&controller, DataPoint::new(JUNE_2, 115.0)));
    assert_eq!(outcome, GestureOutcome::Ignored);
    assert_eq!(controller.toggle_view(), ViewMode::Chart);
}

#[test]
fn reset_and_remove_last_edit_the_collection() {
    let mut controller = controller();
    loaded(&mut controller);
    let drawn = [
        (DataPoint::new(JUNE_2, 100.0), DataPoint::new(JUNE_3, 110.0)),
        (DataPoint::new(JUNE_3, 125.0), DataPoint::new(JUNE_2, 90.0)),
    ];
    for (start, end) in drawn {
        controller.click(pointer_at(&controller, start));
        controller.click(pointer_at(&controller, end));
    }
    assert_eq!(controller.trendlines().len(), 2);

    let removed = controller.remove_last_trendline().expect("removed");
    assert_relative_eq!(removed.start.y, 125.0, max_relative = 1e-12);
    assert_eq!(controller.trendlines().len(), 1);

    controller.reset_trendlines();
    assert!(controller.trendlines().is_empty());
    assert_eq!(controller.remove_last_trendline(), None);
}

#[test]
fn persisted_lines_survive_a_new_session() {
    let line = Trendline::new(DataPoint::new(JUNE_2, 115.0), DataPoint::new(JUNE_3, 112.0));
    let mut slot = MemoryStore::new();
    slot.write(
        "trendlines",
        &serde_json::json!({"schema_version": 1, "trendlines": [line]}).to_string(),
    )
    .expect("seed");

    let mut controller =
        ChartController::new(NullRenderer::default(), slot, &AppConfig::default()).expect("init");
    assert_eq!(controller.trendlines(), &[line]);

    controller.load_mock_candles().expect("mock");
    controller.render().expect("render");
    let renderer = controller.engine().renderer();
    assert_eq!(renderer.last_circle_count, 2);
    let frame = renderer.last_frame.as_ref().expect("frame");
    let segment = frame.lines[frame.lines.len() - 1];
    assert_eq!(segment.stroke_width, 2.0);
    assert!(frame.texts.iter().any(|text| text.text == "BTCUSDT Price"));
}

#[test]
fn dragging_through_the_controller_updates_the_line() {
    let mut controller = controller();
    loaded(&mut controller);
    controller.click(pointer_at(&controller, DataPoint::new(JUNE_2, 115.0)));
    controller.click(pointer_at(&controller, DataPoint::new(JUNE_3, 112.0)));

    let grab = pointer_at(&controller, controller.trendlines()[0].end);
    assert!(matches!(
        controller.pointer_down(grab),
        GestureOutcome::DragStarted { .. }
    ));
    let target = pointer_at(&controller, DataPoint::new(JUNE_3 + 86_400.0, 120.0));
    assert!(controller.pointer_move(target).needs_redraw());
    assert!(matches!(controller.pointer_up(), GestureOutcome::DragEnded { .. }));

    let line = controller.trendlines()[0];
    assert_relative_eq!(line.end.x, JUNE_3 + 86_400.0, max_relative = 1e-12);
    assert_relative_eq!(line.end.y, 120.0, max_relative = 1e-12);
    assert_relative_eq!(line.start.y, 115.0, max_relative = 1e-12);
}

#[test]
fn default_config_hovers_handles_within_a_few_pixels() {
    let mut controller = controller();
    loaded(&mut controller);
    controller.click(pointer_at(&controller, DataPoint::new(JUNE_2, 115.0)));
    controller.click(pointer_at(&controller, DataPoint::new(JUNE_3, 112.0)));

    let handle = pointer_at(&controller, DataPoint::new(JUNE_3, 112.0));
    let beside = PointerPosition::new(handle.client_x + 3.0, handle.client_y - 2.0);
    assert!(matches!(
        controller.pointer_move(beside),
        GestureOutcome::HoverChanged { hover: Some(_) }
    ));
    assert_eq!(controller.cursor(), CursorAffordance::Grab);

    let away = PointerPosition::new(handle.client_x + 20.0, handle.client_y);
    assert!(matches!(
        controller.pointer_move(away),
        GestureOutcome::HoverChanged { hover: None }
    ));
    assert_eq!(controller.cursor(), CursorAffordance::Default);
}

/// Slot whose writes always fail, as with a full disk.
#[derive(Default)]
struct ReadOnlyStore;

impl KeyValueStore for ReadOnlyStore {
    fn read(&mut self, _key: &str) -> ChartResult<Option<String>> {
        Ok(None)
    }

    fn write(&mut self, _key: &str, _value: &str) -> ChartResult<()> {
        Err(ChartError::Storage(std::io::Error::other("read-only slot")))
    }

    fn remove(&mut self, _key: &str) -> ChartResult<()> {
        Ok(())
    }
}

#[test]
fn persistence_failure_keeps_the_in_memory_change() {
    let mut controller =
        ChartController::new(NullRenderer::default(), ReadOnlyStore, &AppConfig::default())
            .expect("init");
    loaded(&mut controller);

    controller.click(pointer_at(&controller, DataPoint::new(JUNE_2, 115.0)));
    let outcome = controller.click(pointer_at(&controller, DataPoint::new(JUNE_3, 112.0)));
    assert_eq!(outcome, GestureOutcome::PersistFailed);
    assert!(outcome.needs_redraw());
    assert_eq!(controller.trendlines().len(), 1);
}
