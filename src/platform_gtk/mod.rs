//! GTK4 desktop host: a `DrawingArea` bound to a `ChartController`.

use std::cell::RefCell;
use std::rc::Rc;

use gtk4 as gtk;
use gtk4::prelude::*;
use gtk4::{gio, glib};
use tracing::warn;

use crate::api::PointerPosition;
use crate::app::{AppConfig, ChartController, FetchOutcome, ViewMode, render_table};
use crate::core::Viewport;
use crate::error::{ChartError, ChartResult};
use crate::interaction::{CursorAffordance, GestureOutcome};
use crate::render::{CairoContextRenderer, CairoRenderer};
use crate::storage::KeyValueStore;

/// Shares one controller between the drawing callback and input handlers.
pub struct GtkChartAdapter<S: KeyValueStore + 'static> {
    drawing_area: gtk::DrawingArea,
    controller: Rc<RefCell<ChartController<CairoRenderer, S>>>,
}

impl<S: KeyValueStore + 'static> GtkChartAdapter<S> {
    #[must_use]
    pub fn new(controller: ChartController<CairoRenderer, S>) -> Self {
        let viewport = controller.engine().viewport();
        let drawing_area = gtk::DrawingArea::builder()
            .content_width(i32::try_from(viewport.width).unwrap_or(i32::MAX))
            .content_height(i32::try_from(viewport.height).unwrap_or(i32::MAX))
            .hexpand(true)
            .vexpand(true)
            .build();
        let controller = Rc::new(RefCell::new(controller));

        let draw_controller = Rc::clone(&controller);
        drawing_area.set_draw_func(move |_, context, width, height| {
            let mut controller = draw_controller.borrow_mut();
            if let Err(err) = draw_on_context(&mut controller, context, width, height) {
                warn!(error = %err, "chart draw failed");
            }
        });

        Self {
            drawing_area,
            controller,
        }
    }

    #[must_use]
    pub fn drawing_area(&self) -> &gtk::DrawingArea {
        &self.drawing_area
    }

    #[must_use]
    pub fn controller(&self) -> Rc<RefCell<ChartController<CairoRenderer, S>>> {
        Rc::clone(&self.controller)
    }

    /// Runs `f` against the controller and schedules a redraw.
    pub fn update_controller<T>(
        &self,
        f: impl FnOnce(&mut ChartController<CairoRenderer, S>) -> T,
    ) -> T {
        let value = f(&mut self.controller.borrow_mut());
        self.drawing_area.queue_draw();
        value
    }

    fn apply_gesture(&self, outcome: GestureOutcome) {
        let cursor = self.controller.borrow().cursor();
        self.drawing_area.set_cursor_from_name(Some(cursor_name(cursor)));
        if outcome.needs_redraw() {
            self.drawing_area.queue_draw();
        }
    }
}

fn draw_on_context<S: KeyValueStore>(
    controller: &mut ChartController<CairoRenderer, S>,
    context: &gtk::cairo::Context,
    width: i32,
    height: i32,
) -> ChartResult<()> {
    let viewport = Viewport::new(
        u32::try_from(width).unwrap_or_default(),
        u32::try_from(height).unwrap_or_default(),
    );
    if !viewport.is_valid() {
        return Ok(());
    }
    controller.set_viewport(viewport)?;
    let frame = controller.build_frame()?;
    controller
        .engine_mut()
        .renderer_mut()
        .render_on_cairo_context(context, &frame)
}

fn cursor_name(cursor: CursorAffordance) -> &'static str {
    match cursor {
        CursorAffordance::Default => "default",
        CursorAffordance::Grab => "grab",
        CursorAffordance::Grabbing => "grabbing",
    }
}

/// Blocks the window with the rejection text; nothing was fetched or cleared.
fn show_validation_alert(button: &gtk::Button, message: &str) {
    let parent = button
        .root()
        .and_then(|root| root.downcast::<gtk::Window>().ok());
    gtk::AlertDialog::builder()
        .message(message)
        .modal(true)
        .build()
        .show(parent.as_ref());
}

/// Registers pointer bindings once; each handler reads controller state at
/// dispatch time.
pub fn install_trendline_interaction<S: KeyValueStore + 'static>(
    adapter: Rc<GtkChartAdapter<S>>,
) {
    let area = adapter.drawing_area().clone();

    let click = gtk::GestureClick::new();
    {
        let adapter = Rc::clone(&adapter);
        click.connect_pressed(move |_, n_press, x, y| {
            let pointer = PointerPosition::new(x, y);
            let outcome = if n_press >= 2 {
                adapter.controller.borrow_mut().double_click(pointer)
            } else {
                adapter.controller.borrow_mut().pointer_down(pointer)
            };
            adapter.apply_gesture(outcome);
        });
    }
    {
        let adapter = Rc::clone(&adapter);
        click.connect_released(move |_, n_press, x, y| {
            let up = adapter.controller.borrow_mut().pointer_up();
            adapter.apply_gesture(up);
            if n_press == 1 {
                let outcome = adapter
                    .controller
                    .borrow_mut()
                    .click(PointerPosition::new(x, y));
                adapter.apply_gesture(outcome);
            }
        });
    }
    area.add_controller(click);

    let motion = gtk::EventControllerMotion::new();
    {
        let adapter = Rc::clone(&adapter);
        motion.connect_motion(move |_, x, y| {
            let outcome = adapter
                .controller
                .borrow_mut()
                .pointer_move(PointerPosition::new(x, y));
            adapter.apply_gesture(outcome);
        });
    }
    {
        let adapter = Rc::clone(&adapter);
        motion.connect_leave(move |_| {
            let outcome = adapter.controller.borrow_mut().pointer_leave();
            adapter.apply_gesture(outcome);
        });
    }
    area.add_controller(motion);
}

/// Builds the viewer window: form row, chart/table stack and trendline
/// buttons.
pub fn build_viewer_window<S: KeyValueStore + 'static>(
    app: &gtk::Application,
    config: &AppConfig,
    adapter: Rc<GtkChartAdapter<S>>,
) -> gtk::ApplicationWindow {
    install_trendline_interaction(Rc::clone(&adapter));

    let interval_entry = gtk::Entry::builder()
        .text(config.interval.as_str())
        .placeholder_text("interval (1d, 4h, ...)")
        .build();
    let limit_spin = gtk::SpinButton::with_range(1.0, 1000.0, 1.0);
    limit_spin.set_value(f64::from(config.limit));
    let go_button = gtk::Button::with_label("Go");
    let toggle_button = gtk::Button::with_label("Table view");
    let reset_button = gtk::Button::with_label("Reset trendlines");
    let pop_button = gtk::Button::with_label("Remove last");
    let status = gtk::Label::new(None);

    let table_view = gtk::TextView::builder()
        .editable(false)
        .monospace(true)
        .build();
    let stack = gtk::Stack::new();
    stack.add_named(adapter.drawing_area(), Some("chart"));
    stack.add_named(
        &gtk::ScrolledWindow::builder().child(&table_view).build(),
        Some("table"),
    );

    {
        let adapter = Rc::clone(&adapter);
        let interval_entry = interval_entry.clone();
        let limit_spin = limit_spin.clone();
        let status = status.clone();
        let table_view = table_view.clone();
        let client = config.kline_client();
        go_button.connect_clicked(move |button| {
            let ticket = adapter.update_controller(|controller| {
                controller.set_interval(interval_entry.text().as_str());
                controller.set_limit_input(limit_spin.value_as_int().to_string());
                controller.go()
            });
            let ticket = match ticket {
                Ok(ticket) => ticket,
                Err(ChartError::Validation(message)) => {
                    show_validation_alert(button, &message);
                    return;
                }
                Err(err) => {
                    status.set_text(&err.to_string());
                    return;
                }
            };
            let client = match &client {
                Ok(client) => client.clone(),
                Err(err) => {
                    status.set_text(&err.to_string());
                    return;
                }
            };
            status.set_text("loading...");

            let adapter = Rc::clone(&adapter);
            let status = status.clone();
            let table_view = table_view.clone();
            let request = ticket.request.clone();
            let handle = gio::spawn_blocking(move || {
                let runtime = tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
                    .map_err(|e| ChartError::Fetch(format!("tokio runtime error: {e}")))?;
                runtime.block_on(client.fetch(&request))
            });
            glib::spawn_future_local(async move {
                let result = handle.await.unwrap_or_else(|_| {
                    Err(ChartError::Fetch("fetch worker panicked".to_owned()))
                });
                let outcome =
                    adapter.update_controller(|controller| controller.complete_fetch(&ticket, result));
                match outcome {
                    FetchOutcome::Applied { rows } => {
                        status.set_text(&format!("{rows} candles"));
                        let text = render_table(&adapter.controller.borrow().table_rows());
                        table_view.buffer().set_text(&text);
                    }
                    FetchOutcome::Stale => {}
                    FetchOutcome::Failed { reason } => status.set_text(&reason),
                }
            });
        });
    }
    {
        let adapter = Rc::clone(&adapter);
        let stack = stack.clone();
        toggle_button.connect_clicked(move |button| {
            let mode = adapter.update_controller(|controller| controller.toggle_view());
            match mode {
                ViewMode::Chart => {
                    stack.set_visible_child_name("chart");
                    button.set_label("Table view");
                }
                ViewMode::Table => {
                    stack.set_visible_child_name("table");
                    button.set_label("Chart view");
                }
            }
        });
    }
    {
        let adapter = Rc::clone(&adapter);
        reset_button.connect_clicked(move |_| {
            adapter.update_controller(|controller| controller.reset_trendlines());
        });
    }
    {
        let adapter = Rc::clone(&adapter);
        pop_button.connect_clicked(move |_| {
            adapter.update_controller(|controller| controller.remove_last_trendline());
        });
    }

    let form = gtk::Box::new(gtk::Orientation::Horizontal, 8);
    form.append(&gtk::Label::new(Some(config.symbol.as_str())));
    form.append(&interval_entry);
    form.append(&limit_spin);
    form.append(&go_button);
    form.append(&toggle_button);
    form.append(&reset_button);
    form.append(&pop_button);
    form.append(&status);

    let root = gtk::Box::new(gtk::Orientation::Vertical, 8);
    root.append(&form);
    root.append(&stack);

    let viewport = config.viewport;
    gtk::ApplicationWindow::builder()
        .application(app)
        .title(format!("chart-trendlines | {}", config.symbol))
        .default_width(i32::try_from(viewport.width).unwrap_or(1280))
        .default_height(i32::try_from(viewport.height).unwrap_or(760))
        .child(&root)
        .build()
}
