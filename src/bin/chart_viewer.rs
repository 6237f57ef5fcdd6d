use std::path::PathBuf;
use std::rc::Rc;

use chart_trendlines::app::{AppConfig, ChartController};
use chart_trendlines::platform_gtk::{GtkChartAdapter, build_viewer_window};
use chart_trendlines::render::CairoRenderer;
use chart_trendlines::storage::FileStore;
use gtk4 as gtk;
use gtk4::prelude::*;

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let _ = chart_trendlines::telemetry::init_default_tracing();

    let mut args = std::env::args().skip(1);
    let config = match args.next().as_deref() {
        Some("--config") => {
            let path = PathBuf::from(
                args.next()
                    .ok_or_else(|| "missing value for --config".to_owned())?,
            );
            AppConfig::load(&path)
                .map_err(|err| format!("failed to load `{}`: {err}", path.display()))?
        }
        Some(other) => return Err(format!("unknown argument `{other}`")),
        None => AppConfig::default(),
    };

    let app = gtk::Application::builder()
        .application_id("rs.chart.trendlines.viewer")
        .build();

    app.connect_activate(move |app| {
        let width = i32::try_from(config.viewport.width).unwrap_or(1280);
        let height = i32::try_from(config.viewport.height).unwrap_or(760);
        let renderer = match CairoRenderer::new(width, height) {
            Ok(renderer) => renderer,
            Err(err) => {
                eprintln!("failed to initialize renderer: {err}");
                return;
            }
        };
        let slot = FileStore::new(config.resolved_data_dir());
        let controller = match ChartController::new(renderer, slot, &config) {
            Ok(controller) => controller,
            Err(err) => {
                eprintln!("failed to initialize controller: {err}");
                return;
            }
        };

        let adapter = Rc::new(GtkChartAdapter::new(controller));
        let window = build_viewer_window(app, &config, adapter);
        window.present();
    });

    // GTK parses its own argv; ours was consumed above.
    let _ = app.run_with_args::<&str>(&[]);
    Ok(())
}
