use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use chart_trendlines::api::{PointerPosition, SurfaceOffset};
use chart_trendlines::app::{AppConfig, ChartController, FetchOutcome, render_table};
use chart_trendlines::core::{Candle, Viewport, mock_candles};
use chart_trendlines::data::KlineClient;
use chart_trendlines::render::{NullRenderer, Renderer};
use chart_trendlines::storage::{FileStore, KeyValueStore, TrendlineStore};

const USAGE: &str = "usage: klines [--config <path>] <command>

commands:
  table   [--symbol S] [--interval I] [--limit N] [--mock]
  lines   <list|reset|pop>
  render  --output <path.png> [--symbol S] [--interval I] [--limit N] [--mock]
  session [--mock]   read pointer/form commands from stdin";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LinesAction {
    List,
    Reset,
    Pop,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum CommandKind {
    Table,
    Lines(LinesAction),
    Render { output: PathBuf },
    Session,
}

#[derive(Debug)]
struct CliArgs {
    command: CommandKind,
    config_path: Option<PathBuf>,
    symbol: Option<String>,
    interval: Option<String>,
    limit: Option<String>,
    mock: bool,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let _ = chart_trendlines::telemetry::init_default_tracing();
    let args = parse_args()?;

    let config = match &args.config_path {
        Some(path) => AppConfig::load(path)
            .map_err(|err| format!("failed to load `{}`: {err}", path.display()))?,
        None => AppConfig::default(),
    };
    let slot = FileStore::new(config.resolved_data_dir());

    match &args.command {
        CommandKind::Lines(action) => run_lines(*action, slot, &config),
        CommandKind::Table => {
            let mut controller = open_controller(NullRenderer::default(), slot, &config, &args)?;
            load_view_candles(&mut controller, &config, args.mock)?;
            print!("{}", render_table(&controller.table_rows()));
            Ok(())
        }
        CommandKind::Render { output } => run_render(output, slot, &config, &args),
        CommandKind::Session => {
            let controller = open_controller(NullRenderer::default(), slot, &config, &args)?;
            run_session(controller, &config, args.mock)
        }
    }
}

fn parse_args() -> Result<CliArgs, String> {
    let mut args = std::env::args().skip(1).peekable();
    let mut config_path = None::<PathBuf>;
    if args.peek().map(String::as_str) == Some("--config") {
        args.next();
        let value = args
            .next()
            .ok_or_else(|| "missing value for --config".to_owned())?;
        config_path = Some(PathBuf::from(value));
    }

    let command = match args.next().as_deref() {
        Some("table") => CommandKind::Table,
        Some("lines") => CommandKind::Lines(match args.next().as_deref() {
            Some("list") => LinesAction::List,
            Some("reset") => LinesAction::Reset,
            Some("pop") => LinesAction::Pop,
            _ => return Err("usage: klines lines <list|reset|pop>".to_owned()),
        }),
        Some("render") => CommandKind::Render {
            output: PathBuf::new(),
        },
        Some("session") => CommandKind::Session,
        _ => return Err(USAGE.to_owned()),
    };

    let mut parsed = CliArgs {
        command,
        config_path,
        symbol: None,
        interval: None,
        limit: None,
        mock: false,
    };
    let mut output = None::<PathBuf>;

    while let Some(flag) = args.next() {
        let mut value = |name: &str| {
            args.next()
                .ok_or_else(|| format!("missing value for {name}"))
        };
        match flag.as_str() {
            "--symbol" => parsed.symbol = Some(value("--symbol")?),
            "--interval" => parsed.interval = Some(value("--interval")?),
            "--limit" => parsed.limit = Some(value("--limit")?),
            "--output" => output = Some(PathBuf::from(value("--output")?)),
            "--mock" => parsed.mock = true,
            "--help" | "-h" => return Err(USAGE.to_owned()),
            _ => return Err(format!("unknown argument `{flag}`")),
        }
    }

    if let CommandKind::Render { output: target } = &mut parsed.command {
        *target = output.ok_or_else(|| "missing --output".to_owned())?;
    }
    Ok(parsed)
}

fn open_controller<R: Renderer>(
    renderer: R,
    slot: FileStore,
    config: &AppConfig,
    args: &CliArgs,
) -> Result<ChartController<R, FileStore>, String> {
    let mut controller = ChartController::new(renderer, slot, config)
        .map_err(|err| format!("controller init: {err}"))?;
    if let Some(symbol) = &args.symbol {
        controller.set_symbol(symbol.clone());
    }
    if let Some(interval) = &args.interval {
        controller.set_interval(interval.clone());
    }
    if let Some(limit) = &args.limit {
        controller.set_limit_input(limit.clone());
    }
    Ok(controller)
}

/// Loads candles for a one-shot view, keeping persisted trendlines.
fn load_view_candles<R: Renderer>(
    controller: &mut ChartController<R, FileStore>,
    config: &AppConfig,
    mock: bool,
) -> Result<(), String> {
    let candles = if mock {
        mock_candles()
    } else {
        let request = controller
            .state()
            .kline_request()
            .map_err(|err| err.to_string())?;
        let client = config
            .kline_client()
            .map_err(|err| err.to_string())?;
        block_on_fetch(&client, &request)?.map_err(|err| err.to_string())?
    };
    controller
        .load_candles(candles)
        .map_err(|err| format!("invalid candles: {err}"))
}

fn block_on_fetch(
    client: &KlineClient,
    request: &chart_trendlines::data::KlineRequest,
) -> Result<chart_trendlines::ChartResult<Vec<Candle>>, String> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| format!("tokio runtime error: {err}"))?;
    Ok(runtime.block_on(client.fetch(request)))
}

fn run_lines(action: LinesAction, slot: FileStore, config: &AppConfig) -> Result<(), String> {
    let mut store = TrendlineStore::open_with_key(slot, config.storage_key.clone());
    match action {
        LinesAction::List => {
            let json = serde_json::to_string_pretty(store.lines())
                .map_err(|err| format!("failed to serialize trendlines: {err}"))?;
            println!("{json}");
        }
        LinesAction::Reset => {
            let count = store.len();
            store.remove_all().map_err(|err| err.to_string())?;
            println!("removed {count} trendline(s)");
        }
        LinesAction::Pop => match store.remove_last().map_err(|err| err.to_string())? {
            Some(line) => println!("removed {line:?}"),
            None => println!("no trendlines stored"),
        },
    }
    Ok(())
}

#[cfg(feature = "cairo-backend")]
fn run_render(
    output: &std::path::Path,
    slot: FileStore,
    config: &AppConfig,
    args: &CliArgs,
) -> Result<(), String> {
    use chart_trendlines::render::CairoRenderer;

    let width = i32::try_from(config.viewport.width).map_err(|err| err.to_string())?;
    let height = i32::try_from(config.viewport.height).map_err(|err| err.to_string())?;
    let renderer = CairoRenderer::new(width, height).map_err(|err| err.to_string())?;
    let mut controller = open_controller(renderer, slot, config, args)?;
    load_view_candles(&mut controller, config, args.mock)?;
    controller.render().map_err(|err| format!("render: {err}"))?;
    controller
        .engine()
        .renderer()
        .write_png(output)
        .map_err(|err| err.to_string())?;
    println!(
        "wrote {} ({} candles, {} trendlines)",
        output.display(),
        controller.candles().len(),
        controller.trendlines().len()
    );
    Ok(())
}

#[cfg(not(feature = "cairo-backend"))]
fn run_render(
    _output: &std::path::Path,
    _slot: FileStore,
    _config: &AppConfig,
    _args: &CliArgs,
) -> Result<(), String> {
    Err("png rendering needs the `cairo-backend` feature".to_owned())
}

fn run_session<S: KeyValueStore>(
    mut controller: ChartController<NullRenderer, S>,
    config: &AppConfig,
    mock: bool,
) -> Result<(), String> {
    let client = if mock {
        None
    } else {
        Some(config.kline_client().map_err(|err| err.to_string())?)
    };
    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();

    for line in stdin.lock().lines() {
        let line = line.map_err(|err| format!("stdin: {err}"))?;
        let mut words = line.split_whitespace();
        let Some(command) = words.next() else {
            continue;
        };
        let rest: Vec<&str> = words.collect();
        let reply = match session_step(&mut controller, client.as_ref(), command, &rest) {
            Ok(reply) => reply,
            Err(err) => format!("error: {err}"),
        };
        writeln!(stdout, "{reply}").map_err(|err| format!("stdout: {err}"))?;
        if command == "quit" {
            break;
        }
    }
    Ok(())
}

fn session_step<S: KeyValueStore>(
    controller: &mut ChartController<NullRenderer, S>,
    client: Option<&KlineClient>,
    command: &str,
    rest: &[&str],
) -> Result<String, String> {
    let reply = match command {
        "size" => {
            let [width, height] = parse_pair::<u32>(rest)?;
            controller
                .set_viewport(Viewport::new(width, height))
                .map_err(|err| err.to_string())?;
            format!("viewport {width}x{height}")
        }
        "offset" => {
            let [left, top] = parse_pair::<f64>(rest)?;
            controller.set_surface_offset(SurfaceOffset::new(left, top));
            format!("offset {left},{top}")
        }
        "symbol" => {
            controller.set_symbol(rest.join(" "));
            format!("symbol `{}`", controller.state().symbol)
        }
        "interval" => {
            controller.set_interval(rest.join(" "));
            format!("interval `{}`", controller.state().interval)
        }
        "limit" => {
            controller.set_limit_input(rest.join(" "));
            format!("limit `{}`", controller.state().limit_input)
        }
        "go" => {
            let ticket = controller.go().map_err(|err| err.to_string())?;
            let result = match client {
                Some(client) => block_on_fetch(client, &ticket.request)?,
                None => Ok(mock_candles()),
            };
            match controller.complete_fetch(&ticket, result) {
                FetchOutcome::Applied { rows } => {
                    controller.render().map_err(|err| err.to_string())?;
                    format!("loaded {rows} candles")
                }
                outcome => format!("{outcome:?}"),
            }
        }
        "view" => format!("{:?}", controller.toggle_view()),
        "reset" => {
            controller.reset_trendlines();
            controller.render().map_err(|err| err.to_string())?;
            "trendlines cleared".to_owned()
        }
        "pop" => {
            let removed = controller.remove_last_trendline();
            controller.render().map_err(|err| err.to_string())?;
            format!("{removed:?}")
        }
        "down" | "move" | "click" | "dblclick" => {
            let [x, y] = parse_pair::<f64>(rest)?;
            let pointer = PointerPosition::new(x, y);
            let outcome = match command {
                "down" => controller.pointer_down(pointer),
                "move" => controller.pointer_move(pointer),
                "click" => controller.click(pointer),
                _ => controller.double_click(pointer),
            };
            if outcome.needs_redraw() {
                controller.render().map_err(|err| err.to_string())?;
            }
            format!("{outcome:?} cursor={:?}", controller.cursor())
        }
        "up" => format!("{:?}", controller.pointer_up()),
        "leave" => format!("{:?}", controller.pointer_leave()),
        "lines" => serde_json::to_string(controller.trendlines())
            .map_err(|err| format!("failed to serialize trendlines: {err}"))?,
        "table" => render_table(&controller.table_rows()),
        "frame" => {
            let renderer = controller.engine().renderer();
            format!(
                "frames={} rects={} lines={} circles={}",
                renderer.frames_rendered,
                renderer.last_rect_count,
                renderer.last_line_count,
                renderer.last_circle_count
            )
        }
        "quit" => "bye".to_owned(),
        other => return Err(format!("unknown session command `{other}`")),
    };
    Ok(reply)
}

fn parse_pair<T: std::str::FromStr>(rest: &[&str]) -> Result<[T; 2], String> {
    let [first, second] = rest else {
        return Err("expected two values".to_owned());
    };
    let parse = |raw: &str| {
        raw.parse::<T>()
            .map_err(|_| format!("invalid value `{raw}`"))
    };
    Ok([parse(*first)?, parse(*second)?])
}
