//! Terminal Map - The full surface against the headless engine
//!
//! Shows the marker dataset in the terminal while driving the surface
//! through its host hooks:
//! - Arrow keys pan, `+`/`-` zoom (each camera stop refreshes the markers)
//! - `h`/`s` hide and show the surface
//! - `b`/`f` send the app to background and foreground
//! - `q` quits
//!
//! Logs go to `poi_map.log`; set `RUST_LOG=debug` for lifecycle transitions.
//! Set `POI_MAP_FAIL_AUTH=1` to watch the authentication retry.
//!
//! Run with: cargo run --example terminal_map

use std::fs::File;
use std::io::{self, stdout};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crossterm::terminal::{self, disable_raw_mode, enable_raw_mode};
use poi_map::host::{poll_command, HostCommand};
use poi_map::{
    AuthOutcome, EventLoop, HeadlessEngine, HostEvent, MapConfig, MapRenderer, MapSurface,
    MarkerCanvas, Size, StubDataProvider,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Pixels the headless engine assumes per terminal cell.
const CELL_WIDTH_PX: f64 = 10.0;
const CELL_HEIGHT_PX: f64 = 20.0;

const FRAME: Duration = Duration::from_millis(30);

fn container_size(cols: u16, rows: u16) -> Size {
    Size::new(cols as f64 * CELL_WIDTH_PX, rows as f64 * CELL_HEIGHT_PX)
}

fn init_logging() -> io::Result<()> {
    let file = File::create("poi_map.log")?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging()?;
    let config = MapConfig::from_env()?;

    let (cols, rows) = terminal::size()?;
    // Last row is the status line
    let map_rows = rows.saturating_sub(1);

    let mut engine = HeadlessEngine::new(container_size(cols, map_rows));
    if std::env::var_os("POI_MAP_FAIL_AUTH").is_some() {
        engine.queue_auth_outcome(AuthOutcome::Fail { code: -1, message: "simulated outage".into() });
    }

    let event_loop = EventLoop::new();
    let sender = event_loop.sender();
    let mut surface = MapSurface::new(engine, StubDataProvider, config.clone());
    surface.load(sender.clone())?;
    sender.send(HostEvent::BecomeVisible);

    // Status line follows the lifecycle and data-mode watches
    let auth_rx = surface.controller_mut().watch_auth();
    let run_rx = surface.controller_mut().watch_run();
    let mode_rx = surface.presenter_mut().watch_mode();
    let mut auth = surface.auth_state();
    let mut run = surface.run_state();
    let mut mode = surface.presenter().data_mode();

    let mut out = stdout();
    let mut renderer = MapRenderer::new();
    let mut canvas = MarkerCanvas::new(cols, map_rows);

    enable_raw_mode()?;
    renderer.enter_fullscreen(&mut out)?;
    info!(cols, rows, "terminal map started");

    let result = (|| -> io::Result<()> {
        loop {
            event_loop.tick(&mut surface, FRAME);
            event_loop.drain(&mut surface, Instant::now());
            if let Some(next) = auth_rx.try_iter().last() {
                auth = next;
            }
            if let Some(next) = run_rx.try_iter().last() {
                run = next;
            }
            if let Some(next) = mode_rx.try_iter().last() {
                mode = next;
            }
            let status = format!(
                " auth: {auth} | engine: {run} | next: {mode:?} | arrows pan, +/- zoom, h/s hide/show, b/f bg/fg, q quit"
            );

            let positions = surface
                .engine()
                .headless_view(&config.view_name)
                .and_then(|view| view.labels().layer(&config.layer_id))
                .map(|layer| layer.visible_positions())
                .unwrap_or_default();
            match surface.controller().current_viewport() {
                Some(viewport) => {
                    canvas.plot(&viewport, &positions);
                }
                None => canvas.clear(),
            }
            renderer.render(&mut out, &canvas, &status)?;

            let Some(command) = poll_command(Duration::ZERO)? else {
                continue;
            };
            match command {
                HostCommand::Pan { dx, dy } => {
                    surface.engine_mut().pan(&config.view_name, dx, dy);
                }
                HostCommand::Zoom(delta) => {
                    surface.engine_mut().zoom_by(&config.view_name, delta);
                }
                HostCommand::Hide => {
                    sender.send(HostEvent::WillHide);
                    sender.send(HostEvent::DidHide);
                }
                HostCommand::Show => {
                    sender.send(HostEvent::BecomeVisible);
                }
                HostCommand::Background => {
                    sender.send(HostEvent::WillResignActive);
                }
                HostCommand::Foreground => {
                    sender.send(HostEvent::DidBecomeActive);
                }
                HostCommand::Resize(cols, rows) => {
                    let map_rows = rows.saturating_sub(1);
                    canvas.resize(cols, map_rows);
                    renderer.invalidate();
                    surface.engine_mut().resize_container(container_size(cols, map_rows));
                }
                HostCommand::Quit => return Ok(()),
                HostCommand::None => {}
            }
        }
    })();

    sender.send(HostEvent::Teardown);
    event_loop.drain(&mut surface, Instant::now());

    renderer.exit_fullscreen(&mut out)?;
    disable_raw_mode()?;
    info!("terminal map stopped");

    result.map_err(Into::into)
}
