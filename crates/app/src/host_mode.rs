//! Headless modes: a blocking loop that reads JSON commands from stdin and
//! writes JSON responses to stdout, and a one-shot file renderer.
//!
//! Both drive the same `HeatmapPlugin` a rendering host would use. See
//! [`influence::host_protocol`] for the wire schema.

use std::io::{BufRead, Write};

use bevy::prelude::*;

use influence::host_protocol::{
    error_response, make_response, protocol_error, HostCommand, HostResponse, OverlayStatus,
    ResponsePayload, PROTOCOL_VERSION,
};
use influence::overlay::PendingHeatmap;
use influence::{
    CategorySchema, Grid, HeatmapConfig, HeatmapError, HeatmapOverlay, HeatmapPlugin,
    HeatmapRequest, LatLng, Marker, MarkerCatalogue,
};

/// Frames to wait for one generation before giving up.
const MAX_GENERATION_FRAMES: u32 = 1_000_000;

fn build_app() -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    // LogPlugin writes to stderr, keeping stdout for the JSON protocol.
    app.add_plugins(bevy::log::LogPlugin::default());
    app.add_plugins(HeatmapPlugin);
    app.update();
    app
}

/// Sends a request and runs frames until it settles. Returns the new grid,
/// or the error that kept the overlay unchanged.
fn generate_blocking(app: &mut App, config: HeatmapConfig) -> Result<&Grid, HeatmapError> {
    let before = app.world().resource::<HeatmapOverlay>().revision;
    app.world_mut()
        .send_event(HeatmapRequest::Generate(config));

    for _ in 0..MAX_GENERATION_FRAMES {
        app.update();
        if !app.world().resource::<PendingHeatmap>().is_busy() {
            break;
        }
        std::thread::yield_now();
    }

    let overlay = app.world().resource::<HeatmapOverlay>();
    match (&overlay.grid, &overlay.last_error) {
        (Some(grid), _) if overlay.revision != before => Ok(grid),
        (_, Some(err)) => Err(err.clone()),
        _ => Err(HeatmapError::Cancelled),
    }
}

fn write_line(out: &mut impl Write, response: &HostResponse) {
    match serde_json::to_string(response) {
        Ok(json) => {
            let _ = writeln!(out, "{json}");
        }
        Err(e) => {
            eprintln!("failed to encode response: {e}");
            let _ = writeln!(
                out,
                r#"{{"protocol_version":{PROTOCOL_VERSION},"type":"error","message":"response encoding failed","kind":null}}"#
            );
        }
    }
    let _ = out.flush();
}

// ---------------------------------------------------------------------------
// --host
// ---------------------------------------------------------------------------

pub fn run_host_mode() {
    let mut app = build_app();

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut stdout = stdout.lock();

    write_line(&mut stdout, &make_response(ResponsePayload::Ready));
    // Log to stderr so it does not interfere with the JSON protocol on stdout.
    eprintln!("influence host mode v{PROTOCOL_VERSION} ready, waiting for commands on stdin");

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                eprintln!("stdin read error: {e}");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<HostCommand>(&line) {
            Ok(cmd) => process_command(cmd, &mut app),
            Err(e) => protocol_error(format!("Parse error: {e}")),
        };
        let is_goodbye = matches!(response.payload, ResponsePayload::Goodbye);
        write_line(&mut stdout, &response);
        if is_goodbye {
            break;
        }
    }

    eprintln!("influence host mode shutting down");
}

fn process_command(cmd: HostCommand, app: &mut App) -> HostResponse {
    match cmd {
        HostCommand::LoadCatalogue { markers, schema } => {
            let payload = ResponsePayload::Loaded {
                markers: markers.len(),
                categories: schema.names().len(),
            };
            app.insert_resource(MarkerCatalogue::new(markers, schema));
            make_response(payload)
        }

        HostCommand::Generate { config } => match generate_blocking(app, config) {
            Ok(grid) => make_response(ResponsePayload::Grid { grid: grid.clone() }),
            Err(err) => error_response(&err),
        },

        HostCommand::Clear => {
            app.world_mut().send_event(HeatmapRequest::Clear);
            app.update();
            make_response(ResponsePayload::Ok)
        }

        HostCommand::Status => {
            let status = OverlayStatus::of(app.world().resource::<HeatmapOverlay>());
            make_response(ResponsePayload::Status { status })
        }

        HostCommand::Probe { lat, lng } => {
            let pixel = app
                .world()
                .resource::<HeatmapOverlay>()
                .grid
                .as_ref()
                .and_then(|g| g.pixel_near(LatLng::new(lat, lng)))
                .cloned();
            make_response(ResponsePayload::Probe { pixel })
        }

        HostCommand::Quit => make_response(ResponsePayload::Goodbye),
    }
}

// ---------------------------------------------------------------------------
// render
// ---------------------------------------------------------------------------

/// `render <markers.json> <schema.json> [config.json]`. Returns the exit code.
pub fn run_render(args: &[String]) -> i32 {
    let (markers_path, schema_path) = match args {
        [m, s] | [m, s, _] => (m, s),
        _ => {
            eprintln!("render expects <markers.json> <schema.json> [config.json]");
            return 2;
        }
    };

    let inputs = load_json::<Vec<Marker>>(markers_path).and_then(|markers| {
        let schema = load_json::<CategorySchema>(schema_path)?;
        let config = match args.get(2) {
            Some(path) => load_json::<HeatmapConfig>(path)?,
            None => HeatmapConfig::default(),
        };
        Ok((markers, schema, config))
    });
    let (markers, schema, config) = match inputs {
        Ok(inputs) => inputs,
        Err(message) => {
            eprintln!("{message}");
            return 1;
        }
    };

    let mut app = build_app();
    app.insert_resource(MarkerCatalogue::new(markers, schema));
    let grid = match generate_blocking(&mut app, config) {
        Ok(grid) => grid,
        Err(err) => {
            eprintln!("heat-map generation failed: {err}");
            return 1;
        }
    };

    match serde_json::to_string(grid) {
        Ok(json) => {
            println!("{json}");
            0
        }
        Err(e) => {
            eprintln!("failed to encode grid: {e}");
            1
        }
    }
}

fn load_json<T: serde::de::DeserializeOwned>(path: &str) -> Result<T, String> {
    let text = std::fs::read_to_string(path).map_err(|e| format!("cannot read {path}: {e}"))?;
    serde_json::from_str(&text).map_err(|e| format!("cannot parse {path}: {e}"))
}
