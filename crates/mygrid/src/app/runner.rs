//! Terminal setup/teardown and the main event loop.
//!
//! One thread mutates state. Foreground input arrives from a reader
//! thread, zone handlers post events on the same channel, and API
//! commands sit in their own bounded queue drained at a per-frame
//! budget. Rendering is paced to the configured frame interval; headless
//! runs skip the terminal entirely.

use std::io;
use std::path::Path;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::{Duration, Instant};

use crossterm::event::{DisableBracketedPaste, EnableBracketedPaste};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use crate::cli::Cli;
use crate::commands;
use crate::config::load_config;
use crate::events::AppEvent;
use crate::project::Project;
use crate::server::{ApiRequest, ApiServer, ServerConfig};

use super::input::{handle_api_request, handle_event};
use super::render;
use super::state::{App, Mode};

const INPUT_POLL: Duration = Duration::from_millis(50);

/// Exit codes per the CLI contract.
pub const EXIT_OK: i32 = 0;
pub const EXIT_INIT_FAILURE: i32 = 1;
pub const EXIT_LOAD_FAILURE: i32 = 2;

/// Entry point: build the app, optional server, then run until quit.
/// Returns the process exit code.
pub fn run(cli: Cli) -> i32 {
    let config = load_config();
    let (event_tx, event_rx) = mpsc::channel::<AppEvent>();
    let mut app = App::new(config, event_tx.clone(), cli.headless);

    // The API server starts before any file loads so load errors still
    // reach a watching client log.
    let mut server = None;
    let mut api_rx = None;
    if cli.server {
        let server_config = ServerConfig {
            tcp_enabled: true,
            host: cli
                .host
                .clone()
                .unwrap_or_else(|| app.config.server.host.clone()),
            port: cli.port.unwrap_or(app.config.server.port),
            fifo_enabled: !cli.no_fifo,
            fifo_path: cli
                .fifo
                .clone()
                .unwrap_or_else(|| app.config.server.fifo_path.clone()),
            ..ServerConfig::default()
        };
        match ApiServer::start(server_config) {
            Ok((running, rx)) => {
                app.server_port = Some(running.port());
                server = Some(running);
                api_rx = Some(rx);
            }
            Err(err) => {
                eprintln!("mygrid: cannot start API server: {err}");
                return EXIT_INIT_FAILURE;
            }
        }
    }

    if let Some(file) = &cli.file {
        if let Err(err) = load_startup_file(&mut app, file) {
            eprintln!("mygrid: {err}");
            if let Some(mut server) = server {
                server.stop();
            }
            return EXIT_LOAD_FAILURE;
        }
    }

    if let Some(layout) = &cli.layout {
        let result = commands::execute(&mut app, &format!("layout load {layout}"));
        if !result.ok {
            tracing::warn!("startup layout failed: {}", result.message);
        }
        app.show_message(result.message);
    }

    let code = if cli.headless {
        run_headless(&mut app, event_rx, api_rx)
    } else {
        run_terminal(&mut app, event_tx, event_rx, api_rx)
    };

    // Shutdown order: no new commands, then zone resources, then the
    // terminal is already restored by run_terminal.
    if let Some(mut server) = server {
        server.stop();
    }
    app.shutdown_zones();
    code
}

/// Open a project (.json) or import any other file as text at startup.
fn load_startup_file(app: &mut App, path: &Path) -> Result<(), String> {
    if path.extension().and_then(|ext| ext.to_str()) == Some("json") {
        apply_project(app, path)
    } else {
        crate::project::import_text(&mut app.canvas, path, 0, 0)
            .map(|_| ())
            .map_err(|err| format!("cannot import {}: {err}", path.display()))
    }
}

/// Replace live state with a decoded project and recreate its zones.
pub fn apply_project(app: &mut App, path: &Path) -> Result<(), String> {
    let loaded = Project::load(path)?;

    app.canvas = loaded.canvas;
    app.viewport.pan_to(loaded.viewport_pos.0, loaded.viewport_pos.1);
    app.viewport.set_cursor(loaded.cursor.0, loaded.cursor.1);
    app.viewport.origin.x = loaded.origin.0;
    app.viewport.origin.y = loaded.origin.1;
    app.viewport.y_direction = loaded.y_direction;
    app.grid = loaded.grid;
    app.bookmarks = loaded.bookmarks;

    for existing in app.zones.names() {
        let _ = app.delete_zone(&existing);
    }
    let mut failures = Vec::new();
    for descriptor in loaded.zones {
        let config = match descriptor.config.clone().into_config() {
            Ok(config) => config,
            Err(err) => {
                failures.push(format!("{}: {err}", descriptor.name));
                continue;
            }
        };
        if let Err(err) = commands::exec::zone::create_zone(
            app,
            &descriptor.name,
            descriptor.x,
            descriptor.y,
            descriptor.width,
            descriptor.height,
            config,
            descriptor.bookmark,
            descriptor.description.clone(),
        ) {
            failures.push(format!("{}: {err}", descriptor.name));
        }
    }
    if !failures.is_empty() {
        tracing::warn!("zones skipped on load: {}", failures.join("; "));
        app.show_message(format!("Some zones failed to start: {}", failures.join("; ")));
    }

    app.project.filepath = Some(path.to_path_buf());
    app.project.metadata = loaded.metadata;
    app.project.mark_clean();
    Ok(())
}

fn run_terminal(
    app: &mut App,
    event_tx: Sender<AppEvent>,
    event_rx: Receiver<AppEvent>,
    api_rx: Option<Receiver<ApiRequest>>,
) -> i32 {
    let mut stdout = io::stdout();
    if enable_raw_mode().is_err() {
        eprintln!("mygrid: cannot acquire the terminal (needs an ANSI tty)");
        return EXIT_INIT_FAILURE;
    }
    if stdout.execute(EnterAlternateScreen).is_err() {
        let _ = disable_raw_mode();
        return EXIT_INIT_FAILURE;
    }
    // Pasted text arrives as one event instead of a keystroke storm.
    let _ = stdout.execute(EnableBracketedPaste);

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = match Terminal::new(backend) {
        Ok(terminal) => terminal,
        Err(_) => {
            let _ = disable_raw_mode();
            return EXIT_INIT_FAILURE;
        }
    };

    if let Ok(size) = terminal.size() {
        app.viewport.resize(size.width, size.height.saturating_sub(1));
    }

    spawn_input_thread(event_tx);
    let code = event_loop(app, event_rx, api_rx, Some(&mut terminal));

    let _ = terminal.backend_mut().execute(DisableBracketedPaste);
    let _ = disable_raw_mode();
    let _ = terminal.backend_mut().execute(LeaveAlternateScreen);
    let _ = terminal.show_cursor();
    code
}

fn run_headless(
    app: &mut App,
    event_rx: Receiver<AppEvent>,
    api_rx: Option<Receiver<ApiRequest>>,
) -> i32 {
    event_loop(app, event_rx, api_rx, None)
}

/// Forward crossterm events to the unified channel until the app exits.
fn spawn_input_thread(sender: Sender<AppEvent>) {
    std::thread::Builder::new()
        .name("input".to_string())
        .spawn(move || loop {
            match crossterm::event::read() {
                Ok(event) => {
                    if sender.send(AppEvent::Input(event)).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            }
        })
        .map(|_| ())
        .unwrap_or_else(|err| tracing::warn!("failed to spawn input thread: {err}"));
}

type Term = Terminal<CrosstermBackend<io::Stdout>>;

/// The single serialized state-transition loop.
fn event_loop(
    app: &mut App,
    event_rx: Receiver<AppEvent>,
    api_rx: Option<Receiver<ApiRequest>>,
    mut terminal: Option<&mut Term>,
) -> i32 {
    let frame_interval = app.config.ui.frame_interval;
    let mut last_frame = Instant::now() - frame_interval;

    while !app.should_quit {
        // External commands first, bounded per frame to keep the UI live.
        if let Some(api) = &api_rx {
            for _ in 0..app.config.server.commands_per_frame {
                match api.try_recv() {
                    Ok(request) => handle_api_request(app, request),
                    Err(_) => break,
                }
            }
        }

        // Then foreground input and zone traffic, blocking briefly when
        // idle so the loop sleeps instead of spinning.
        match event_rx.recv_timeout(INPUT_POLL) {
            Ok(event) => {
                handle_event(app, event);
                // Drain whatever else is queued before redrawing.
                let mut drained = 0;
                while drained < 256 {
                    match event_rx.try_recv() {
                        Ok(event) => {
                            handle_event(app, event);
                            drained += 1;
                        }
                        Err(_) => break,
                    }
                }
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }

        if let Some(term) = terminal.as_deref_mut() {
            if last_frame.elapsed() >= frame_interval {
                if term.draw(|frame| render::render(app, frame)).is_err() {
                    break;
                }
                last_frame = Instant::now();
            }
        }
    }

    // A focused zone releases the input channel on the way out.
    if app.mode == Mode::PtyFocused {
        app.set_mode(Mode::Nav);
    }
    EXIT_OK
}

#[cfg(test)]
mod tests {
    use std::io::{BufRead, BufReader, Write};
    use std::net::{TcpListener, TcpStream};

    use tempfile::TempDir;

    use crate::config::Config;

    use super::*;

    #[test]
    fn headless_loop_serves_api_round_trip() {
        let probe = TcpListener::bind("127.0.0.1:0").expect("probe");
        let port = probe.local_addr().expect("addr").port();
        drop(probe);

        let (mut server, api_rx) = ApiServer::start(ServerConfig {
            tcp_enabled: true,
            host: "127.0.0.1".to_string(),
            port,
            fifo_enabled: false,
            ..ServerConfig::default()
        })
        .expect("server");

        let loop_thread = std::thread::spawn(move || {
            let (tx, rx) = mpsc::channel();
            let mut app = App::new(Config::default(), tx, true);
            app.server_port = Some(port);
            run_headless(&mut app, rx, Some(api_rx))
        });

        let mut stream = TcpStream::connect(("127.0.0.1", port)).expect("connect");
        stream
            .write_all(b"goto 5 5\nrect 4 2\nstatus\n")
            .expect("write");
        let mut reader = BufReader::new(stream.try_clone().expect("clone"));

        let mut lines = Vec::new();
        for _ in 0..3 {
            let mut line = String::new();
            reader.read_line(&mut line).expect("read");
            lines.push(line);
        }
        let responses: Vec<serde_json::Value> = lines
            .iter()
            .map(|line| serde_json::from_str(line).expect("json"))
            .collect();
        assert_eq!(responses[0]["status"], "ok");
        assert_eq!(responses[1]["status"], "ok");
        let status = &responses[2]["data"];
        assert_eq!(status["cursor"]["x"], 5);
        assert_eq!(status["cursor"]["y"], 5);
        assert_eq!(status["mode"], "NAV");
        assert!(status["cells"].as_u64().expect("cells") >= 8);

        stream.write_all(b"quit\n").expect("write quit");
        let mut line = String::new();
        let _ = reader.read_line(&mut line);

        assert_eq!(loop_thread.join().expect("join"), EXIT_OK);
        server.stop();
    }

    #[test]
    fn project_round_trip_through_apply() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("state.json");

        let (tx, _rx) = mpsc::channel();
        let mut app = App::new(Config::default(), tx, true);
        let _ = crate::commands::execute(&mut app, ":goto 10 20");
        let _ = crate::commands::execute(&mut app, ":mark a");
        let _ = crate::commands::execute(&mut app, ":goto 100 200");
        let _ = crate::commands::execute(&mut app, ":mark b");
        let _ = crate::commands::execute(&mut app, ":text saved");
        let result = crate::commands::execute(&mut app, &format!(":w {}", path.display()));
        assert!(result.ok, "{}", result.message);

        let (tx, _rx) = mpsc::channel();
        let mut fresh = App::new(Config::default(), tx, true);
        apply_project(&mut fresh, &path).expect("apply");
        assert_eq!(
            fresh.bookmarks.get('a'),
            Some(crate::bookmarks::Bookmark { x: 10, y: 20 })
        );
        assert_eq!(
            fresh.bookmarks.get('b'),
            Some(crate::bookmarks::Bookmark { x: 100, y: 200 })
        );
        assert_eq!(fresh.canvas.cell_count(), app.canvas.cell_count());
        assert!(!fresh.project.dirty());
    }

    #[test]
    fn startup_text_file_imports_at_origin() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("art.txt");
        std::fs::write(&path, "ab\ncd\n").expect("write");

        let (tx, _rx) = mpsc::channel();
        let mut app = App::new(Config::default(), tx, true);
        load_startup_file(&mut app, &path).expect("load");
        assert_eq!(app.canvas.get_char(0, 0), 'a');
        assert_eq!(app.canvas.get_char(1, 1), 'd');
    }
}
