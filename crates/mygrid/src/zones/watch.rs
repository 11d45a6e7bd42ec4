//! WATCH zones: periodic or file-triggered command refresh.
//!
//! Interval mode sleeps on a channel `recv_timeout` so stop is immediate.
//! File mode uses a notify watcher with a debounce window, substituting
//! `{file}` in the command with the changed path. A paused handler keeps
//! ticking but skips execution; command failures append the error output
//! and the next tick proceeds normally.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::time::Duration;

use notify::{RecursiveMode, Watcher};

use crate::events::AppEvent;

use super::{pipe, HandlerHandle, WatchTrigger};

const FILE_DEBOUNCE: Duration = Duration::from_millis(250);

/// Start the background refresh thread for a WATCH zone.
pub fn spawn(
    zone: String,
    command: String,
    trigger: WatchTrigger,
    events: Sender<AppEvent>,
) -> Result<HandlerHandle, String> {
    let stop = Arc::new(AtomicBool::new(false));
    let paused = Arc::new(AtomicBool::new(false));
    let (wake_tx, wake_rx) = mpsc::channel::<()>();

    let thread_stop = Arc::clone(&stop);
    let thread_paused = Arc::clone(&paused);
    let thread = std::thread::Builder::new()
        .name(format!("watch-{zone}"))
        .spawn(move || match trigger {
            WatchTrigger::Interval(interval) => run_interval(
                &zone,
                &command,
                interval,
                &thread_stop,
                &thread_paused,
                &wake_rx,
                &events,
            ),
            WatchTrigger::Path(path) => run_file_watch(
                &zone,
                &command,
                path,
                &thread_stop,
                &thread_paused,
                &wake_rx,
                &events,
            ),
        })
        .map_err(|err| format!("failed to spawn watch thread: {err}"))?;

    let wake = Box::new(move || {
        let _ = wake_tx.send(());
    });
    Ok(HandlerHandle::new(stop, paused, Some(wake), thread))
}

fn run_once(zone: &str, command: &str, events: &Sender<AppEvent>) {
    match pipe::capture(command) {
        Ok((lines, _status)) => {
            let _ = events.send(AppEvent::ZoneContent {
                zone: zone.to_string(),
                lines,
                replace: true,
            });
        }
        Err(message) => {
            // Keep ticking; the error is surfaced but not fatal.
            let _ = events.send(AppEvent::ZoneError {
                zone: zone.to_string(),
                message,
            });
        }
    }
}

fn run_interval(
    zone: &str,
    command: &str,
    interval: Duration,
    stop: &AtomicBool,
    paused: &AtomicBool,
    wake_rx: &mpsc::Receiver<()>,
    events: &Sender<AppEvent>,
) {
    run_once(zone, command, events);
    loop {
        match wake_rx.recv_timeout(interval) {
            Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                if stop.load(Ordering::SeqCst) {
                    return;
                }
            }
            Err(RecvTimeoutError::Timeout) => {}
        }
        if stop.load(Ordering::SeqCst) {
            return;
        }
        if paused.load(Ordering::SeqCst) {
            continue;
        }
        run_once(zone, command, events);
    }
}

fn run_file_watch(
    zone: &str,
    command: &str,
    path: PathBuf,
    stop: &AtomicBool,
    paused: &AtomicBool,
    wake_rx: &mpsc::Receiver<()>,
    events: &Sender<AppEvent>,
) {
    let (notify_tx, notify_rx) = mpsc::channel::<PathBuf>();
    let mut watcher = match notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
        if let Ok(event) = res {
            for changed in event.paths {
                let _ = notify_tx.send(changed);
            }
        }
    }) {
        Ok(watcher) => watcher,
        Err(err) => {
            let _ = events.send(AppEvent::ZoneError {
                zone: zone.to_string(),
                message: format!("watch setup failed: {err}"),
            });
            return;
        }
    };

    // Watch the parent so the target may be created/replaced while watched.
    let target = path.clone();
    let watch_root = path.parent().map(PathBuf::from).unwrap_or_else(|| path.clone());
    if let Err(err) = watcher.watch(&watch_root, RecursiveMode::NonRecursive) {
        let _ = events.send(AppEvent::ZoneError {
            zone: zone.to_string(),
            message: format!("cannot watch {}: {err}", watch_root.display()),
        });
        return;
    }

    run_once(zone, &super::substitute_file(command, &target), events);

    loop {
        // Block until something changes, waking periodically for stop.
        let changed = match notify_rx.recv_timeout(Duration::from_millis(200)) {
            Ok(path) => Some(path),
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => return,
        };
        let _ = wake_rx.try_recv();
        if stop.load(Ordering::SeqCst) {
            return;
        }
        let Some(changed) = changed else {
            continue;
        };
        if changed != target {
            continue;
        }
        // Coalesce bursts of writes into one run.
        std::thread::sleep(FILE_DEBOUNCE);
        while notify_rx.try_recv().is_ok() {}
        if stop.load(Ordering::SeqCst) {
            return;
        }
        if paused.load(Ordering::SeqCst) {
            continue;
        }
        run_once(zone, &super::substitute_file(command, &changed), events);
    }
}

/// Parse a watch interval spec: `1.5s`, `2m`, bare seconds, or
/// `watch:PATH` for file-triggered refresh.
pub fn parse_trigger(spec: &str) -> Result<WatchTrigger, String> {
    if let Some(path) = spec.strip_prefix("watch:") {
        if path.is_empty() {
            return Err("missing file path after 'watch:'".to_string());
        }
        let mut path = PathBuf::from(path);
        if let Ok(stripped) = path.strip_prefix("~") {
            if let Some(home) = dirs::home_dir() {
                path = home.join(stripped);
            }
        }
        if !path.is_absolute() {
            if let Ok(cwd) = std::env::current_dir() {
                path = cwd.join(path);
            }
        }
        return Ok(WatchTrigger::Path(path));
    }

    let (number, scale) = if let Some(rest) = spec.strip_suffix('s') {
        (rest, 1.0)
    } else if let Some(rest) = spec.strip_suffix('m') {
        (rest, 60.0)
    } else {
        (spec, 1.0)
    };
    let seconds: f64 = number
        .parse()
        .map_err(|_| format!("invalid interval: {spec}"))?;
    if seconds <= 0.0 {
        return Err(format!("interval must be positive: {spec}"));
    }
    Ok(WatchTrigger::Interval(Duration::from_secs_f64(
        seconds * scale,
    )))
}
