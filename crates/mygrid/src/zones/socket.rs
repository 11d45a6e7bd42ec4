//! SOCKET zones: append lines received on a loopback TCP port.
//!
//! One sequential connection at a time, matching the one-way contract:
//! bytes in, lines appended, no response. The listener is non-blocking so
//! the accept loop can observe the stop flag; a port already in use is a
//! creation error surfaced to the caller.

use std::io::{BufRead, BufReader};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::time::Duration;

use crate::events::AppEvent;

use super::{ansi, HandlerHandle, ZoneLine};

const ACCEPT_POLL: Duration = Duration::from_millis(100);

/// Bind the loopback listener and start the accept thread.
pub fn spawn(zone: String, port: u16, events: Sender<AppEvent>) -> Result<HandlerHandle, String> {
    let listener = TcpListener::bind(("127.0.0.1", port))
        .map_err(|err| format!("cannot bind port {port}: {err}"))?;
    listener
        .set_nonblocking(true)
        .map_err(|err| err.to_string())?;

    let stop = Arc::new(AtomicBool::new(false));
    let paused = Arc::new(AtomicBool::new(false));

    let thread_stop = Arc::clone(&stop);
    let thread_paused = Arc::clone(&paused);
    let thread = std::thread::Builder::new()
        .name(format!("socket-{zone}"))
        .spawn(move || {
            while !thread_stop.load(Ordering::SeqCst) {
                match listener.accept() {
                    Ok((stream, _addr)) => {
                        handle_connection(&zone, stream, &thread_stop, &thread_paused, &events);
                    }
                    Err(err) if err.kind() == std::io::ErrorKind::WouldBlock => {
                        std::thread::sleep(ACCEPT_POLL);
                    }
                    Err(err) => {
                        if !thread_stop.load(Ordering::SeqCst) {
                            let _ = events.send(AppEvent::ZoneError {
                                zone: zone.clone(),
                                message: format!("accept error: {err}"),
                            });
                        }
                        break;
                    }
                }
            }
        })
        .map_err(|err| format!("failed to spawn socket thread: {err}"))?;

    Ok(HandlerHandle::new(stop, paused, None, thread))
}

fn handle_connection(
    zone: &str,
    stream: TcpStream,
    stop: &AtomicBool,
    paused: &AtomicBool,
    events: &Sender<AppEvent>,
) {
    // Readable with a timeout so a silent client cannot pin the thread
    // past shutdown.
    let _ = stream.set_nonblocking(false);
    let _ = stream.set_read_timeout(Some(Duration::from_millis(500)));
    let mut reader = BufReader::new(stream);
    let mut line = String::new();
    loop {
        if stop.load(Ordering::SeqCst) {
            return;
        }
        line.clear();
        match reader.read_line(&mut line) {
            Ok(0) => return,
            Ok(_) => {
                if paused.load(Ordering::SeqCst) {
                    continue;
                }
                let trimmed = line.trim_end_matches(['\r', '\n']);
                let _ = events.send(AppEvent::ZoneLine {
                    zone: zone.to_string(),
                    line: ZoneLine::plain(ansi::strip(trimmed)),
                });
            }
            Err(err)
                if err.kind() == std::io::ErrorKind::WouldBlock
                    || err.kind() == std::io::ErrorKind::TimedOut =>
            {
                continue;
            }
            Err(_) => return,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::mpsc;

    fn free_port() -> u16 {
        // Bind to an ephemeral port, note it, release it for the zone.
        let probe = TcpListener::bind(("127.0.0.1", 0)).expect("probe bind");
        probe.local_addr().expect("addr").port()
    }

    #[test]
    fn lines_from_sequential_connections_are_appended() {
        let port = free_port();
        let (tx, rx) = mpsc::channel();
        let mut handle = spawn("net".to_string(), port, tx).expect("spawn");

        for payload in ["first\n", "second\n"] {
            let mut stream = TcpStream::connect(("127.0.0.1", port)).expect("connect");
            stream.write_all(payload.as_bytes()).expect("write");
        }

        let mut lines = Vec::new();
        let deadline = std::time::Instant::now() + Duration::from_secs(2);
        while lines.len() < 2 && std::time::Instant::now() < deadline {
            if let Ok(AppEvent::ZoneLine { line, .. }) =
                rx.recv_timeout(Duration::from_millis(300))
            {
                lines.push(line.to_plain());
            }
        }
        assert_eq!(lines, vec!["first", "second"]);
        handle.stop(Duration::from_secs(1));
    }

    #[test]
    fn port_in_use_is_an_error() {
        let holder = TcpListener::bind(("127.0.0.1", 0)).expect("bind");
        let port = holder.local_addr().expect("addr").port();
        let (tx, _rx) = mpsc::channel();
        assert!(spawn("dup".to_string(), port, tx).is_err());
    }
}
