//! External command ingress: TCP and named-pipe listeners.
//!
//! Both channels enqueue raw command lines onto a bounded queue the main
//! loop drains at a configurable per-frame budget. TCP connections get
//! one JSON response object per command line, in order; the FIFO is
//! fire-and-forget. Everything binds loopback-only unless overridden —
//! clients are trusted local processes.

use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::os::unix::fs::OpenOptionsExt;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender, SyncSender, TrySendError};
use std::sync::{mpsc, Arc};
use std::time::Duration;

use serde::Serialize;

const ACCEPT_POLL: Duration = Duration::from_millis(100);
const QUEUE_CAPACITY: usize = 1000;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub tcp_enabled: bool,
    pub host: String,
    pub port: u16,
    pub fifo_enabled: bool,
    pub fifo_path: PathBuf,
    pub response_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            tcp_enabled: true,
            host: "127.0.0.1".to_string(),
            port: 8765,
            fifo_enabled: true,
            fifo_path: PathBuf::from("/tmp/mygrid.fifo"),
            response_timeout: Duration::from_secs(5),
        }
    }
}

/// A command line received from an external source. Synchronous sources
/// carry a response channel; the FIFO does not.
#[derive(Debug)]
pub struct ApiRequest {
    pub line: String,
    pub source: &'static str,
    pub respond: Option<Sender<ApiResponse>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse {
    pub status: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl ApiResponse {
    pub fn ok(message: impl Into<String>, data: Option<serde_json::Value>) -> Self {
        Self {
            status: "ok",
            message: message.into(),
            data,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error",
            message: message.into(),
            data: None,
        }
    }
}

/// Producer side of the bounded command queue.
#[derive(Clone)]
pub struct CommandQueue {
    tx: SyncSender<ApiRequest>,
}

impl CommandQueue {
    pub fn push(&self, request: ApiRequest) -> bool {
        match self.tx.try_send(request) {
            Ok(()) => true,
            Err(TrySendError::Full(request)) => {
                tracing::warn!(source = request.source, "command queue full, dropping");
                false
            }
            Err(TrySendError::Disconnected(_)) => false,
        }
    }
}

/// Running listener threads plus the queue consumer end.
pub struct ApiServer {
    config: ServerConfig,
    stop: Arc<AtomicBool>,
    threads: Vec<std::thread::JoinHandle<()>>,
}

impl ApiServer {
    /// Bind and start the configured listeners. Returns the server and
    /// the receiver the main loop drains.
    pub fn start(config: ServerConfig) -> Result<(Self, Receiver<ApiRequest>), String> {
        let (tx, rx) = mpsc::sync_channel(QUEUE_CAPACITY);
        let queue = CommandQueue { tx };
        let stop = Arc::new(AtomicBool::new(false));
        let mut threads = Vec::new();

        if config.tcp_enabled {
            let listener = TcpListener::bind((config.host.as_str(), config.port))
                .map_err(|err| format!("cannot bind {}:{}: {err}", config.host, config.port))?;
            listener
                .set_nonblocking(true)
                .map_err(|err| err.to_string())?;
            tracing::info!(host = %config.host, port = config.port, "tcp api listening");

            let tcp_stop = Arc::clone(&stop);
            let tcp_queue = queue.clone();
            let timeout = config.response_timeout;
            let thread = std::thread::Builder::new()
                .name("api-tcp".to_string())
                .spawn(move || accept_loop(listener, tcp_stop, tcp_queue, timeout))
                .map_err(|err| err.to_string())?;
            threads.push(thread);
        }

        if config.fifo_enabled {
            let fifo_stop = Arc::clone(&stop);
            let fifo_queue = queue.clone();
            let fifo_path = config.fifo_path.clone();
            crate::zones::fifo::ensure(&fifo_path)?;
            tracing::info!(path = %fifo_path.display(), "fifo api listening");
            let thread = std::thread::Builder::new()
                .name("api-fifo".to_string())
                .spawn(move || fifo_loop(fifo_path, fifo_stop, fifo_queue))
                .map_err(|err| err.to_string())?;
            threads.push(thread);
        }

        Ok((
            Self {
                config,
                stop,
                threads,
            },
            rx,
        ))
    }

    pub fn port(&self) -> u16 {
        self.config.port
    }

    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        if self.config.fifo_enabled {
            // Wake a blocked FIFO open and remove the pipe.
            let _ = std::fs::OpenOptions::new()
                .write(true)
                .custom_flags(libc::O_NONBLOCK)
                .open(&self.config.fifo_path);
            let _ = std::fs::remove_file(&self.config.fifo_path);
        }
        let deadline = std::time::Instant::now() + Duration::from_secs(1);
        for thread in self.threads.drain(..) {
            while !thread.is_finished() && std::time::Instant::now() < deadline {
                std::thread::sleep(Duration::from_millis(10));
            }
            if thread.is_finished() {
                let _ = thread.join();
            } else {
                tracing::warn!("api listener did not stop within deadline, detaching");
            }
        }
        tracing::info!("api server stopped");
    }
}

fn accept_loop(
    listener: TcpListener,
    stop: Arc<AtomicBool>,
    queue: CommandQueue,
    timeout: Duration,
) {
    while !stop.load(Ordering::SeqCst) {
        match listener.accept() {
            Ok((stream, _addr)) => {
                let conn_stop = Arc::clone(&stop);
                let conn_queue = queue.clone();
                let result = std::thread::Builder::new()
                    .name("api-conn".to_string())
                    .spawn(move || handle_connection(stream, conn_stop, conn_queue, timeout));
                if let Err(err) = result {
                    tracing::warn!("failed to spawn connection thread: {err}");
                }
            }
            Err(err) if err.kind() == std::io::ErrorKind::WouldBlock => {
                std::thread::sleep(ACCEPT_POLL);
            }
            Err(err) => {
                if !stop.load(Ordering::SeqCst) {
                    tracing::warn!("tcp accept error: {err}");
                }
                break;
            }
        }
    }
}

/// One connection: commands in, one JSON line out per command, in order.
fn handle_connection(
    stream: TcpStream,
    stop: Arc<AtomicBool>,
    queue: CommandQueue,
    timeout: Duration,
) {
    let _ = stream.set_nonblocking(false);
    let _ = stream.set_read_timeout(Some(Duration::from_millis(500)));
    let mut writer = match stream.try_clone() {
        Ok(clone) => clone,
        Err(_) => return,
    };
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
                let command = line.trim();
                if command.is_empty() {
                    continue;
                }
                let response = execute_remote(command, &queue, timeout);
                let mut payload = serde_json::to_string(&response)
                    .unwrap_or_else(|_| r#"{"status":"error","message":"encode failed"}"#.into());
                payload.push('\n');
                if writer.write_all(payload.as_bytes()).is_err() {
                    return;
                }
                let _ = writer.flush();
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

fn execute_remote(command: &str, queue: &CommandQueue, timeout: Duration) -> ApiResponse {
    let (tx, rx) = mpsc::channel();
    let accepted = queue.push(ApiRequest {
        line: command.to_string(),
        source: "tcp",
        respond: Some(tx),
    });
    if !accepted {
        return ApiResponse::error("command queue full");
    }
    match rx.recv_timeout(timeout) {
        Ok(response) => response,
        Err(RecvTimeoutError::Timeout) => ApiResponse::error("command timeout"),
        Err(RecvTimeoutError::Disconnected) => ApiResponse::error("server shutting down"),
    }
}

fn fifo_loop(path: PathBuf, stop: Arc<AtomicBool>, queue: CommandQueue) {
    while !stop.load(Ordering::SeqCst) {
        let file = match std::fs::File::open(&path) {
            Ok(file) => file,
            Err(err) => {
                if !stop.load(Ordering::SeqCst) {
                    tracing::warn!("fifo open error: {err}");
                }
                return;
            }
        };
        let reader = BufReader::new(file);
        for line in reader.lines() {
            if stop.load(Ordering::SeqCst) {
                return;
            }
            let Ok(line) = line else { break };
            let command = line.trim();
            if command.is_empty() {
                continue;
            }
            queue.push(ApiRequest {
                line: command.to_string(),
                source: "fifo",
                respond: None,
            });
        }
        // EOF: reopen for the next writer.
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_serialization_shape() {
        let ok = ApiResponse::ok("done", None);
        assert_eq!(
            serde_json::to_string(&ok).expect("encode"),
            r#"{"status":"ok","message":"done"}"#
        );

        let with_data = ApiResponse::ok("state", Some(serde_json::json!({"cells": 3})));
        let value: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&with_data).expect("encode"))
                .expect("decode");
        assert_eq!(value["data"]["cells"], 3);

        let err = ApiResponse::error("nope");
        assert_eq!(
            serde_json::to_string(&err).expect("encode"),
            r#"{"status":"error","message":"nope"}"#
        );
    }

    #[test]
    fn queue_bounds_are_enforced() {
        let (tx, rx) = mpsc::sync_channel(2);
        let queue = CommandQueue { tx };
        assert!(queue.push(ApiRequest {
            line: "a".into(),
            source: "test",
            respond: None
        }));
        assert!(queue.push(ApiRequest {
            line: "b".into(),
            source: "test",
            respond: None
        }));
        // Third push is dropped, not blocked.
        assert!(!queue.push(ApiRequest {
            line: "c".into(),
            source: "test",
            respond: None
        }));
        assert_eq!(rx.try_iter().count(), 2);
    }

    #[test]
    fn tcp_round_trip_in_arrival_order() {
        let config = ServerConfig {
            tcp_enabled: true,
            host: "127.0.0.1".to_string(),
            port: 0,
            fifo_enabled: false,
            ..ServerConfig::default()
        };
        // Bind an ephemeral port manually to learn it.
        let probe = TcpListener::bind("127.0.0.1:0").expect("probe");
        let port = probe.local_addr().expect("addr").port();
        drop(probe);
        let config = ServerConfig { port, ..config };

        let (mut server, rx) = ApiServer::start(config).expect("start");

        // Fake executor: echo the command back.
        let executor = std::thread::spawn(move || {
            for _ in 0..2 {
                let request = rx.recv_timeout(Duration::from_secs(2)).expect("request");
                if let Some(respond) = request.respond {
                    let _ = respond.send(ApiResponse::ok(request.line.clone(), None));
                }
            }
        });

        let mut stream = TcpStream::connect(("127.0.0.1", port)).expect("connect");
        stream.write_all(b"goto 5 5\nrect 4 2\n").expect("write");
        let mut reader = BufReader::new(stream.try_clone().expect("clone"));
        let mut first = String::new();
        reader.read_line(&mut first).expect("read");
        let mut second = String::new();
        reader.read_line(&mut second).expect("read");

        let first: serde_json::Value = serde_json::from_str(&first).expect("json");
        let second: serde_json::Value = serde_json::from_str(&second).expect("json");
        assert_eq!(first["message"], "goto 5 5");
        assert_eq!(second["message"], "rect 4 2");

        executor.join().expect("executor");
        server.stop();
    }
}
