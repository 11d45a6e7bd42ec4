//! PTY zones: a live shell inside a zone rectangle.
//!
//! A session owns the portable-pty master, the child process and the
//! terminal screen fed from the reader thread. Output bytes are posted as
//! events and fed into the screen by the application thread, which is the
//! only mutator; the renderer reads the same screen between events.

use std::io::{Read, Write};
use std::sync::mpsc::Sender;
use std::time::Duration;

use portable_pty::{native_pty_system, CommandBuilder, MasterPty, PtySize};

use crate::events::AppEvent;
use crate::term::TermScreen;

/// A running terminal session attached to a PTY zone.
pub struct PtySession {
    screen: TermScreen,
    writer: Box<dyn Write + Send>,
    master: Box<dyn MasterPty + Send>,
    child: Box<dyn portable_pty::Child + Send + Sync>,
    reader_thread: Option<std::thread::JoinHandle<()>>,
    exited: bool,
}

impl PtySession {
    /// Spawn `sh -c <command_line>` on a fresh PTY sized to the zone's
    /// inner rectangle. The reader thread forwards raw output bytes as
    /// ZoneBytes events until EOF.
    pub fn spawn(
        zone: &str,
        command_line: &str,
        rows: u16,
        cols: u16,
        scrollback: usize,
        events: Sender<AppEvent>,
    ) -> Result<Self, String> {
        let rows = rows.max(1);
        let cols = cols.max(1);
        let pty_system = native_pty_system();
        let pair = pty_system
            .openpty(PtySize {
                rows,
                cols,
                pixel_width: 0,
                pixel_height: 0,
            })
            .map_err(|err| err.to_string())?;

        let mut cmd = CommandBuilder::new("sh");
        cmd.arg("-c");
        cmd.arg(command_line);
        if let Ok(cwd) = std::env::current_dir() {
            cmd.cwd(cwd);
        }
        cmd.env("TERM", "xterm-256color");

        let child = pair
            .slave
            .spawn_command(cmd)
            .map_err(|err| err.to_string())?;
        let mut reader = pair
            .master
            .try_clone_reader()
            .map_err(|err| err.to_string())?;
        let writer = pair.master.take_writer().map_err(|err| err.to_string())?;

        let zone_name = zone.to_string();
        let reader_thread = std::thread::Builder::new()
            .name(format!("pty-{zone}"))
            .spawn(move || {
                let mut buffer = [0u8; 8192];
                loop {
                    match reader.read(&mut buffer) {
                        Ok(0) => break,
                        Ok(size) => {
                            if events
                                .send(AppEvent::ZoneBytes {
                                    zone: zone_name.clone(),
                                    bytes: buffer[..size].to_vec(),
                                })
                                .is_err()
                            {
                                break;
                            }
                        }
                        Err(_) => break,
                    }
                }
                let _ = events.send(AppEvent::ZoneClosed {
                    zone: zone_name,
                    message: "terminal closed".to_string(),
                });
            })
            .map_err(|err| format!("failed to spawn reader thread: {err}"))?;

        Ok(Self {
            screen: TermScreen::new(rows, cols, scrollback),
            writer,
            master: pair.master,
            child,
            reader_thread: Some(reader_thread),
            exited: false,
        })
    }

    pub fn screen(&self) -> &TermScreen {
        &self.screen
    }

    pub fn screen_mut(&mut self) -> &mut TermScreen {
        &mut self.screen
    }

    pub fn feed(&mut self, bytes: &[u8]) {
        self.screen.feed(bytes);
    }

    pub fn mark_exited(&mut self) {
        self.exited = true;
    }

    pub fn is_running(&self) -> bool {
        !self.exited
    }

    /// Write input bytes to the child's terminal.
    pub fn send(&mut self, bytes: &[u8]) -> Result<(), String> {
        self.writer
            .write_all(bytes)
            .and_then(|_| self.writer.flush())
            .map_err(|err| err.to_string())
    }

    /// Resize both the PTY and the emulator screen.
    pub fn resize(&mut self, rows: u16, cols: u16) -> Result<(), String> {
        let rows = rows.max(1);
        let cols = cols.max(1);
        self.master
            .resize(PtySize {
                rows,
                cols,
                pixel_width: 0,
                pixel_height: 0,
            })
            .map_err(|err| err.to_string())?;
        self.screen.resize(rows, cols);
        Ok(())
    }

    /// Terminate the child and join the reader, bounded by `deadline`.
    pub fn stop(&mut self, deadline: Duration) {
        let _ = self.child.kill();
        let _ = self.child.wait();
        if let Some(thread) = self.reader_thread.take() {
            let started = std::time::Instant::now();
            while !thread.is_finished() && started.elapsed() < deadline {
                std::thread::sleep(Duration::from_millis(10));
            }
            if thread.is_finished() {
                let _ = thread.join();
            } else {
                tracing::warn!("pty reader did not stop within deadline, detaching");
            }
        }
    }
}

impl std::fmt::Debug for PtySession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PtySession")
            .field("exited", &self.exited)
            .finish()
    }
}
