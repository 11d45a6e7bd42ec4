//! FIFO zones: append lines written by external processes to a named pipe.
//!
//! The pipe is created with owner-only permissions if absent and removed
//! on stop only if this zone created it. The reader reopens at EOF so
//! sequential writers keep working; stop wakes a blocked open by briefly
//! opening the write end non-blocking.

use std::ffi::CString;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::os::unix::ffi::OsStrExt;
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;

use crate::events::AppEvent;

use super::{ansi, HandlerHandle, ZoneLine};

/// Create the named pipe if needed. Returns whether we created it.
pub fn ensure(path: &Path) -> Result<bool, String> {
    match std::fs::metadata(path) {
        Ok(meta) => {
            use std::os::unix::fs::FileTypeExt;
            if meta.file_type().is_fifo() {
                Ok(false)
            } else {
                Err(format!("{} exists and is not a fifo", path.display()))
            }
        }
        Err(_) => {
            let c_path = CString::new(path.as_os_str().as_bytes())
                .map_err(|_| "path contains a NUL byte".to_string())?;
            let rc = unsafe { libc::mkfifo(c_path.as_ptr(), 0o600) };
            if rc != 0 {
                Err(format!(
                    "mkfifo {}: {}",
                    path.display(),
                    std::io::Error::last_os_error()
                ))
            } else {
                Ok(true)
            }
        }
    }
}

/// Open the write end without blocking, which unblocks a reader waiting
/// in open(2). Errors are ignored: if nothing is blocked there is nothing
/// to wake.
fn wake_reader(path: &Path) {
    let _ = std::fs::OpenOptions::new()
        .write(true)
        .custom_flags(libc::O_NONBLOCK)
        .open(path);
}

/// Start the FIFO reader thread for a zone.
pub fn spawn(
    zone: String,
    path: PathBuf,
    events: Sender<AppEvent>,
) -> Result<HandlerHandle, String> {
    let created = ensure(&path)?;

    let stop = Arc::new(AtomicBool::new(false));
    let paused = Arc::new(AtomicBool::new(false));

    let thread_stop = Arc::clone(&stop);
    let thread_paused = Arc::clone(&paused);
    let thread_path = path.clone();
    let thread = std::thread::Builder::new()
        .name(format!("fifo-{zone}"))
        .spawn(move || {
            while !thread_stop.load(Ordering::SeqCst) {
                // Blocks until a writer opens the pipe.
                let file = match File::open(&thread_path) {
                    Ok(file) => file,
                    Err(err) => {
                        if !thread_stop.load(Ordering::SeqCst) {
                            let _ = events.send(AppEvent::ZoneError {
                                zone: zone.clone(),
                                message: format!("fifo read error: {err}"),
                            });
                        }
                        break;
                    }
                };
                let reader = BufReader::new(file);
                for line in reader.lines() {
                    if thread_stop.load(Ordering::SeqCst) {
                        break;
                    }
                    let Ok(line) = line else { break };
                    if thread_paused.load(Ordering::SeqCst) {
                        continue;
                    }
                    let _ = events.send(AppEvent::ZoneLine {
                        zone: zone.clone(),
                        line: ZoneLine::plain(ansi::strip(&line)),
                    });
                }
                // EOF: the writer went away; reopen for the next one.
            }
            if created {
                let _ = std::fs::remove_file(&thread_path);
            }
        })
        .map_err(|err| format!("failed to spawn fifo thread: {err}"))?;

    let wake_path = path;
    let wake = Box::new(move || wake_reader(&wake_path));
    Ok(HandlerHandle::new(stop, paused, Some(wake), thread))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::mpsc;
    use std::time::Duration;
    use tempfile::TempDir;

    #[test]
    fn fifo_lines_arrive_in_order_and_file_is_removed() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("zone.fifo");
        let (tx, rx) = mpsc::channel();

        let mut handle = spawn("feed".to_string(), path.clone(), tx).expect("spawn");
        assert!(path.exists());

        {
            let mut writer = std::fs::OpenOptions::new()
                .write(true)
                .open(&path)
                .expect("open write end");
            writer.write_all(b"A\nB\nC\n").expect("write");
        }

        let mut lines = Vec::new();
        let deadline = std::time::Instant::now() + Duration::from_secs(2);
        while lines.len() < 3 && std::time::Instant::now() < deadline {
            if let Ok(AppEvent::ZoneLine { line, .. }) =
                rx.recv_timeout(Duration::from_millis(300))
            {
                lines.push(line.to_plain());
            }
        }
        assert_eq!(lines, vec!["A", "B", "C"]);

        handle.stop(Duration::from_secs(1));
        assert!(!path.exists(), "fifo created by the zone must be removed");
    }

    #[test]
    fn existing_non_fifo_path_is_rejected() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("plain.txt");
        std::fs::write(&path, "data").expect("write");
        let (tx, _rx) = mpsc::channel();
        assert!(spawn("bad".to_string(), path, tx).is_err());
    }
}
