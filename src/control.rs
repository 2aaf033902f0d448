//! Remote control via Unix socket
//!
//! Accepts one command per line (`launch 320`, `burst`, `clear`, ...) and
//! forwards them to the main loop, which applies them between frames.

use log::{debug, warn};
use skyburst::{Command, Result};
use std::io::{BufRead, BufReader};
use std::os::unix::net::{UnixListener, UnixStream};
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use std::thread;

/// Controller that listens for commands on a Unix socket
pub struct Controller {
    path: PathBuf,
    _listener_thread: thread::JoinHandle<()>,
}

impl Controller {
    /// Bind the socket and start forwarding commands to `sender`
    pub fn spawn(path: impl AsRef<Path>, sender: Sender<Command>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        // Remove a stale socket left by a previous run
        let _ = std::fs::remove_file(&path);

        let listener = UnixListener::bind(&path)?;
        // Non-blocking so the thread notices when the receiver is gone
        listener.set_nonblocking(true)?;

        let handle = thread::spawn(move || {
            Self::listener_loop(listener, sender);
        });

        Ok(Self {
            path,
            _listener_thread: handle,
        })
    }

    fn listener_loop(listener: UnixListener, sender: Sender<Command>) {
        loop {
            match listener.accept() {
                Ok((stream, _)) => {
                    let sender = sender.clone();
                    thread::spawn(move || {
                        Self::handle_client(stream, sender);
                    });
                },
                Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                    thread::sleep(std::time::Duration::from_millis(50));
                },
                Err(e) => {
                    warn!("control socket closed: {}", e);
                    break;
                },
            }
        }
    }

    fn handle_client(stream: UnixStream, sender: Sender<Command>) {
        // Accepted streams inherit non-blocking mode on some platforms
        if let Err(e) = stream.set_nonblocking(false) {
            warn!("control client setup failed: {}", e);
            return;
        }
        let reader = BufReader::new(stream);
        for line in reader.lines().map_while(std::result::Result::ok) {
            if line.trim().is_empty() {
                continue;
            }
            match line.parse::<Command>() {
                Ok(cmd) => {
                    debug!("control: {:?}", cmd);
                    if sender.send(cmd).is_err() {
                        break;
                    }
                },
                Err(e) => warn!("control: {}", e),
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for Controller {
    fn drop(&mut self) {
        // Clean up the socket file
        let _ = std::fs::remove_file(&self.path);
    }
}
