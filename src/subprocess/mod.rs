//! Non-blocking child processes
//! A spawned command's stdout and stderr are drained by reader threads into
//! one channel; the main loop polls the channel every frame and never
//! blocks. Used by the build command.

use crate::constants::errors;
use crate::error::{EditorError, ErrorKind, Result};
use std::io::Read;
use std::process::{Child, Command, Stdio};
use std::sync::mpsc::{channel, Receiver, Sender, TryRecvError};
use std::thread;

/// One poll of the output stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Poll {
    /// No data yet; the child is still running
    Pending,
    /// A chunk of combined stdout/stderr
    Data(Vec<u8>),
    /// Both streams closed; carries the exit code when known
    Closed(Option<i32>),
}

/// A running child with its output stream
#[derive(Debug)]
pub struct Subprocess {
    child: Child,
    rx: Receiver<Vec<u8>>,
    /// Number of reader threads still attached
    open_readers: usize,
    exit_code: Option<i32>,
}

impl Subprocess {
    /// Launch `argv` with stdout and stderr redirected into the stream
    pub fn spawn(argv: &[String]) -> Result<Subprocess> {
        let (program, args) = argv.split_first().ok_or_else(|| {
            EditorError::new(ErrorKind::Build, errors::SPAWN_FAILED, "empty command")
        })?;

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                EditorError::new(
                    ErrorKind::Build,
                    errors::SPAWN_FAILED,
                    format!("{}: {}", program, e),
                )
            })?;

        let (tx, rx) = channel();
        let mut open_readers = 0;
        if let Some(stdout) = child.stdout.take() {
            spawn_reader(stdout, tx.clone());
            open_readers += 1;
        }
        if let Some(stderr) = child.stderr.take() {
            spawn_reader(stderr, tx);
            open_readers += 1;
        }

        Ok(Subprocess {
            child,
            rx,
            open_readers,
            exit_code: None,
        })
    }

    /// Drain one chunk without blocking
    pub fn poll(&mut self) -> Poll {
        match self.rx.try_recv() {
            Ok(chunk) => {
                if chunk.is_empty() {
                    // reader sends one empty chunk when its stream closes
                    self.open_readers = self.open_readers.saturating_sub(1);
                    if self.open_readers == 0 {
                        self.reap();
                        return Poll::Closed(self.exit_code);
                    }
                    Poll::Pending
                } else {
                    Poll::Data(chunk)
                }
            }
            Err(TryRecvError::Empty) => Poll::Pending,
            Err(TryRecvError::Disconnected) => {
                self.reap();
                Poll::Closed(self.exit_code)
            }
        }
    }

    fn reap(&mut self) {
        if self.exit_code.is_none() {
            if let Ok(status) = self.child.wait() {
                self.exit_code = status.code();
            }
        }
    }

    /// Best-effort termination, used when the user abandons a build
    pub fn kill(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

fn spawn_reader(mut stream: impl Read + Send + 'static, tx: Sender<Vec<u8>>) {
    thread::spawn(move || {
        let mut buf = [0u8; 4096];
        loop {
            match stream.read(&mut buf) {
                Ok(0) | Err(_) => {
                    let _ = tx.send(Vec::new());
                    return;
                }
                Ok(n) => {
                    if tx.send(buf[..n].to_vec()).is_err() {
                        return;
                    }
                }
            }
        }
    });
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
