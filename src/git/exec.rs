//! git::exec
//!
//! Runs a finished [`Command`] under its deadline.
//!
//! # Capture
//!
//! stdout and stderr are drained by one reader thread each. Chunks flow back
//! over a channel in arrival order, which gives both the separate streams and
//! an interleaved transcript from a single run. The main thread polls the
//! child and kills it once the deadline passes; whatever was captured up to
//! that point is kept on the resulting [`ExecutionError`].
//!
//! After a normal exit the readers run to end of file and are joined, so no
//! output is lost. A grandchild that inherited the pipes (credential helper,
//! ssh) can keep them open; reading then stops at the command's deadline.
//!
//! # Entry points
//!
//! - [`execute`]: stdout, or stderr for verbs that report on stderr
//! - [`execute_combined`]: stdout and stderr interleaved
//! - [`execute_with_stderr`]: both streams, separately

use std::io::{Read, Write};
use std::process::{Child, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use super::command::Command;
use super::error::{ExecutionError, GitError};

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// How long to keep draining pipes after a killed child is gone.
const KILL_DRAIN_GRACE: Duration = Duration::from_millis(200);

/// Captured output of a successful run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Output {
    pub stdout: String,
    pub stderr: String,
    /// Both streams in arrival order.
    pub combined: String,
}

#[derive(Clone, Copy)]
enum Stream {
    Stdout,
    Stderr,
}

/// Run `cmd` and return its primary output.
///
/// That is stdout, unless the command is flagged stderr-primary, in which
/// case a successful run returns stderr.
///
/// # Errors
///
/// - [`GitError::Io`] if the process could not be spawned
/// - [`GitError::Execution`] on non-zero exit or deadline expiry
pub fn execute(cmd: &Command) -> Result<String, GitError> {
    let output = run(cmd)?;
    if cmd.stderr_is_primary() {
        Ok(output.stderr)
    } else {
        Ok(output.stdout)
    }
}

/// Run `cmd` and return stdout and stderr merged in arrival order.
pub fn execute_combined(cmd: &Command) -> Result<String, GitError> {
    run(cmd).map(|o| o.combined)
}

/// Run `cmd` and return both streams.
pub fn execute_with_stderr(cmd: &Command) -> Result<Output, GitError> {
    run(cmd)
}

fn run(cmd: &Command) -> Result<Output, GitError> {
    let argv = cmd.argv();
    debug!(
        subcommand = cmd.subcommand().unwrap_or(""),
        argv = ?argv,
        working_dir = ?cmd.working_dir(),
        timeout_ms = cmd.timeout().as_millis() as u64,
        env_keys = ?cmd.env().keys().collect::<Vec<_>>(),
        "running git"
    );

    let mut process = std::process::Command::new(cmd.binary());
    process
        .args(&argv)
        .envs(cmd.env())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .stdin(if cmd.stdin().is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        });
    if let Some(dir) = cmd.working_dir() {
        if !dir.as_os_str().is_empty() {
            process.current_dir(dir);
        }
    }

    let mut child = process
        .spawn()
        .map_err(|e| GitError::io(format!("failed to spawn {}", cmd.binary().display()), e))?;

    if let (Some(input), Some(mut pipe)) = (cmd.stdin(), child.stdin.take()) {
        let input = input.to_owned();
        // A writer thread keeps a large payload from deadlocking against full output pipes
        thread::spawn(move || {
            let _ = pipe.write_all(input.as_bytes());
        });
    }

    let (tx, rx) = mpsc::channel();
    let mut readers = Vec::with_capacity(2);
    if let Some(pipe) = child.stdout.take() {
        readers.push(spawn_reader(pipe, Stream::Stdout, tx.clone()));
    }
    if let Some(pipe) = child.stderr.take() {
        readers.push(spawn_reader(pipe, Stream::Stderr, tx.clone()));
    }
    drop(tx);

    let deadline = Instant::now() + cmd.timeout();
    let mut capture = Capture::default();
    let (status, timed_out, at_eof) = wait(&mut child, &rx, &mut capture, deadline)?;
    if at_eof {
        for reader in readers {
            let _ = reader.join();
        }
    } else if !timed_out {
        warn!(argv = ?argv, "git exited but its output pipes stayed open; output may be incomplete");
    }
    let output = capture.finish();

    match status {
        Some(status) if status.success() => {
            debug!(
                exit_code = status.code(),
                stdout_bytes = output.stdout.len(),
                stderr_bytes = output.stderr.len(),
                "git finished"
            );
            Ok(output)
        }
        _ => {
            if timed_out {
                warn!(
                    argv = ?argv,
                    timeout_ms = cmd.timeout().as_millis() as u64,
                    "git timed out and was killed"
                );
            } else {
                debug!(
                    exit_code = status.and_then(|s| s.code()),
                    stderr = %output.stderr.trim(),
                    "git failed"
                );
            }
            Err(ExecutionError {
                argv,
                exit_code: status.and_then(|s| s.code()),
                stdout: output.stdout,
                stderr: output.stderr,
                timed_out,
            }
            .into())
        }
    }
}

fn spawn_reader<R>(mut pipe: R, stream: Stream, tx: Sender<(Stream, Vec<u8>)>) -> JoinHandle<()>
where
    R: Read + Send + 'static,
{
    thread::spawn(move || {
        let mut buf = [0u8; 8192];
        loop {
            match pipe.read(&mut buf) {
                Ok(0) | Err(_) => break,
                Ok(n) => {
                    if tx.send((stream, buf[..n].to_vec())).is_err() {
                        break;
                    }
                }
            }
        }
    })
}

/// Wait for the child, collecting chunks, until it exits or the deadline passes.
///
/// Returns the exit status (`None` when killed), whether the deadline fired,
/// and whether both pipes reached end of file.
fn wait(
    child: &mut Child,
    rx: &Receiver<(Stream, Vec<u8>)>,
    capture: &mut Capture,
    deadline: Instant,
) -> Result<(Option<ExitStatus>, bool, bool), GitError> {
    loop {
        match rx.recv_timeout(POLL_INTERVAL) {
            Ok((stream, chunk)) => {
                capture.push(stream, chunk);
                continue;
            }
            Err(RecvTimeoutError::Disconnected) => {
                // Both pipes closed; the child is exiting
                let (status, timed_out) = wait_for_exit(child, deadline)?;
                return Ok((status, timed_out, true));
            }
            Err(RecvTimeoutError::Timeout) => {}
        }

        if let Some(status) = child
            .try_wait()
            .map_err(|e| GitError::io("failed to poll git", e))?
        {
            let at_eof = drain_until(rx, capture, deadline);
            return Ok((Some(status), false, at_eof));
        }

        if Instant::now() >= deadline {
            kill(child);
            let at_eof = drain_until(rx, capture, Instant::now() + KILL_DRAIN_GRACE);
            return Ok((None, true, at_eof));
        }
    }
}

fn wait_for_exit(
    child: &mut Child,
    deadline: Instant,
) -> Result<(Option<ExitStatus>, bool), GitError> {
    loop {
        if let Some(status) = child
            .try_wait()
            .map_err(|e| GitError::io("failed to poll git", e))?
        {
            return Ok((Some(status), false));
        }
        if Instant::now() >= deadline {
            kill(child);
            return Ok((None, true));
        }
        thread::sleep(POLL_INTERVAL);
    }
}

fn kill(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

/// Collect chunks until both readers hit end of file or `until` passes.
///
/// Returns true when the readers finished.
fn drain_until(rx: &Receiver<(Stream, Vec<u8>)>, capture: &mut Capture, until: Instant) -> bool {
    loop {
        let remaining = until.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return false;
        }
        match rx.recv_timeout(remaining) {
            Ok((stream, chunk)) => capture.push(stream, chunk),
            Err(RecvTimeoutError::Disconnected) => return true,
            Err(RecvTimeoutError::Timeout) => return false,
        }
    }
}

#[derive(Default)]
struct Capture {
    stdout: Vec<u8>,
    stderr: Vec<u8>,
    combined: Vec<u8>,
}

impl Capture {
    fn push(&mut self, stream: Stream, chunk: Vec<u8>) {
        self.combined.extend_from_slice(&chunk);
        match stream {
            Stream::Stdout => self.stdout.extend(chunk),
            Stream::Stderr => self.stderr.extend(chunk),
        }
    }

    fn finish(self) -> Output {
        Output {
            stdout: String::from_utf8_lossy(&self.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&self.stderr).into_owned(),
            combined: String::from_utf8_lossy(&self.combined).into_owned(),
        }
    }
}
