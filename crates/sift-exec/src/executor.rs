//! Interpreter subprocess with a hard wall-clock timeout.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use sift_core::config::ExecutorConfig;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::task::{JoinError, JoinHandle};

use crate::memory::{bytes_to_mb, delta_mb, MemoryProbe};
use crate::summary::{parse_summary, EXECUTION_TEST_NAME};
use crate::types::{ExecutionResult, TestOutcome};

const FALLBACK_PATH: &str = "/usr/local/bin:/usr/bin:/bin";
const READ_CHUNK: usize = 8 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum ExecError {
    #[error("interpreter `{0}` not found on PATH")]
    InterpreterNotFound(String),

    #[error("failed to prepare temp source file: {0}")]
    TempFile(#[source] io::Error),

    #[error("failed to spawn interpreter: {0}")]
    Spawn(#[source] io::Error),

    #[error("I/O error while running interpreter: {0}")]
    Io(#[from] io::Error),
}

/// Run `source` with the default executor settings.
pub async fn execute(source: &str, timeout_secs: u64) -> ExecutionResult {
    Executor::default().execute(source, timeout_secs).await
}

/// Run a generated unittest module with the default executor settings.
pub async fn run_generated_tests(combined_source: &str) -> Vec<TestOutcome> {
    Executor::default().run_generated_tests(combined_source).await
}

/// Runs Python sources as child processes.
///
/// Stateless apart from its settings; one executor can serve any number of
/// concurrent calls since each call owns its temp file and child.
#[derive(Debug, Clone, Default)]
pub struct Executor {
    config: ExecutorConfig,
}

/// What the child did, before it is shaped into a result.
struct RawRun {
    stdout: Captured,
    stderr: Captured,
    exit_code: Option<i32>,
    timed_out: bool,
    elapsed: Duration,
    parent_delta_mb: f64,
    child_peak_bytes: u64,
}

struct Captured {
    text: String,
    truncated: bool,
}

/// Bytes read so far from one stream, shared with its reader task so that
/// an abandoned reader still leaves its partial output behind.
#[derive(Default)]
struct CaptureBuf {
    bytes: Vec<u8>,
    truncated: bool,
}

type CaptureSink = Arc<Mutex<CaptureBuf>>;

impl Executor {
    pub fn new(config: ExecutorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Run `source` and wait at most `timeout_secs` seconds.
    ///
    /// Never fails: setup errors come back as `success = false` with the
    /// reason in `error`.
    pub async fn execute(&self, source: &str, timeout_secs: u64) -> ExecutionResult {
        match self.run(source, timeout_secs).await {
            Ok(raw) => shape_result(raw, timeout_secs),
            Err(e) => {
                tracing::warn!(error = %e, "execution failed before completion");
                ExecutionResult::failed(e.to_string())
            }
        }
    }

    /// Run an application + unittest module and parse its console summary.
    pub async fn run_generated_tests(&self, combined_source: &str) -> Vec<TestOutcome> {
        let timeout = self.config.test_timeout_seconds;
        match self.run(combined_source, timeout).await {
            Ok(raw) if raw.timed_out => vec![TestOutcome::failed(
                EXECUTION_TEST_NAME,
                format!("Test execution timed out ({timeout} seconds)"),
            )],
            Ok(raw) => {
                let mut output = raw.stdout.text;
                output.push_str(&raw.stderr.text);
                parse_summary(&output)
            }
            Err(e) => vec![TestOutcome::failed(EXECUTION_TEST_NAME, e.to_string())],
        }
    }

    async fn run(&self, source: &str, timeout_secs: u64) -> Result<RawRun, ExecError> {
        let interpreter = which::which(&self.config.interpreter)
            .map_err(|_| ExecError::InterpreterNotFound(self.config.interpreter.clone()))?;

        // Removed when `script` drops, on every return path below.
        let mut script = tempfile::Builder::new()
            .prefix("sift-")
            .suffix(".py")
            .tempfile()
            .map_err(ExecError::TempFile)?;
        script
            .write_all(source.as_bytes())
            .and_then(|_| script.flush())
            .map_err(ExecError::TempFile)?;

        let mut parent = MemoryProbe::current();
        let parent_before = parent.as_mut().and_then(MemoryProbe::rss_bytes);

        let mut cmd = sandboxed_command(&interpreter, script.path());
        let start = Instant::now();
        let mut child = cmd.spawn().map_err(ExecError::Spawn)?;
        let pid = child.id();
        tracing::info!(?pid, timeout_secs, "spawned interpreter");

        let limit = self.config.max_output_bytes;
        let stdout_sink = CaptureSink::default();
        let stderr_sink = CaptureSink::default();
        let mut stdout_task = tokio::spawn(read_capped(
            child.stdout.take(),
            limit,
            Arc::clone(&stdout_sink),
        ));
        let mut stderr_task = tokio::spawn(read_capped(
            child.stderr.take(),
            limit,
            Arc::clone(&stderr_sink),
        ));

        let mut child_probe = pid.map(MemoryProbe::for_pid);
        let mut child_peak_bytes = 0;
        let mut sampler = tokio::time::interval(Duration::from_millis(
            self.config.memory_sample_interval_ms.max(1),
        ));
        let deadline = tokio::time::sleep(Duration::from_secs(timeout_secs));
        tokio::pin!(deadline);

        let status = loop {
            tokio::select! {
                status = child.wait() => break Some(status?),
                _ = &mut deadline => break None,
                _ = sampler.tick() => {
                    if let Some(rss) = child_probe.as_mut().and_then(MemoryProbe::rss_bytes) {
                        child_peak_bytes = child_peak_bytes.max(rss);
                    }
                }
            }
        };
        let elapsed = start.elapsed();
        let timed_out = status.is_none();

        // Also reaps anything the script left running in its group.
        kill_process_group(pid);
        if timed_out {
            tracing::warn!(?pid, timeout_secs, "interpreter timed out, killed");
            if let Err(e) = child.kill().await {
                tracing::debug!(error = %e, "child already gone");
            }
        }

        let grace = Duration::from_millis(self.config.output_drain_grace_ms);
        drain_readers(pid, grace, &mut stdout_task, &mut stderr_task).await?;
        let stdout = take_capture(&stdout_sink);
        let stderr = take_capture(&stderr_sink);
        let parent_after = parent.as_mut().and_then(MemoryProbe::rss_bytes);
        let exit_code = status.and_then(|s| s.code());
        tracing::info!(
            ?pid,
            ?exit_code,
            elapsed_ms = elapsed.as_millis() as u64,
            "interpreter finished"
        );

        Ok(RawRun {
            stdout,
            stderr,
            exit_code,
            timed_out,
            elapsed,
            parent_delta_mb: delta_mb(parent_before, parent_after),
            child_peak_bytes,
        })
    }
}

fn shape_result(raw: RawRun, timeout_secs: u64) -> ExecutionResult {
    let error = if raw.timed_out {
        Some(format!("Execution timeout ({timeout_secs} seconds)"))
    } else if raw.stderr.text.is_empty() {
        None
    } else {
        Some(raw.stderr.text)
    };
    ExecutionResult {
        success: !raw.timed_out && raw.exit_code == Some(0),
        output: raw.stdout.text,
        error,
        execution_time: raw.elapsed.as_secs_f64(),
        memory_usage: raw.parent_delta_mb,
        child_peak_memory: (raw.child_peak_bytes > 0).then(|| bytes_to_mb(raw.child_peak_bytes)),
        exit_code: raw.exit_code,
        timed_out: raw.timed_out,
        output_truncated: raw.stdout.truncated || raw.stderr.truncated,
        test_results: None,
    }
}

/// Interpreter command with a minimal environment, null stdin, piped
/// output, and its own process group.
fn sandboxed_command(interpreter: &Path, script: &Path) -> Command {
    let path = std::env::var_os("PATH").unwrap_or_else(|| FALLBACK_PATH.into());
    let workdir: PathBuf = script
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(std::env::temp_dir);

    let mut std_cmd = std::process::Command::new(interpreter);
    std_cmd
        .arg(script)
        .current_dir(&workdir)
        .env_clear()
        .env("PATH", path)
        .env("HOME", &workdir)
        .env("LANG", "C.UTF-8")
        .env("PYTHONDONTWRITEBYTECODE", "1")
        .env("PYTHONUNBUFFERED", "1")
        .env("PYTHONIOENCODING", "utf-8")
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        std_cmd.process_group(0);
    }

    let mut cmd = Command::from(std_cmd);
    cmd.kill_on_drop(true);
    cmd
}

#[cfg(unix)]
fn kill_process_group(pid: Option<u32>) {
    let Some(pid) = pid else {
        return;
    };
    // SAFETY: killpg only sends a signal; the group id is the child's pid
    // because it was spawned with process_group(0).
    let rc = unsafe { libc::killpg(pid as libc::pid_t, libc::SIGKILL) };
    if rc != 0 {
        tracing::trace!(pid, "no process group left to kill");
    }
}

#[cfg(not(unix))]
fn kill_process_group(_pid: Option<u32>) {}

/// Read a stream to EOF into `sink`, keeping at most `limit` bytes. The
/// rest is drained so the child never blocks on a full pipe.
async fn read_capped<R>(reader: Option<R>, limit: usize, sink: CaptureSink) -> io::Result<()>
where
    R: AsyncRead + Unpin,
{
    let Some(mut reader) = reader else {
        return Ok(());
    };
    let mut chunk = vec![0u8; READ_CHUNK];
    loop {
        let n = reader.read(&mut chunk).await?;
        if n == 0 {
            return Ok(());
        }
        {
            let mut buf = lock_sink(&sink);
            let room = limit.saturating_sub(buf.bytes.len());
            if n > room {
                buf.truncated = true;
            }
            buf.bytes.extend_from_slice(&chunk[..n.min(room)]);
        }
    }
}

/// Wait up to `grace` for both readers to reach EOF, then abandon them.
///
/// EOF only arrives once every holder of the pipe's write end is gone. A
/// descendant that moved to its own session survives the group kill and can
/// keep the pipe open indefinitely.
async fn drain_readers(
    pid: Option<u32>,
    grace: Duration,
    stdout_task: &mut JoinHandle<io::Result<()>>,
    stderr_task: &mut JoinHandle<io::Result<()>>,
) -> Result<(), ExecError> {
    let drained = tokio::time::timeout(grace, async {
        let stdout = (&mut *stdout_task).await;
        let stderr = (&mut *stderr_task).await;
        (stdout, stderr)
    })
    .await;
    match drained {
        Ok((stdout, stderr)) => {
            reader_result(stdout)?;
            reader_result(stderr)
        }
        Err(_) => {
            tracing::warn!(
                ?pid,
                grace_ms = grace.as_millis() as u64,
                "output pipes still open after exit, abandoning readers"
            );
            stdout_task.abort();
            stderr_task.abort();
            Ok(())
        }
    }
}

fn reader_result(joined: Result<io::Result<()>, JoinError>) -> Result<(), ExecError> {
    match joined {
        Ok(read) => Ok(read?),
        Err(e) => Err(ExecError::Io(io::Error::other(e))),
    }
}

fn take_capture(sink: &CaptureSink) -> Captured {
    let buf = std::mem::take(&mut *lock_sink(sink));
    Captured {
        text: String::from_utf8_lossy(&buf.bytes).into_owned(),
        truncated: buf.truncated,
    }
}

fn lock_sink(sink: &CaptureSink) -> MutexGuard<'_, CaptureBuf> {
    sink.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
