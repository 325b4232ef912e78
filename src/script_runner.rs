//! scriptRunner - runs helper scripts for completion generators
//! - run_script: spawn with timeout, never errors
//! - capture_stdout: stdout of a successful run, empty text otherwise

use std::process::Stdio;
use tokio::process::Command;
use tokio::time::{timeout, Duration};
use tracing::debug;

/// Default time budget for a helper script while the user is typing
pub const DEFAULT_TIMEOUT_MS: u64 = 500;

#[derive(Debug, Clone)]
pub struct RunScriptOpts {
    pub timeout_ms: u64,
}

impl Default for RunScriptOpts {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl RunScriptOpts {
    pub fn with_timeout_ms(timeout_ms: u64) -> Self {
        Self { timeout_ms }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RunScriptResult {
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    pub error: Option<String>,
    pub timed_out: bool,
}

impl RunScriptResult {
    fn failed(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::default()
        }
    }

    /// Whether the process ran to completion with exit status 0
    pub fn success(&self) -> bool {
        self.error.is_none() && !self.timed_out && self.code == Some(0)
    }
}

/// Kills the script's process group when dropped, unless disarmed.
///
/// `kill_on_drop` only reaches the direct child; processes the script
/// started itself share its group and go with it.
struct ProcessGroupGuard {
    pgid: Option<i32>,
}

impl ProcessGroupGuard {
    fn new(pid: Option<u32>) -> Self {
        Self {
            pgid: pid.and_then(|pid| i32::try_from(pid).ok()),
        }
    }

    fn disarm(&mut self) {
        self.pgid = None;
    }
}

impl Drop for ProcessGroupGuard {
    fn drop(&mut self) {
        #[cfg(unix)]
        if let Some(pgid) = self.pgid.take() {
            debug!(pgid, "killing helper script process group");
            // SAFETY: plain syscall; a negative pid addresses the group
            // created for this child by `process_group(0)`.
            unsafe {
                libc::kill(-pgid, libc::SIGKILL);
            }
        }
    }
}

/// Run `argv[0]` with the remaining elements as arguments.
///
/// Failures are reported inside the result: an empty argv, a spawn
/// error or an exceeded timeout never produce an `Err`. On timeout, or
/// when the future is dropped, the script and everything it spawned
/// are killed.
pub async fn run_script(argv: &[String], opts: &RunScriptOpts) -> RunScriptResult {
    let Some((program, args)) = argv.split_first() else {
        return RunScriptResult::failed("empty command");
    };

    let mut cmd = Command::new(program);
    cmd.args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    #[cfg(unix)]
    cmd.process_group(0);

    let child = match cmd.spawn() {
        Ok(child) => child,
        Err(e) => return RunScriptResult::failed(e.to_string()),
    };
    let mut group = ProcessGroupGuard::new(child.id());

    let budget = Duration::from_millis(opts.timeout_ms);
    match timeout(budget, child.wait_with_output()).await {
        Ok(Ok(output)) => {
            group.disarm();
            RunScriptResult {
                code: output.status.code(),
                stdout: String::from_utf8_lossy(&output.stdout).to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).to_string(),
                error: None,
                timed_out: false,
            }
        }
        Ok(Err(e)) => RunScriptResult::failed(e.to_string()),
        Err(_) => RunScriptResult {
            error: Some("Timeout exceeded".to_string()),
            timed_out: true,
            ..RunScriptResult::default()
        },
    }
}

/// Stdout of `argv`, or empty text if it could not run or did not succeed
pub async fn capture_stdout(argv: &[String], opts: &RunScriptOpts) -> String {
    let result = run_script(argv, opts).await;
    if result.success() {
        return result.stdout;
    }

    debug!(
        command = ?argv,
        code = ?result.code,
        error = ?result.error,
        timed_out = result.timed_out,
        stderr = %result.stderr.trim(),
        "helper script failed, no suggestions"
    );
    String::new()
}
