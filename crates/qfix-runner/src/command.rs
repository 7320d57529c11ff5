//! Bounded external command execution.
//!
//! Output is captured to temp files rather than pipes so the poll-and-kill
//! timeout loop cannot deadlock on a full pipe buffer.

use std::path::Path;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use anyhow::{anyhow, bail, Context, Result};

const POLL_INTERVAL: Duration = Duration::from_millis(100);
const MAX_ERROR_BYTES: usize = 500;

#[derive(Clone, Debug)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Run `cmd` (shell-split, not shell-interpreted) in `root` with a hard
/// timeout. Timeout and non-zero exit are both errors; the caller treats
/// them as a per-finding failure, never a hang.
pub fn run_command(root: &Path, cmd: &str, timeout: Duration) -> Result<CommandOutput> {
    let argv = shell_words::split(cmd).with_context(|| format!("split command `{cmd}`"))?;
    let (program, args) = argv
        .split_first()
        .ok_or_else(|| anyhow!("empty command"))?;

    let stdout_capture = tempfile::NamedTempFile::new().context("create stdout capture")?;
    let stderr_capture = tempfile::NamedTempFile::new().context("create stderr capture")?;

    let mut child = Command::new(program)
        .args(args)
        .current_dir(root)
        .stdin(Stdio::null())
        .stdout(Stdio::from(stdout_capture.reopen()?))
        .stderr(Stdio::from(stderr_capture.reopen()?))
        .spawn()
        .with_context(|| format!("spawn `{program}`"))?;

    let started = Instant::now();
    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) => {
                if started.elapsed() > timeout {
                    let _ = child.kill();
                    let _ = child.wait();
                    bail!("command `{program}` timed out after {}s", timeout.as_secs());
                }
                std::thread::sleep(POLL_INTERVAL);
            }
            Err(e) => return Err(e).with_context(|| format!("wait for `{program}`")),
        }
    };

    let stdout = std::fs::read_to_string(stdout_capture.path()).unwrap_or_default();
    let stderr = std::fs::read_to_string(stderr_capture.path()).unwrap_or_default();

    if !status.success() {
        bail!(
            "command `{program}` failed ({status}): {}",
            truncate(&stderr, MAX_ERROR_BYTES)
        );
    }

    Ok(CommandOutput { stdout, stderr })
}

fn truncate(text: &str, max: usize) -> &str {
    if text.len() <= max {
        return text;
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}
