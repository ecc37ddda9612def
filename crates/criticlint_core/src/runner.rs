//! Perl::Critic process execution.

use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tracing::{debug, warn};

use crate::CriticError;
use crate::command::CriticInvocation;
use crate::violation::ViolationRecord;

/// Everything collected from one run of the tool.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CriticOutput {
    /// Valid records, in output order.
    pub violations: Vec<ViolationRecord>,
    /// Non-blank stdout lines that were not valid records.
    pub discarded_lines: usize,
    /// Exit code, for logging only.
    pub exit_code: Option<i32>,
}

/// Runs `invocation` to completion.
///
/// Stdout is parsed line by line as it arrives and stderr is only logged.
/// The exit code never turns into an error; only failing to start the
/// process does.
pub async fn run(invocation: &CriticInvocation) -> Result<CriticOutput, CriticError> {
    let program = resolve_program(invocation)?;
    let mut command = build_command(invocation, &program);

    debug!("Running {}", invocation.shell_line());
    let mut child = command
        .spawn()
        .map_err(|e| CriticError::spawn(invocation.program(), e))?;

    let stdout = child.stdout.take();
    let stderr = child.stderr.take();
    let (collected, ()) = tokio::join!(
        async move {
            match stdout {
                Some(stdout) => collect_violations(stdout).await,
                None => Ok(CriticOutput::default()),
            }
        },
        async move {
            if let Some(stderr) = stderr {
                log_stderr(stderr).await;
            }
        }
    );

    let mut output = collected?;
    let status = child.wait().await?;
    output.exit_code = status.code();

    debug!(
        "{} exited with {:?}: {} violation(s), {} discarded line(s)",
        invocation.program(),
        output.exit_code,
        output.violations.len(),
        output.discarded_lines
    );

    Ok(output)
}

/// Reads `reader` to end of stream, parsing each line as a record.
pub async fn collect_violations<R: AsyncRead + Unpin>(reader: R) -> io::Result<CriticOutput> {
    let mut reader = BufReader::new(reader);
    let mut output = CriticOutput::default();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }

        let line = String::from_utf8_lossy(&buf);
        let line = line.trim_end_matches(['\n', '\r']);
        match ViolationRecord::parse_line(line) {
            Some(record) => output.violations.push(record),
            None if line.trim().is_empty() => {}
            None => {
                debug!("Discarding unparseable line: {}", line);
                output.discarded_lines += 1;
            }
        }
    }

    Ok(output)
}

async fn log_stderr<R: AsyncRead + Unpin>(reader: R) {
    let mut lines = BufReader::new(reader).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) if line.trim().is_empty() => {}
            Ok(Some(line)) => warn!("perlcritic stderr: {}", line),
            Ok(None) => break,
            Err(e) => {
                debug!("Stopped reading stderr: {}", e);
                break;
            }
        }
    }
}

/// Locates the program before spawning so a missing binary is reported
/// as a spawn failure even when the command runs through a shell.
fn resolve_program(invocation: &CriticInvocation) -> Result<PathBuf, CriticError> {
    let cwd = match invocation.working_dir() {
        Some(dir) => dir.to_path_buf(),
        None => std::env::current_dir()?,
    };

    which::which_in(invocation.program(), std::env::var_os("PATH"), &cwd).map_err(|e| {
        CriticError::spawn(
            invocation.program(),
            io::Error::new(io::ErrorKind::NotFound, e),
        )
    })
}

#[cfg(unix)]
fn build_command(invocation: &CriticInvocation, program: &Path) -> Command {
    let program = program.to_string_lossy();
    let line = shell_words::join(
        std::iter::once(program.as_ref()).chain(invocation.args().iter().map(String::as_str)),
    );

    let mut command = Command::new("sh");
    command.arg("-c").arg(line);
    configure(&mut command, invocation);
    command
}

// cmd.exe does not understand POSIX quoting, so Windows gets a direct spawn.
#[cfg(not(unix))]
fn build_command(invocation: &CriticInvocation, program: &Path) -> Command {
    let mut command = Command::new(program);
    command.args(invocation.args());
    configure(&mut command, invocation);
    command
}

fn configure(command: &mut Command, invocation: &CriticInvocation) {
    if let Some(dir) = invocation.working_dir() {
        command.current_dir(dir);
    }
    command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
}
