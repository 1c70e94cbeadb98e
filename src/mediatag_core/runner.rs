use crate::mediatag_core::error::{Result, TaggerError};
use std::io::{self, Read};
use std::process::{Child, Command, Stdio};

/// What happens to a spawned tool's standard output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Share the terminal with the tool.
    Inherit,
    /// Discard stdout and stderr.
    Suppress,
    /// Collect stdout as text, discard stderr.
    Capture,
}

/// A spawned external process plus the argument vector used to launch it.
#[derive(Debug)]
pub struct ProcessHandle {
    child: Child,
    args: Vec<String>,
    stdout: String,
}

impl ProcessHandle {
    /// The command as it is reported in diagnostics.
    pub fn command(&self) -> String {
        self.args.join(" ")
    }

    pub fn pid(&self) -> u32 {
        self.child.id()
    }
}

/// Outcome of a supervised process that exited cleanly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessResult {
    pub exit_code: i32,
    pub stdout: String,
}

/// Split a command line into an argument vector using shell-word rules.
pub fn split_command_line(command_line: &str) -> Result<Vec<String>> {
    let args = shlex::split(command_line)
        .ok_or_else(|| TaggerError::InvalidCommandLine(command_line.to_string()))?;
    if args.is_empty() {
        return Err(TaggerError::InvalidCommandLine("empty command".to_string()));
    }
    Ok(args)
}

/// Quote each argument so the resulting line splits back into the same vector.
pub fn join_command_line<'a, I>(args: I) -> Result<String>
where
    I: IntoIterator<Item = &'a str>,
{
    shlex::try_join(args).map_err(|e| TaggerError::InvalidCommandLine(e.to_string()))
}

/// Launches and supervises one external process at a time.
#[derive(Debug, Default, Clone, Copy)]
pub struct ToolRunner;

impl ToolRunner {
    pub fn new() -> Self {
        ToolRunner
    }

    /// Spawn the command. The program is resolved on `PATH`.
    pub fn spawn(&self, command_line: &str, mode: OutputMode) -> Result<ProcessHandle> {
        let args = split_command_line(command_line)?;
        let mut cmd = Command::new(&args[0]);
        cmd.args(&args[1..]).stdin(Stdio::null());

        match mode {
            OutputMode::Inherit => {}
            OutputMode::Suppress => {
                cmd.stdout(Stdio::null()).stderr(Stdio::null());
            }
            OutputMode::Capture => {
                cmd.stdout(Stdio::piped()).stderr(Stdio::null());
            }
        }

        log::debug!("Spawning {}", args.join(" "));
        let child = cmd.spawn().map_err(|e| match e.kind() {
            io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied => {
                TaggerError::ToolNotFound(args[0].clone())
            }
            _ => TaggerError::Io(e),
        })?;

        Ok(ProcessHandle {
            child,
            args,
            stdout: String::new(),
        })
    }

    /// Block until the process exits, draining captured output first.
    pub fn wait(&self, handle: &mut ProcessHandle) -> Result<()> {
        if let Some(mut out) = handle.child.stdout.take() {
            out.read_to_string(&mut handle.stdout)?;
        }
        handle.child.wait()?;
        Ok(())
    }

    /// Enforce the exit-code contract. A process that is still running is
    /// killed and reported as a failure.
    pub fn check(&self, handle: &mut ProcessHandle) -> Result<ProcessResult> {
        let status = match handle.child.try_wait()? {
            Some(status) => status,
            None => {
                log::error!(
                    "Killing the process command: {} with PID {}",
                    handle.command(),
                    handle.pid()
                );
                match handle.child.kill() {
                    Err(e) if e.kind() != io::ErrorKind::InvalidInput => return Err(e.into()),
                    _ => {}
                }
                handle.child.wait()?
            }
        };

        // Terminated by a signal: no exit code.
        let exit_code = status.code().unwrap_or(-1);
        if exit_code != 0 {
            log::error!(
                "Process with command: {} ended with return code {}",
                handle.command(),
                exit_code
            );
            return Err(TaggerError::ExternalTool {
                command: handle.command(),
                exit_code,
            });
        }

        Ok(ProcessResult {
            exit_code,
            stdout: std::mem::take(&mut handle.stdout),
        })
    }

    /// Spawn, wait and check in one go.
    pub fn run(&self, command_line: &str, mode: OutputMode) -> Result<ProcessResult> {
        let mut handle = self.spawn(command_line, mode)?;
        self.wait(&mut handle)?;
        self.check(&mut handle)
    }

    /// Check if a program can be launched and exits cleanly with `probe_arg`.
    pub fn available(&self, program: &str, probe_arg: &str) -> bool {
        Command::new(program)
            .arg(probe_arg)
            .stdin(Stdio::null())
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }
}
