use super::command::LauncherCommand;
use std::process::Command;

/// Exit status and captured streams of a finished launcher process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    pub success: bool,
    /// `None` when the process was ended by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            success: true,
            code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    pub fn failed(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            success: false,
            code: Some(code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }
}

/// Seam between the client and the operating system.
///
/// Implementations run the command synchronously and report how it ended;
/// turning a failed exit into an error is the caller's job.
pub trait CommandRunner {
    fn run(&self, command: &LauncherCommand) -> std::io::Result<ProcessOutput>;
}

/// Runs the launcher as a child process and waits for it.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, command: &LauncherCommand) -> std::io::Result<ProcessOutput> {
        let output = to_process(command).output()?;
        Ok(ProcessOutput {
            success: output.status.success(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// One argv element per token. The command is a single argument even when it
/// is empty or contains spaces, so Windows quotes it like any other.
fn to_process(command: &LauncherCommand) -> Command {
    let mut process = Command::new(&command.program);
    process.args(&command.options);
    process.arg(&command.command);
    process
}
