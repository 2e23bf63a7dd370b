use crate::command::{ExecutableCommand, ExitCode, Signal};
use crate::error::ShellError;
use crate::interpreter::Interpreter;
use anyhow::Result;
use std::ffi::OsString;
use std::io::Write;
use std::process::{Command, ExitStatus};
use tracing::debug;

/// Status recorded when the program could not be started at all.
pub const NOT_LAUNCHED: ExitCode = 127;

/// Command that is not a builtin: a program started as a child process.
///
/// The program is looked up through `PATH` by the operating system and receives
/// its arguments verbatim. The child inherits the working directory and the
/// standard streams of the interpreter.
pub struct ExternalCommand {
    program: OsString,
    args: Vec<OsString>,
}

impl ExternalCommand {
    pub fn new(program: &str, args: &[&str]) -> Self {
        Self {
            program: program.into(),
            args: args.iter().map(OsString::from).collect(),
        }
    }

    /// Start the program and block until it exited or was killed.
    ///
    /// `Child::wait` does not report stopped children, so a suspended program is
    /// waited through until it really finishes.
    pub fn launch(&self) -> Result<ExitCode, ShellError> {
        let program = self.program.to_string_lossy().into_owned();
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .spawn()
            .map_err(|source| ShellError::Spawn {
                program: program.clone(),
                source,
            })?;
        debug!(program = %program, pid = child.id(), "spawned child");

        let exit_status = child
            .wait()
            .map_err(|source| ShellError::Wait { program, source })?;
        Ok(match exit_status.code() {
            Some(x) => x,
            None => terminated_by_signal(exit_status),
        })
    }
}

impl ExecutableCommand for ExternalCommand {
    fn execute(self: Box<Self>, shell: &mut Interpreter) -> Result<Signal> {
        // Output from the interpreter must not interleave with the child's.
        shell.stdout().flush()?;
        let code = match self.launch() {
            Ok(code) => code,
            Err(err @ ShellError::Spawn { .. }) => {
                shell.env_mut().last_status = Some(NOT_LAUNCHED);
                return Err(err.into());
            }
            Err(err) => return Err(err.into()),
        };
        debug!(program = ?self.program, code, "child finished");
        shell.env_mut().last_status = Some(code);
        Ok(Signal::Continue)
    }
}

#[cfg(unix)]
fn terminated_by_signal(exit_status: ExitStatus) -> ExitCode {
    use std::os::unix::process::ExitStatusExt;
    if let Some(signal) = ExitStatusExt::signal(&exit_status) {
        128 + signal
    } else if ExitStatusExt::core_dumped(&exit_status) {
        255
    } else {
        -1
    }
}

#[cfg(not(unix))]
fn terminated_by_signal(_exit_status: ExitStatus) -> ExitCode {
    -1
}
