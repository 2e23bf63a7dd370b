use crate::interpreter::Interpreter;
use anyhow::Result;

/// Conventional process exit code type used by this crate.
///
/// A value of 0 indicates success; any non-zero value indicates failure.
/// Only used to record how external programs finished.
pub type ExitCode = i32;

/// Outcome of running one command: whether the interactive loop keeps reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum Signal {
    /// Keep reading commands.
    Continue,
    /// Stop the interpreter.
    Terminate,
}

/// Object-safe trait for any command that can be executed by the shell.
///
/// This is implemented by built-ins via a blanket impl and by external commands.
/// Commands get the whole interpreter so that scripts can dispatch their own lines.
pub trait ExecutableCommand {
    /// Executes the command.
    ///
    /// Errors are reported by the dispatcher and never stop the interpreter.
    fn execute(self: Box<Self>, shell: &mut Interpreter) -> Result<Signal>;
}

/// Factory creating a command from the name it was invoked by and its arguments.
///
/// Registered once per builtin in the [`Registry`](crate::builtin::Registry).
pub trait CommandFactory {
    /// Canonical name of the command this factory builds.
    fn name(&self) -> &'static str;

    /// Other names the same command answers to.
    fn aliases(&self) -> &'static [&'static str];

    /// Create a command instance for the provided invocation name and arguments.
    fn create(&self, name: &str, args: &[&str]) -> Box<dyn ExecutableCommand>;
}
