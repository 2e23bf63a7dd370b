use crate::builtin::Registry;
use crate::command::{ExecutableCommand, Signal};
use crate::config::Settings;
use crate::env::{Environment, State};
use crate::error::ShellError;
use crate::external::ExternalCommand;
use crate::io_adapters::LineSource;
use crate::{batch, lexer};
use std::io::{self, Write};
use std::path::Path;
use tracing::debug;

/// Factory allows creating instances of ExecutableCommand.
///
/// Only supports builtins defined in this crate.
pub(crate) struct Factory<T> {
    _phantom: std::marker::PhantomData<T>,
}

impl<T> Default for Factory<T> {
    fn default() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

/// A minimal shell-like interpreter that runs builtins and external programs.
///
/// The interpreter owns an [`Environment`], the fixed builtin [`Registry`] and the
/// output/error streams its own messages go to. External programs always inherit the
/// process's standard streams.
///
/// Example
/// ```
/// use myshell::{Interpreter, Signal};
/// let mut sh = Interpreter::default();
/// assert_eq!(sh.dispatch(&["exit"]), Signal::Terminate);
/// ```
pub struct Interpreter {
    env: Environment,
    registry: Registry,
    settings: Settings,
    stdout: Box<dyn Write>,
    stderr: Box<dyn Write>,
}

impl Interpreter {
    /// Create a new interpreter writing to the process's stdout and stderr.
    pub fn new(registry: Registry, settings: Settings) -> Self {
        Self {
            env: Environment::new(),
            registry,
            settings,
            stdout: Box::new(io::stdout()),
            stderr: Box::new(io::stderr()),
        }
    }

    /// Redirect the interpreter's own output and error messages.
    pub fn with_output(
        mut self,
        stdout: impl Write + 'static,
        stderr: impl Write + 'static,
    ) -> Self {
        self.stdout = Box::new(stdout);
        self.stderr = Box::new(stderr);
        self
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    pub fn env_mut(&mut self) -> &mut Environment {
        &mut self.env
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn stdout(&mut self) -> &mut dyn Write {
        self.stdout.as_mut()
    }

    pub fn stderr(&mut self) -> &mut dyn Write {
        self.stderr.as_mut()
    }

    /// Route one argument vector to a builtin or to an external program.
    ///
    /// An empty vector does nothing. Failures are reported on the error stream and
    /// turned into [`Signal::Continue`], so only `exit` can stop the interpreter.
    pub fn dispatch<S: AsRef<str>>(&mut self, args: &[S]) -> Signal {
        let Some((name, rest)) = args.split_first() else {
            return Signal::Continue;
        };
        let name: &str = name.as_ref();
        let rest: Vec<&str> = rest.iter().map(|arg| arg.as_ref()).collect();

        let command: Box<dyn ExecutableCommand> = match self.registry.lookup(name) {
            Some(factory) => {
                debug!(command = name, builtin = factory.name(), "dispatching builtin");
                factory.create(name, &rest)
            }
            None => {
                debug!(command = name, "dispatching external program");
                Box::new(ExternalCommand::new(name, &rest))
            }
        };

        match command.execute(self) {
            Ok(signal) => signal,
            Err(err) => {
                self.report(&err);
                Signal::Continue
            }
        }
    }

    /// Split a raw line into arguments and dispatch them.
    pub fn execute_line(&mut self, line: &str) -> Signal {
        let args = lexer::split_into_tokens(line);
        self.dispatch(&args)
    }

    /// Run every line of the script at `path`, see [`ScriptExitPolicy`](crate::ScriptExitPolicy)
    /// for what an `exit` inside it does.
    pub fn run_script(&mut self, path: &Path) -> Result<Signal, ShellError> {
        batch::run_script(self, path)
    }

    /// Prompt shown before every line: the absolute working directory and ` ? `.
    pub fn prompt(&self) -> String {
        format!("{} ? ", self.env.prompt_dir().display())
    }

    /// Read-Eval-Print Loop: read lines from `source` until `exit` or end of input.
    pub fn repl(&mut self, source: &mut dyn LineSource) -> anyhow::Result<()> {
        self.env.state = State::Running;
        while self.env.state == State::Running {
            let prompt = self.prompt();
            let Some(line) = source.read_line(&prompt)? else {
                debug!("end of input");
                self.env.state = State::Stopped;
                break;
            };
            if self.execute_line(&line) == Signal::Terminate {
                self.env.state = State::Stopped;
            }
        }
        Ok(())
    }

    fn report(&mut self, err: &anyhow::Error) {
        debug!(error = %err, "command failed");
        // Nowhere left to report a failing error stream to.
        let _ = writeln!(self.stderr, "shell: {err}");
        let _ = self.stderr.flush();
    }
}

impl Default for Interpreter {
    /// Create an interpreter with the default builtins (`cd`, `exit`, `multi`/`xscript`)
    /// and default settings.
    fn default() -> Self {
        Self::new(Registry::with_builtins(), Settings::default())
    }
}
