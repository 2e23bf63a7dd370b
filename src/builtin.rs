use crate::command::{CommandFactory, ExecutableCommand, Signal};
use crate::error::ShellError;
use crate::interpreter::{Factory, Interpreter};
use anyhow::Result;
use argh::{EarlyExit, FromArgs};
use std::collections::HashMap;
use std::env;
use std::io::Write;
use std::iter;
use std::path::Path;
use std::rc::Rc;
use tracing::debug;

/// Built-in commands known to the shell at compile time.
///
/// Builtins are described with the [`argh`] crate (`FromArgs`) and executed directly
/// in-process without spawning a child process. Builtins taking paths override
/// [`BuiltinCommand::parse`] so their arguments are never read as flags.
pub(crate) trait BuiltinCommand: Sized + FromArgs {
    /// Canonical name of the command, e.g. "cd" or "exit".
    fn name() -> &'static str;

    /// Further names the command is registered under.
    fn aliases() -> &'static [&'static str] {
        &[]
    }

    /// Turn the invocation into a command. Parses flags with `argh` by default.
    fn parse(name: &str, args: &[&str]) -> std::result::Result<Self, EarlyExit> {
        Self::from_args(&[name], args)
    }

    /// Signal returned when the arguments could not be parsed or `--help` was asked.
    fn signal_on_early_exit() -> Signal {
        Signal::Continue
    }

    /// Executes the command against the interpreter state.
    fn execute(self, shell: &mut Interpreter) -> Result<Signal>;
}

impl<T: BuiltinCommand> ExecutableCommand for T {
    fn execute(self: Box<Self>, shell: &mut Interpreter) -> Result<Signal> {
        <T as BuiltinCommand>::execute(*self, shell)
    }
}

/// Help text or an argument error produced by `argh` instead of a parsed command.
struct InvalidArgs {
    output: String,
    is_error: bool,
    signal: Signal,
}

impl ExecutableCommand for InvalidArgs {
    fn execute(self: Box<Self>, shell: &mut Interpreter) -> Result<Signal> {
        let output = self.output.trim_end();
        if self.is_error {
            writeln!(shell.stderr(), "shell: {output}")?;
        } else {
            writeln!(shell.stdout(), "{output}")?;
        }
        Ok(self.signal)
    }
}

impl<T: BuiltinCommand + 'static> CommandFactory for Factory<T> {
    fn name(&self) -> &'static str {
        T::name()
    }

    fn aliases(&self) -> &'static [&'static str] {
        T::aliases()
    }

    fn create(&self, name: &str, args: &[&str]) -> Box<dyn ExecutableCommand> {
        match T::parse(name, args) {
            Ok(cmd) => Box::new(cmd),
            Err(EarlyExit { output, status }) => Box::new(InvalidArgs {
                output,
                is_error: status.is_err(),
                signal: T::signal_on_early_exit(),
            }),
        }
    }
}

/// Arguments taken as they are, so that `-d` is a path and not a flag.
///
/// Only a lone `--help` is still handed to `argh` for the usage text.
fn verbatim_args<T: FromArgs>(
    name: &str,
    args: &[&str],
) -> std::result::Result<Vec<String>, EarlyExit> {
    match args {
        ["--help"] => T::from_args(&[name], args).map(|_| Vec::new()),
        _ => Ok(args.iter().map(|arg| arg.to_string()).collect()),
    }
}

/// Fixed table of builtins, keyed by every name they answer to.
///
/// Built once when the interpreter is created and never changed afterwards.
pub struct Registry {
    builtins: HashMap<&'static str, Rc<dyn CommandFactory>>,
}

impl Registry {
    /// Registry holding `cd`, `exit` and the script runner (`multi`, alias `xscript`).
    pub fn with_builtins() -> Self {
        let mut registry = Self {
            builtins: HashMap::new(),
        };
        registry.register::<Cd>();
        registry.register::<Exit>();
        registry.register::<Script>();
        registry
    }

    fn register<T: BuiltinCommand + 'static>(&mut self) {
        let factory: Rc<dyn CommandFactory> = Rc::new(Factory::<T>::default());
        for name in iter::once(factory.name()).chain(factory.aliases().iter().copied()) {
            self.builtins.insert(name, Rc::clone(&factory));
        }
    }

    /// Exact, case-sensitive lookup of a builtin by name.
    pub fn lookup(&self, name: &str) -> Option<&dyn CommandFactory> {
        self.builtins.get(name).map(|factory| factory.as_ref())
    }

    /// All names that resolve to a builtin, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.builtins.keys().copied()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

#[derive(FromArgs)]
/// Change the current working directory.
pub struct Cd {
    #[argh(positional, greedy)]
    /// directory to switch to, absolute or relative to the current directory. Further arguments are ignored.
    pub args: Vec<String>,
}

impl BuiltinCommand for Cd {
    fn name() -> &'static str {
        "cd"
    }

    fn parse(name: &str, args: &[&str]) -> std::result::Result<Self, EarlyExit> {
        verbatim_args::<Self>(name, args).map(|args| Self { args })
    }

    fn execute(self, shell: &mut Interpreter) -> Result<Signal> {
        let Some(target) = self.args.first() else {
            return Err(ShellError::MissingArgument { command: "cd" }.into());
        };

        env::set_current_dir(target).map_err(|source| ShellError::ChangeDir {
            path: target.into(),
            source,
        })?;
        shell.env_mut().refresh_current_dir();
        debug!(dir = %shell.env().current_dir.display(), "changed directory");
        Ok(Signal::Continue)
    }
}

#[derive(FromArgs)]
/// Exit the shell.
pub struct Exit {
    #[argh(positional, greedy)]
    /// ignored.
    pub args: Vec<String>,
}

impl BuiltinCommand for Exit {
    fn name() -> &'static str {
        "exit"
    }

    fn signal_on_early_exit() -> Signal {
        Signal::Terminate
    }

    fn execute(self, _shell: &mut Interpreter) -> Result<Signal> {
        Ok(Signal::Terminate)
    }
}

#[derive(FromArgs)]
/// Run every line of a script file as a command, in file order.
pub struct Script {
    #[argh(positional, greedy)]
    /// path of the script file. Further arguments are ignored.
    pub args: Vec<String>,
}

impl BuiltinCommand for Script {
    fn name() -> &'static str {
        "multi"
    }

    fn aliases() -> &'static [&'static str] {
        &["xscript"]
    }

    fn parse(name: &str, args: &[&str]) -> std::result::Result<Self, EarlyExit> {
        verbatim_args::<Self>(name, args).map(|args| Self { args })
    }

    fn execute(self, shell: &mut Interpreter) -> Result<Signal> {
        let Some(path) = self.args.first() else {
            return Err(ShellError::MissingArgument { command: "multi" }.into());
        };
        Ok(shell.run_script(Path::new(path))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::test_support::{captured_shell, lock_current_dir, make_unique_temp_dir};
    use std::env as stdenv;
    use std::fs;

    #[test]
    fn test_registry_lookup_is_exact() {
        let registry = Registry::with_builtins();

        assert!(registry.lookup("cd").is_some());
        assert!(registry.lookup("exit").is_some());
        assert!(registry.lookup("CD").is_none());
        assert!(registry.lookup("cd ").is_none());
        assert!(registry.lookup("ls").is_none());
    }

    #[test]
    fn test_multi_and_xscript_are_one_builtin() {
        let registry = Registry::with_builtins();

        let multi = registry.lookup("multi").expect("multi registered");
        let xscript = registry.lookup("xscript").expect("xscript registered");
        assert_eq!(multi.name(), "multi");
        assert_eq!(xscript.name(), "multi");

        let mut names: Vec<_> = registry.names().collect();
        names.sort();
        assert_eq!(names, vec!["cd", "exit", "multi", "xscript"]);
    }

    #[test]
    fn test_exit_terminates() {
        let (mut sh, captured) = captured_shell(Settings::default());

        assert_eq!(sh.dispatch(&["exit"]), Signal::Terminate);
        assert_eq!(sh.dispatch(&["exit", "extra"]), Signal::Terminate);
        assert_eq!(sh.dispatch(&["exit", "1", "2", "3"]), Signal::Terminate);
        assert_eq!(captured.stderr(), "");
    }

    #[test]
    fn test_exit_terminates_even_on_bad_flags() {
        let (mut sh, captured) = captured_shell(Settings::default());

        assert_eq!(sh.dispatch(&["exit", "--bogus"]), Signal::Terminate);
        assert!(!captured.stderr().is_empty());
    }

    #[test]
    fn test_cd_without_argument_reports_usage() {
        let _lock = lock_current_dir();
        let before = stdenv::current_dir().unwrap();
        let (mut sh, captured) = captured_shell(Settings::default());

        assert_eq!(sh.dispatch(&["cd"]), Signal::Continue);

        assert_eq!(stdenv::current_dir().unwrap(), before);
        assert_eq!(captured.stderr(), "shell: expected argument to \"cd\"\n");
    }

    #[test]
    fn test_cd_nonexistent_path_reports_os_error() {
        let _lock = lock_current_dir();
        let before = stdenv::current_dir().unwrap();
        let (mut sh, captured) = captured_shell(Settings::default());

        assert_eq!(
            sh.dispatch(&["cd", "/nonexistent-path-xyz"]),
            Signal::Continue
        );

        assert_eq!(stdenv::current_dir().unwrap(), before);
        assert_eq!(sh.env().current_dir, before);
        let err = captured.stderr();
        assert!(err.starts_with("shell: cd: /nonexistent-path-xyz: "), "{err}");
        assert!(err.contains("No such file or directory"), "{err}");
    }

    #[test]
    fn test_cd_to_absolute_path() {
        let _lock = lock_current_dir();
        let temp = make_unique_temp_dir("cd_abs").expect("failed to create temp dir");
        let canonical_temp = fs::canonicalize(&temp).expect("canonicalize failed");
        let orig = stdenv::current_dir().unwrap();
        let (mut sh, captured) = captured_shell(Settings::default());

        let target = canonical_temp.to_string_lossy().to_string();
        assert_eq!(sh.dispatch(&["cd", target.as_str()]), Signal::Continue);

        let new_cwd = fs::canonicalize(stdenv::current_dir().unwrap()).unwrap();
        assert_eq!(new_cwd, canonical_temp);
        assert_eq!(fs::canonicalize(&sh.env().current_dir).unwrap(), canonical_temp);
        assert_eq!(captured.stderr(), "");

        stdenv::set_current_dir(orig).expect("failed to restore cwd");
        let _ = fs::remove_dir_all(&temp);
    }

    #[test]
    fn test_cd_relative_path_ignores_extra_arguments() {
        let _lock = lock_current_dir();
        let temp = make_unique_temp_dir("cd_rel").expect("failed to create temp dir");
        fs::create_dir_all(temp.join("inner")).unwrap();
        let orig = stdenv::current_dir().unwrap();
        stdenv::set_current_dir(&temp).unwrap();
        let (mut sh, captured) = captured_shell(Settings::default());

        assert_eq!(sh.dispatch(&["cd", "inner", "ignored"]), Signal::Continue);

        let new_cwd = fs::canonicalize(stdenv::current_dir().unwrap()).unwrap();
        assert_eq!(new_cwd, fs::canonicalize(temp.join("inner")).unwrap());
        assert_eq!(captured.stderr(), "");

        stdenv::set_current_dir(orig).expect("failed to restore cwd");
        let _ = fs::remove_dir_all(&temp);
    }

    #[test]
    fn test_help_is_printed_to_stdout() {
        let _lock = lock_current_dir();
        let before = stdenv::current_dir().unwrap();
        let (mut sh, captured) = captured_shell(Settings::default());

        assert_eq!(sh.dispatch(&["cd", "--help"]), Signal::Continue);

        assert!(captured.stdout().contains("Usage: cd"), "{}", captured.stdout());
        assert_eq!(captured.stderr(), "");
        assert_eq!(stdenv::current_dir().unwrap(), before);
    }

    #[test]
    fn test_dash_argument_is_a_path_not_a_flag() {
        let _lock = lock_current_dir();
        let before = stdenv::current_dir().unwrap();
        let (mut sh, captured) = captured_shell(Settings::default());

        assert_eq!(sh.dispatch(&["cd", "--bogus"]), Signal::Continue);

        let err = captured.stderr();
        assert!(err.starts_with("shell: cd: --bogus: "), "{err}");
        assert_eq!(captured.stdout(), "");
        assert_eq!(stdenv::current_dir().unwrap(), before);
    }

    #[test]
    fn test_cd_into_dash_leading_directory() {
        let _lock = lock_current_dir();
        let temp = make_unique_temp_dir("cd_dash").expect("failed to create temp dir");
        fs::create_dir_all(temp.join("-d")).unwrap();
        let orig = stdenv::current_dir().unwrap();
        stdenv::set_current_dir(&temp).unwrap();
        let (mut sh, captured) = captured_shell(Settings::default());

        assert_eq!(sh.dispatch(&["cd", "-d"]), Signal::Continue);

        let new_cwd = fs::canonicalize(stdenv::current_dir().unwrap()).unwrap();
        assert_eq!(new_cwd, fs::canonicalize(temp.join("-d")).unwrap());
        assert_eq!(captured.stderr(), "");

        stdenv::set_current_dir(orig).expect("failed to restore cwd");
        let _ = fs::remove_dir_all(&temp);
    }

    #[test]
    fn test_script_path_may_start_with_dash() {
        let _lock = lock_current_dir();
        let temp = make_unique_temp_dir("script_dash").expect("failed to create temp dir");
        fs::write(temp.join("-script.txt"), "cd /nonexistent-path-xyz\n").unwrap();
        let orig = stdenv::current_dir().unwrap();
        stdenv::set_current_dir(&temp).unwrap();
        let (mut sh, captured) = captured_shell(Settings::default());

        assert_eq!(sh.dispatch(&["multi", "-script.txt"]), Signal::Continue);

        stdenv::set_current_dir(orig).expect("failed to restore cwd");
        let err = captured.stderr();
        assert!(err.starts_with("shell: cd: /nonexistent-path-xyz: "), "{err}");
        let _ = fs::remove_dir_all(&temp);
    }

    #[test]
    fn test_script_without_path_reports_usage() {
        let (mut sh, captured) = captured_shell(Settings::default());

        assert_eq!(sh.dispatch(&["multi"]), Signal::Continue);
        assert_eq!(sh.dispatch(&["xscript"]), Signal::Continue);

        assert_eq!(
            captured.stderr(),
            "shell: expected argument to \"multi\"\nshell: expected argument to \"multi\"\n"
        );
    }
}
