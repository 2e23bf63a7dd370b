use anyhow::{Context, Result};
use argh::FromArgs;
use myshell::{BufReadSource, Editor, Interpreter, Registry, ScriptExitPolicy, Settings, Signal};
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use tracing::{Level, debug};

#[derive(FromArgs)]
/// A small line-oriented command interpreter.
struct Options {
    #[argh(switch, short = 'v')]
    /// log dispatch decisions to stderr.
    verbose: bool,

    #[argh(option, default = "ScriptExitPolicy::Ignore")]
    /// what `exit` inside a script stops: ignore, script or shell. Defaults to ignore.
    script_exit: ScriptExitPolicy,

    #[argh(option, default = "Settings::DEFAULT_MAX_SCRIPT_DEPTH")]
    /// how deep scripts may run other scripts.
    max_script_depth: usize,

    #[argh(switch)]
    /// do not print the welcome banner.
    no_banner: bool,

    #[argh(positional)]
    /// run this script and exit instead of reading commands.
    script: Option<PathBuf>,
}

fn main() -> Result<()> {
    let opts: Options = argh::from_env();

    let level = if opts.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();

    let settings = Settings {
        script_exit: opts.script_exit,
        max_script_depth: opts.max_script_depth,
    };
    let mut sh = Interpreter::new(Registry::with_builtins(), settings);

    if let Some(script) = opts.script {
        let signal = sh
            .run_script(&script)
            .with_context(|| format!("failed to run {}", script.display()))?;
        // Script mode exits after the script either way.
        match signal {
            Signal::Continue => debug!("script finished"),
            Signal::Terminate => debug!("script requested exit"),
        }
        return Ok(());
    }

    if !opts.no_banner {
        println!("      - Welcome to myShell -");
    }

    if io::stdin().is_terminal() {
        debug!("reading commands from the terminal");
        let mut editor = Editor::new().context("failed to initialise the line editor")?;
        sh.repl(&mut editor)?;
    } else {
        debug!("reading commands from standard input");
        let mut source = BufReadSource::new(io::stdin().lock(), io::stdout());
        sh.repl(&mut source)?;
    }
    Ok(())
}
