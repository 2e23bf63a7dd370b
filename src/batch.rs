//! Script mode: running every line of a file through the dispatcher.

use crate::command::Signal;
use crate::config::ScriptExitPolicy;
use crate::error::ShellError;
use crate::interpreter::Interpreter;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Read the script at `path` and dispatch each of its lines in order.
///
/// The whole file is read up front; if that fails nothing runs. A line asking to
/// terminate is handled according to [`ScriptExitPolicy`]. The returned signal is
/// `Terminate` only under [`ScriptExitPolicy::StopShell`].
pub(crate) fn run_script(shell: &mut Interpreter, path: &Path) -> Result<Signal, ShellError> {
    let limit = shell.settings().max_script_depth;
    if shell.env().script_depth >= limit {
        return Err(ShellError::ScriptTooDeep {
            path: path.to_owned(),
            limit,
        });
    }

    let content = fs::read_to_string(path).map_err(|source| ShellError::ScriptRead {
        path: path.to_owned(),
        source,
    })?;
    info!(path = %path.display(), "running script");

    shell.env_mut().script_depth += 1;
    let signal = run_lines(shell, &content);
    shell.env_mut().script_depth -= 1;

    info!(path = %path.display(), ?signal, "script finished");
    Ok(signal)
}

fn run_lines(shell: &mut Interpreter, content: &str) -> Signal {
    let policy = shell.settings().script_exit;
    for (index, line) in content.split('\n').enumerate() {
        if shell.execute_line(line) == Signal::Continue {
            continue;
        }
        match policy {
            ScriptExitPolicy::Ignore => {
                debug!(line = index + 1, "ignoring exit inside script");
            }
            ScriptExitPolicy::StopScript => {
                debug!(line = index + 1, "exit stops the script");
                return Signal::Continue;
            }
            ScriptExitPolicy::StopShell => {
                debug!(line = index + 1, "exit stops the shell");
                return Signal::Terminate;
            }
        }
    }
    Signal::Continue
}
