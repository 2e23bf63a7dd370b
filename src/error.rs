use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failures of a single command. None of them stop the interpreter.
#[derive(Debug, Error)]
pub enum ShellError {
    #[error("expected argument to \"{command}\"")]
    MissingArgument { command: &'static str },

    #[error("cd: {}: {source}", path.display())]
    ChangeDir { path: PathBuf, source: io::Error },

    #[error("{program}: {source}")]
    Spawn { program: String, source: io::Error },

    #[error("{program}: failed to wait for child: {source}")]
    Wait { program: String, source: io::Error },

    #[error("{}: cannot read script: {source}", path.display())]
    ScriptRead { path: PathBuf, source: io::Error },

    #[error("{}: scripts nested deeper than {limit}", path.display())]
    ScriptTooDeep { path: PathBuf, limit: usize },
}
