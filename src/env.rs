use crate::command::ExitCode;
use std::env as stdenv;
use std::path::PathBuf;

/// Whether the interactive loop keeps reading lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Running,
    Stopped,
}

/// Mutable session state of the interpreter.
///
/// The environment contains:
/// - `current_dir`: the working directory as of the last successful `cd`.
/// - `state`: the interactive loop state.
/// - `script_depth`: how many scripts are running inside each other right now.
/// - `last_status`: how the most recent external program finished.
///
/// Note: fields are public for simplicity; the process working directory
/// itself remains the source of truth for child processes.
#[derive(Debug, Clone)]
pub struct Environment {
    pub current_dir: PathBuf,
    pub state: State,
    pub script_depth: usize,
    pub last_status: Option<ExitCode>,
}

impl Environment {
    /// Capture the current process state into a new `Environment` instance.
    pub fn new() -> Self {
        let current_dir = stdenv::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self {
            current_dir,
            state: State::Running,
            script_depth: 0,
            last_status: None,
        }
    }

    /// Re-read the process working directory after it changed.
    pub fn refresh_current_dir(&mut self) {
        if let Ok(dir) = stdenv::current_dir() {
            self.current_dir = dir;
        }
    }

    /// Directory shown in the prompt.
    ///
    /// Falls back to the last known directory when the process one vanished.
    pub fn prompt_dir(&self) -> PathBuf {
        stdenv::current_dir().unwrap_or_else(|_| self.current_dir.clone())
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}
