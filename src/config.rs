use std::fmt;
use std::str::FromStr;

/// What an `exit` executed from inside a script stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScriptExitPolicy {
    /// Discard it: every script line runs and the interpreter keeps going.
    #[default]
    Ignore,
    /// Skip the remaining lines of the script that ran `exit`.
    StopScript,
    /// Stop the script and the interpreter.
    StopShell,
}

impl FromStr for ScriptExitPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ignore" => Ok(Self::Ignore),
            "script" => Ok(Self::StopScript),
            "shell" => Ok(Self::StopShell),
            other => Err(format!(
                "unknown script exit policy `{other}`, expected one of: ignore, script, shell"
            )),
        }
    }
}

impl fmt::Display for ScriptExitPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Ignore => "ignore",
            Self::StopScript => "script",
            Self::StopShell => "shell",
        })
    }
}

/// Tunables of an [`Interpreter`](crate::Interpreter), fixed at construction.
#[derive(Debug, Clone)]
pub struct Settings {
    pub script_exit: ScriptExitPolicy,
    /// How many scripts may be running inside each other at once.
    pub max_script_depth: usize,
}

impl Settings {
    pub const DEFAULT_MAX_SCRIPT_DEPTH: usize = 32;
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            script_exit: ScriptExitPolicy::default(),
            max_script_depth: Self::DEFAULT_MAX_SCRIPT_DEPTH,
        }
    }
}
