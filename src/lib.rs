//! A small line-oriented command interpreter.
//!
//! Lines are split into arguments on whitespace, then either handled by a builtin
//! (`cd`, `exit`, `multi`/`xscript`) or started as an external program that the
//! interpreter waits for. `multi <file>` runs every line of a file the same way.
//!
//! The main entry point is [`Interpreter`]: [`Interpreter::dispatch`] runs one
//! argument vector and [`Interpreter::repl`] drives the read-dispatch loop over any
//! [`LineSource`].

mod batch;
mod builtin;
pub mod command;
pub mod config;
pub mod env;
pub mod error;
mod external;
mod interpreter;
pub mod io_adapters;
pub mod lexer;

#[cfg(test)]
mod test_support;

pub use builtin::Registry;
pub use command::{ExitCode, Signal};
pub use config::{ScriptExitPolicy, Settings};
pub use error::ShellError;
pub use external::ExternalCommand;
/// Just a convenient re-export of the interactive command runner.
///
/// See [`Interpreter`] for the high-level API and examples.
pub use interpreter::Interpreter;
pub use io_adapters::{BufReadSource, Editor, LineSource};
