//! Helpers shared by the unit tests.

use crate::builtin::Registry;
use crate::config::Settings;
use crate::interpreter::Interpreter;
use crate::io_adapters::MemWriter;
use std::cell::RefCell;
use std::env as stdenv;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

/// Serializes tests that read or change the process working directory.
pub(crate) fn lock_current_dir() -> MutexGuard<'static, ()> {
    static MUTEX: OnceLock<Mutex<()>> = OnceLock::new();
    MUTEX
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
}

pub(crate) fn make_unique_temp_dir(tag: &str) -> io::Result<PathBuf> {
    let mut p = stdenv::temp_dir();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    p.push(format!("myshell_test_{tag}_{}_{nanos}", std::process::id()));
    fs::create_dir_all(&p)?;
    Ok(p)
}

pub(crate) fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).expect("write test file");
    path
}

/// What an interpreter built by [`captured_shell`] wrote.
pub(crate) struct Captured {
    out: Rc<RefCell<Vec<u8>>>,
    err: Rc<RefCell<Vec<u8>>>,
}

impl Captured {
    pub(crate) fn stdout(&self) -> String {
        String::from_utf8(self.out.borrow().clone()).unwrap()
    }

    pub(crate) fn stderr(&self) -> String {
        String::from_utf8(self.err.borrow().clone()).unwrap()
    }
}

pub(crate) fn captured_shell(settings: Settings) -> (Interpreter, Captured) {
    let (out_writer, out) = MemWriter::with_handle();
    let (err_writer, err) = MemWriter::with_handle();
    let shell =
        Interpreter::new(Registry::with_builtins(), settings).with_output(out_writer, err_writer);
    (shell, Captured { out, err })
}
