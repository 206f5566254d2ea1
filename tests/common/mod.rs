//! Stub executables for driving the command-line integrations.

#![allow(dead_code)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

static EXEC_LOCK: Mutex<()> = Mutex::new(());

/// Serialize stub creation and execution within one test binary.
///
/// A script still open for writing in one thread makes a concurrent exec
/// fail with ETXTBSY.
pub fn exec_lock() -> MutexGuard<'static, ()> {
    EXEC_LOCK.lock().unwrap_or_else(|e| e.into_inner())
}

/// Write an executable `/bin/sh` script that appends `<name> <args>` to `log`
/// before running `body`.
pub fn stub(dir: &Path, name: &str, log: &Path, body: &str) -> PathBuf {
    let path = dir.join(name);
    let script = format!(
        "#!/bin/sh\necho \"{name} $*\" >> \"{log}\"\n{body}\n",
        log = log.display()
    );
    fs::write(&path, script).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// Lines recorded by the stubs so far.
pub fn recorded(log: &Path) -> Vec<String> {
    fs::read_to_string(log)
        .unwrap_or_default()
        .lines()
        .map(str::to_string)
        .collect()
}
