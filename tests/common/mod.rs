use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use tempfile::TempDir;

/// Serializes the tests that spawn processes.
///
/// Executing a file that another thread still has open for writing fails
/// with ETXTBSY, which happens when a stub is written while another test
/// forks.
static SPAWN_LOCK: Mutex<()> = Mutex::new(());

pub fn spawn_lock() -> MutexGuard<'static, ()> {
    SPAWN_LOCK.lock().unwrap_or_else(|e| e.into_inner())
}

/// A stand-in for `pdnsutil`.
///
/// It appends the number of arguments and then every argument in brackets
/// to `argv.log` next to itself, answers `show-zone` like PowerDNS does for
/// an unsecured zone and exits with `$STUB_EXIT` (0 by default).
pub struct Stub {
    pub dir: TempDir,
    pub path: PathBuf,
}

impl Stub {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pdnsutil");
        fs::write(
            &path,
            r#"#!/bin/sh
log="$(dirname "$0")/argv.log"
printf '%s\n' "$#" >> "$log"
for arg in "$@"; do
    printf '[%s]\n' "$arg" >> "$log"
done
if [ "$1" = "show-zone" ]; then
    echo "This is a Master zone"
    echo "Zone is not actively secured"
fi
echo "stub ran $1" >&2
exit "${STUB_EXIT:-0}"
"#,
        )
        .unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        Self { dir, path }
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    /// Everything the stub logged, empty if it never ran.
    pub fn argv_log(&self) -> String {
        fs::read_to_string(self.dir().join("argv.log")).unwrap_or_default()
    }
}
