/// Shared test helpers for all sift integration tests.
///
/// Import from any integration test entry point with:
///   `#[macro_use] #[path = "common/mod.rs"] mod common;`
pub mod generators;

use std::path::{Path, PathBuf};

/// Whether a `python3` interpreter is on PATH. Tests that spawn the
/// interpreter skip themselves when it is not.
#[allow(dead_code)]
pub fn python_available() -> bool {
    which::which("python3").is_ok()
}

/// Return early from a test when `python3` is unavailable.
#[allow(unused_macros)]
macro_rules! require_python {
    () => {
        if !$crate::common::python_available() {
            eprintln!("skipping: python3 not on PATH");
            return;
        }
    };
}

/// Directory holding the sample Python sources used across suites.
#[allow(dead_code)]
pub fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

/// Read a fixture by file name.
#[allow(dead_code)]
pub fn fixture(name: &str) -> String {
    let path = fixtures_dir().join(name);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("missing fixture {}: {e}", path.display()))
}

/// Whether any live process still has `marker` on its command line.
#[cfg(target_os = "linux")]
#[allow(dead_code)]
pub fn process_with_arg_exists(marker: &str) -> bool {
    let Ok(entries) = std::fs::read_dir("/proc") else {
        return false;
    };
    entries.flatten().any(|entry| {
        std::fs::read(entry.path().join("cmdline"))
            .map(|raw| String::from_utf8_lossy(&raw).contains(marker))
            .unwrap_or(false)
    })
}
