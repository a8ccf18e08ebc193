//! Shared fixtures for the `krun` integration tests.
//!
//! Tests that talk to libkrun go through [`context`], which returns `None`
//! when this build has no native library (stub mode) so the test can skip.

use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::os::fd::{AsRawFd, OwnedFd, RawFd};
use std::sync::{Once, OnceLock};

use krun::{Context, LogLevel};

static NATIVE_LOG_INIT: Once = Once::new();

/// Silence libkrun's logger once per test process.
///
/// libkrun's logger can only be set up once, so every test binary funnels
/// through here before its first native call.
pub fn init_native_logging() {
    NATIVE_LOG_INIT.call_once(|| {
        if let Err(err) = krun::logging::set_log_level(LogLevel::Off) {
            eprintln!("krun-test-utils: set_log_level: {err}");
        }
    });
}

/// A fresh context, or `None` when libkrun isn't linked into this build.
///
/// Panics if libkrun is linked but refuses to create a context.
pub fn context() -> Option<Context> {
    if !krun::native_available() {
        return None;
    }
    init_native_logging();
    Some(Context::create().expect("krun_create_ctx failed"))
}

/// Bind a fresh context or return early from the test when libkrun is absent.
#[macro_export]
macro_rules! require_context {
    () => {
        match $crate::context() {
            Some(ctx) => ctx,
            None => {
                eprintln!("skipping: libkrun not available (stub build)");
                return;
            }
        }
    };
}

/// Whether this host can actually run a microVM.
pub fn kvm_available() -> bool {
    krun::host::check_virtualization_support().available
}

/// Compile `source` into a static executable `dir/name` with the system C
/// compiler, so it can run as the sole process of a bare rootfs.
pub fn build_static_guest(dir: &Path, name: &str, source: &str) -> io::Result<PathBuf> {
    let src_path = dir.join(format!("{name}.c"));
    let bin_path = dir.join(name);
    std::fs::write(&src_path, source)?;

    let output = Command::new("cc")
        .arg("-static")
        .arg("-o")
        .arg(&bin_path)
        .arg(&src_path)
        .output()?;
    if !output.status.success() {
        return Err(io::Error::other(format!(
            "cc -static failed: {}",
            String::from_utf8_lossy(&output.stderr)
        )));
    }
    Ok(bin_path)
}

/// Guest that prints "OK" and exits 0.
pub const GUEST_OK: &str = r#"
#include <unistd.h>
int main(void) {
    write(1, "OK\n", 3);
    return 0;
}
"#;

/// Guest that exits 42.
pub const GUEST_EXIT_42: &str = r#"
int main(void) {
    return 42;
}
"#;

/// A temporary rootfs directory, removed on drop.
pub fn temp_rootfs() -> tempfile::TempDir {
    tempfile::Builder::new()
        .prefix("krun-rootfs")
        .tempdir()
        .expect("Failed to create temp rootfs")
}

static DEVNULL: OnceLock<OwnedFd> = OnceLock::new();

/// A `/dev/null` descriptor shared by the whole test process.
pub fn devnull_fd() -> RawFd {
    DEVNULL
        .get_or_init(|| {
            std::fs::OpenOptions::new()
                .read(true)
                .write(true)
                .open("/dev/null")
                .expect("open /dev/null failed")
                .into()
        })
        .as_raw_fd()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_devnull_fd_is_reused() {
        let fd = devnull_fd();
        assert!(fd >= 0);
        assert_eq!(devnull_fd(), fd);
    }
}
