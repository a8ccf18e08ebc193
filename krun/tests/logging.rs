//! Integration tests for libkrun's process-wide logger.
//!
//! Each test binary is its own process, so this file owns the one-time
//! initialization and must not use `krun_test_utils::context()`.

use krun::logging::{self, LogConfig, LogLevel, LogStyle, LogTarget};
use krun::Errno;

#[test]
fn first_successful_init_is_recorded() {
    let first = LogConfig {
        target: LogTarget::Fd(libc::STDERR_FILENO),
        level: LogLevel::Warn,
        style: LogStyle::Never,
        no_env: true,
    };

    match logging::init_log(&first) {
        Ok(()) => {
            assert_eq!(logging::active_log_config(), Some(&first));
        }
        Err(err) => {
            assert!(!krun::native_available(), "krun_init_log failed: {err}");
            assert_eq!(err, Errno::ENOSYS);
            assert_eq!(err.func(), "krun_init_log");
            assert_eq!(logging::active_log_config(), None);
        }
    }
}
