//! Translation of libkrun return codes.
//!
//! Every libkrun entry point returns an `i32`: `>= 0` is success (sometimes
//! carrying a value), `< 0` is a negated errno. These helpers are the only
//! place where that convention is interpreted.

use nix::errno::Errno;

use crate::error::{KrunError, KrunResult};

/// Map a libkrun status to `Ok(())` or a [`KrunError`] naming `label`.
pub fn check_status(label: &'static str, status: i32) -> KrunResult<()> {
    status_to_value(label, status).map(|_| ())
}

/// Like [`check_status`], but hands back the non-negative value on success.
pub fn status_to_value(label: &'static str, status: i32) -> KrunResult<u32> {
    if status < 0 {
        tracing::debug!(function = label, status, "libkrun FFI call failed");
        Err(KrunError::from_status(label, status))
    } else {
        Ok(status as u32)
    }
}

/// Error returned by entry points that are absent from this build.
pub fn not_implemented(label: &'static str) -> KrunError {
    tracing::debug!(function = label, "libkrun entry point not compiled in");
    KrunError::new(label, Errno::ENOSYS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_status_success() {
        assert!(check_status("test", 0).is_ok());
        assert!(check_status("test", 42).is_ok());
        assert!(check_status("test", i32::MAX).is_ok());
    }

    #[test]
    fn test_check_status_einval() {
        let err = check_status("krun_test", -22).unwrap_err();
        assert_eq!(err, Errno::EINVAL);
        assert_eq!(err.func(), "krun_test");
    }

    #[test]
    fn test_check_status_eperm() {
        let err = check_status("krun_test", -1).unwrap_err();
        assert_eq!(err, Errno::EPERM);
    }

    #[test]
    fn test_status_to_value() {
        assert_eq!(status_to_value("krun_add_display", 3), Ok(3));
        assert_eq!(status_to_value("krun_get_max_vcpus", 0), Ok(0));
        let err = status_to_value("krun_add_display", -(libc::ENOSPC)).unwrap_err();
        assert_eq!(err, Errno::ENOSPC);
        assert_eq!(err.func(), "krun_add_display");
    }

    #[test]
    fn test_not_implemented() {
        let err = not_implemented("krun_add_disk3");
        assert!(err.is_not_implemented());
        assert_eq!(err.func(), "krun_add_disk3");
    }
}
