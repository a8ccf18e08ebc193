//! Error type for failed libkrun calls.
//!
//! libkrun reports failures as a negated errno. [`KrunError`] keeps that code
//! together with the name of the C function that produced it, so callers can
//! branch on the condition (`err == Errno::ENOSYS`) without matching strings.
//! The raw code is kept even when `nix` has no name for it.

use std::borrow::Cow;
use std::io;

use nix::errno::Errno;
use thiserror::Error;

/// Result alias used throughout the crate.
pub type KrunResult<T> = Result<T, KrunError>;

/// A libkrun entry point returned a negative status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("krun: {func}: {}", describe(.code))]
pub struct KrunError {
    func: &'static str,
    code: i32,
    // Always `Errno::from_raw(code)`; `UnknownErrno` when nix has no name for it.
    #[source]
    errno: Errno,
}

fn describe(code: &i32) -> Cow<'static, str> {
    match Errno::from_raw(*code) {
        Errno::UnknownErrno => Cow::Owned(format!("Unknown error {code}")),
        errno => Cow::Borrowed(errno.desc()),
    }
}

impl KrunError {
    pub fn new(func: &'static str, errno: Errno) -> Self {
        Self {
            func,
            code: errno as i32,
            errno,
        }
    }

    /// Build an error from a raw negative libkrun status.
    ///
    /// The status is negated to recover the errno, so `-22` becomes `EINVAL`.
    pub fn from_status(func: &'static str, status: i32) -> Self {
        let code = status.saturating_neg();
        Self {
            func,
            code,
            errno: Errno::from_raw(code),
        }
    }

    /// The libkrun C function that failed.
    pub fn func(&self) -> &'static str {
        self.func
    }

    pub fn errno(&self) -> Errno {
        self.errno
    }

    /// The positive system error code, exactly as libkrun reported it.
    pub fn code(&self) -> i32 {
        self.code
    }

    /// Whether this error carries the given errno.
    pub fn is(&self, errno: Errno) -> bool {
        self.code == errno as i32
    }

    /// True for the ENOSYS reported by entry points missing from this build.
    pub fn is_not_implemented(&self) -> bool {
        self.is(Errno::ENOSYS)
    }
}

impl PartialEq<Errno> for KrunError {
    fn eq(&self, other: &Errno) -> bool {
        self.is(*other)
    }
}

impl PartialEq<KrunError> for Errno {
    fn eq(&self, other: &KrunError) -> bool {
        other.is(*self)
    }
}

impl From<KrunError> for io::Error {
    fn from(err: KrunError) -> Self {
        io::Error::from_raw_os_error(err.code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_error_display() {
        let err = KrunError::new("krun_test_func", Errno::EINVAL);
        assert_eq!(err.to_string(), "krun: krun_test_func: Invalid argument");
    }

    #[test]
    fn test_error_source_is_errno() {
        let err = KrunError::new("krun_test_func", Errno::EPERM);
        let source = err.source().expect("errno source");
        assert_eq!(source.downcast_ref::<Errno>(), Some(&Errno::EPERM));
    }

    #[test]
    fn test_error_compares_against_errno() {
        let err = KrunError::new("krun_test_func", Errno::EINVAL);
        assert_eq!(err, Errno::EINVAL);
        assert_eq!(Errno::EINVAL, err);
        assert_ne!(err, Errno::EPERM);
        assert!(err.is(Errno::EINVAL));
        assert!(!err.is_not_implemented());
    }

    #[test]
    fn test_error_accessors() {
        let err = KrunError::new("krun_test_func", Errno::ENOENT);
        assert_eq!(err.func(), "krun_test_func");
        assert_eq!(err.errno(), Errno::ENOENT);
    }

    #[test]
    fn test_from_status_negates() {
        let err = KrunError::from_status("krun_test", -22);
        assert_eq!(err.errno(), Errno::EINVAL);
        let err = KrunError::from_status("krun_test", -1);
        assert_eq!(err.errno(), Errno::EPERM);
        assert_eq!(err.code(), 1);
    }

    #[test]
    fn test_unknown_code_is_preserved() {
        let err = KrunError::from_status("krun_test", -4000);
        assert_eq!(err.code(), 4000);
        assert_eq!(err.errno(), Errno::UnknownErrno);
        assert_ne!(err, Errno::UnknownErrno);
        assert_eq!(err.to_string(), "krun: krun_test: Unknown error 4000");

        let io_err: io::Error = err.into();
        assert_eq!(io_err.raw_os_error(), Some(4000));
    }

    #[test]
    fn test_io_error_conversion() {
        let err: io::Error = KrunError::new("krun_test", Errno::ENOENT).into();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        assert_eq!(err.raw_os_error(), Some(libc::ENOENT));
    }
}
