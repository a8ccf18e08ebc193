//! Conversion of Rust values into the shapes libkrun expects.
//!
//! Strings become NUL-terminated `CString`s and string lists become
//! NULL-terminated arrays of C string pointers. Both own their memory and
//! release it on drop, so a value built right before a boundary call is freed
//! on every exit path of that call.
//!
//! For string lists, `None` and `Some(&[])` mean different things to libkrun:
//! `None` becomes a NULL pointer ("choose a default", e.g. inherit the host
//! environment), while an empty slice becomes an array holding only the
//! terminator ("explicitly nothing").

use std::ffi::{CStr, CString, c_char};
use std::os::unix::ffi::OsStrExt;
use std::path::Path;
use std::ptr;

use nix::errno::Errno;

use crate::error::{KrunError, KrunResult};

/// Convert a string argument for the libkrun function `func`.
///
/// C strings cannot carry interior NUL bytes; such input is reported as
/// `EINVAL` against `func`.
pub fn c_string(func: &'static str, value: &str) -> KrunResult<CString> {
    CString::new(value).map_err(|e| {
        tracing::debug!(function = func, position = e.nul_position(), "interior NUL in argument");
        KrunError::new(func, Errno::EINVAL)
    })
}

/// Convert a host path, byte for byte, for the libkrun function `func`.
pub fn c_path(func: &'static str, path: &Path) -> KrunResult<CString> {
    CString::new(path.as_os_str().as_bytes()).map_err(|e| {
        tracing::debug!(function = func, position = e.nul_position(), "interior NUL in path");
        KrunError::new(func, Errno::EINVAL)
    })
}

pub fn optional_c_string(func: &'static str, value: Option<&str>) -> KrunResult<Option<CString>> {
    value.map(|v| c_string(func, v)).transpose()
}

pub fn optional_c_path(func: &'static str, path: Option<&Path>) -> KrunResult<Option<CString>> {
    path.map(|p| c_path(func, p)).transpose()
}

/// Pointer for an optional C string: NULL when absent.
pub fn opt_ptr(value: Option<&CString>) -> *const c_char {
    value.map_or(ptr::null(), |c| c.as_ptr())
}

/// A NULL-terminated array of C strings, owned for the duration of one call.
///
/// Dropping it frees every element and the pointer array itself.
#[derive(Debug)]
pub struct CStringArray {
    // Owns the bytes `ptrs` points into.
    storage: Vec<CString>,
    ptrs: Vec<*const c_char>,
}

impl CStringArray {
    pub fn new<S: AsRef<str>>(func: &'static str, items: &[S]) -> KrunResult<Self> {
        let storage: Vec<CString> = items
            .iter()
            .map(|item| c_string(func, item.as_ref()))
            .collect::<Result<_, _>>()?;
        let mut ptrs: Vec<*const c_char> = storage.iter().map(|c| c.as_ptr()).collect();
        ptrs.push(ptr::null());
        Ok(Self { storage, ptrs })
    }

    /// `None` stays `None` so the caller can pass a NULL array.
    pub fn from_option<S: AsRef<str>>(
        func: &'static str,
        items: Option<&[S]>,
    ) -> KrunResult<Option<Self>> {
        items.map(|items| Self::new(func, items)).transpose()
    }

    /// Pointer to the first element; valid while `self` is alive.
    pub fn as_ptr(&self) -> *const *const c_char {
        self.ptrs.as_ptr()
    }

    /// Number of strings, not counting the terminator.
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }
}

/// Pointer for an optional array: NULL when absent.
pub fn array_ptr(array: Option<&CStringArray>) -> *const *const c_char {
    array.map_or(ptr::null(), CStringArray::as_ptr)
}

/// Read a NULL-terminated C string array back into owned strings.
///
/// Returns `None` for a NULL array pointer.
///
/// # Safety
///
/// `array` must be NULL or point to a NULL-terminated array of valid,
/// NUL-terminated C strings that outlive this call.
pub unsafe fn read_c_string_array(array: *const *const c_char) -> Option<Vec<String>> {
    if array.is_null() {
        return None;
    }
    let mut out = Vec::new();
    let mut cursor = array;
    loop {
        let entry = unsafe { *cursor };
        if entry.is_null() {
            break;
        }
        out.push(unsafe { CStr::from_ptr(entry) }.to_string_lossy().into_owned());
        cursor = unsafe { cursor.add(1) };
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_none_is_null() {
        let array = CStringArray::from_option::<&str>("krun_set_env", None).unwrap();
        assert!(array.is_none());
        assert!(array_ptr(array.as_ref()).is_null());
        assert_eq!(unsafe { read_c_string_array(array_ptr(array.as_ref())) }, None);
    }

    #[test]
    fn test_empty_is_terminator_only() {
        let array = CStringArray::new::<&str>("krun_set_env", &[]).unwrap();
        assert!(array.is_empty());
        let ptr = array.as_ptr();
        assert!(!ptr.is_null());
        assert!(unsafe { *ptr }.is_null());
        assert_eq!(unsafe { read_c_string_array(ptr) }, Some(vec![]));
    }

    #[test]
    fn test_values_are_null_terminated() {
        let strs = ["hello", "world"];
        let array = CStringArray::new("krun_set_exec", &strs).unwrap();
        assert_eq!(array.len(), 2);
        let slice = unsafe { std::slice::from_raw_parts(array.as_ptr(), strs.len() + 1) };
        assert!(slice[strs.len()].is_null());
        assert!(slice[..strs.len()].iter().all(|p| !p.is_null()));
    }

    #[test]
    fn test_release_of_absent_and_empty_arrays() {
        drop(CStringArray::from_option::<String>("krun_set_port_map", None).unwrap());
        drop(CStringArray::new::<String>("krun_set_port_map", &[]).unwrap());
    }

    #[test]
    fn test_interior_nul_is_einval() {
        let err = CStringArray::new("krun_set_rlimits", &["ok", "bad\0value"]).unwrap_err();
        assert_eq!(err, Errno::EINVAL);
        assert_eq!(err.func(), "krun_set_rlimits");

        let err = c_string("krun_set_workdir", "/tmp\0x").unwrap_err();
        assert_eq!(err.func(), "krun_set_workdir");
    }

    #[test]
    fn test_optional_strings() {
        assert!(opt_ptr(optional_c_string("krun_set_kernel", None).unwrap().as_ref()).is_null());
        let cmdline = optional_c_string("krun_set_kernel", Some("console=hvc0")).unwrap();
        assert_eq!(cmdline.unwrap().to_str().unwrap(), "console=hvc0");
    }

    #[test]
    fn test_c_path_keeps_bytes() {
        let path = c_path("krun_set_root", Path::new("/var/lib/rootfs dir")).unwrap();
        assert_eq!(path.as_bytes(), b"/var/lib/rootfs dir");
    }

    proptest! {
        #[test]
        fn prop_round_trip(items in proptest::collection::vec("[^\\x00]{0,16}", 0..8)) {
            let array = CStringArray::new("krun_set_exec", &items).unwrap();
            let back = unsafe { read_c_string_array(array.as_ptr()) };
            prop_assert_eq!(back, Some(items));
        }
    }
}
