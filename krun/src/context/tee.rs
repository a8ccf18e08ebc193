use std::path::Path;

use super::Context;
use crate::error::KrunResult;

#[cfg(feature = "tee")]
use crate::marshal::c_path;
#[cfg(feature = "tee")]
use crate::status::check_status;
#[cfg(not(feature = "tee"))]
use crate::status::not_implemented;

impl Context {
    /// TEE configuration file for SEV/TDX builds of libkrun.
    #[cfg(feature = "tee")]
    pub fn set_tee_config_file(&self, filepath: impl AsRef<Path>) -> KrunResult<()> {
        let filepath = filepath.as_ref();
        tracing::debug!(ctx_id = self.ctx_id, filepath = %filepath.display(), "Setting TEE config file");
        let filepath_c = c_path("krun_set_tee_config_file", filepath)?;
        check_status("krun_set_tee_config_file", unsafe {
            libkrun_sys::krun_set_tee_config_file(self.ctx_id, filepath_c.as_ptr())
        })
    }

    #[cfg(not(feature = "tee"))]
    pub fn set_tee_config_file(&self, filepath: impl AsRef<Path>) -> KrunResult<()> {
        tracing::trace!(ctx_id = self.ctx_id, filepath = %filepath.as_ref().display(), "tee support not built");
        Err(not_implemented("krun_set_tee_config_file"))
    }
}

#[cfg(all(test, not(feature = "tee")))]
mod tests {
    use super::*;

    #[test]
    fn test_tee_config_missing_without_tee() {
        let err = Context::unregistered()
            .set_tee_config_file("/tmp/tee.json")
            .unwrap_err();
        assert!(err.is_not_implemented());
        assert_eq!(err.func(), "krun_set_tee_config_file");
    }
}
