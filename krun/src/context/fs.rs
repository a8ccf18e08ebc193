use super::Context;
use crate::config::VirtioFsConfig;
use crate::error::KrunResult;
use crate::marshal::{c_path, c_string};
use crate::status::check_status;

impl Context {
    /// Share a host directory with the guest over virtio-fs.
    ///
    /// Uses `krun_add_virtiofs2` when a DAX window size is given.
    pub fn add_virtiofs(&self, fs: &VirtioFsConfig) -> KrunResult<()> {
        tracing::debug!(
            ctx_id = self.ctx_id,
            tag = %fs.tag,
            host_path = %fs.path.display(),
            shm_size = ?fs.shm_size,
            "Adding virtiofs mount"
        );

        match fs.shm_size {
            None => {
                let tag_c = c_string("krun_add_virtiofs", &fs.tag)?;
                let path_c = c_path("krun_add_virtiofs", &fs.path)?;
                check_status("krun_add_virtiofs", unsafe {
                    libkrun_sys::krun_add_virtiofs(self.ctx_id, tag_c.as_ptr(), path_c.as_ptr())
                })
            }
            Some(shm_size) => {
                let tag_c = c_string("krun_add_virtiofs2", &fs.tag)?;
                let path_c = c_path("krun_add_virtiofs2", &fs.path)?;
                check_status("krun_add_virtiofs2", unsafe {
                    libkrun_sys::krun_add_virtiofs2(
                        self.ctx_id,
                        tag_c.as_ptr(),
                        path_c.as_ptr(),
                        shm_size,
                    )
                })
            }
        }
    }
}
