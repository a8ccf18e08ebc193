use std::path::Path;

use super::Context;
use crate::config::KernelConfig;
use crate::error::KrunResult;
use crate::marshal::{c_path, opt_ptr, optional_c_path, optional_c_string};
use crate::status::check_status;

impl Context {
    /// Boot through the given firmware image.
    pub fn set_firmware(&self, firmware: impl AsRef<Path>) -> KrunResult<()> {
        let firmware = firmware.as_ref();
        tracing::debug!(ctx_id = self.ctx_id, firmware = %firmware.display(), "Setting firmware");
        let firmware_c = c_path("krun_set_firmware", firmware)?;
        check_status("krun_set_firmware", unsafe {
            libkrun_sys::krun_set_firmware(self.ctx_id, firmware_c.as_ptr())
        })
    }

    /// Boot an external kernel instead of the bundled one.
    ///
    /// A missing initramfs or command line is passed to libkrun as NULL.
    pub fn set_kernel(&self, kernel: &KernelConfig) -> KrunResult<()> {
        const FUNC: &str = "krun_set_kernel";
        tracing::debug!(
            ctx_id = self.ctx_id,
            path = %kernel.path.display(),
            format = ?kernel.format,
            initramfs = ?kernel.initramfs,
            cmdline = ?kernel.cmdline,
            "Setting kernel"
        );

        let kernel_c = c_path(FUNC, &kernel.path)?;
        let initramfs_c = optional_c_path(FUNC, kernel.initramfs.as_deref())?;
        let cmdline_c = optional_c_string(FUNC, kernel.cmdline.as_deref())?;

        check_status(FUNC, unsafe {
            libkrun_sys::krun_set_kernel(
                self.ctx_id,
                kernel_c.as_ptr(),
                kernel.format as u32,
                opt_ptr(initramfs_c.as_ref()),
                opt_ptr(cmdline_c.as_ref()),
            )
        })
    }
}
