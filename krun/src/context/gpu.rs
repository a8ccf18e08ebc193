//! virtio-gpu, displays, input devices and sound.

use std::ffi::c_void;
use std::os::unix::io::RawFd;
use std::ptr;

use super::Context;
use crate::config::GpuConfig;
use crate::error::KrunResult;
use crate::status::{check_status, status_to_value};

impl Context {
    /// Enable virtio-gpu. Uses `krun_set_gpu_options2` when a SHM window
    /// size is given.
    pub fn set_gpu_options(&self, gpu: &GpuConfig) -> KrunResult<()> {
        tracing::debug!(
            ctx_id = self.ctx_id,
            virgl_flags = gpu.virgl_flags,
            shm_size = ?gpu.shm_size,
            "Setting GPU options"
        );
        match gpu.shm_size {
            None => check_status("krun_set_gpu_options", unsafe {
                libkrun_sys::krun_set_gpu_options(self.ctx_id, gpu.virgl_flags)
            }),
            Some(shm_size) => check_status("krun_set_gpu_options2", unsafe {
                libkrun_sys::krun_set_gpu_options2(self.ctx_id, gpu.virgl_flags, shm_size)
            }),
        }
    }

    /// Add a display and return its id. At most
    /// [`MAX_DISPLAYS`](crate::constants::MAX_DISPLAYS) can be added.
    pub fn add_display(&self, width: u32, height: u32) -> KrunResult<u32> {
        let display_id = status_to_value("krun_add_display", unsafe {
            libkrun_sys::krun_add_display(self.ctx_id, width, height)
        })?;
        tracing::debug!(ctx_id = self.ctx_id, display_id, width, height, "Added display");
        Ok(display_id)
    }

    /// Set a custom EDID blob. An empty blob is passed as NULL and left for
    /// libkrun to reject.
    pub fn display_set_edid(&self, display_id: u32, edid: &[u8]) -> KrunResult<()> {
        let edid_ptr = if edid.is_empty() {
            ptr::null()
        } else {
            edid.as_ptr()
        };
        check_status("krun_display_set_edid", unsafe {
            libkrun_sys::krun_display_set_edid(self.ctx_id, display_id, edid_ptr, edid.len())
        })
    }

    pub fn display_set_dpi(&self, display_id: u32, dpi: u32) -> KrunResult<()> {
        check_status("krun_display_set_dpi", unsafe {
            libkrun_sys::krun_display_set_dpi(self.ctx_id, display_id, dpi)
        })
    }

    pub fn display_set_physical_size(
        &self,
        display_id: u32,
        width_mm: u16,
        height_mm: u16,
    ) -> KrunResult<()> {
        check_status("krun_display_set_physical_size", unsafe {
            libkrun_sys::krun_display_set_physical_size(self.ctx_id, display_id, width_mm, height_mm)
        })
    }

    pub fn display_set_refresh_rate(&self, display_id: u32, refresh_rate: u32) -> KrunResult<()> {
        check_status("krun_display_set_refresh_rate", unsafe {
            libkrun_sys::krun_display_set_refresh_rate(self.ctx_id, display_id, refresh_rate)
        })
    }

    /// Install a display backend vtable.
    ///
    /// # Safety
    ///
    /// `backend` must point to `size` bytes holding a display backend structure
    /// of the layout libkrun expects, and must stay valid for as long as
    /// libkrun may use it (normally until the process exits).
    pub unsafe fn set_display_backend(
        &self,
        backend: *const c_void,
        size: usize,
    ) -> KrunResult<()> {
        tracing::debug!(ctx_id = self.ctx_id, size, "Setting display backend");
        check_status("krun_set_display_backend", unsafe {
            libkrun_sys::krun_set_display_backend(self.ctx_id, backend, size)
        })
    }

    /// Forward a host evdev device to the guest.
    pub fn add_input_device_fd(&self, input_fd: RawFd) -> KrunResult<()> {
        tracing::debug!(ctx_id = self.ctx_id, input_fd, "Adding input device");
        check_status("krun_add_input_device_fd", unsafe {
            libkrun_sys::krun_add_input_device_fd(self.ctx_id, input_fd)
        })
    }

    /// Add an input device driven by custom config and event backends.
    ///
    /// # Safety
    ///
    /// Both pointers must reference backend structures of the given sizes in
    /// the layout libkrun expects, valid for as long as libkrun may use them.
    pub unsafe fn add_input_device(
        &self,
        config_backend: *const c_void,
        config_backend_size: usize,
        events_backend: *const c_void,
        events_backend_size: usize,
    ) -> KrunResult<()> {
        check_status("krun_add_input_device", unsafe {
            libkrun_sys::krun_add_input_device(
                self.ctx_id,
                config_backend,
                config_backend_size,
                events_backend,
                events_backend_size,
            )
        })
    }

    pub fn set_snd_device(&self, enable: bool) -> KrunResult<()> {
        check_status("krun_set_snd_device", unsafe {
            libkrun_sys::krun_set_snd_device(self.ctx_id, enable)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_edid_is_handed_to_libkrun() {
        // No local validation: the native side decides, so the error names it.
        let err = Context::unregistered().display_set_edid(0, &[]).unwrap_err();
        assert_eq!(err.func(), "krun_display_set_edid");
    }
}
