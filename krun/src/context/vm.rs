use std::os::unix::io::RawFd;
use std::path::Path;

use super::Context;
use crate::config::VmConfig;
use crate::error::KrunResult;
use crate::marshal::{CStringArray, c_path};
use crate::status::{check_status, status_to_value};

impl Context {
    /// Set the number of vCPUs and the amount of RAM.
    pub fn set_vm_config(&self, config: &VmConfig) -> KrunResult<()> {
        tracing::debug!(
            ctx_id = self.ctx_id,
            num_vcpus = config.num_vcpus,
            ram_mib = config.ram_mib,
            "Setting VM config"
        );
        check_status("krun_set_vm_config", unsafe {
            libkrun_sys::krun_set_vm_config(self.ctx_id, config.num_vcpus, config.ram_mib)
        })
    }

    /// Use a host directory as the guest's root filesystem.
    pub fn set_root(&self, root: impl AsRef<Path>) -> KrunResult<()> {
        let root = root.as_ref();
        tracing::debug!(ctx_id = self.ctx_id, root = %root.display(), "Setting root");
        let root_c = c_path("krun_set_root", root)?;
        check_status("krun_set_root", unsafe {
            libkrun_sys::krun_set_root(self.ctx_id, root_c.as_ptr())
        })
    }

    /// Enable nested virtualization (macOS).
    pub fn set_nested_virt(&self, enabled: bool) -> KrunResult<()> {
        tracing::trace!(ctx_id = self.ctx_id, enabled, "Setting nested virtualization");
        check_status("krun_set_nested_virt", unsafe {
            libkrun_sys::krun_set_nested_virt(self.ctx_id, enabled)
        })
    }

    /// Use the split IRQ chip (userspace IOAPIC/PIC) instead of the in-kernel one.
    pub fn split_irqchip(&self, enable: bool) -> KrunResult<()> {
        check_status("krun_split_irqchip", unsafe {
            libkrun_sys::krun_split_irqchip(self.ctx_id, enable)
        })
    }

    /// Set the uid the VMM switches to before starting the microVM.
    pub fn set_uid(&self, uid: libc::uid_t) -> KrunResult<()> {
        tracing::debug!(ctx_id = self.ctx_id, uid, "Setting VM process uid");
        check_status("krun_setuid", unsafe {
            libkrun_sys::krun_setuid(self.ctx_id, uid)
        })
    }

    /// Set the gid the VMM switches to before starting the microVM.
    pub fn set_gid(&self, gid: libc::gid_t) -> KrunResult<()> {
        tracing::debug!(ctx_id = self.ctx_id, gid, "Setting VM process gid");
        check_status("krun_setgid", unsafe {
            libkrun_sys::krun_setgid(self.ctx_id, gid)
        })
    }

    /// SMBIOS OEM strings. An empty slice is sent as an empty array, not NULL.
    pub fn set_smbios_oem_strings<S: AsRef<str>>(&self, oem_strings: &[S]) -> KrunResult<()> {
        let strings = CStringArray::new("krun_set_smbios_oem_strings", oem_strings)?;
        check_status("krun_set_smbios_oem_strings", unsafe {
            libkrun_sys::krun_set_smbios_oem_strings(self.ctx_id, strings.as_ptr())
        })
    }

    /// An eventfd the host can signal to request an orderly guest shutdown.
    ///
    /// Only libkrun-efi implements this.
    pub fn get_shutdown_eventfd(&self) -> KrunResult<RawFd> {
        let fd = status_to_value("krun_get_shutdown_eventfd", unsafe {
            libkrun_sys::krun_get_shutdown_eventfd(self.ctx_id)
        })?;
        Ok(fd as RawFd)
    }
}
