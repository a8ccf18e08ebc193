//! Block devices. Requires libkrun built with `BLK=1` and the `blk` feature;
//! without it these methods return ENOSYS.

use super::Context;
use crate::config::{DiskConfig, RootDiskRemountConfig};
use crate::error::KrunResult;

#[cfg(feature = "blk")]
use crate::marshal::{c_path, c_string, opt_ptr, optional_c_string};
#[cfg(feature = "blk")]
use crate::status::check_status;
#[cfg(not(feature = "blk"))]
use crate::status::not_implemented;

impl Context {
    /// Attach a disk image as a virtio-blk device.
    ///
    /// Non-raw images (like qcow2) can reference other files, which libkrun
    /// opens and gives the guest access to.
    #[cfg(feature = "blk")]
    pub fn add_disk(&self, disk: &DiskConfig) -> KrunResult<()> {
        const FUNC: &str = "krun_add_disk3";
        tracing::debug!(
            ctx_id = self.ctx_id,
            block_id = %disk.block_id,
            path = %disk.path.display(),
            format = ?disk.format,
            read_only = disk.read_only,
            direct_io = disk.direct_io,
            sync_mode = ?disk.sync_mode,
            "Adding disk"
        );

        let block_id_c = c_string(FUNC, &disk.block_id)?;
        let path_c = c_path(FUNC, &disk.path)?;
        check_status(FUNC, unsafe {
            libkrun_sys::krun_add_disk3(
                self.ctx_id,
                block_id_c.as_ptr(),
                path_c.as_ptr(),
                disk.format as u32,
                disk.read_only,
                disk.direct_io,
                disk.sync_mode as u32,
            )
        })
    }

    #[cfg(not(feature = "blk"))]
    pub fn add_disk(&self, disk: &DiskConfig) -> KrunResult<()> {
        tracing::trace!(ctx_id = self.ctx_id, block_id = %disk.block_id, "blk support not built");
        Err(not_implemented("krun_add_disk3"))
    }

    /// Remount the root filesystem from a block device configured with
    /// [`Context::add_disk`].
    #[cfg(feature = "blk")]
    pub fn set_root_disk_remount(&self, remount: &RootDiskRemountConfig) -> KrunResult<()> {
        const FUNC: &str = "krun_set_root_disk_remount";
        tracing::debug!(
            ctx_id = self.ctx_id,
            device = %remount.device,
            fstype = ?remount.fstype,
            options = ?remount.options,
            "Setting root disk remount"
        );

        let device_c = c_string(FUNC, &remount.device)?;
        let fstype_c = optional_c_string(FUNC, remount.fstype.as_deref())?;
        let options_c = optional_c_string(FUNC, remount.options.as_deref())?;
        check_status(FUNC, unsafe {
            libkrun_sys::krun_set_root_disk_remount(
                self.ctx_id,
                device_c.as_ptr(),
                opt_ptr(fstype_c.as_ref()),
                opt_ptr(options_c.as_ref()),
            )
        })
    }

    #[cfg(not(feature = "blk"))]
    pub fn set_root_disk_remount(&self, remount: &RootDiskRemountConfig) -> KrunResult<()> {
        tracing::trace!(ctx_id = self.ctx_id, device = %remount.device, "blk support not built");
        Err(not_implemented("krun_set_root_disk_remount"))
    }
}

#[cfg(all(test, not(feature = "blk")))]
mod tests {
    use super::*;

    #[test]
    fn test_disk_entry_points_missing_without_blk() {
        let ctx = Context::unregistered();

        let err = ctx.add_disk(&DiskConfig::new("vda", "/tmp/disk.img")).unwrap_err();
        assert!(err.is_not_implemented());
        assert_eq!(err.func(), "krun_add_disk3");

        let remount = RootDiskRemountConfig {
            device: "/dev/vda".into(),
            fstype: Some("ext4".into()),
            options: Some("rw".into()),
        };
        let err = ctx.set_root_disk_remount(&remount).unwrap_err();
        assert!(err.is_not_implemented());
        assert_eq!(err.func(), "krun_set_root_disk_remount");
    }
}
