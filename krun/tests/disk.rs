//! Integration tests for block devices.
//!
//! Without the `blk` feature both entry points must report ENOSYS; with it,
//! libkrun validates the request itself.

use krun::{DiskConfig, DiskFormat, Errno, RootDiskRemountConfig, SyncMode};
use krun_test_utils::require_context;

fn check_blk_result(result: krun::KrunResult<()>) {
    if cfg!(feature = "blk") {
        if let Err(err) = result {
            assert_ne!(err, Errno::ENOSYS, "blk entry point missing: {err}");
        }
    } else {
        assert_eq!(result.unwrap_err(), Errno::ENOSYS);
    }
}

#[test]
fn add_disk_raw() {
    let ctx = require_context!();
    let image = tempfile::NamedTempFile::new().unwrap();
    image.as_file().set_len(1024 * 1024).unwrap();
    let disk = DiskConfig {
        read_only: true,
        ..DiskConfig::new("vda", image.path())
    };
    check_blk_result(ctx.add_disk(&disk));
}

#[test]
fn add_disk_qcow2_full_sync() {
    let ctx = require_context!();
    let disk = DiskConfig {
        format: DiskFormat::Qcow2,
        sync_mode: SyncMode::Full,
        ..DiskConfig::new("vdb", "/tmp/disk.qcow2")
    };
    check_blk_result(ctx.add_disk(&disk));
}

#[test]
fn set_root_disk_remount() {
    let ctx = require_context!();
    check_blk_result(ctx.set_root_disk_remount(&RootDiskRemountConfig {
        device: "/dev/vda".into(),
        fstype: Some("ext4".into()),
        options: Some("rw".into()),
    }));
}
