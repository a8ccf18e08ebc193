//! Integration tests for firmware and external kernel settings.

use std::path::PathBuf;

use krun::{KernelConfig, KernelFormat};
use krun_test_utils::require_context;
use tempfile::TempDir;

fn fake_file(dir: &TempDir, name: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, b"fake image").unwrap();
    path
}

#[test]
fn set_firmware() {
    let ctx = require_context!();
    let dir = TempDir::new().unwrap();
    ctx.set_firmware(fake_file(&dir, "firmware.bin")).unwrap();
}

#[test]
fn set_kernel_minimal_and_full() {
    let ctx = require_context!();
    let dir = TempDir::new().unwrap();
    let kernel = fake_file(&dir, "kernel.bin");

    ctx.set_kernel(&KernelConfig {
        path: kernel.clone(),
        ..Default::default()
    })
    .unwrap();

    ctx.set_kernel(&KernelConfig {
        path: kernel.clone(),
        cmdline: Some("console=ttyS0".into()),
        ..Default::default()
    })
    .unwrap();

    ctx.set_kernel(&KernelConfig {
        path: kernel,
        format: KernelFormat::Elf,
        initramfs: Some(fake_file(&dir, "initramfs.img")),
        cmdline: Some("root=/dev/vda".into()),
    })
    .unwrap();
}
