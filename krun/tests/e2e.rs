//! End-to-end boot tests.
//!
//! A successful `start_enter` never returns, so the booting tests re-run this
//! test binary with `KRUN_E2E_HELPER=1`; the child configures a VM and hands
//! itself over to it, and the parent checks its output and exit code.

use std::path::Path;
use std::process::Command;

use krun::{Context, ExecConfig, VmConfig};
use krun_test_utils::{
    GUEST_EXIT_42, GUEST_OK, build_static_guest, init_native_logging, kvm_available,
    require_context, temp_rootfs,
};

const HELPER_ENV: &str = "KRUN_E2E_HELPER";
const ROOTFS_ENV: &str = "KRUN_E2E_ROOTFS";
const EXEC_ENV: &str = "KRUN_E2E_EXEC";

// ============================================================================
// HELPER (runs in the child)
// ============================================================================

#[test]
fn e2e_helper() {
    if std::env::var_os(HELPER_ENV).is_none() {
        return;
    }
    let rootfs = std::env::var(ROOTFS_ENV).expect("KRUN_E2E_ROOTFS must be set");
    let exec_path = std::env::var(EXEC_ENV).expect("KRUN_E2E_EXEC must be set");

    init_native_logging();
    let ctx = Context::create().expect("create");
    ctx.set_vm_config(&VmConfig {
        num_vcpus: 1,
        ram_mib: 256,
    })
    .expect("set_vm_config");
    ctx.set_root(&rootfs).expect("set_root");
    ctx.set_exec(&ExecConfig::new(exec_path.clone(), vec![exec_path]).with_env(vec![]))
        .expect("set_exec");
    ctx.set_workdir("/").expect("set_workdir");

    let err = ctx.start_enter().unwrap_err();
    eprintln!("e2e_helper: {err}");
    std::process::exit(1);
}

/// Re-run this binary as the VM host. Returns combined output and exit code.
fn run_guest(rootfs: &Path, exec_path: &str) -> (String, i32) {
    let exe = std::env::current_exe().expect("current_exe");
    let output = Command::new(exe)
        .args(["e2e_helper", "--exact", "--nocapture", "--test-threads=1"])
        .env(HELPER_ENV, "1")
        .env(ROOTFS_ENV, rootfs)
        .env(EXEC_ENV, exec_path)
        .output()
        .expect("failed to run e2e helper");

    let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
    text.push_str(&String::from_utf8_lossy(&output.stderr));
    (text, output.status.code().unwrap_or(-1))
}

fn can_boot() -> bool {
    if !krun::native_available() || !kvm_available() {
        eprintln!("skipping: needs libkrun and a usable hypervisor");
        return false;
    }
    true
}

// ============================================================================
// BOOT TESTS
// ============================================================================

#[cfg(target_os = "linux")]
#[test]
fn boot_and_exit_zero() {
    if !can_boot() {
        return;
    }
    let rootfs = temp_rootfs();
    build_static_guest(rootfs.path(), "guest", GUEST_OK).expect("build guest");

    let (output, code) = run_guest(rootfs.path(), "/guest");
    assert_eq!(code, 0, "output: {output}");
    assert!(output.contains("OK"), "output: {output}");
}

#[cfg(target_os = "linux")]
#[test]
fn exit_code_is_propagated() {
    if !can_boot() {
        return;
    }
    let rootfs = temp_rootfs();
    build_static_guest(rootfs.path(), "guest", GUEST_EXIT_42).expect("build guest");

    let (output, code) = run_guest(rootfs.path(), "/guest");
    assert_eq!(code, 42, "output: {output}");
}

// Without a hypervisor the start must fail and hand back an error instead of
// taking over the process.
#[test]
fn start_without_hypervisor_returns_error() {
    if kvm_available() {
        eprintln!("skipping: a hypervisor is present, start would take over the process");
        return;
    }
    let ctx = require_context!();
    let rootfs = temp_rootfs();
    ctx.set_vm_config(&VmConfig::default()).unwrap();
    ctx.set_root(rootfs.path()).unwrap();
    ctx.set_exec(&ExecConfig::new("/guest", vec!["/guest".into()])).unwrap();

    let err = ctx.start_enter().unwrap_err();
    assert_eq!(err.func(), "krun_start_enter");
}
