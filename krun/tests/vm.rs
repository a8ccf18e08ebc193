//! Integration tests for VM-level settings.

use krun::VmConfig;
use krun_test_utils::require_context;

#[test]
fn set_vm_config_accepts_defaults() {
    let ctx = require_context!();
    ctx.set_vm_config(&VmConfig::default()).unwrap();
}

#[test]
fn set_root_accepts_existing_directory() {
    let ctx = require_context!();
    let dir = tempfile::tempdir().unwrap();
    ctx.set_root(dir.path()).unwrap();
}

#[cfg(target_os = "macos")]
#[test]
fn set_nested_virt_toggles() {
    let ctx = require_context!();
    for enabled in [true, false] {
        ctx.set_nested_virt(enabled)
            .unwrap_or_else(|e| panic!("set_nested_virt({enabled}): {e}"));
    }
}

#[cfg(target_os = "linux")]
#[test]
fn split_irqchip_toggles() {
    let ctx = require_context!();
    for enable in [true, false] {
        ctx.split_irqchip(enable)
            .unwrap_or_else(|e| panic!("split_irqchip({enable}): {e}"));
    }
}

#[test]
fn set_uid_and_gid_to_current_user() {
    let ctx = require_context!();
    ctx.set_uid(unsafe { libc::getuid() }).unwrap();
    ctx.set_gid(unsafe { libc::getgid() }).unwrap();
}

#[test]
fn set_smbios_oem_strings_populated_and_empty() {
    let ctx = require_context!();
    ctx.set_smbios_oem_strings(&["key1=val1", "key2=val2"]).unwrap();
    ctx.set_smbios_oem_strings::<&str>(&[]).unwrap();
}
