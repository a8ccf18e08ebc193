#![allow(dead_code)]

use assert_cmd::Command;
use std::time::Duration;

/// A `krunctl` command with a timeout and quiet logging.
pub fn krunctl() -> Command {
    let bin_path = env!("CARGO_BIN_EXE_krunctl");
    let mut cmd = Command::new(bin_path);
    // You can override this with .timeout(Duration::from_secs(N))
    cmd.timeout(Duration::from_secs(60));
    cmd.env_remove("RUST_LOG");
    cmd.env("KRUN_LOG_LEVEL", "off");
    cmd
}

/// Whether the VM-booting tests can run here.
pub fn can_boot() -> bool {
    if !krun::native_available() || !krun_test_utils::kvm_available() {
        eprintln!("skipping: needs libkrun and a usable hypervisor");
        return false;
    }
    true
}
