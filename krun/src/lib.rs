//! Safe Rust bindings for libkrun, a library for running workloads in
//! lightweight KVM / Hypervisor.framework microVMs.
//!
//! ```no_run
//! use krun::{Context, ExecConfig, VmConfig};
//!
//! # fn main() -> krun::KrunResult<()> {
//! let ctx = Context::create()?;
//! ctx.set_vm_config(&VmConfig { num_vcpus: 1, ram_mib: 512 })?;
//! ctx.set_root("/srv/rootfs")?;
//! ctx.set_exec(&ExecConfig::new("/bin/sh", vec!["/bin/sh".into(), "-c".into(), "uname -a".into()]))?;
//! // Only returns if the VM failed to start.
//! ctx.start_enter()
//! # }
//! ```
//!
//! Every failure is a [`KrunError`]: the name of the libkrun function plus the
//! errno it reported. Entry points behind the `blk`, `net` and `tee` features
//! report `ENOSYS` when the feature is off.

pub mod config;
pub mod constants;
mod context;
pub mod error;
pub mod host;
pub mod logging;
pub mod marshal;
pub mod status;

pub use config::{
    ConsolePortInOutConfig, ConsolePortTtyConfig, DiskConfig, DiskFormat, ExecConfig, GpuConfig,
    KernelConfig, KernelFormat, NetEndpoint, NetTapConfig, NetUnixConfig, ParseConfigError,
    RootDiskRemountConfig, SerialConsoleConfig, SyncMode, VirtioConsoleConfig, VirtioFsConfig,
    VmConfig, VsockPortConfig,
};
pub use context::Context;
pub use error::{KrunError, KrunResult};
pub use host::{Feature, VirtualizationSupport};
pub use logging::{LogConfig, LogLevel, LogStyle, LogTarget};

/// Errno type carried by [`KrunError`].
pub use nix::errno::Errno;

/// Whether this build links a real libkrun. False for stub builds, where
/// every native call reports `ENOSYS`.
pub fn native_available() -> bool {
    !libkrun_sys::STUB
}
