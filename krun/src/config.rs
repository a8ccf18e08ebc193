//! Configuration types passed to [`Context`](crate::Context) setters.
//!
//! Setters that take several related parameters accept one of these structs
//! rather than a positional argument list. All of them are serde types so a
//! whole VM description can be loaded from a file.

use std::os::unix::io::RawFd;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A string did not name a known variant of a configuration enum.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind}: '{value}' (supported: {supported})")]
pub struct ParseConfigError {
    kind: &'static str,
    value: String,
    supported: &'static str,
}

/// Disk image format for [`DiskConfig`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u32)]
pub enum DiskFormat {
    #[default]
    Raw = libkrun_sys::KRUN_DISK_FORMAT_RAW,
    Qcow2 = libkrun_sys::KRUN_DISK_FORMAT_QCOW2,
    /// Only FLAT/ZERO VMDK images without delta links.
    Vmdk = libkrun_sys::KRUN_DISK_FORMAT_VMDK,
}

impl FromStr for DiskFormat {
    type Err = ParseConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "raw" => Ok(DiskFormat::Raw),
            "qcow2" => Ok(DiskFormat::Qcow2),
            "vmdk" => Ok(DiskFormat::Vmdk),
            _ => Err(ParseConfigError {
                kind: "disk format",
                value: s.to_string(),
                supported: "raw, qcow2, vmdk",
            }),
        }
    }
}

/// How VIRTIO_BLK_F_FLUSH requests are honored.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u32)]
pub enum SyncMode {
    /// Ignore flush requests. May lose data.
    None = libkrun_sys::KRUN_SYNC_NONE,
    /// Honor flushes but relax strict hardware syncing on macOS.
    #[default]
    Relaxed = libkrun_sys::KRUN_SYNC_RELAXED,
    /// Flush all the way to the physical disk.
    Full = libkrun_sys::KRUN_SYNC_FULL,
}

/// Kernel image format for [`KernelConfig`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u32)]
pub enum KernelFormat {
    #[default]
    Raw = libkrun_sys::KRUN_KERNEL_FORMAT_RAW,
    Elf = libkrun_sys::KRUN_KERNEL_FORMAT_ELF,
    PeGz = libkrun_sys::KRUN_KERNEL_FORMAT_PE_GZ,
    ImageBz2 = libkrun_sys::KRUN_KERNEL_FORMAT_IMAGE_BZ2,
    ImageGz = libkrun_sys::KRUN_KERNEL_FORMAT_IMAGE_GZ,
    ImageZstd = libkrun_sys::KRUN_KERNEL_FORMAT_IMAGE_ZSTD,
}

impl FromStr for KernelFormat {
    type Err = ParseConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "raw" => Ok(KernelFormat::Raw),
            "elf" => Ok(KernelFormat::Elf),
            "pe_gz" => Ok(KernelFormat::PeGz),
            "image_bz2" => Ok(KernelFormat::ImageBz2),
            "image_gz" => Ok(KernelFormat::ImageGz),
            "image_zstd" => Ok(KernelFormat::ImageZstd),
            _ => Err(ParseConfigError {
                kind: "kernel format",
                value: s.to_string(),
                supported: "raw, elf, pe_gz, image_bz2, image_gz, image_zstd",
            }),
        }
    }
}

/// Basic microVM resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VmConfig {
    pub num_vcpus: u8,
    pub ram_mib: u32,
}

impl Default for VmConfig {
    fn default() -> Self {
        Self {
            num_vcpus: 2,
            ram_mib: 512,
        }
    }
}

/// The process to run inside the microVM.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecConfig {
    /// Executable path, relative to the guest root.
    pub path: String,
    /// Argument vector; `args[0]` is usually the program name. Always sent as
    /// an array, so an empty vector reaches libkrun as an empty list, never NULL.
    #[serde(default)]
    pub args: Vec<String>,
    /// `KEY=value` entries. `None` lets libkrun derive the environment from
    /// the current process; `Some(vec![])` means no variables at all.
    #[serde(default)]
    pub env: Option<Vec<String>>,
}

impl ExecConfig {
    pub fn new(path: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            path: path.into(),
            args,
            env: None,
        }
    }

    pub fn with_env(mut self, env: Vec<String>) -> Self {
        self.env = Some(env);
        self
    }
}

/// Kernel to load instead of the bundled libkrunfw one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KernelConfig {
    pub path: PathBuf,
    #[serde(default)]
    pub format: KernelFormat,
    #[serde(default)]
    pub initramfs: Option<PathBuf>,
    #[serde(default)]
    pub cmdline: Option<String>,
}

/// A disk image attached as a virtio-blk device.
///
/// Non-raw images (qcow2) can reference other files, which libkrun opens and
/// exposes to the guest as well.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiskConfig {
    /// Block device identifier, e.g. "vda".
    pub block_id: String,
    pub path: PathBuf,
    #[serde(default)]
    pub format: DiskFormat,
    #[serde(default)]
    pub read_only: bool,
    #[serde(default)]
    pub direct_io: bool,
    #[serde(default)]
    pub sync_mode: SyncMode,
}

impl DiskConfig {
    pub fn new(block_id: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            block_id: block_id.into(),
            path: path.into(),
            format: DiskFormat::default(),
            read_only: false,
            direct_io: false,
            sync_mode: SyncMode::default(),
        }
    }
}

/// Use a configured block device as the guest root filesystem.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootDiskRemountConfig {
    /// Device node inside the guest, e.g. "/dev/vda1".
    pub device: String,
    /// Filesystem type ("ext4", "auto"); `None` passes NULL.
    #[serde(default)]
    pub fstype: Option<String>,
    /// Comma-separated mount options; `None` passes NULL.
    #[serde(default)]
    pub options: Option<String>,
}

/// A host directory shared with the guest over virtio-fs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VirtioFsConfig {
    /// Tag the guest uses to mount the share.
    pub tag: String,
    pub path: PathBuf,
    /// DAX window size in bytes; `None` keeps libkrun's default.
    #[serde(default)]
    pub shm_size: Option<u64>,
}

/// Where a unix-socket network backend is reached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NetEndpoint {
    /// libkrun connects to the socket itself.
    Path(PathBuf),
    /// An already connected socket.
    Fd(RawFd),
}

/// virtio-net device backed by a unix stream or datagram socket
/// (passt, socket_vmnet, gvproxy, vmnet-helper).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetUnixConfig {
    pub endpoint: NetEndpoint,
    pub mac: [u8; 6],
    /// Bitmask of `network_features::NET_FEATURE_*`.
    #[serde(default)]
    pub features: u32,
    /// Bitmask of `network_features::NET_FLAG_*`.
    #[serde(default)]
    pub flags: u32,
}

/// virtio-net device backed by a TAP interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetTapConfig {
    pub tap_name: String,
    pub mac: [u8; 6],
    #[serde(default)]
    pub features: u32,
    #[serde(default)]
    pub flags: u32,
}

/// Maps a guest vsock port to a host unix socket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VsockPortConfig {
    pub port: u32,
    pub path: PathBuf,
    /// When true the guest expects the host side to initiate connections.
    #[serde(default)]
    pub listen: bool,
}

/// virtio-gpu device options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GpuConfig {
    /// Bitmask of `virgl_flags::VIRGL_*`.
    pub virgl_flags: u32,
    /// Host SHM window (guest vRAM) in bytes; `None` keeps the default.
    #[serde(default)]
    pub shm_size: Option<u64>,
}

/// virtio-console device on the given descriptors.
///
/// TTY descriptors get a single console port; others get extra ports for
/// stdin/stdout/stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VirtioConsoleConfig {
    pub input_fd: RawFd,
    pub output_fd: RawFd,
    pub err_fd: RawFd,
}

impl VirtioConsoleConfig {
    /// The current process's stdin, stdout and stderr.
    pub fn stdio() -> Self {
        Self {
            input_fd: libc::STDIN_FILENO,
            output_fd: libc::STDOUT_FILENO,
            err_fd: libc::STDERR_FILENO,
        }
    }
}

/// Legacy serial device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerialConsoleConfig {
    pub input_fd: RawFd,
    pub output_fd: RawFd,
}

/// TTY port on a multi-port console; supports window resize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsolePortTtyConfig {
    pub console_id: u32,
    /// Port name seen by the guest, may be empty.
    #[serde(default)]
    pub name: String,
    pub tty_fd: RawFd,
}

/// Plain I/O port on a multi-port console.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsolePortInOutConfig {
    pub console_id: u32,
    #[serde(default)]
    pub name: String,
    pub input_fd: RawFd,
    pub output_fd: RawFd,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disk_format_from_str() {
        assert_eq!("raw".parse::<DiskFormat>(), Ok(DiskFormat::Raw));
        assert_eq!("QCOW2".parse::<DiskFormat>(), Ok(DiskFormat::Qcow2));
        assert_eq!("vmdk".parse::<DiskFormat>(), Ok(DiskFormat::Vmdk));

        let err = "vhd".parse::<DiskFormat>().unwrap_err();
        assert!(err.to_string().contains("unknown disk format: 'vhd'"));
    }

    #[test]
    fn test_kernel_format_from_str() {
        assert_eq!("elf".parse::<KernelFormat>(), Ok(KernelFormat::Elf));
        assert_eq!("image-gz".parse::<KernelFormat>(), Ok(KernelFormat::ImageGz));
        assert!("bzImage".parse::<KernelFormat>().is_err());
    }

    #[test]
    fn test_native_values() {
        assert_eq!(DiskFormat::Vmdk as u32, 2);
        assert_eq!(SyncMode::Full as u32, 2);
        assert_eq!(KernelFormat::ImageZstd as u32, 5);
    }

    #[test]
    fn test_disk_config_defaults() {
        let disk = DiskConfig::new("vda", "/tmp/disk.img");
        assert_eq!(disk.format, DiskFormat::Raw);
        assert_eq!(disk.sync_mode, SyncMode::Relaxed);
        assert!(!disk.read_only && !disk.direct_io);
    }

    #[test]
    fn test_exec_env_none_vs_empty_survives_serde() {
        let inherit: ExecConfig = serde_json::from_str(r#"{"path":"/bin/sh"}"#).unwrap();
        assert_eq!(inherit.env, None);

        let empty: ExecConfig = serde_json::from_str(r#"{"path":"/bin/sh","env":[]}"#).unwrap();
        assert_eq!(empty.env, Some(vec![]));
    }

    #[test]
    fn test_net_endpoint_serde() {
        let cfg: NetUnixConfig = serde_json::from_str(
            r#"{"endpoint":{"path":"/tmp/passt.sock"},"mac":[222,173,190,239,0,1]}"#,
        )
        .unwrap();
        assert_eq!(cfg.endpoint, NetEndpoint::Path("/tmp/passt.sock".into()));
        assert_eq!(cfg.features, 0);
    }
}
