use std::path::PathBuf;

use anyhow::Context as _;
use clap::Args;
use krun::{
    Context, DiskConfig, DiskFormat, KernelConfig, KernelFormat, RootDiskRemountConfig,
    VirtioConsoleConfig, VirtioFsConfig, VmConfig,
};

#[derive(Args, Debug)]
pub struct BootArgs {
    /// Kernel image
    #[arg(long)]
    pub kernel: PathBuf,

    /// Kernel image format: raw, elf, pe_gz, image_bz2, image_gz, image_zstd
    #[arg(long, default_value = "raw")]
    pub kernel_format: KernelFormat,

    /// Initramfs image
    #[arg(long)]
    pub initramfs: Option<PathBuf>,

    /// Kernel command line
    #[arg(long, default_value = "console=hvc0 root=/dev/vda1 rw")]
    pub cmdline: String,

    /// Root disk image, attached as vda
    #[arg(long)]
    pub disk: PathBuf,

    /// Disk image format: raw, qcow2, vmdk
    #[arg(long, default_value = "raw")]
    pub format: DiskFormat,

    /// Guest device holding the root filesystem
    #[arg(long, default_value = "/dev/vda1")]
    pub root_device: String,

    /// Root filesystem type
    #[arg(long, default_value = "ext4")]
    pub fstype: String,

    /// Host directory to share with the guest under the tag "shared"
    #[arg(long)]
    pub shared: Option<PathBuf>,

    /// Number of vCPUs
    #[arg(long, default_value_t = 2)]
    pub cpus: u8,

    /// RAM in MiB
    #[arg(long, default_value_t = 1024)]
    pub memory: u32,
}

pub fn execute(args: BootArgs, global: &crate::cli::GlobalFlags) -> anyhow::Result<()> {
    global.init_native_logging()?;
    let ctx = Context::create().context("Failed to create libkrun context")?;

    ctx.set_vm_config(&VmConfig {
        num_vcpus: args.cpus,
        ram_mib: args.memory,
    })
    .context("Failed to set VM config")?;

    ctx.set_kernel(&KernelConfig {
        path: args.kernel.clone(),
        format: args.kernel_format,
        initramfs: args.initramfs.clone(),
        cmdline: Some(args.cmdline.clone()),
    })
    .with_context(|| format!("Failed to set kernel {}", args.kernel.display()))?;

    let disk = DiskConfig {
        format: args.format,
        ..DiskConfig::new("vda", args.disk.clone())
    };
    ctx.add_disk(&disk)
        .with_context(|| format!("Failed to add disk {}", args.disk.display()))?;

    ctx.set_root_disk_remount(&RootDiskRemountConfig {
        device: args.root_device.clone(),
        fstype: Some(args.fstype.clone()),
        options: None,
    })
    .context("Failed to set root disk remount")?;

    if let Some(shared) = &args.shared {
        ctx.add_virtiofs(&VirtioFsConfig {
            tag: "shared".into(),
            path: shared.clone(),
            shm_size: None,
        })
        .with_context(|| format!("Failed to share {}", shared.display()))?;
    }

    ctx.add_virtio_console_default(&VirtioConsoleConfig::stdio())
        .context("Failed to add console")?;

    super::start(ctx)
}
