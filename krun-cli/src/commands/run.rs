use std::path::PathBuf;

use anyhow::Context as _;
use clap::Args;
use krun::{Context, ExecConfig, VirtioFsConfig, VmConfig};

/// Environment handed to the guest unless `--inherit-env` is given. Inheriting
/// the whole host environment can overflow the kernel command line.
const DEFAULT_ENV: &[&str] = &[
    "PATH=/usr/local/bin:/usr/bin:/bin:/usr/sbin:/sbin",
    "HOME=/root",
    "TERM=xterm-256color",
];

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Host directory to use as the guest root filesystem
    pub rootfs: PathBuf,

    /// Command to run, path relative to the rootfs, followed by its arguments
    #[arg(required = true, num_args = 1.., trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,

    /// Number of vCPUs
    #[arg(long, default_value_t = 2)]
    pub cpus: u8,

    /// RAM in MiB
    #[arg(long, default_value_t = 512)]
    pub memory: u32,

    /// Set an environment variable (KEY=VALUE), repeatable
    #[arg(short, long = "env", value_name = "KEY=VALUE")]
    pub env: Vec<String>,

    /// Let libkrun pass the host environment through instead of a minimal one
    #[arg(long, conflicts_with = "env")]
    pub inherit_env: bool,

    /// Working directory inside the guest
    #[arg(short, long)]
    pub workdir: Option<String>,

    /// Expose a guest port on the host (HOST:GUEST), repeatable
    #[arg(short, long = "publish", value_name = "HOST:GUEST")]
    pub publish: Vec<String>,

    /// Share a host directory with the guest (TAG:PATH), repeatable
    #[arg(long = "share", value_name = "TAG:PATH", value_parser = parse_share)]
    pub shares: Vec<VirtioFsConfig>,

    /// Resource limit for the guest process (RESOURCE=CUR:MAX), repeatable
    #[arg(long = "rlimit", value_name = "RESOURCE=CUR:MAX")]
    pub rlimits: Vec<String>,

    /// Write the guest console to a file instead of the terminal
    #[arg(long)]
    pub console_output: Option<PathBuf>,
}

impl RunArgs {
    fn exec_config(&self) -> ExecConfig {
        let exec = ExecConfig::new(self.command[0].clone(), self.command.clone());
        if self.inherit_env {
            return exec;
        }
        let mut env: Vec<String> = DEFAULT_ENV.iter().map(|e| e.to_string()).collect();
        env.extend(self.env.iter().cloned());
        exec.with_env(env)
    }
}

fn parse_share(value: &str) -> Result<VirtioFsConfig, String> {
    let (tag, path) = value
        .split_once(':')
        .ok_or_else(|| format!("expected TAG:PATH, got '{value}'"))?;
    if tag.is_empty() || path.is_empty() {
        return Err(format!("expected TAG:PATH, got '{value}'"));
    }
    Ok(VirtioFsConfig {
        tag: tag.to_string(),
        path: PathBuf::from(path),
        shm_size: None,
    })
}

pub fn execute(args: RunArgs, global: &crate::cli::GlobalFlags) -> anyhow::Result<()> {
    if !args.rootfs.is_dir() {
        anyhow::bail!("rootfs {} is not a directory", args.rootfs.display());
    }

    global.init_native_logging()?;
    let ctx = Context::create().context("Failed to create libkrun context")?;

    ctx.set_vm_config(&VmConfig {
        num_vcpus: args.cpus,
        ram_mib: args.memory,
    })
    .context("Failed to set VM config")?;
    ctx.set_root(&args.rootfs)
        .with_context(|| format!("Failed to set root {}", args.rootfs.display()))?;

    for share in &args.shares {
        ctx.add_virtiofs(share)
            .with_context(|| format!("Failed to share {} as {}", share.path.display(), share.tag))?;
    }

    let exec = args.exec_config();
    tracing::debug!(path = %exec.path, args = ?exec.args, "Configured guest command");
    ctx.set_exec(&exec).context("Failed to set exec")?;

    if let Some(workdir) = &args.workdir {
        ctx.set_workdir(workdir).context("Failed to set workdir")?;
    }
    if !args.rlimits.is_empty() {
        ctx.set_rlimits(&args.rlimits)
            .context("Failed to set rlimits")?;
    }
    if !args.publish.is_empty() {
        ctx.set_port_map(Some(args.publish.as_slice()))
            .context("Failed to set port map")?;
    }
    if let Some(path) = &args.console_output {
        ctx.set_console_output(path)
            .context("Failed to set console output")?;
    }

    super::start(ctx)
}
