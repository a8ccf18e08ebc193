//! File-based VM description for `krunctl launch`.
//!
//! ```yaml
//! vm: { num_vcpus: 2, ram_mib: 1024 }
//! root: /srv/rootfs
//! exec:
//!   path: /bin/sh
//!   args: [/bin/sh, -c, "echo hello"]
//!   env: [PATH=/bin:/usr/bin]
//! port_map: ["8080:80"]
//! virtiofs:
//!   - { tag: data, path: /srv/data }
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context as _, bail};
use krun::{
    Context, DiskConfig, ExecConfig, KernelConfig, RootDiskRemountConfig, VirtioFsConfig,
    VmConfig, VsockPortConfig,
};
use serde::{Deserialize, Serialize};

/// Everything needed to configure one microVM.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VmSpec {
    #[serde(default)]
    pub vm: VmConfig,
    /// Host directory used as the guest root filesystem.
    #[serde(default)]
    pub root: Option<PathBuf>,
    #[serde(default)]
    pub kernel: Option<KernelConfig>,
    #[serde(default)]
    pub exec: Option<ExecConfig>,
    #[serde(default)]
    pub workdir: Option<String>,
    /// `RESOURCE=CUR:MAX` entries.
    #[serde(default)]
    pub rlimits: Vec<String>,
    /// `HOST:GUEST` entries. Absent exposes every guest port; empty exposes none.
    #[serde(default)]
    pub port_map: Option<Vec<String>>,
    #[serde(default)]
    pub virtiofs: Vec<VirtioFsConfig>,
    #[serde(default)]
    pub disks: Vec<DiskConfig>,
    #[serde(default)]
    pub root_disk_remount: Option<RootDiskRemountConfig>,
    #[serde(default)]
    pub vsock_ports: Vec<VsockPortConfig>,
    #[serde(default)]
    pub console_output: Option<PathBuf>,
    #[serde(default)]
    pub uid: Option<u32>,
    #[serde(default)]
    pub gid: Option<u32>,
}

impl VmSpec {
    /// Read a spec file, choosing the parser by extension (`.json`, `.yaml`, `.yml`).
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        let spec: VmSpec = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse {} as JSON", path.display()))?,
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse {} as YAML", path.display()))?,
            _ => bail!(
                "Unsupported config file extension for {} (expected .json, .yaml or .yml)",
                path.display()
            ),
        };

        spec.validate()?;
        Ok(spec)
    }

    /// Reject descriptions libkrun could never boot.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.root.is_none() && self.kernel.is_none() && self.root_disk_remount.is_none() {
            bail!("VM needs a root directory, a kernel or a root disk");
        }
        if self.vm.num_vcpus == 0 {
            bail!("num_vcpus must be at least 1");
        }
        if self.vm.ram_mib == 0 {
            bail!("ram_mib must be at least 1");
        }
        if self.exec.as_ref().is_some_and(|e| e.path.is_empty()) {
            bail!("exec.path must not be empty");
        }
        Ok(())
    }

    /// Apply every configured setting to `ctx`, in a fixed order.
    pub fn apply(&self, ctx: &Context) -> anyhow::Result<()> {
        ctx.set_vm_config(&self.vm)
            .context("Failed to set VM config")?;

        if let Some(root) = &self.root {
            ctx.set_root(root)
                .with_context(|| format!("Failed to set root {}", root.display()))?;
        }
        if let Some(kernel) = &self.kernel {
            ctx.set_kernel(kernel).context("Failed to set kernel")?;
        }
        for disk in &self.disks {
            ctx.add_disk(disk)
                .with_context(|| format!("Failed to add disk {}", disk.block_id))?;
        }
        if let Some(remount) = &self.root_disk_remount {
            ctx.set_root_disk_remount(remount)
                .context("Failed to set root disk remount")?;
        }
        for fs in &self.virtiofs {
            ctx.add_virtiofs(fs)
                .with_context(|| format!("Failed to add virtiofs share {}", fs.tag))?;
        }
        if let Some(exec) = &self.exec {
            ctx.set_exec(exec).context("Failed to set exec")?;
        }
        if let Some(workdir) = &self.workdir {
            ctx.set_workdir(workdir).context("Failed to set workdir")?;
        }
        if !self.rlimits.is_empty() {
            ctx.set_rlimits(&self.rlimits)
                .context("Failed to set rlimits")?;
        }
        if let Some(port_map) = &self.port_map {
            ctx.set_port_map(Some(port_map.as_slice()))
                .context("Failed to set port map")?;
        }
        for vsock in &self.vsock_ports {
            ctx.add_vsock_port(vsock)
                .with_context(|| format!("Failed to add vsock port {}", vsock.port))?;
        }
        if let Some(path) = &self.console_output {
            ctx.set_console_output(path)
                .context("Failed to set console output")?;
        }
        if let Some(uid) = self.uid {
            ctx.set_uid(uid).context("Failed to set uid")?;
        }
        if let Some(gid) = self.gid {
            ctx.set_gid(gid).context("Failed to set gid")?;
        }
        Ok(())
    }
}
