//! Library and host introspection.
//!
//! [`max_vcpus`], [`check_nested_virt`] and [`has_feature`] ask libkrun what it
//! supports. [`check_virtualization_support`] probes the host itself (KVM on
//! Linux, Hypervisor.framework on macOS) without calling into libkrun, so a
//! caller can explain up front why a VM will not start.

use serde::{Deserialize, Serialize};

use crate::error::KrunResult;
use crate::status::status_to_value;

/// Build-time features a libkrun library may have been compiled with.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u64)]
pub enum Feature {
    Net = libkrun_sys::KRUN_FEATURE_NET,
    Blk = libkrun_sys::KRUN_FEATURE_BLK,
    Gpu = libkrun_sys::KRUN_FEATURE_GPU,
    Snd = libkrun_sys::KRUN_FEATURE_SND,
    Input = libkrun_sys::KRUN_FEATURE_INPUT,
    Efi = libkrun_sys::KRUN_FEATURE_EFI,
    Tee = libkrun_sys::KRUN_FEATURE_TEE,
    AmdSev = libkrun_sys::KRUN_FEATURE_AMD_SEV,
    IntelTdx = libkrun_sys::KRUN_FEATURE_INTEL_TDX,
    AwsNitro = libkrun_sys::KRUN_FEATURE_AWS_NITRO,
    VirglResourceMap2 = libkrun_sys::KRUN_FEATURE_VIRGL_RESOURCE_MAP2,
}

impl Feature {
    pub const ALL: [Feature; 11] = [
        Feature::Net,
        Feature::Blk,
        Feature::Gpu,
        Feature::Snd,
        Feature::Input,
        Feature::Efi,
        Feature::Tee,
        Feature::AmdSev,
        Feature::IntelTdx,
        Feature::AwsNitro,
        Feature::VirglResourceMap2,
    ];

    /// Human-readable name.
    pub fn name(self) -> &'static str {
        match self {
            Feature::Net => "Networking",
            Feature::Blk => "Block devices",
            Feature::Gpu => "GPU",
            Feature::Snd => "Sound",
            Feature::Input => "Input",
            Feature::Efi => "EFI",
            Feature::Tee => "TEE",
            Feature::AmdSev => "AMD SEV",
            Feature::IntelTdx => "Intel TDX",
            Feature::AwsNitro => "AWS Nitro",
            Feature::VirglResourceMap2 => "Virgl Resource Map2",
        }
    }
}

/// Whether libkrun was built with `feature`.
///
/// Older libraries that don't know the feature id report `EINVAL`.
pub fn has_feature(feature: Feature) -> KrunResult<bool> {
    let value = status_to_value("krun_has_feature", unsafe {
        libkrun_sys::krun_has_feature(feature as u64)
    })?;
    tracing::trace!(?feature, value, "krun_has_feature returned");
    Ok(value == 1)
}

/// Maximum number of vCPUs the hypervisor supports.
pub fn max_vcpus() -> KrunResult<u32> {
    status_to_value("krun_get_max_vcpus", unsafe {
        libkrun_sys::krun_get_max_vcpus()
    })
}

/// Whether nested virtualization is available. Only meaningful on macOS;
/// elsewhere libkrun reports an error.
pub fn check_nested_virt() -> KrunResult<bool> {
    let value = status_to_value("krun_check_nested_virt", unsafe {
        libkrun_sys::krun_check_nested_virt()
    })?;
    Ok(value == 1)
}

/// Outcome of probing the host for a usable hypervisor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualizationSupport {
    pub available: bool,
    /// Human-readable reason for the status.
    pub reason: String,
}

impl VirtualizationSupport {
    fn available(reason: impl Into<String>) -> Self {
        Self {
            available: true,
            reason: reason.into(),
        }
    }

    fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            available: false,
            reason: reason.into(),
        }
    }
}

/// Check if the host supports the virtualization technology libkrun needs:
/// - **Linux**: `/dev/kvm` exists and can be opened read-write
/// - **macOS**: Apple Silicon with `sysctl kern.hv_support` = 1
pub fn check_virtualization_support() -> VirtualizationSupport {
    #[cfg(target_os = "linux")]
    {
        check_linux_kvm()
    }

    #[cfg(target_os = "macos")]
    {
        check_macos_hypervisor()
    }

    #[cfg(not(any(target_os = "linux", target_os = "macos")))]
    {
        VirtualizationSupport::unavailable("libkrun only supports Linux and macOS")
    }
}

#[cfg(target_os = "linux")]
fn check_linux_kvm() -> VirtualizationSupport {
    use std::path::Path;

    const KVM_DEVICE: &str = "/dev/kvm";
    let kvm_path = Path::new(KVM_DEVICE);

    if !kvm_path.exists() {
        return VirtualizationSupport::unavailable(format!(
            "{KVM_DEVICE} does not exist (is KVM enabled and the kvm module loaded?)"
        ));
    }

    match std::fs::OpenOptions::new()
        .read(true)
        .write(true)
        .open(kvm_path)
    {
        Ok(_) => VirtualizationSupport::available("KVM is available and accessible"),
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            VirtualizationSupport::unavailable(format!(
                "{KVM_DEVICE} exists but access denied (add your user to the kvm group)"
            ))
        }
        Err(e) => VirtualizationSupport::unavailable(format!(
            "{KVM_DEVICE} exists but couldn't be accessed: {e}"
        )),
    }
}

#[cfg(target_os = "macos")]
fn check_macos_hypervisor() -> VirtualizationSupport {
    #[cfg(target_arch = "aarch64")]
    {
        use std::process::Command;

        let output = match Command::new("sysctl").arg("kern.hv_support").output() {
            Ok(output) if output.status.success() => output,
            Ok(_) => return VirtualizationSupport::unavailable("sysctl kern.hv_support failed"),
            Err(e) => {
                return VirtualizationSupport::unavailable(format!(
                    "Failed to check Hypervisor.framework support: {e}"
                ));
            }
        };

        // "kern.hv_support: 1" or "kern.hv_support: 0"
        let stdout = String::from_utf8_lossy(&output.stdout);
        let value = stdout.split(':').nth(1).map(|s| s.trim()).unwrap_or("0");
        if value == "1" {
            VirtualizationSupport::available("Hypervisor.framework is available (Apple Silicon)")
        } else {
            VirtualizationSupport::unavailable("Hypervisor.framework is not available")
        }
    }

    #[cfg(not(target_arch = "aarch64"))]
    {
        VirtualizationSupport::unavailable(format!(
            "Unsupported architecture: {} (libkrun on macOS requires Apple Silicon)",
            std::env::consts::ARCH
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_ids_match_header() {
        assert_eq!(Feature::Net as u64, 0);
        assert_eq!(Feature::Tee as u64, 6);
        assert_eq!(Feature::VirglResourceMap2 as u64, 10);
        assert_eq!(Feature::ALL.len(), 11);
    }

    #[test]
    fn test_virtualization_check_runs() {
        // Result depends on the machine; it must not panic and must explain itself.
        let support = check_virtualization_support();
        assert!(!support.reason.is_empty());
    }
}
