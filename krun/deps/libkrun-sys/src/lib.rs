//! Low-level FFI bindings to libkrun
//!
//! This crate provides raw, unsafe bindings to the libkrun C library.
//! For a safe, idiomatic Rust API, use the higher-level wrapper in the `krun` crate.
//!
//! Every entry point returns an `i32`: negative values are negated errno codes,
//! non-negative values mean success and sometimes carry a result (a context id,
//! a display index, a boolean answer).
//!
//! Entry points that only exist in libkrun builds with optional devices are
//! gated behind the `blk`, `net` and `tee` cargo features.
//!
//! When the build script cannot find libkrun (or `LIBKRUN_SYS_STUB` is set) the
//! crate is compiled with `cfg(libkrun_stub)`: every function keeps its
//! signature but returns `-ENOSYS` without touching any native code.

use std::os::raw::{c_char, c_int, c_void};

/// True when this crate was built without a native libkrun to link against.
pub const STUB: bool = cfg!(libkrun_stub);

// Log constants from libkrun.h
pub const KRUN_LOG_TARGET_DEFAULT: c_int = -1;
pub const KRUN_LOG_TARGET_STDOUT: c_int = 1;
pub const KRUN_LOG_TARGET_STDERR: c_int = 2;

pub const KRUN_LOG_LEVEL_OFF: u32 = 0;
pub const KRUN_LOG_LEVEL_ERROR: u32 = 1;
pub const KRUN_LOG_LEVEL_WARN: u32 = 2;
pub const KRUN_LOG_LEVEL_INFO: u32 = 3;
pub const KRUN_LOG_LEVEL_DEBUG: u32 = 4;
pub const KRUN_LOG_LEVEL_TRACE: u32 = 5;

pub const KRUN_LOG_STYLE_AUTO: u32 = 0;
pub const KRUN_LOG_STYLE_ALWAYS: u32 = 1;
pub const KRUN_LOG_STYLE_NEVER: u32 = 2;

/// Don't let `RUST_LOG`-style environment variables override the log settings.
pub const KRUN_LOG_OPTION_NO_ENV: u32 = 1;

// Disk format constants from libkrun.h
pub const KRUN_DISK_FORMAT_RAW: u32 = 0;
pub const KRUN_DISK_FORMAT_QCOW2: u32 = 1;
pub const KRUN_DISK_FORMAT_VMDK: u32 = 2;

// Sync modes for VIRTIO_BLK_F_FLUSH
pub const KRUN_SYNC_NONE: u32 = 0;
pub const KRUN_SYNC_RELAXED: u32 = 1;
pub const KRUN_SYNC_FULL: u32 = 2;

// Kernel image formats
pub const KRUN_KERNEL_FORMAT_RAW: u32 = 0;
pub const KRUN_KERNEL_FORMAT_ELF: u32 = 1;
pub const KRUN_KERNEL_FORMAT_PE_GZ: u32 = 2;
pub const KRUN_KERNEL_FORMAT_IMAGE_BZ2: u32 = 3;
pub const KRUN_KERNEL_FORMAT_IMAGE_GZ: u32 = 4;
pub const KRUN_KERNEL_FORMAT_IMAGE_ZSTD: u32 = 5;

// Build-time feature ids for krun_has_feature
pub const KRUN_FEATURE_NET: u64 = 0;
pub const KRUN_FEATURE_BLK: u64 = 1;
pub const KRUN_FEATURE_GPU: u64 = 2;
pub const KRUN_FEATURE_SND: u64 = 3;
pub const KRUN_FEATURE_INPUT: u64 = 4;
pub const KRUN_FEATURE_EFI: u64 = 5;
pub const KRUN_FEATURE_TEE: u64 = 6;
pub const KRUN_FEATURE_AMD_SEV: u64 = 7;
pub const KRUN_FEATURE_INTEL_TDX: u64 = 8;
pub const KRUN_FEATURE_AWS_NITRO: u64 = 9;
pub const KRUN_FEATURE_VIRGL_RESOURCE_MAP2: u64 = 10;

/// Same as VIRTIO_GPU_MAX_SCANOUTS.
pub const KRUN_MAX_DISPLAYS: u32 = 16;

/// Declares the libkrun API once and expands it either to real `extern "C"`
/// declarations or, in stub mode, to functions returning `-ENOSYS`.
macro_rules! krun_api {
    ($(
        $(#[$attr:meta])*
        pub fn $name:ident($($arg:ident: $ty:ty),* $(,)?) -> i32;
    )*) => {
        #[cfg(not(libkrun_stub))]
        extern "C" {
            $(
                $(#[$attr])*
                pub fn $name($($arg: $ty),*) -> i32;
            )*
        }

        $(
            #[cfg(libkrun_stub)]
            $(#[$attr])*
            #[allow(unused_variables, clippy::missing_safety_doc)]
            pub unsafe fn $name($($arg: $ty),*) -> i32 {
                -libc::ENOSYS
            }
        )*
    };
}

krun_api! {
    /// Initialize logging. Only the first call in a process takes effect.
    pub fn krun_init_log(target: c_int, level: u32, style: u32, options: u32) -> i32;
    /// Set the log level. Initializes logging with default target and style.
    pub fn krun_set_log_level(level: u32) -> i32;

    pub fn krun_create_ctx() -> i32;
    pub fn krun_free_ctx(ctx_id: u32) -> i32;
    /// Start and enter the microVM. Only returns on failure; otherwise the
    /// process exits with the workload's exit code.
    pub fn krun_start_enter(ctx_id: u32) -> i32;

    pub fn krun_set_vm_config(ctx_id: u32, num_vcpus: u8, ram_mib: u32) -> i32;
    pub fn krun_set_root(ctx_id: u32, root_path: *const c_char) -> i32;
    pub fn krun_set_nested_virt(ctx_id: u32, enabled: bool) -> i32;
    pub fn krun_split_irqchip(ctx_id: u32, enable: bool) -> i32;
    /// Set the uid before starting the microVM.
    pub fn krun_setuid(ctx_id: u32, uid: libc::uid_t) -> i32;
    /// Set the gid before starting the microVM.
    pub fn krun_setgid(ctx_id: u32, gid: libc::gid_t) -> i32;
    pub fn krun_set_smbios_oem_strings(ctx_id: u32, oem_strings: *const *const c_char) -> i32;
    /// Only available in libkrun-efi.
    pub fn krun_get_shutdown_eventfd(ctx_id: u32) -> i32;

    pub fn krun_set_exec(
        ctx_id: u32,
        exec_path: *const c_char,
        argv: *const *const c_char,
        envp: *const *const c_char,
    ) -> i32;
    pub fn krun_set_env(ctx_id: u32, envp: *const *const c_char) -> i32;
    pub fn krun_set_workdir(ctx_id: u32, workdir_path: *const c_char) -> i32;
    pub fn krun_set_rlimits(ctx_id: u32, rlimits: *const *const c_char) -> i32;

    pub fn krun_set_firmware(ctx_id: u32, firmware_path: *const c_char) -> i32;
    pub fn krun_set_kernel(
        ctx_id: u32,
        kernel_path: *const c_char,
        kernel_format: u32,
        initramfs: *const c_char,
        cmdline: *const c_char,
    ) -> i32;

    pub fn krun_add_virtiofs(
        ctx_id: u32,
        mount_tag: *const c_char,
        host_path: *const c_char,
    ) -> i32;
    pub fn krun_add_virtiofs2(
        ctx_id: u32,
        mount_tag: *const c_char,
        host_path: *const c_char,
        shm_size: u64,
    ) -> i32;

    #[cfg(feature = "blk")]
    pub fn krun_add_disk3(
        ctx_id: u32,
        block_id: *const c_char,
        disk_path: *const c_char,
        disk_format: u32,
        read_only: bool,
        direct_io: bool,
        sync_mode: u32,
    ) -> i32;
    #[cfg(feature = "blk")]
    pub fn krun_set_root_disk_remount(
        ctx_id: u32,
        device: *const c_char,
        fstype: *const c_char,
        options: *const c_char,
    ) -> i32;

    pub fn krun_set_port_map(ctx_id: u32, port_map: *const *const c_char) -> i32;
    #[cfg(feature = "net")]
    pub fn krun_add_net_unixstream(
        ctx_id: u32,
        c_path: *const c_char,
        fd: c_int,
        c_mac: *const u8,
        features: u32,
        flags: u32,
    ) -> i32;
    #[cfg(feature = "net")]
    pub fn krun_add_net_unixgram(
        ctx_id: u32,
        c_path: *const c_char,
        fd: c_int,
        c_mac: *const u8,
        features: u32,
        flags: u32,
    ) -> i32;
    #[cfg(feature = "net")]
    pub fn krun_add_net_tap(
        ctx_id: u32,
        c_tap_name: *const c_char,
        c_mac: *const u8,
        features: u32,
        flags: u32,
    ) -> i32;
    #[cfg(feature = "net")]
    pub fn krun_set_net_mac(ctx_id: u32, c_mac: *const u8) -> i32;

    /// Set a file path to redirect the implicit console output to.
    ///
    /// Must be called before `krun_start_enter`.
    pub fn krun_set_console_output(ctx_id: u32, filepath: *const c_char) -> i32;
    pub fn krun_disable_implicit_console(ctx_id: u32) -> i32;
    pub fn krun_set_kernel_console(ctx_id: u32, console_id: *const c_char) -> i32;
    pub fn krun_add_virtio_console_default(
        ctx_id: u32,
        input_fd: c_int,
        output_fd: c_int,
        err_fd: c_int,
    ) -> i32;
    pub fn krun_add_serial_console_default(ctx_id: u32, input_fd: c_int, output_fd: c_int) -> i32;
    /// Returns the console id on success.
    pub fn krun_add_virtio_console_multiport(ctx_id: u32) -> i32;
    pub fn krun_add_console_port_tty(
        ctx_id: u32,
        console_id: u32,
        name: *const c_char,
        tty_fd: c_int,
    ) -> i32;
    pub fn krun_add_console_port_inout(
        ctx_id: u32,
        console_id: u32,
        name: *const c_char,
        input_fd: c_int,
        output_fd: c_int,
    ) -> i32;

    pub fn krun_set_gpu_options(ctx_id: u32, virgl_flags: u32) -> i32;
    pub fn krun_set_gpu_options2(ctx_id: u32, virgl_flags: u32, shm_size: u64) -> i32;
    /// Returns the display id on success.
    pub fn krun_add_display(ctx_id: u32, width: u32, height: u32) -> i32;
    pub fn krun_display_set_edid(
        ctx_id: u32,
        display_id: u32,
        edid: *const u8,
        size: libc::size_t,
    ) -> i32;
    pub fn krun_display_set_dpi(ctx_id: u32, display_id: u32, dpi: u32) -> i32;
    pub fn krun_display_set_physical_size(
        ctx_id: u32,
        display_id: u32,
        width_mm: u16,
        height_mm: u16,
    ) -> i32;
    pub fn krun_display_set_refresh_rate(ctx_id: u32, display_id: u32, refresh_rate: u32) -> i32;
    pub fn krun_set_display_backend(
        ctx_id: u32,
        display_backend: *const c_void,
        backend_size: libc::size_t,
    ) -> i32;
    pub fn krun_add_input_device_fd(ctx_id: u32, input_fd: c_int) -> i32;
    pub fn krun_add_input_device(
        ctx_id: u32,
        config_backend: *const c_void,
        config_backend_size: libc::size_t,
        events_backend: *const c_void,
        events_backend_size: libc::size_t,
    ) -> i32;
    pub fn krun_set_snd_device(ctx_id: u32, enable: bool) -> i32;

    pub fn krun_add_vsock_port2(
        ctx_id: u32,
        port: u32,
        filepath: *const c_char,
        listen: bool,
    ) -> i32;
    pub fn krun_add_vsock(ctx_id: u32, tsi_features: u32) -> i32;
    pub fn krun_disable_implicit_vsock(ctx_id: u32) -> i32;

    #[cfg(feature = "tee")]
    pub fn krun_set_tee_config_file(ctx_id: u32, filepath: *const c_char) -> i32;

    pub fn krun_get_max_vcpus() -> i32;
    /// Returns 1 when supported, 0 otherwise. macOS only.
    pub fn krun_check_nested_virt() -> i32;
    /// Returns 1 when the feature was enabled at build time, 0 otherwise.
    pub fn krun_has_feature(feature: u64) -> i32;
}
