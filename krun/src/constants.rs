/// Network feature flags (from virtio_net.h)
pub mod network_features {
    // These match the VIRTIO_NET_F_* features from the virtio specification
    pub const NET_FEATURE_CSUM: u32 = 1 << 0; // Guest handles packets with partial checksum
    pub const NET_FEATURE_GUEST_CSUM: u32 = 1 << 1; // Guest handles packets with partial checksum offload
    pub const NET_FEATURE_GUEST_TSO4: u32 = 1 << 7; // Guest can receive TSOv4
    pub const NET_FEATURE_GUEST_TSO6: u32 = 1 << 8; // Guest can receive TSOv6
    pub const NET_FEATURE_GUEST_UFO: u32 = 1 << 10; // Guest can receive UFO
    pub const NET_FEATURE_HOST_TSO4: u32 = 1 << 11; // Host can receive TSOv4
    pub const NET_FEATURE_HOST_TSO6: u32 = 1 << 12; // Host can receive TSOv6
    pub const NET_FEATURE_HOST_UFO: u32 = 1 << 14; // Host can receive UFO

    /// Features enabled by the deprecated krun_set_passt_fd / krun_set_gvproxy_path.
    pub const COMPAT_NET_FEATURES: u32 = NET_FEATURE_CSUM
        | NET_FEATURE_GUEST_CSUM
        | NET_FEATURE_GUEST_TSO4
        | NET_FEATURE_GUEST_UFO
        | NET_FEATURE_HOST_TSO4
        | NET_FEATURE_HOST_UFO;

    // NET_FLAG_VFKIT: Send the VFKIT magic ("VFKT") after establishing connection
    // This is required by gvproxy when using VFKit protocol with unixgram sockets
    pub const NET_FLAG_VFKIT: u32 = 1 << 0;
}

/// Transparent Socket Impersonation flags for `krun_add_vsock`.
pub mod tsi_features {
    pub const TSI_HIJACK_INET: u32 = 1 << 0;
    pub const TSI_HIJACK_UNIX: u32 = 1 << 1;
}

/// virglrenderer flags for `krun_set_gpu_options`.
pub mod virgl_flags {
    pub const VIRGL_USE_EGL: u32 = 1 << 0;
    pub const VIRGL_THREAD_SYNC: u32 = 1 << 1;
    pub const VIRGL_USE_GLX: u32 = 1 << 2;
    pub const VIRGL_USE_SURFACELESS: u32 = 1 << 3;
    pub const VIRGL_USE_GLES: u32 = 1 << 4;
    pub const VIRGL_USE_EXTERNAL_BLOB: u32 = 1 << 5;
    pub const VIRGL_VENUS: u32 = 1 << 6;
    pub const VIRGL_NO_VIRGL: u32 = 1 << 7;
    pub const VIRGL_USE_ASYNC_FENCE_CB: u32 = 1 << 8;
    pub const VIRGL_RENDER_SERVER: u32 = 1 << 9;
    pub const VIRGL_DRM: u32 = 1 << 10;
}

/// Maximum number of displays (VIRTIO_GPU_MAX_SCANOUTS).
pub const MAX_DISPLAYS: u32 = libkrun_sys::KRUN_MAX_DISPLAYS;
