use super::Context;
use crate::config::VsockPortConfig;
use crate::error::KrunResult;
use crate::marshal::c_path;
use crate::status::check_status;

impl Context {
    /// Bridge a guest vsock port to a host unix socket.
    ///
    /// With `listen` set, libkrun creates the socket and the host side
    /// connects to it.
    pub fn add_vsock_port(&self, vsock: &VsockPortConfig) -> KrunResult<()> {
        tracing::debug!(
            ctx_id = self.ctx_id,
            port = vsock.port,
            socket_path = %vsock.path.display(),
            listen = vsock.listen,
            "Configuring vsock port"
        );
        let path_c = c_path("krun_add_vsock_port2", &vsock.path)?;
        check_status("krun_add_vsock_port2", unsafe {
            libkrun_sys::krun_add_vsock_port2(self.ctx_id, vsock.port, path_c.as_ptr(), vsock.listen)
        })
    }

    /// Add a vsock device explicitly, with the given
    /// [`tsi_features`](crate::constants::tsi_features). Needs
    /// [`Context::disable_implicit_vsock`] first.
    pub fn add_vsock(&self, tsi_features: u32) -> KrunResult<()> {
        tracing::debug!(ctx_id = self.ctx_id, tsi_features, "Adding vsock device");
        check_status("krun_add_vsock", unsafe {
            libkrun_sys::krun_add_vsock(self.ctx_id, tsi_features)
        })
    }

    pub fn disable_implicit_vsock(&self) -> KrunResult<()> {
        check_status("krun_disable_implicit_vsock", unsafe {
            libkrun_sys::krun_disable_implicit_vsock(self.ctx_id)
        })
    }
}
