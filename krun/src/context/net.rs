use super::Context;
use crate::config::{NetTapConfig, NetUnixConfig};
use crate::error::KrunResult;
use crate::marshal::{CStringArray, array_ptr};
use crate::status::check_status;

#[cfg(feature = "net")]
use std::ffi::CString;
#[cfg(feature = "net")]
use std::os::unix::io::RawFd;

#[cfg(feature = "net")]
use crate::config::NetEndpoint;
#[cfg(feature = "net")]
use crate::marshal::{c_path, c_string, opt_ptr};
#[cfg(not(feature = "net"))]
use crate::status::not_implemented;

impl Context {
    /// Expose guest ports on the host as `"HOST:GUEST"` entries.
    ///
    /// `None` exposes every listening guest port; `Some(&[])` exposes none.
    pub fn set_port_map<S: AsRef<str>>(&self, port_map: Option<&[S]>) -> KrunResult<()> {
        const FUNC: &str = "krun_set_port_map";
        tracing::debug!(
            ctx_id = self.ctx_id,
            entries = port_map.map(<[S]>::len),
            "Setting port map"
        );
        let port_map = CStringArray::from_option(FUNC, port_map)?;
        check_status(FUNC, unsafe {
            libkrun_sys::krun_set_port_map(self.ctx_id, array_ptr(port_map.as_ref()))
        })
    }

    /// virtio-net over a unix stream socket (passt, socket_vmnet).
    #[cfg(feature = "net")]
    pub fn add_net_unixstream(&self, net: &NetUnixConfig) -> KrunResult<()> {
        const FUNC: &str = "krun_add_net_unixstream";
        tracing::debug!(ctx_id = self.ctx_id, endpoint = ?net.endpoint, features = net.features, flags = net.flags, "Adding unixstream network backend");
        let (path_c, fd) = unix_endpoint(FUNC, &net.endpoint)?;
        check_status(FUNC, unsafe {
            libkrun_sys::krun_add_net_unixstream(
                self.ctx_id,
                opt_ptr(path_c.as_ref()),
                fd,
                net.mac.as_ptr(),
                net.features,
                net.flags,
            )
        })
    }

    #[cfg(not(feature = "net"))]
    pub fn add_net_unixstream(&self, net: &NetUnixConfig) -> KrunResult<()> {
        tracing::trace!(ctx_id = self.ctx_id, endpoint = ?net.endpoint, "net support not built");
        Err(not_implemented("krun_add_net_unixstream"))
    }

    /// virtio-net over a unix datagram socket (gvproxy, vmnet-helper).
    ///
    /// gvproxy in vfkit mode also needs `NET_FLAG_VFKIT` in `flags`.
    #[cfg(feature = "net")]
    pub fn add_net_unixgram(&self, net: &NetUnixConfig) -> KrunResult<()> {
        const FUNC: &str = "krun_add_net_unixgram";
        tracing::debug!(ctx_id = self.ctx_id, endpoint = ?net.endpoint, features = net.features, flags = net.flags, "Adding unixgram network backend");
        let (path_c, fd) = unix_endpoint(FUNC, &net.endpoint)?;
        check_status(FUNC, unsafe {
            libkrun_sys::krun_add_net_unixgram(
                self.ctx_id,
                opt_ptr(path_c.as_ref()),
                fd,
                net.mac.as_ptr(),
                net.features,
                net.flags,
            )
        })
    }

    #[cfg(not(feature = "net"))]
    pub fn add_net_unixgram(&self, net: &NetUnixConfig) -> KrunResult<()> {
        tracing::trace!(ctx_id = self.ctx_id, endpoint = ?net.endpoint, "net support not built");
        Err(not_implemented("krun_add_net_unixgram"))
    }

    /// virtio-net backed by a host TAP interface.
    #[cfg(feature = "net")]
    pub fn add_net_tap(&self, net: &NetTapConfig) -> KrunResult<()> {
        const FUNC: &str = "krun_add_net_tap";
        tracing::debug!(ctx_id = self.ctx_id, tap_name = %net.tap_name, features = net.features, "Adding tap network backend");
        let tap_c = c_string(FUNC, &net.tap_name)?;
        check_status(FUNC, unsafe {
            libkrun_sys::krun_add_net_tap(
                self.ctx_id,
                tap_c.as_ptr(),
                net.mac.as_ptr(),
                net.features,
                net.flags,
            )
        })
    }

    #[cfg(not(feature = "net"))]
    pub fn add_net_tap(&self, net: &NetTapConfig) -> KrunResult<()> {
        tracing::trace!(ctx_id = self.ctx_id, tap_name = %net.tap_name, "net support not built");
        Err(not_implemented("krun_add_net_tap"))
    }

    /// MAC address of the implicit (TSI-less) network device.
    #[cfg(feature = "net")]
    pub fn set_net_mac(&self, mac: [u8; 6]) -> KrunResult<()> {
        tracing::debug!(ctx_id = self.ctx_id, ?mac, "Setting net MAC");
        check_status("krun_set_net_mac", unsafe {
            libkrun_sys::krun_set_net_mac(self.ctx_id, mac.as_ptr())
        })
    }

    #[cfg(not(feature = "net"))]
    pub fn set_net_mac(&self, mac: [u8; 6]) -> KrunResult<()> {
        tracing::trace!(ctx_id = self.ctx_id, ?mac, "net support not built");
        Err(not_implemented("krun_set_net_mac"))
    }
}

// libkrun takes either a path (fd = -1) or a connected fd (path = NULL).
#[cfg(feature = "net")]
fn unix_endpoint(
    func: &'static str,
    endpoint: &NetEndpoint,
) -> KrunResult<(Option<CString>, RawFd)> {
    match endpoint {
        NetEndpoint::Path(path) => Ok((Some(c_path(func, path)?), -1)),
        NetEndpoint::Fd(fd) => Ok((None, *fd)),
    }
}
