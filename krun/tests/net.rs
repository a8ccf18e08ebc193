//! Integration tests for port mapping and virtio-net backends.

use krun::constants::network_features::{COMPAT_NET_FEATURES, NET_FLAG_VFKIT};
use krun::{Errno, KrunResult, NetEndpoint, NetTapConfig, NetUnixConfig};
use krun_test_utils::require_context;

const MAC: [u8; 6] = [0xde, 0xad, 0xbe, 0xef, 0x00, 0x01];

fn check_net_result(result: KrunResult<()>) {
    if cfg!(feature = "net") {
        if let Err(err) = result {
            assert_ne!(err, Errno::ENOSYS, "net entry point missing: {err}");
        }
    } else {
        assert_eq!(result.unwrap_err(), Errno::ENOSYS);
    }
}

#[test]
fn set_port_map_explicit_empty_and_all() {
    let ctx = require_context!();
    ctx.set_port_map(Some(&["8080:80", "4433:443"][..])).unwrap();
    ctx.set_port_map::<&str>(Some(&[])).unwrap();
    ctx.set_port_map::<&str>(None).unwrap();
}

#[test]
fn add_net_unixstream_by_path() {
    let ctx = require_context!();
    check_net_result(ctx.add_net_unixstream(&NetUnixConfig {
        endpoint: NetEndpoint::Path("/tmp/passt.sock".into()),
        mac: MAC,
        features: COMPAT_NET_FEATURES,
        flags: 0,
    }));
}

#[test]
fn add_net_unixgram_vfkit() {
    let ctx = require_context!();
    check_net_result(ctx.add_net_unixgram(&NetUnixConfig {
        endpoint: NetEndpoint::Path("/tmp/gvproxy.sock".into()),
        mac: MAC,
        features: COMPAT_NET_FEATURES,
        flags: NET_FLAG_VFKIT,
    }));
}

#[test]
fn add_net_tap() {
    let ctx = require_context!();
    check_net_result(ctx.add_net_tap(&NetTapConfig {
        tap_name: "tap0".into(),
        mac: MAC,
        features: 0,
        flags: 0,
    }));
}

#[test]
fn set_net_mac() {
    let ctx = require_context!();
    check_net_result(ctx.set_net_mac(MAC));
}
