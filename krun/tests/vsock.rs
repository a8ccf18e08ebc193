//! Integration tests for vsock configuration.

use krun::VsockPortConfig;
use krun_test_utils::require_context;

#[test]
fn add_vsock_port_connect_and_listen() {
    let ctx = require_context!();
    let dir = tempfile::tempdir().unwrap();

    ctx.add_vsock_port(&VsockPortConfig {
        port: 5001,
        path: dir.path().join("vsock.sock"),
        listen: false,
    })
    .unwrap();
    ctx.add_vsock_port(&VsockPortConfig {
        port: 5002,
        path: dir.path().join("vsock2.sock"),
        listen: true,
    })
    .unwrap();
}

#[test]
fn explicit_vsock_after_disabling_implicit() {
    let ctx = require_context!();
    ctx.disable_implicit_vsock().unwrap();
    ctx.add_vsock(0).unwrap();
}

#[test]
fn disable_implicit_vsock() {
    let ctx = require_context!();
    ctx.disable_implicit_vsock().unwrap();
}
