//! Integration tests for the guest process settings.

use krun::ExecConfig;
use krun_test_utils::require_context;

fn sh(args: &[&str]) -> ExecConfig {
    ExecConfig::new("/bin/sh", args.iter().map(|a| a.to_string()).collect())
}

#[test]
fn set_workdir() {
    let ctx = require_context!();
    ctx.set_workdir("/tmp").unwrap();
}

#[test]
fn set_exec_with_explicit_env() {
    let ctx = require_context!();
    let exec = sh(&["sh", "-c", "echo hello"]).with_env(vec!["PATH=/usr/bin".into()]);
    ctx.set_exec(&exec).unwrap();
}

#[test]
fn set_exec_with_inherited_env() {
    let ctx = require_context!();
    ctx.set_exec(&sh(&["sh"])).unwrap();
}

#[test]
fn set_exec_with_empty_env() {
    let ctx = require_context!();
    ctx.set_exec(&sh(&["sh"]).with_env(vec![])).unwrap();
}

#[test]
fn set_env_explicit_and_inherited() {
    let ctx = require_context!();
    ctx.set_env(Some(&["FOO=bar", "BAZ=qux"][..])).unwrap();
    ctx.set_env::<&str>(None).unwrap();
}

#[test]
fn set_rlimits() {
    let ctx = require_context!();
    ctx.set_rlimits(&["7=1024:4096"]).unwrap();
}
