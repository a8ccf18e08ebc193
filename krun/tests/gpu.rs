//! Integration tests for GPU, display and sound settings.
//!
//! These need libkrun built with the matching device support; without it
//! the tests only check that the call is answered.

use krun::constants::virgl_flags::{VIRGL_USE_EGL, VIRGL_USE_SURFACELESS};
use krun::host::{self, Feature};
use krun::GpuConfig;
use krun_test_utils::require_context;

fn has(feature: Feature) -> bool {
    host::has_feature(feature).unwrap_or(false)
}

#[test]
fn set_gpu_options() {
    let ctx = require_context!();
    let result = ctx.set_gpu_options(&GpuConfig {
        virgl_flags: VIRGL_USE_SURFACELESS | VIRGL_USE_EGL,
        shm_size: None,
    });
    if has(Feature::Gpu) {
        result.unwrap();
    }
}

#[test]
fn set_gpu_options_with_shm_size() {
    let ctx = require_context!();
    let result = ctx.set_gpu_options(&GpuConfig {
        virgl_flags: VIRGL_USE_SURFACELESS,
        shm_size: Some(256 * 1024 * 1024),
    });
    if has(Feature::Gpu) {
        result.unwrap();
    } else if let Err(err) = result {
        assert_eq!(err.func(), "krun_set_gpu_options2");
    }
}

#[test]
fn displays_are_numbered() {
    let ctx = require_context!();
    if !has(Feature::Gpu) {
        return;
    }
    let first = ctx.add_display(1280, 800).unwrap();
    let second = ctx.add_display(1920, 1080).unwrap();
    assert_ne!(first, second);

    ctx.display_set_dpi(first, 96).unwrap();
    ctx.display_set_physical_size(first, 300, 190).unwrap();
    ctx.display_set_refresh_rate(first, 60).unwrap();
}

#[test]
fn set_snd_device() {
    let ctx = require_context!();
    for enable in [true, false] {
        let result = ctx.set_snd_device(enable);
        if has(Feature::Snd) {
            result.unwrap_or_else(|e| panic!("set_snd_device({enable}): {e}"));
        }
    }
}
