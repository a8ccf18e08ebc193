use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

fn main() {
    println!("cargo:rustc-check-cfg=cfg(libkrun_stub)");
    println!("cargo:rerun-if-changed=vendor/libkrun");
    println!("cargo:rerun-if-env-changed=LIBKRUN_SYS_STUB");
    println!("cargo:rerun-if-env-changed=PKG_CONFIG_PATH");

    // Set LIBKRUN_SYS_STUB=1 to skip linking entirely: every entry point
    // returns -ENOSYS. Useful for CI linting and for hosts without libkrun.
    if env::var("LIBKRUN_SYS_STUB").is_ok() {
        println!("cargo:warning=LIBKRUN_SYS_STUB mode: not linking libkrun");
        emit_stub();
        return;
    }

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap());
    let vendored = manifest_dir.join("vendor/libkrun");
    if vendored.exists() {
        build_vendored(&vendored);
        return;
    }

    match pkg_config::Config::new()
        .atleast_version("1.15")
        .probe("libkrun")
    {
        Ok(lib) => {
            for path in &lib.link_paths {
                println!("cargo:LIBKRUN_DIR={}", path.display());
            }
        }
        Err(e) => {
            println!("cargo:warning=libkrun not found via pkg-config ({e}); building in stub mode");
            emit_stub();
        }
    }
}

fn emit_stub() {
    println!("cargo:rustc-cfg=libkrun_stub");
}

/// Runs a command and panics with a helpful message if it fails.
fn run_command(cmd: &mut Command, description: &str) {
    let status = cmd
        .status()
        .unwrap_or_else(|e| panic!("Failed to execute {}: {}", description, e));

    if !status.success() {
        panic!("{} failed with exit code: {:?}", description, status.code());
    }
}

/// Creates a make command with common configuration.
fn make_command(
    source_dir: &Path,
    install_dir: &Path,
    extra_env: &HashMap<String, String>,
) -> Command {
    let mut cmd = Command::new("make");
    cmd.stdout(Stdio::inherit());
    cmd.stderr(Stdio::inherit());
    cmd.args(["-j", &num_cpus::get().to_string()])
        .arg("MAKEFLAGS=") // Clear MAKEFLAGS to prevent -w flag issues in submakes
        .env("PREFIX", install_dir)
        .current_dir(source_dir);

    for (key, value) in extra_env {
        cmd.env(key, value);
    }

    cmd
}

/// Builds libkrun from a vendored checkout, enabling the optional device
/// families that match this crate's cargo features.
fn build_vendored(source_dir: &Path) {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let install_dir = out_dir.join("libkrun");

    let mut extra_env = HashMap::new();
    for (feature, flag) in [("BLK", "BLK"), ("NET", "NET"), ("TEE", "SEV")] {
        if env::var(format!("CARGO_FEATURE_{feature}")).is_ok() {
            extra_env.insert(flag.to_string(), "1".to_string());
        }
    }
    println!(
        "cargo:warning=Building vendored libkrun with {:?}",
        extra_env.keys().collect::<Vec<_>>()
    );

    std::fs::create_dir_all(&install_dir)
        .unwrap_or_else(|e| panic!("Failed to create install directory: {}", e));

    let mut make_cmd = make_command(source_dir, &install_dir, &extra_env);
    run_command(&mut make_cmd, "make libkrun");

    let mut install_cmd = make_command(source_dir, &install_dir, &extra_env);
    install_cmd.arg("install");
    run_command(&mut install_cmd, "make install libkrun");

    let lib_dir = ["lib64", "lib"]
        .iter()
        .map(|d| install_dir.join(d))
        .find(|d| d.exists())
        .unwrap_or_else(|| panic!("no lib directory under {}", install_dir.display()));

    println!("cargo:rustc-link-search=native={}", lib_dir.display());
    println!("cargo:rustc-link-lib=dylib=krun");
    println!("cargo:LIBKRUN_DIR={}", lib_dir.display());
}
