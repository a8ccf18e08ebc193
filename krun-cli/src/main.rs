//! krunctl: run workloads in libkrun microVMs from the command line.

use clap::{Parser, Subcommand};

mod cli;
mod commands;
mod vm_spec;

use cli::GlobalFlags;

/// krunctl - run commands and kernels in libkrun microVMs
#[derive(Parser, Debug)]
#[command(name = "krunctl", author, version)]
#[command(about = "Run commands and kernels in lightweight libkrun microVMs")]
#[command(
    long_about = "krunctl drives libkrun directly. Each VM replaces the krunctl process: \
when the guest workload exits, krunctl exits with its status.\n\n\
Quick start:\n  \
krunctl run ./rootfs -- /bin/uname -a\n  \
krunctl boot --kernel vmlinux --disk rootfs.ext4\n  \
krunctl launch --config vm.yaml\n  \
krunctl features"
)]
struct Cli {
    #[command(flatten)]
    global: GlobalFlags,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a command inside a microVM rooted at a host directory
    Run(commands::run::RunArgs),

    /// Boot an external kernel with a root disk image
    Boot(commands::boot::BootArgs),

    /// Launch a microVM described by a JSON or YAML file
    Launch(commands::launch::LaunchArgs),

    /// Print what the installed libkrun and this host support
    Features(commands::features::FeaturesArgs),
}

fn main() {
    let cli = Cli::parse();

    cli.global.init_tracing();
    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "starting krunctl");

    let result = match cli.command {
        Commands::Run(args) => commands::run::execute(args, &cli.global),
        Commands::Boot(args) => commands::boot::execute(args, &cli.global),
        Commands::Launch(args) => commands::launch::execute(args, &cli.global),
        Commands::Features(args) => commands::features::execute(args),
    };

    if let Err(e) = result {
        tracing::debug!(error = ?e, "command failed");
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
