use std::path::PathBuf;

use anyhow::Context as _;
use clap::Args;
use krun::Context;

use crate::vm_spec::VmSpec;

#[derive(Args, Debug)]
pub struct LaunchArgs {
    /// VM description file (.json, .yaml or .yml)
    #[arg(short, long, value_name = "FILE")]
    pub config: PathBuf,

    /// Validate and print the description without starting anything
    #[arg(long)]
    pub dry_run: bool,
}

pub fn execute(args: LaunchArgs, global: &crate::cli::GlobalFlags) -> anyhow::Result<()> {
    let spec = VmSpec::load(&args.config)?;
    tracing::debug!(?spec, "Loaded VM description");

    if args.dry_run {
        println!("{}", serde_json::to_string_pretty(&spec)?);
        return Ok(());
    }

    global.init_native_logging()?;
    let ctx = Context::create().context("Failed to create libkrun context")?;
    spec.apply(&ctx)
        .with_context(|| format!("Failed to configure VM from {}", args.config.display()))?;

    super::start(ctx)
}
