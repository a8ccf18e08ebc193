pub mod boot;
pub mod features;
pub mod launch;
pub mod run;

use anyhow::Context as _;

/// Hand the process over to the configured microVM.
///
/// Only returns when the VM failed to start.
pub(crate) fn start(ctx: krun::Context) -> anyhow::Result<()> {
    tracing::info!(ctx_id = ctx.id(), "Handing process control to the microVM");
    ctx.start_enter().context("Failed to start microVM")
}
