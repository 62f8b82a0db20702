use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

/// Handle `seva seed`.
pub async fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let report = ctx.store.seed_sample_data().await?;
    output(&report, flags.format)
}
