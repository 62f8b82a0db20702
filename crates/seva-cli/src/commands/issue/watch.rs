use anyhow::Context;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::issue::IssueFilterArgs;
use crate::commands::shared::filter::issue_filter;
use crate::context::AppContext;
use crate::output::render;

/// Print the matching issues now and after every change, until Ctrl-C.
pub async fn run(args: &IssueFilterArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let filter = issue_filter(args)?;
    let format = flags.format;
    let subscription = ctx.store.subscribe_issues(filter, move |issues| {
        match render(&issues, format) {
            Ok(rendered) => println!("{rendered}"),
            Err(error) => tracing::warn!(%error, "failed to render issue list"),
        }
    });

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for Ctrl-C")?;
    subscription.unsubscribe();
    Ok(())
}
