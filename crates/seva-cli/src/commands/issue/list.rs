use crate::cli::GlobalFlags;
use crate::cli::subcommands::issue::IssueFilterArgs;
use crate::commands::shared::filter::issue_filter;
use crate::commands::shared::limit::effective_limit;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(args: &IssueFilterArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let filter = issue_filter(args)?;
    let limit = effective_limit(flags.limit, ctx.config.general.default_limit);
    let issues = ctx.store.list_issues(&filter, Some(limit)).await?;
    output(&issues, flags.format)
}
