use seva_core::enums::{IssueCategory, IssuePriority};
use seva_db::updates::issue::IssueUpdate;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::issue::IssueUpdateArgs;
use crate::commands::shared::parse::parse_opt_enum;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(args: &IssueUpdateArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let update = to_update(args)?;
    if update.is_empty() {
        anyhow::bail!("nothing to update: pass at least one field flag");
    }
    let issue = ctx.store.update_issue(&args.id, update).await?;
    output(&issue, flags.format)
}

fn to_update(args: &IssueUpdateArgs) -> anyhow::Result<IssueUpdate> {
    Ok(IssueUpdate {
        title: args.title.clone(),
        description: args.description.clone(),
        category: parse_opt_enum::<IssueCategory>(args.category.as_deref(), "category")?,
        priority: parse_opt_enum::<IssuePriority>(args.priority.as_deref(), "priority")?,
        ward: clearable(args.ward.as_deref()),
        location: args.location.clone(),
        address: clearable(args.address.as_deref()),
    })
}

/// `--ward ""` clears the column; an absent flag leaves it alone.
fn clearable(flag: Option<&str>) -> Option<Option<String>> {
    flag.map(|value| Some(value.trim()).filter(|v| !v.is_empty()).map(String::from))
}
