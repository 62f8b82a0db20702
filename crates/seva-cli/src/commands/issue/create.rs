use std::path::Path;

use anyhow::Context;
use seva_core::entities::{Issue, NewIssue, Reporter};
use seva_core::enums::{IssueCategory, IssuePriority};
use seva_storage::ImageUpload;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::issue::IssueCreateArgs;
use crate::commands::shared::parse::parse_enum;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(args: &IssueCreateArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let issue = create(args, ctx).await?;
    output(&issue, flags.format)
}

async fn create(args: &IssueCreateArgs, ctx: &AppContext) -> anyhow::Result<Issue> {
    let new_issue = NewIssue {
        title: args.title.clone(),
        description: args.description.clone(),
        category: parse_enum::<IssueCategory>(&args.category, "category")?,
        location: args.location.clone(),
        address: args.address.clone(),
        priority: parse_enum::<IssuePriority>(&args.priority, "priority")?,
        ward: args.ward.clone(),
    };
    let image = match args.image.as_deref() {
        Some(path) => Some(read_image(path).await?),
        None => None,
    };
    let reporter = ctx
        .signed_in_principal()
        .await
        .map_or_else(Reporter::guest, |principal| Reporter::from(&principal));

    Ok(ctx.store.create_issue(&new_issue, image, &reporter).await?)
}

async fn read_image(path: &Path) -> anyhow::Result<ImageUpload> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read image {}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .with_context(|| format!("{} has no file name", path.display()))?;
    Ok(ImageUpload { file_name, bytes })
}
