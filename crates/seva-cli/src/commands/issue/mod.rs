mod create;
mod list;
mod update;
mod watch;

use seva_core::enums::IssueStatus;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::IssueCommands;
use crate::commands::shared::parse::parse_enum;
use crate::context::AppContext;
use crate::output::output;

/// Handle `seva issue`.
pub async fn handle(action: &IssueCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match action {
        IssueCommands::Create(args) => create::run(args, ctx, flags).await,
        IssueCommands::List { filter } => list::run(filter, ctx, flags).await,
        IssueCommands::Get { id } => output(&ctx.store.get_issue(id).await?, flags.format),
        IssueCommands::Update(args) => update::run(args, ctx, flags).await,
        IssueCommands::Assign {
            id,
            worker_id,
            worker_name,
        } => {
            let issue = ctx
                .store
                .assign_issue_to_worker(id, worker_id, worker_name)
                .await?;
            output(&issue, flags.format)
        }
        IssueCommands::Status { id, status, notes } => {
            let status = parse_enum::<IssueStatus>(status, "status")?;
            let issue = ctx
                .store
                .update_issue_status(id, status, notes.as_deref())
                .await?;
            output(&issue, flags.format)
        }
        IssueCommands::Watch { filter } => watch::run(filter, ctx, flags).await,
    }
}
