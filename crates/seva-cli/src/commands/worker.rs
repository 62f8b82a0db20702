use seva_core::entities::{NewWorker, Worker};
use seva_core::enums::WorkerStatus;
use seva_core::filters::{workers_by_department, workers_by_status};

use crate::cli::GlobalFlags;
use crate::cli::subcommands::WorkerCommands;
use crate::commands::shared::parse::{parse_enum, parse_opt_enum};
use crate::context::AppContext;
use crate::output::output;

/// Handle `seva worker`.
pub async fn handle(action: &WorkerCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match action {
        WorkerCommands::Add {
            name,
            department,
            status,
            phone,
        } => {
            let new_worker = NewWorker {
                name: name.clone(),
                department: department.clone(),
                status: parse_enum::<WorkerStatus>(status, "status")?,
                phone: phone.clone(),
            };
            let worker = ctx.store.create_worker(&new_worker).await?;
            output(&worker, flags.format)
        }
        WorkerCommands::List { status, department } => {
            let workers = list(ctx, status.as_deref(), department.as_deref()).await?;
            output(&workers, flags.format)
        }
    }
}

async fn list(ctx: &AppContext, status: Option<&str>, department: Option<&str>) -> anyhow::Result<Vec<Worker>> {
    let mut workers = ctx.store.list_workers().await?;
    if let Some(status) = parse_opt_enum::<WorkerStatus>(status, "status")? {
        workers = workers_by_status(&workers, status).into_iter().cloned().collect();
    }
    if let Some(department) = department {
        workers = workers_by_department(&workers, department)
            .into_iter()
            .cloned()
            .collect();
    }
    Ok(workers)
}
