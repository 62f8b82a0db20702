use std::collections::BTreeMap;

use serde::Serialize;
use seva_core::board::{BoardSummary, IssueBoard, WorkerRoster};
use seva_core::filters::IssueFilter;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

/// Counts-only view of the dashboard. `seva issue list` shows the issues.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardResponse {
    pub summary: BoardSummary,
    pub by_category: BTreeMap<String, usize>,
    pub by_priority: BTreeMap<String, usize>,
    pub workers: RosterCounts,
}

#[derive(Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterCounts {
    pub free: usize,
    pub onsite: usize,
    pub on_break: usize,
    pub total: usize,
}

/// Handle `seva board`.
pub async fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    output(&build(ctx).await?, flags.format)
}

async fn build(ctx: &AppContext) -> anyhow::Result<BoardResponse> {
    let issues = ctx.store.list_issues(&IssueFilter::default(), None).await?;
    let workers = ctx.store.list_workers().await?;
    let board = IssueBoard::from_issues(&issues);
    let roster = WorkerRoster::from_workers(&workers);

    Ok(BoardResponse {
        summary: board.summary(),
        by_category: board.by_category,
        by_priority: board.by_priority,
        workers: RosterCounts {
            free: roster.free,
            onsite: roster.onsite,
            on_break: roster.on_break,
            total: roster.total,
        },
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{RosterCounts, build};
    use crate::context::AppContext;

    #[tokio::test]
    async fn empty_store_has_zero_counts() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = AppContext::for_tests(dir.path()).await;
        let board = build(&ctx).await.unwrap();
        assert_eq!(board.summary.total, 0);
        assert!(board.by_category.is_empty());
        assert_eq!(board.workers.total, 0);
    }

    #[tokio::test]
    async fn seeded_store_counts() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = AppContext::for_tests(dir.path()).await;
        ctx.store.seed_sample_data().await.unwrap();

        let board = build(&ctx).await.unwrap();
        assert_eq!(board.summary.new, 2);
        assert_eq!(board.summary.ongoing, 2);
        assert_eq!(board.summary.resolved, 0);
        assert_eq!(
            board.workers,
            RosterCounts {
                free: 2,
                onsite: 1,
                on_break: 1,
                total: 4,
            }
        );
        assert_eq!(board.by_priority.values().sum::<usize>(), 4);
    }
}
