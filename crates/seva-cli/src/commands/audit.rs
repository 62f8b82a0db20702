use seva_core::entities::AuditEntry;
use seva_core::enums::{AuditAction, EntityType};
use seva_db::repos::audit::AuditFilter;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::AuditArgs;
use crate::commands::shared::limit::effective_limit;
use crate::commands::shared::parse::parse_opt_enum;
use crate::context::AppContext;
use crate::output::output;

/// Handle `seva audit`.
pub async fn handle(args: &AuditArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let entries = fetch(args, ctx, flags).await?;
    output(&entries, flags.format)
}

async fn fetch(args: &AuditArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<Vec<AuditEntry>> {
    let filter = AuditFilter {
        entity_type: parse_opt_enum::<EntityType>(args.entity_type.as_deref(), "entity-type")?,
        entity_id: args.entity_id.clone(),
        action: parse_opt_enum::<AuditAction>(args.action.as_deref(), "action")?,
        limit: Some(effective_limit(flags.limit, ctx.config.general.default_limit)),
    };
    Ok(ctx.store.query_audit(&filter).await?)
}

#[cfg(test)]
mod tests {
    use seva_core::enums::AuditAction;

    use super::fetch;
    use crate::cli::root_commands::AuditArgs;
    use crate::cli::{GlobalFlags, OutputFormat};
    use crate::context::AppContext;

    fn flags(limit: Option<u32>) -> GlobalFlags {
        GlobalFlags {
            format: OutputFormat::Json,
            limit,
            quiet: true,
        }
    }

    #[tokio::test]
    async fn filters_by_action_and_limit() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = AppContext::for_tests(dir.path()).await;
        let seeded = ctx.store.seed_sample_data().await.unwrap();

        let args = AuditArgs {
            entity_type: Some("issue".into()),
            entity_id: None,
            action: Some("created".into()),
        };
        let all = fetch(&args, &ctx, &flags(None)).await.unwrap();
        assert_eq!(all.len(), seeded.issues.len());
        assert!(all.iter().all(|entry| entry.action == AuditAction::Created));

        let limited = fetch(&args, &ctx, &flags(Some(1))).await.unwrap();
        assert_eq!(limited.len(), 1);
    }

    #[tokio::test]
    async fn unknown_action_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = AppContext::for_tests(dir.path()).await;
        let args = AuditArgs {
            entity_type: None,
            entity_id: None,
            action: Some("deleted".into()),
        };
        assert!(fetch(&args, &ctx, &flags(None)).await.is_err());
    }
}
