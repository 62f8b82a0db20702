use anyhow::Context;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ImportArgs;
use crate::context::AppContext;
use crate::output::output;

/// Handle `seva import`. Bad records are reported under `skipped`, not fatal.
pub async fn handle(args: &ImportArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let raw = tokio::fs::read_to_string(&args.file)
        .await
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    let document: serde_json::Value = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not valid JSON", args.file.display()))?;

    let report = ctx.store.import_legacy(&document).await?;
    if !report.skipped.is_empty() {
        tracing::warn!(skipped = report.skipped.len(), "some records were not imported");
    }
    output(&report, flags.format)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::handle;
    use crate::cli::root_commands::ImportArgs;
    use crate::cli::{GlobalFlags, OutputFormat};
    use crate::context::AppContext;

    fn flags() -> GlobalFlags {
        GlobalFlags {
            format: OutputFormat::Raw,
            limit: None,
            quiet: true,
        }
    }

    #[tokio::test]
    async fn imports_file_into_store() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = AppContext::for_tests(dir.path()).await;
        let file = dir.path().join("export.json");
        std::fs::write(
            &file,
            r#"{"workers": {"w1": {"name": "Ravi Kumar", "status": "free"}}}"#,
        )
        .unwrap();

        handle(&ImportArgs { file }, &ctx, &flags()).await.unwrap();
        let workers = ctx.store.list_workers().await.unwrap();
        assert_eq!(workers.len(), 1);
        assert_eq!(workers[0].name, "Ravi Kumar");
    }

    #[tokio::test]
    async fn missing_file_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = AppContext::for_tests(dir.path()).await;
        let args = ImportArgs {
            file: PathBuf::from("/nonexistent/export.json"),
        };
        let err = handle(&args, &ctx, &flags()).await.unwrap_err();
        assert!(err.to_string().contains("/nonexistent/export.json"));
    }
}
