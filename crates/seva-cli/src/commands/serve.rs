use std::sync::Arc;

use anyhow::Context;
use seva_server::AppState;

use crate::cli::root_commands::ServeArgs;
use crate::context::AppContext;

/// Handle `seva serve`. Runs until the process is stopped.
pub async fn handle(args: &ServeArgs, ctx: &AppContext) -> anyhow::Result<()> {
    let bind = args.bind.as_deref().unwrap_or(&ctx.config.server.bind);
    let state = AppState::new(Arc::clone(&ctx.store), ctx.auth.clone());
    seva_server::serve(state, bind)
        .await
        .with_context(|| format!("api server on {bind} stopped"))
}
