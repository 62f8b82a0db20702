use chrono::{DateTime, Utc};
use serde::Serialize;
use seva_auth::{IssuedSession, SessionState};
use seva_core::identity::Principal;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::AuthCommands;
use crate::context::AppContext;
use crate::output::output;

/// What `register` and `login` print. The token itself stays in the
/// credentials file.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SignedIn {
    user: Principal,
    expires_at: DateTime<Utc>,
    credentials: String,
}

#[derive(Debug, Serialize)]
struct SignedOut {
    success: bool,
}

/// Handle `seva auth`.
pub async fn handle(action: &AuthCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match action {
        AuthCommands::Register(args) => {
            let session = SessionState::init(ctx.auth.clone(), None).await;
            let issued = session
                .register(&args.email, &args.password, args.display_name.as_deref())
                .await?;
            output(&persist(ctx, issued)?, flags.format)
        }
        AuthCommands::Login(args) => {
            let session = SessionState::init(ctx.auth.clone(), None).await;
            let issued = session.sign_in(&args.email, &args.password).await?;
            output(&persist(ctx, issued)?, flags.format)
        }
        AuthCommands::Logout => {
            logout(ctx).await?;
            output(&SignedOut { success: true }, flags.format)
        }
        AuthCommands::Whoami => output(&whoami(ctx).await?, flags.format),
    }
}

fn persist(ctx: &AppContext, issued: IssuedSession) -> anyhow::Result<SignedIn> {
    ctx.tokens.store(&issued.token)?;
    tracing::info!(user_id = %issued.principal.user_id, "signed in");
    Ok(SignedIn {
        user: issued.principal,
        expires_at: issued.expires_at,
        credentials: ctx.tokens.path().display().to_string(),
    })
}

/// Revoke the stored token server-side, then forget it locally. The local
/// file is removed even when revocation fails.
async fn logout(ctx: &AppContext) -> anyhow::Result<()> {
    let session = SessionState::init(ctx.auth.clone(), ctx.tokens.load()).await;
    let revoked = session.sign_out().await;
    ctx.tokens.delete()?;
    session.teardown();
    revoked.map_err(Into::into)
}

async fn whoami(ctx: &AppContext) -> anyhow::Result<Principal> {
    let session = SessionState::init(ctx.auth.clone(), ctx.tokens.load()).await;
    match session.current() {
        Some(principal) => Ok(principal),
        None => {
            let reason = session
                .error()
                .unwrap_or_else(|| String::from("not signed in, run `seva auth login`"));
            anyhow::bail!(reason)
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{logout, persist, whoami};
    use crate::context::AppContext;

    #[tokio::test]
    async fn login_persists_token_for_whoami() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = AppContext::for_tests(dir.path()).await;
        let issued = ctx
            .auth
            .register("asha@example.com", "s3cret-pass", None)
            .await
            .unwrap();

        let signed_in = persist(&ctx, issued).unwrap();
        assert_eq!(signed_in.user.email, "asha@example.com");
        assert!(ctx.tokens.path().exists());

        let principal = whoami(&ctx).await.unwrap();
        assert_eq!(principal, signed_in.user);
    }

    #[tokio::test]
    async fn logout_revokes_and_removes_credentials() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = AppContext::for_tests(dir.path()).await;
        let issued = ctx
            .auth
            .register("ravi@example.com", "s3cret-pass", Some("Ravi"))
            .await
            .unwrap();
        let token = issued.token.clone();
        persist(&ctx, issued).unwrap();

        logout(&ctx).await.unwrap();
        assert!(!ctx.tokens.path().exists());
        assert!(ctx.auth.principal_for_token(&token).await.is_err());
        assert!(whoami(&ctx).await.is_err());
    }

    #[tokio::test]
    async fn logout_without_credentials_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = AppContext::for_tests(dir.path()).await;
        logout(&ctx).await.unwrap();
    }
}
