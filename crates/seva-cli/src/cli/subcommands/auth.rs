use clap::{Args, Subcommand};

/// Authentication commands.
#[derive(Clone, Debug, Subcommand)]
pub enum AuthCommands {
    /// Create an account and sign in.
    Register(AuthRegisterArgs),
    /// Sign in and store the token.
    Login(AuthLoginArgs),
    /// Revoke the stored token and delete it.
    Logout,
    /// Show the signed-in account.
    Whoami,
}

#[derive(Clone, Debug, Args)]
pub struct AuthRegisterArgs {
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub password: String,
    #[arg(long)]
    pub display_name: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct AuthLoginArgs {
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub password: String,
}
