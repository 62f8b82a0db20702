use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::cli::subcommands::{AuthCommands, IssueCommands, WorkerCommands};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Run the HTTP API.
    Serve(ServeArgs),
    /// Insert sample issues and workers.
    Seed,
    /// Dashboard counts: new, ongoing, resolved, and worker availability.
    Board,
    /// Import an exported JSON document with issues, complaints, and workers.
    Import(ImportArgs),
    /// Issues.
    Issue {
        #[command(subcommand)]
        action: IssueCommands,
    },
    /// Field workers.
    Worker {
        #[command(subcommand)]
        action: WorkerCommands,
    },
    /// View audit trail.
    Audit(AuditArgs),
    /// Authentication.
    Auth {
        #[command(subcommand)]
        action: AuthCommands,
    },
}

/// Arguments for `seva serve`.
#[derive(Clone, Debug, Args)]
pub struct ServeArgs {
    /// Listen address (overrides `server.bind`).
    #[arg(long)]
    pub bind: Option<String>,
}

/// Arguments for `seva import`.
#[derive(Clone, Debug, Args)]
pub struct ImportArgs {
    pub file: PathBuf,
}

/// Arguments for `seva audit`.
#[derive(Clone, Debug, Args)]
pub struct AuditArgs {
    #[arg(long)]
    pub entity_type: Option<String>,
    #[arg(long)]
    pub entity_id: Option<String>,
    #[arg(long)]
    pub action: Option<String>,
}
