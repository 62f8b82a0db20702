use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Filters shared by `issue list` and `issue watch`.
#[derive(Clone, Debug, Default, Args)]
pub struct IssueFilterArgs {
    /// open, assigned, in_progress, resolved
    #[arg(long)]
    pub status: Option<String>,
    /// low, medium, high, urgent
    #[arg(long)]
    pub priority: Option<String>,
    #[arg(long)]
    pub ward: Option<String>,
    /// Reporter user id.
    #[arg(long)]
    pub reporter: Option<String>,
    /// pothole, garbage, street-light, water, other
    #[arg(long)]
    pub category: Option<String>,
}

/// Arguments for `seva issue create`.
#[derive(Clone, Debug, Args)]
pub struct IssueCreateArgs {
    /// Defaults to a title derived from the category.
    #[arg(long, default_value = "")]
    pub title: String,
    #[arg(long)]
    pub description: String,
    #[arg(long)]
    pub category: String,
    #[arg(long)]
    pub location: String,
    #[arg(long)]
    pub address: Option<String>,
    #[arg(long, default_value = "medium")]
    pub priority: String,
    #[arg(long)]
    pub ward: Option<String>,
    /// Photo to upload with the report.
    #[arg(long)]
    pub image: Option<PathBuf>,
}

/// Arguments for `seva issue update`. An empty `--ward` or `--address`
/// clears the field.
#[derive(Clone, Debug, Args)]
pub struct IssueUpdateArgs {
    pub id: String,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub category: Option<String>,
    #[arg(long)]
    pub priority: Option<String>,
    #[arg(long)]
    pub ward: Option<String>,
    #[arg(long)]
    pub location: Option<String>,
    #[arg(long)]
    pub address: Option<String>,
}

/// Issue commands.
#[derive(Clone, Debug, Subcommand)]
pub enum IssueCommands {
    /// Report an issue. Uses the signed-in account as reporter, else guest.
    Create(IssueCreateArgs),
    /// List issues, newest first. Respects the global `--limit`.
    List {
        #[command(flatten)]
        filter: IssueFilterArgs,
    },
    /// Get an issue by ID.
    Get { id: String },
    /// Update descriptive fields.
    Update(IssueUpdateArgs),
    /// Assign a worker (sets status to assigned).
    Assign {
        id: String,
        #[arg(long)]
        worker_id: String,
        #[arg(long)]
        worker_name: String,
    },
    /// Overwrite the status.
    Status {
        id: String,
        status: String,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Print the matching list now and on every change until Ctrl-C.
    Watch {
        #[command(flatten)]
        filter: IssueFilterArgs,
    },
}
