use clap::Subcommand;

/// Worker commands.
#[derive(Clone, Debug, Subcommand)]
pub enum WorkerCommands {
    /// Register a field worker.
    Add {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        department: String,
        /// free, onsite, break
        #[arg(long, default_value = "free")]
        status: String,
        #[arg(long, default_value = "")]
        phone: String,
    },
    /// List workers, optionally filtered.
    List {
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        department: Option<String>,
    },
}
