pub mod auth;
pub mod issue;
pub mod worker;

pub use auth::AuthCommands;
pub use issue::IssueCommands;
pub use worker::WorkerCommands;
