//! Record structs for all Seva-Setu domain objects.
//!
//! Each struct maps to one table in the libSQL database and is the single
//! normalized shape handed to consumers. Wire field names are camelCase.

mod account;
mod audit;
mod issue;
mod worker;

pub use account::{Account, AuthSessionRecord};
pub use audit::AuditEntry;
pub use issue::{Assignment, GUEST_REPORTER, Issue, NewComplaint, NewIssue, Reporter};
pub use worker::{NewWorker, Worker};
