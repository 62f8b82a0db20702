//! Repository modules implementing data access for all Seva-Setu records.
//!
//! Each module adds methods to `SevaService` via `impl SevaService` blocks.

pub mod account;
pub mod audit;
pub mod import;
pub mod issue;
pub mod seed;
pub mod worker;
