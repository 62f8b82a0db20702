//! # seva-core
//!
//! Core types shared across all Seva-Setu crates:
//! - Canonical record structs (issues, workers, accounts, audit entries)
//! - Status and category enums with their canonical string forms
//! - Issue filters and dashboard grouping
//! - Normalization of records written in older shapes
//! - ID prefix constants and cross-cutting error types

pub mod audit_detail;
pub mod board;
pub mod entities;
pub mod enums;
pub mod errors;
pub mod filters;
pub mod identity;
pub mod ids;
pub mod legacy;
