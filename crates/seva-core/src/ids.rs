//! ID prefix constants.
//!
//! Store-assigned IDs are `{prefix}-{8 hex chars}`, e.g. `iss-a3f8b2c1`.

pub const PREFIX_ISSUE: &str = "iss";
pub const PREFIX_WORKER: &str = "wrk";
pub const PREFIX_ACCOUNT: &str = "usr";
pub const PREFIX_AUDIT: &str = "aud";

/// Every prefix the store hands out.
pub const ALL_PREFIXES: [&str; 4] = [PREFIX_ISSUE, PREFIX_WORKER, PREFIX_ACCOUNT, PREFIX_AUDIT];

/// Check that `id` has the shape `{prefix}-{8 hex chars}`.
#[must_use]
pub fn has_prefix(id: &str, prefix: &str) -> bool {
    id.strip_prefix(prefix)
        .and_then(|rest| rest.strip_prefix('-'))
        .is_some_and(|hex| hex.len() == 8 && hex.chars().all(|c| c.is_ascii_hexdigit()))
}
