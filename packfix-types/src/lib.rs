//! Shared DTOs (schemas-as-code) for the packfix workspace.
//!
//! # Design constraints
//! - These types are intended to be serialized to disk.
//! - Finding codes are a stable wire contract; never rename them.
//! - Fix operations are data, not behavior: a tagged enum interpreted
//!   by `packfix-edit`, so findings stay serializable and testable.

pub mod artifact;
pub mod finding;
pub mod fix;
pub mod report;

/// Schema identifiers.
pub mod schema {
    pub const PACKFIX_REPORT_V1: &str = "packfix.report.v1";
}
