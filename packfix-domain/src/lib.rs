//! Scanner and integrity checkers for an unpacked OOXML presentation tree.
//!
//! All checkers are read-only over the tree; mutations happen in
//! `packfix-edit`. Checkers never abort each other: per-file problems
//! become findings, and only a missing or non-directory root is fatal.

pub mod checks;
pub mod scan;
pub mod tree;
mod xml;

pub use checks::{Check, builtin_checks, run_checks};
pub use scan::{ScanIndex, scan_tree};
pub use tree::WorkTree;
