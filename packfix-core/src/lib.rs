//! Validate/fix pipelines, extracted from the CLI so they stay
//! independently testable.

pub mod pipeline;
pub mod settings;

pub use pipeline::{ToolError, ValidateOutcome, run_validate, write_report_artifact};
pub use settings::ValidateSettings;
