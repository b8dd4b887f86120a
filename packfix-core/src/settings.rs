//! Clap-free settings for the validate pipeline.

use camino::Utf8PathBuf;

/// Settings for one validate (or validate + fix) run.
#[derive(Debug, Clone)]
pub struct ValidateSettings {
    /// Root of the unpacked package tree.
    pub work_dir: Utf8PathBuf,

    /// Apply fixes and re-validate.
    pub fix: bool,

    // Fix policy
    pub allow: Vec<String>,
    pub deny: Vec<String>,
}

impl Default for ValidateSettings {
    fn default() -> Self {
        Self {
            work_dir: Utf8PathBuf::from("."),
            fix: false,
            allow: Vec::new(),
            deny: Vec::new(),
        }
    }
}
