//! Fixed job configuration for gloss extraction.
//!
//! The binary always runs with [`GlossConfig::default`], the ELAN preset.
//! Presets:
//! - ELAN (`ELANData`): tier `gl`, every `ANNOTATION_VALUE` below a `TIER`
//!   whose `TIER_ID` contains the tier marker.
//! - EXMARaLDA (`EXMARaLDATranscriptionData`): tier `gr`, the `event`
//!   children of the `tier` whose `id` equals the tier marker.
//!
//! Output files always land in `output_dir`; the invocation's own output
//! path is not consulted.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Placeholder substituted with the tier identifier.
pub const TIER_PLACEHOLDER: &str = "%s";

pub const DEFAULT_OUTPUT_DIR: &str = "/tmp/gloss";

/// Value stamped into the `function` field of every item the job emits.
pub const FUNCTION_NAME: &str = "dump-gloss";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GlossConfig {
    /// Data-format tag the invocation must carry for the job to run.
    pub expected_data: String,
    pub tier_id: String,
    /// XPath with `%s` standing for the tier identifier.
    pub xpath_template: String,
    pub output_dir: PathBuf,
    #[serde(default = "default_function")]
    pub function: String,
}

fn default_function() -> String {
    FUNCTION_NAME.to_string()
}

impl Default for GlossConfig {
    fn default() -> Self {
        Self::elan()
    }
}

impl GlossConfig {
    pub fn elan() -> Self {
        GlossConfig {
            expected_data: "ELANData".to_string(),
            tier_id: "gl".to_string(),
            xpath_template: r#"//TIER[contains(@TIER_ID,"%s")]//ANNOTATION_VALUE"#.to_string(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            function: default_function(),
        }
    }

    pub fn exmaralda() -> Self {
        GlossConfig {
            expected_data: "EXMARaLDATranscriptionData".to_string(),
            tier_id: "gr".to_string(),
            xpath_template: r#"//tier[@id="%s"]/event"#.to_string(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            function: default_function(),
        }
    }

    /// Same preset, different target directory.
    pub fn with_output_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.output_dir = dir.as_ref().to_path_buf();
        self
    }

    /// The template with every placeholder replaced by the tier identifier.
    pub fn xpath(&self) -> String {
        self.xpath_template.replace(TIER_PLACEHOLDER, &self.tier_id)
    }

    /// `<output_dir>/<input stem>_<tier>.txt`
    pub fn output_path_for(&self, input: &Path) -> PathBuf {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        self.output_dir
            .join(format!("{}_{}.txt", stem, self.tier_id))
    }
}
