//! Settings file for svgm
//!
//! Settings are read from `svgm.toml` in the working directory, or from the
//! file given with `--config`. Every key is optional:
//!
//! ```toml
//! [extract]
//! context_chars = 150
//! placeholder_suffix = "_with_placeholders"
//! records_file = "svgs.json"
//!
//! [restore]
//! min_confidence = 0.6
//! output = "restored.html"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use svg_blocks::{DEFAULT_CONTEXT_CHARS, DEFAULT_MIN_CONFIDENCE};
use svg_fs::ConfigStore;

use crate::error::{CliError, Result};

/// Settings file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "svgm.toml";

fn default_context_chars() -> usize {
    DEFAULT_CONTEXT_CHARS
}

fn default_placeholder_suffix() -> String {
    "_with_placeholders".to_string()
}

fn default_records_file() -> PathBuf {
    PathBuf::from("svgs.json")
}

fn default_min_confidence() -> f64 {
    DEFAULT_MIN_CONFIDENCE
}

fn default_restore_output() -> PathBuf {
    PathBuf::from("restored.html")
}

/// `[extract]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractSection {
    #[serde(default = "default_context_chars")]
    pub context_chars: usize,

    /// Appended to the input file stem to name the placeholder document
    #[serde(default = "default_placeholder_suffix")]
    pub placeholder_suffix: String,

    #[serde(default = "default_records_file")]
    pub records_file: PathBuf,
}

impl Default for ExtractSection {
    fn default() -> Self {
        Self {
            context_chars: default_context_chars(),
            placeholder_suffix: default_placeholder_suffix(),
            records_file: default_records_file(),
        }
    }
}

/// `[restore]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestoreSection {
    #[serde(default = "default_min_confidence")]
    pub min_confidence: f64,

    #[serde(default = "default_restore_output")]
    pub output: PathBuf,
}

impl Default for RestoreSection {
    fn default() -> Self {
        Self {
            min_confidence: default_min_confidence(),
            output: default_restore_output(),
        }
    }
}

/// Parsed settings file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub extract: ExtractSection,

    #[serde(default)]
    pub restore: RestoreSection,
}

impl Settings {
    /// Load settings.
    ///
    /// An explicit path must exist. Without one, `svgm.toml` in `cwd` is used
    /// if present, otherwise defaults apply.
    pub fn load(explicit: Option<&Path>, cwd: &Path) -> Result<Self> {
        let path = match explicit {
            Some(path) if !path.exists() => {
                return Err(CliError::user(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            Some(path) => path.to_path_buf(),
            None => {
                let candidate = cwd.join(DEFAULT_CONFIG_FILE);
                if !candidate.exists() {
                    tracing::debug!("No {} found, using defaults", DEFAULT_CONFIG_FILE);
                    return Ok(Self::default());
                }
                candidate
            }
        };

        tracing::debug!(path = %path.display(), "Loading settings");
        let settings: Self = ConfigStore::new().load(&path)?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        validate_confidence(self.restore.min_confidence)
    }
}

/// Reject thresholds outside `[0, 1]`.
pub fn validate_confidence(value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(CliError::user(format!(
            "min_confidence must be between 0.0 and 1.0, got {value}"
        )))
    }
}
