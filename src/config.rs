use std::path::PathBuf;

pub const DEFAULT_OUTPUT_DIR: &str = "media_analysis_output";
pub const DEFAULT_LOG_FILE: &str = "logs/media_intel.log";

/// Runtime settings read from the environment (and `.env`, once loaded).
///
/// | Variable                 | Default                 |
/// |--------------------------|-------------------------|
/// | `MEDIA_INTEL_OUTPUT_DIR` | `media_analysis_output` |
/// | `LOG_FILE_PATH`          | `logs/media_intel.log`  |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub output_dir: PathBuf,
    pub log_file_path: PathBuf,
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from any key lookup. Blank values fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(default))
        };

        Self {
            output_dir: get("MEDIA_INTEL_OUTPUT_DIR", DEFAULT_OUTPUT_DIR),
            log_file_path: get("LOG_FILE_PATH", DEFAULT_LOG_FILE),
        }
    }

    /// Replaces the output directory when one was given on the command line.
    pub fn with_output_dir(mut self, output_dir: Option<PathBuf>) -> Self {
        if let Some(dir) = output_dir {
            self.output_dir = dir;
        }
        self
    }
}
