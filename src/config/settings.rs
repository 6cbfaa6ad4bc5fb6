//! Pipeline settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across tasks.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::timed::DEFAULT_MAX_SEGMENT_SECS;

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Errors raised while loading or saving configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading or writing the file failed.
    #[error("config file I/O failed: {0}")]
    Io(#[from] std::io::Error),
    /// The file exists but is not valid TOML for these settings.
    #[error("config file is not valid TOML: {0}")]
    Parse(#[from] toml::de::Error),
    /// Settings could not be serialised (should not happen for these types).
    #[error("config serialisation failed: {0}")]
    Serialize(#[from] toml::ser::Error),
}

// ---------------------------------------------------------------------------
// BatchConfig
// ---------------------------------------------------------------------------

/// Settings for batch entry construction and the model request envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Soft token budget per batch entry; oversized documents are split on
    /// line boundaries to stay under it.
    pub max_tokens_per_entry: usize,
    /// Minimum number of entries per batch; shortfalls are padded with
    /// dummy records the result side discards.
    pub min_total_entries: usize,
    /// Tokens-per-word multiplier used when the token counter is
    /// unavailable.
    pub fallback_tokens_per_word: f64,
    /// Sampling temperature sent with every correction request.
    pub temperature: f64,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_tokens_per_entry: 60_000,
            min_total_entries: 100,
            fallback_tokens_per_word: 4.0,
            temperature: 0.4,
        }
    }
}

// ---------------------------------------------------------------------------
// TimingConfig
// ---------------------------------------------------------------------------

/// Settings for the timed-text intake guard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Maximum plausible duration of one timed segment in seconds; the
    /// first segment past it marks a runaway transcription tail.
    pub max_segment_secs: f64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            max_segment_secs: DEFAULT_MAX_SEGMENT_SECS,
        }
    }
}

// ---------------------------------------------------------------------------
// AnalysisConfig
// ---------------------------------------------------------------------------

/// Settings for word-confidence degradation analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Moving-average window size in words.
    pub window: usize,
    /// Rolling-average detector threshold as a fraction of the baseline;
    /// an average below `baseline * threshold` flags degradation.
    pub rolling_threshold_pct: f64,
    /// CUSUM detector threshold on the accumulated negative drift.
    pub cusum_threshold: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            window: 100,
            rolling_threshold_pct: 0.5,
            cusum_threshold: 80.0,
        }
    }
}

// ---------------------------------------------------------------------------
// ReviewConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level pipeline configuration, serialised as `review.toml`.
///
/// # Persistence
///
/// ```rust,no_run
/// use transcript_review::config::ReviewConfig;
///
/// // Load (returns Default when the file is missing)
/// let config = ReviewConfig::load_from("review.toml".as_ref()).unwrap();
///
/// // Modify and save
/// // config.save_to("review.toml".as_ref()).unwrap();
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReviewConfig {
    /// Batch construction / request envelope settings.
    pub batch: BatchConfig,
    /// Timed-text intake guard settings.
    pub timing: TimingConfig,
    /// Degradation analysis settings.
    pub analysis: AnalysisConfig,
}

impl ReviewConfig {
    /// Load configuration from an explicit path.
    ///
    /// Returns `Ok(ReviewConfig::default())` when the file does not exist
    /// yet so callers never need to special-case a missing file.
    pub fn load_from(path: &std::path::Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to an explicit path, creating parent directories
    /// as needed.
    pub fn save_to(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
