//! Dual-method transcription degradation detection.
//!
//! When forced alignment drifts off the audio, per-word confidence collapses
//! and stays low for the rest of the document.  The analyzer looks for that
//! collapse with two independent detectors over a trailing moving average of
//! word probability:
//!
//! * **rolling average** — flags the first window whose average falls below
//!   a fraction of an early-document baseline
//! * **CUSUM** — accumulates negative drift from the same baseline and flags
//!   when the accumulated deficit grows past a threshold
//!
//! A degradation is only actionable when **both** methods flag it; requiring
//! independent agreement keeps single-method false positives from truncating
//! healthy documents.  The CUSUM index marks where truncation starts.

use serde::{Deserialize, Serialize};

use crate::config::AnalysisConfig;

use super::words::WordConfidence;

// ---------------------------------------------------------------------------
// Report / outcome types
// ---------------------------------------------------------------------------

/// Raw detection indices from both methods, indexing the sorted series of
/// probability-carrying words.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DegradationReport {
    /// First index flagged by the rolling-average method.
    pub rolling_avg_index: Option<usize>,
    /// First index flagged by the CUSUM method.
    pub cusum_index: Option<usize>,
}

impl DegradationReport {
    /// Both methods agree that the document degrades.
    pub fn is_actionable(&self) -> bool {
        self.rolling_avg_index.is_some() && self.cusum_index.is_some()
    }

    /// Word index where artifact truncation starts, when actionable.
    pub fn truncation_index(&self) -> Option<usize> {
        if self.is_actionable() {
            self.cusum_index
        } else {
            None
        }
    }
}

/// Terminal result of one analysis run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisOutcome {
    /// Too few words carry a probability for the statistics to mean
    /// anything; no detection was attempted.
    InsufficientData { valid_points: usize },
    /// Analyzed, not actionable; artifacts stay untouched.
    Clean(DegradationReport),
    /// Both methods agree; artifacts past the truncation index are suspect.
    Degraded(DegradationReport),
}

/// Persisted form of a [`DegradationReport`] (`-1` = undetected).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub rolling_avg_method: i64,
    pub cusum_method: i64,
}

impl From<&DegradationReport> for AnalysisRecord {
    fn from(report: &DegradationReport) -> Self {
        Self {
            rolling_avg_method: report.rolling_avg_index.map_or(-1, |i| i as i64),
            cusum_method: report.cusum_index.map_or(-1, |i| i as i64),
        }
    }
}

impl AnalysisRecord {
    /// Pretty-printed JSON for the `.analysis` artifact.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

// ---------------------------------------------------------------------------
// QualityAnalyzer
// ---------------------------------------------------------------------------

/// Runs both detectors over a word-confidence series.
///
/// Pure and deterministic: same words in, same outcome out.
#[derive(Debug, Clone)]
pub struct QualityAnalyzer {
    /// Moving-average window size in words.
    pub window: usize,
    /// Rolling-average threshold as a fraction of the baseline.
    pub rolling_threshold_pct: f64,
    /// CUSUM threshold on the accumulated negative drift.
    pub cusum_threshold: f64,
}

impl Default for QualityAnalyzer {
    fn default() -> Self {
        Self::new(&AnalysisConfig::default())
    }
}

impl QualityAnalyzer {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            window: config.window,
            rolling_threshold_pct: config.rolling_threshold_pct,
            cusum_threshold: config.cusum_threshold,
        }
    }

    /// Analyze a word-confidence series.
    ///
    /// Words are sorted by start time first (the export's order is not
    /// guaranteed; missing start times sort to the front), then words
    /// without a probability are dropped.  At least `3 * window` valid
    /// points are required; fewer returns
    /// [`AnalysisOutcome::InsufficientData`].
    pub fn analyze(&self, words: &[WordConfidence]) -> AnalysisOutcome {
        let mut sorted: Vec<&WordConfidence> = words.iter().collect();
        sorted.sort_by(|a, b| {
            a.start_time
                .unwrap_or(0.0)
                .total_cmp(&b.start_time.unwrap_or(0.0))
        });

        let probabilities: Vec<f64> = sorted.iter().filter_map(|w| w.probability).collect();

        if probabilities.len() < 3 * self.window {
            log::info!(
                "degradation analysis skipped: {} valid points, need {}",
                probabilities.len(),
                3 * self.window
            );
            return AnalysisOutcome::InsufficientData {
                valid_points: probabilities.len(),
            };
        }

        let moving = moving_average(&probabilities, self.window);
        // Baseline from the early document, past the warm-up region.
        let baseline = mean(&moving[self.window..3 * self.window]);

        let report = DegradationReport {
            rolling_avg_index: self.detect_rolling(&moving, baseline),
            cusum_index: self.detect_cusum(&moving, baseline),
        };

        if report.is_actionable() {
            AnalysisOutcome::Degraded(report)
        } else {
            AnalysisOutcome::Clean(report)
        }
    }

    /// First index past the warm-up where the moving average drops below
    /// `baseline * rolling_threshold_pct`.
    fn detect_rolling(&self, moving: &[f64], baseline: f64) -> Option<usize> {
        let threshold = baseline * self.rolling_threshold_pct;
        (self.window..moving.len()).find(|&i| moving[i] < threshold)
    }

    /// First index where the one-sided negative cumulative sum of
    /// `moving[i] - baseline` exceeds `cusum_threshold` in magnitude.
    fn detect_cusum(&self, moving: &[f64], target: f64) -> Option<usize> {
        let mut cusum = 0.0_f64;
        for i in self.window..moving.len() {
            cusum = (cusum + (moving[i] - target)).min(0.0);
            if cusum.abs() > self.cusum_threshold {
                return Some(i);
            }
        }
        None
    }
}

/// Trailing moving average: index `i` averages `values[max(0, i-window+1)..=i]`.
fn moving_average(values: &[f64], window: usize) -> Vec<f64> {
    let mut averages = Vec::with_capacity(values.len());
    let mut sum = 0.0;
    for i in 0..values.len() {
        sum += values[i];
        if i >= window {
            sum -= values[i - window];
        }
        let count = (i + 1).min(window);
        averages.push(sum / count as f64);
    }
    averages
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
