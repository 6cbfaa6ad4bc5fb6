//! Analysis pipeline — degradation detection over stored artifacts.
//!
//! Runs the [`QualityAnalyzer`] against a document's word-confidence export
//! and, when both detectors agree the transcription collapsed, truncates the
//! subtitle artifacts in place and records the detection indices.
//!
//! ```text
//! run(stem)
//!   └─▶ load {stem}.json word-confidence export
//!   └─▶ QualityAnalyzer::analyze
//!         ├─ InsufficientData → log, leave artifacts alone
//!         ├─ Clean            → log, leave artifacts alone
//!         └─ Degraded         → truncate {stem}.vtt / {stem}.srt
//!                               persist {stem}.analysis
//! ```

use std::sync::Arc;

use thiserror::Error;

use crate::config::AnalysisConfig;
use crate::quality::{parse_word_export, AnalysisOutcome, AnalysisRecord, QualityAnalyzer};
use crate::storage::{Storage, StorageError};
use crate::subtitle::{truncate_srt, truncate_vtt};

// ---------------------------------------------------------------------------
// AnalysisError
// ---------------------------------------------------------------------------

/// Errors that abort an analysis run.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// No word-confidence export is stored for the document.
    #[error("no word-confidence export stored at {key}")]
    MissingExport { key: String },
    /// A storage backend failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
    /// The export or the analysis record could not be (de)serialised.
    #[error("analysis JSON handling failed: {0}")]
    Json(#[from] serde_json::Error),
}

// ---------------------------------------------------------------------------
// AnalysisPipeline
// ---------------------------------------------------------------------------

/// Drives degradation analysis for stored documents.
pub struct AnalysisPipeline {
    store: Arc<dyn Storage>,
    analyzer: QualityAnalyzer,
}

impl AnalysisPipeline {
    pub fn new(store: Arc<dyn Storage>, config: &AnalysisConfig) -> Self {
        Self {
            store,
            analyzer: QualityAnalyzer::new(config),
        }
    }

    /// Analyze one document and act on the outcome.
    ///
    /// Only a `Degraded` outcome touches storage: both subtitle artifacts
    /// are truncated at the detected word index (a missing artifact is
    /// logged and skipped) and the raw detection indices are persisted as
    /// `{stem}.analysis`.
    ///
    /// # Errors
    ///
    /// [`AnalysisError::MissingExport`] when `{stem}.json` does not exist;
    /// [`AnalysisError::Json`] when it cannot be parsed.
    pub async fn run(&self, stem: &str) -> Result<AnalysisOutcome, AnalysisError> {
        // ── 1. Load the word-confidence export ───────────────────────────
        let key = format!("{stem}.json");
        let json = self
            .store
            .get(&key)
            .await?
            .ok_or(AnalysisError::MissingExport { key })?;

        // ── 2. Analyze ───────────────────────────────────────────────────
        let words = parse_word_export(&json)?;
        let outcome = self.analyzer.analyze(&words);

        // ── 3. Act on the outcome ────────────────────────────────────────
        match &outcome {
            AnalysisOutcome::Degraded(report) => {
                // Degraded implies an actionable report with a CUSUM index.
                if let Some(index) = report.truncation_index() {
                    log::warn!("{stem}: transcription degrades at word {index}, truncating");
                    self.truncate_subtitles(stem, index).await?;

                    let record = AnalysisRecord::from(report);
                    self.store
                        .put(&format!("{stem}.analysis"), &record.to_json()?)
                        .await?;
                }
            }
            AnalysisOutcome::Clean(_) => {
                log::info!("{stem}: no degradation detected");
            }
            AnalysisOutcome::InsufficientData { valid_points } => {
                log::info!("{stem}: only {valid_points} valid points, analysis skipped");
            }
        }

        Ok(outcome)
    }

    /// Truncate both subtitle artifacts at `index` words, in place.
    async fn truncate_subtitles(&self, stem: &str, index: usize) -> Result<(), AnalysisError> {
        let vtt_key = format!("{stem}.vtt");
        match self.store.get(&vtt_key).await? {
            Some(content) => {
                self.store
                    .put(&vtt_key, &truncate_vtt(&content, index))
                    .await?;
            }
            None => log::warn!("{vtt_key}: missing, nothing to truncate"),
        }

        let srt_key = format!("{stem}.srt");
        match self.store.get(&srt_key).await? {
            Some(content) => {
                self.store
                    .put(&srt_key, &truncate_srt(&content, index))
                    .await?;
            }
            None => log::warn!("{srt_key}: missing, nothing to truncate"),
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
