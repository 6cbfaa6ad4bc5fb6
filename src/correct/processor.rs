//! Per-document finalization of corrected text.
//!
//! Given a stem and its merged corrected text, the processor re-attaches
//! timing, persists the plain-text and subtitle artifacts, and reports
//! whether the subtitles carry synchronized or original (fallback) timing.

use std::sync::Arc;

use thiserror::Error;

use crate::storage::{Storage, StorageError};
use crate::subtitle::to_vtt;
use crate::timed::parse;

use super::reinject::reinject;

// ---------------------------------------------------------------------------
// SyncStatus / ProcessError
// ---------------------------------------------------------------------------

/// How the final subtitle artifact got its timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStatus {
    /// Corrected text with reinjected original timestamps.
    Synced,
    /// Original (pre-correction) text and timing; the correction survives
    /// only as plain text.
    FallbackTiming,
}

/// Errors raised while finalizing one document.
#[derive(Debug, Clone, Error)]
pub enum ProcessError {
    /// The `{stem}.time` sidecar is missing, so no subtitle can be built.
    #[error("no timing sidecar stored for {stem}")]
    MissingTiming { stem: String },
    /// A storage backend failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

// ---------------------------------------------------------------------------
// ResultProcessor
// ---------------------------------------------------------------------------

/// Finalizes corrected documents into stored artifacts.
///
/// Reads the timing sidecar from the transcript store and writes the
/// finished artifacts (`.txt`, `.vtt`, and on fallback `.no_timing.txt`) to
/// the output store.
pub struct ResultProcessor {
    transcripts: Arc<dyn Storage>,
    output: Arc<dyn Storage>,
}

impl ResultProcessor {
    pub fn new(transcripts: Arc<dyn Storage>, output: Arc<dyn Storage>) -> Self {
        Self {
            transcripts,
            output,
        }
    }

    /// Finalize one document.
    ///
    /// Persists `{stem}.txt` unconditionally, then either a synchronized
    /// `{stem}.vtt` (reinjection succeeded) or a fallback `{stem}.vtt` from
    /// the original timing plus `{stem}.no_timing.txt` with the corrected
    /// text.
    ///
    /// # Errors
    ///
    /// [`ProcessError::MissingTiming`] when the `{stem}.time` sidecar does
    /// not exist; [`ProcessError::Storage`] on backend failure.
    pub async fn process_document(
        &self,
        stem: &str,
        corrected: &str,
    ) -> Result<SyncStatus, ProcessError> {
        let timed = self
            .transcripts
            .get(&format!("{stem}.time"))
            .await?
            .ok_or_else(|| ProcessError::MissingTiming {
                stem: stem.to_string(),
            })?;

        self.output.put(&format!("{stem}.txt"), corrected).await?;

        match reinject(corrected, &timed) {
            Some(synced) => {
                let vtt = to_vtt(&parse(&synced));
                self.output.put(&format!("{stem}.vtt"), &vtt).await?;
                log::info!("{stem}: subtitles carry corrected text with synchronized timing");
                Ok(SyncStatus::Synced)
            }
            None => {
                log::warn!(
                    "{stem}: corrected text no longer matches the timed line structure, \
                     keeping original timing in the subtitles"
                );
                self.output
                    .put(&format!("{stem}.no_timing.txt"), corrected)
                    .await?;
                let vtt = to_vtt(&parse(&timed));
                self.output.put(&format!("{stem}.vtt"), &vtt).await?;
                Ok(SyncStatus::FallbackTiming)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    const TIMED: &str = "\
[1] 00:00:01.000 - 00:00:03.500: helo world
[2] 00:00:03.500 - 00:00:07.250: this is a tset";

    async fn processor_with_timing(
        stem: &str,
    ) -> (ResultProcessor, Arc<MemoryStore>, Arc<MemoryStore>) {
        let transcripts = Arc::new(MemoryStore::new());
        let output = Arc::new(MemoryStore::new());
        let processor = ResultProcessor::new(transcripts.clone(), output.clone());
        transcripts
            .put(&format!("{stem}.time"), TIMED)
            .await
            .unwrap();
        (processor, transcripts, output)
    }

    #[tokio::test]
    async fn matching_correction_is_synced() {
        let (processor, _transcripts, output) = processor_with_timing("clip").await;

        let status = processor
            .process_document("clip", "hello world\nthis is a test")
            .await
            .unwrap();

        assert_eq!(status, SyncStatus::Synced);
        assert_eq!(
            output.get("clip.txt").await.unwrap().as_deref(),
            Some("hello world\nthis is a test")
        );

        let vtt = output.get("clip.vtt").await.unwrap().unwrap();
        assert!(vtt.starts_with("WEBVTT"));
        assert!(vtt.contains("00:00:01.000 --> 00:00:03.500"));
        assert!(vtt.contains("hello world"));
        assert!(vtt.contains("this is a test"));

        // No fallback artifact on the happy path.
        assert_eq!(output.get("clip.no_timing.txt").await.unwrap(), None);
    }

    #[tokio::test]
    async fn mismatched_correction_falls_back_to_original_timing() {
        let (processor, _transcripts, output) = processor_with_timing("clip").await;

        // The model merged both lines into one.
        let status = processor
            .process_document("clip", "hello world this is a test")
            .await
            .unwrap();

        assert_eq!(status, SyncStatus::FallbackTiming);

        // Corrected text still lands in both plain-text artifacts.
        assert_eq!(
            output.get("clip.txt").await.unwrap().as_deref(),
            Some("hello world this is a test")
        );
        assert_eq!(
            output.get("clip.no_timing.txt").await.unwrap().as_deref(),
            Some("hello world this is a test")
        );

        // The subtitles keep the original (uncorrected) text and timing.
        let vtt = output.get("clip.vtt").await.unwrap().unwrap();
        assert!(vtt.contains("helo world"));
        assert!(vtt.contains("this is a tset"));
    }

    #[tokio::test]
    async fn missing_timing_sidecar_is_an_error() {
        let transcripts = Arc::new(MemoryStore::new());
        let output = Arc::new(MemoryStore::new());
        let processor = ResultProcessor::new(transcripts, output);

        let err = processor
            .process_document("clip", "hello")
            .await
            .unwrap_err();

        assert!(matches!(err, ProcessError::MissingTiming { ref stem } if stem == "clip"));
        assert!(err.to_string().contains("clip"));
    }
}
