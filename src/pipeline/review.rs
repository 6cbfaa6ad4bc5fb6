//! Review pipeline — drives discovery → batch → correction → artifacts.
//!
//! [`ReviewPipeline`] owns the storage and model collaborators and runs the
//! whole correction flow for every timed transcription under a key prefix.
//!
//! # Pipeline flow
//!
//! ```text
//! run_online(prefix)
//!   └─▶ discover: list *.timed.txt → intake guard → documents
//!         └─▶ persist {stem}.time / {stem}.template.txt sidecars
//!   └─▶ BatchBuilder: split oversized documents, pad to the floor
//!   └─▶ LlmInvoker::invoke
//!   └─▶ merge_records: chunks → whole corrected documents
//!   └─▶ ResultProcessor per document
//!         ├─ reinject ok  → synchronized {stem}.vtt          [Synced]
//!         └─ mismatch     → original timing + no_timing.txt  [FallbackTiming]
//! ```
//!
//! `prepare_batch` / `process_batch_results` split the same flow in two for
//! offline batch invocation: the first renders input JSONL and persists the
//! sidecars a later pass needs, the second turns output JSONL into final
//! artifacts and cleans up the inputs.

use std::sync::Arc;

use thiserror::Error;

use crate::batch::{
    merge_records, parse_output_jsonl, render_jsonl, BatchBuildError, BatchBuilder, BatchStats,
    TranscriptionDocument,
};
use crate::config::ReviewConfig;
use crate::correct::ResultProcessor;
use crate::llm::{InvokeError, LlmInvoker, TokenCounter};
use crate::storage::{Storage, StorageError};
use crate::timed::{find_long_segment, truncate_at_line};

/// Storage suffix that marks a timed transcription source.
pub const TIMED_SUFFIX: &str = ".timed.txt";

/// System prompt used when a document carries no `{stem}.template.txt`.
///
/// The line-preservation wording is what keeps reinjection possible: the
/// model must answer with the same line structure it was given.
pub const DEFAULT_SYSTEM_PROMPT: &str = "\
You are reviewing a speech-to-text transcription. Fix recognition errors so \
every line reads naturally, using the surrounding lines as context. Keep \
exactly one corrected line per input line, in the same order; never merge, \
split, or reorder lines. Reply with the corrected text only.";

// ---------------------------------------------------------------------------
// PipelineError / reports
// ---------------------------------------------------------------------------

/// Errors that abort a pipeline run.
///
/// Per-document failures do not abort the run; they are logged and counted
/// in the run's report instead.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A storage backend failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
    /// The correction model invocation failed.
    #[error(transparent)]
    Invoke(#[from] InvokeError),
    /// Batch construction failed.
    #[error(transparent)]
    Batch(#[from] BatchBuildError),
}

/// Outcome of one `run_online` pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReviewReport {
    /// Documents discovered under the prefix.
    pub total_found: usize,
    /// Documents whose artifacts were finalized (synced or fallback).
    pub fixed: usize,
    /// Documents with no usable correction or a failed finalization.
    pub failed: usize,
}

/// Outcome of one `process_batch_results` pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProcessReport {
    /// Distinct documents present in the batch output.
    pub total_records: usize,
    /// Documents whose artifacts were finalized.
    pub processed: usize,
    /// Documents that failed to finalize.
    pub failed: usize,
    /// Documents whose batch inputs were deleted after finalizing.
    pub cleaned_up: usize,
}

// ---------------------------------------------------------------------------
// ReviewPipeline
// ---------------------------------------------------------------------------

/// Drives the complete transcription review flow.
///
/// Reads timed sources from the transcript store, writes finished artifacts
/// to the output store.  Keep the two keyspaces separate: the offline result
/// pass cleans up batch inputs with a `{stem}.`-prefix delete on the
/// transcript store, which would also catch artifacts written next to them.
pub struct ReviewPipeline {
    transcripts: Arc<dyn Storage>,
    output: Arc<dyn Storage>,
    invoker: Arc<dyn LlmInvoker>,
    counter: Arc<dyn TokenCounter>,
    config: ReviewConfig,
}

impl ReviewPipeline {
    /// Create a new pipeline.
    ///
    /// # Arguments
    ///
    /// * `transcripts` — store holding `*.timed.txt` sources and sidecars.
    /// * `output`      — store receiving finished artifacts.
    /// * `invoker`     — correction model backend.
    /// * `counter`     — token counter for batch splitting.
    pub fn new(
        transcripts: Arc<dyn Storage>,
        output: Arc<dyn Storage>,
        invoker: Arc<dyn LlmInvoker>,
        counter: Arc<dyn TokenCounter>,
        config: ReviewConfig,
    ) -> Self {
        Self {
            transcripts,
            output,
            invoker,
            counter,
            config,
        }
    }

    // -----------------------------------------------------------------------
    // Online flow
    // -----------------------------------------------------------------------

    /// Review every timed transcription under `prefix` in one pass:
    /// discover, correct through the invoker, and finalize all artifacts.
    ///
    /// An empty prefix is not an error; the report simply stays at zero.
    pub async fn run_online(&self, prefix: &str) -> Result<ReviewReport, PipelineError> {
        // ── 1. Discover documents ────────────────────────────────────────
        let documents = self.discover(prefix).await?;
        if documents.is_empty() {
            log::info!("nothing to review under {prefix:?}");
            return Ok(ReviewReport::default());
        }

        // ── 2. Build the batch ───────────────────────────────────────────
        let entries =
            BatchBuilder::new(&self.config.batch).build(&documents, self.counter.as_ref())?;
        let stats = BatchStats::from_entries(&entries);
        log::info!(
            "built {} batch entries ({} real, {} padding, {} real tokens)",
            stats.total_entries,
            stats.real_entries,
            stats.dummy_entries,
            stats.real_tokens
        );

        // ── 3. Invoke the correction model ───────────────────────────────
        let records = self.invoker.invoke(&entries).await?;

        // ── 4. Merge chunks back into whole documents ────────────────────
        let merged = merge_records(&records);

        // ── 5. Finalize artifacts per document ───────────────────────────
        let processor =
            ResultProcessor::new(Arc::clone(&self.transcripts), Arc::clone(&self.output));
        let mut fixed = 0usize;
        let mut failed = 0usize;

        for document in &documents {
            let Some(corrected) = merged.get(&document.stem) else {
                log::warn!("{}: no correction came back for this document", document.stem);
                failed += 1;
                continue;
            };

            match processor.process_document(&document.stem, corrected).await {
                Ok(_status) => {
                    self.copy_audit_timing(&document.stem).await?;
                    fixed += 1;
                }
                Err(err) => {
                    log::error!("{}: finalization failed: {err}", document.stem);
                    failed += 1;
                }
            }
        }

        Ok(ReviewReport {
            total_found: documents.len(),
            fixed,
            failed,
        })
    }

    // -----------------------------------------------------------------------
    // Offline batch flow
    // -----------------------------------------------------------------------

    /// Discover documents under `prefix` and render the batch input JSONL.
    ///
    /// Persists the `{stem}.time` / `{stem}.template.txt` sidecars so a
    /// later [`process_batch_results`](Self::process_batch_results) pass can
    /// finalize without the in-memory documents.
    ///
    /// # Errors
    ///
    /// [`BatchBuildError::EmptyDocumentSet`] when the prefix holds no
    /// reviewable documents: an empty batch input is never worth uploading.
    pub async fn prepare_batch(
        &self,
        prefix: &str,
    ) -> Result<(String, BatchStats), PipelineError> {
        let documents = self.discover(prefix).await?;
        let entries =
            BatchBuilder::new(&self.config.batch).build(&documents, self.counter.as_ref())?;
        let stats = BatchStats::from_entries(&entries);
        log::info!(
            "prepared batch input: {} entries for {} documents",
            stats.total_entries,
            documents.len()
        );
        Ok((render_jsonl(&entries, &self.config.batch), stats))
    }

    /// Finalize artifacts from batch output JSONL.
    ///
    /// Documents are processed in sorted stem order.  Each successfully
    /// finalized document gets its timing audit copy and has its batch
    /// inputs deleted; failed documents keep their inputs for reprocessing.
    pub async fn process_batch_results(
        &self,
        output_jsonl: &str,
    ) -> Result<ProcessReport, PipelineError> {
        // ── 1. Parse and merge ───────────────────────────────────────────
        let records = parse_output_jsonl(output_jsonl);
        let merged = merge_records(&records);

        let mut stems: Vec<&String> = merged.keys().collect();
        stems.sort();
        log::info!("processing batch results for {} documents", stems.len());

        // ── 2. Finalize each document ────────────────────────────────────
        let processor =
            ResultProcessor::new(Arc::clone(&self.transcripts), Arc::clone(&self.output));
        let mut processed = 0usize;
        let mut failed = 0usize;
        let mut cleaned_up = 0usize;

        for stem in stems {
            match processor.process_document(stem, &merged[stem]).await {
                Ok(_status) => {
                    processed += 1;

                    // ── 3. Audit copy, then input cleanup ────────────────
                    self.copy_audit_timing(stem).await?;
                    let removed = self.transcripts.delete_prefix(&format!("{stem}.")).await?;
                    log::info!("{stem}: removed {removed} batch input object(s)");
                    cleaned_up += 1;
                }
                Err(err) => {
                    log::error!("{stem}: processing failed: {err}");
                    failed += 1;
                }
            }
        }

        Ok(ProcessReport {
            total_records: merged.len(),
            processed,
            failed,
            cleaned_up,
        })
    }

    // -----------------------------------------------------------------------
    // Shared steps
    // -----------------------------------------------------------------------

    /// Load every timed transcription under `prefix` into documents.
    ///
    /// Per key: load the source, apply the long-segment intake guard, build
    /// the document, and persist the `{stem}.time` and `{stem}.template.txt`
    /// sidecars for the result pass.  The timing sidecar always keeps the
    /// full source; when the guard truncates, the shortened correction later
    /// takes the original-timing fallback, which is the intended outcome for
    /// an unreliable tail.
    async fn discover(&self, prefix: &str) -> Result<Vec<TranscriptionDocument>, PipelineError> {
        let keys = self.transcripts.list(prefix, TIMED_SUFFIX).await?;
        log::info!("found {} timed transcription(s) under {prefix:?}", keys.len());

        let mut documents = Vec::new();
        for key in keys {
            let stem = key.strip_suffix(TIMED_SUFFIX).unwrap_or(&key).to_string();

            let Some(source) = self.transcripts.get(&key).await? else {
                log::warn!("{key}: listed but no longer present, skipping");
                continue;
            };
            let prompt = match self.transcripts.get(&format!("{stem}.template.txt")).await? {
                Some(prompt) => prompt,
                None => DEFAULT_SYSTEM_PROMPT.to_string(),
            };

            let timed = match find_long_segment(&source, self.config.timing.max_segment_secs) {
                Some(line) => {
                    log::warn!(
                        "{stem}: segment at line {line} runs longer than {}s, dropping the tail",
                        self.config.timing.max_segment_secs
                    );
                    truncate_at_line(&source, line)
                }
                None => source.clone(),
            };

            let document = TranscriptionDocument::from_timed_text(stem, timed, prompt);
            if document.is_empty() {
                log::warn!("{}: no spoken words, skipping", document.stem);
                continue;
            }

            self.transcripts
                .put(&format!("{}.time", document.stem), &source)
                .await?;
            self.transcripts
                .put(
                    &format!("{}.template.txt", document.stem),
                    &document.system_prompt,
                )
                .await?;

            documents.push(document);
        }

        Ok(documents)
    }

    /// Copy the pre-correction timing sidecar into the output store as the
    /// `{stem}.pre-fix.time` audit artifact.
    async fn copy_audit_timing(&self, stem: &str) -> Result<(), PipelineError> {
        if let Some(timing) = self.transcripts.get(&format!("{stem}.time")).await? {
            self.output
                .put(&format!("{stem}.pre-fix.time"), &timing)
                .await?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
