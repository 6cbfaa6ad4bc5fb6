//! Pipeline module for the transcription review service.
//!
//! Wires the full discovery → batch → correction → artifact flow and the
//! artifact-level degradation analysis that runs after alignment.
//!
//! # Architecture
//!
//! ```text
//! ReviewPipeline
//!        │
//!        ├─ run_online(prefix)            one-pass correction
//!        │     discover → BatchBuilder → LlmInvoker → merge
//!        │     → ResultProcessor (reinject / fallback) → reports
//!        │
//!        ├─ prepare_batch(prefix)         offline: input JSONL + sidecars
//!        └─ process_batch_results(jsonl)  offline: finalize + cleanup
//!
//! AnalysisPipeline
//!        └─ run(stem)                     word-confidence export
//!              → QualityAnalyzer → truncate .vtt/.srt → .analysis
//! ```
//!
//! # Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use transcript_review::config::ReviewConfig;
//! use transcript_review::llm::WordEstimateCounter;
//! use transcript_review::pipeline::ReviewPipeline;
//! use transcript_review::storage::MemoryStore;
//!
//! #[tokio::main]
//! async fn main() {
//!     let transcripts = Arc::new(MemoryStore::new());
//!     let artifacts = Arc::new(MemoryStore::new());
//!
//!     // (invoker constructed from the deployment's model backend)
//!     # use transcript_review::llm::LlmInvoker;
//!     # fn make_invoker() -> Arc<dyn LlmInvoker> { unimplemented!() }
//!
//!     let pipeline = ReviewPipeline::new(
//!         transcripts,
//!         artifacts,
//!         make_invoker(),
//!         Arc::new(WordEstimateCounter::default()),
//!         ReviewConfig::default(),
//!     );
//!
//!     let report = pipeline.run_online("recordings/2026-01/").await.unwrap();
//!     println!("fixed {}/{}", report.fixed, report.total_found);
//! }
//! ```

pub mod analysis;
pub mod review;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use analysis::{AnalysisError, AnalysisPipeline};
pub use review::{
    PipelineError, ProcessReport, ReviewPipeline, ReviewReport, DEFAULT_SYSTEM_PROMPT,
    TIMED_SUFFIX,
};
