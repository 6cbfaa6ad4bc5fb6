//! Transcription review — batch post-processing for timed speech-to-text
//! output.
//!
//! Takes timed transcriptions (`[n] start - end: text` lines, one per
//! aligned segment), sends their plain text through a correction model in
//! token-budgeted batches, reattaches the original timing to the corrected
//! text, and emits the final artifacts (plain text, WebVTT, SubRip).  A
//! separate analysis pass watches the aligner's per-word confidence and cuts
//! subtitles short when the transcription demonstrably collapsed.
//!
//! # Modules
//!
//! | Module       | Responsibility                                           |
//! |--------------|----------------------------------------------------------|
//! | [`timed`]    | Timed-line grammar: parse, render, strip, intake guard   |
//! | [`batch`]    | Batch entries: split, pad, JSONL codec, chunk merge      |
//! | [`llm`]      | Correction model and token-counter collaborator traits   |
//! | [`correct`]  | Timestamp reinjection and artifact finalization          |
//! | [`subtitle`] | WebVTT / SubRip rendering and truncation                 |
//! | [`quality`]  | Word-confidence parsing and degradation detection        |
//! | [`pipeline`] | Review and analysis orchestration                        |
//! | [`storage`]  | Artifact store trait plus the in-memory backend          |
//! | [`config`]   | TOML settings for every stage                            |
//!
//! # Quick start
//!
//! The core is synchronous and pure; only the pipelines and their
//! collaborators are async.
//!
//! ```rust
//! use transcript_review::batch::{BatchBuilder, TranscriptionDocument};
//! use transcript_review::config::BatchConfig;
//! use transcript_review::correct::reinject;
//! use transcript_review::llm::WordEstimateCounter;
//!
//! let timed = "[1] 00:00:00.000 - 00:00:02.000: helo wrld";
//! let doc = TranscriptionDocument::from_timed_text("clip", timed, "fix the text");
//!
//! // The model sees plain text only.
//! let config = BatchConfig { min_total_entries: 1, ..BatchConfig::default() };
//! let entries = BatchBuilder::new(&config)
//!     .build(std::slice::from_ref(&doc), &WordEstimateCounter::default())
//!     .unwrap();
//! assert_eq!(entries[0].content, "helo wrld");
//!
//! // The corrected reply takes the original timing back.
//! let synced = reinject("hello world", timed).unwrap();
//! assert_eq!(synced, "[1] 00:00:00.000 - 00:00:02.000: hello world");
//! ```

pub mod batch;
pub mod config;
pub mod correct;
pub mod llm;
pub mod pipeline;
pub mod quality;
pub mod storage;
pub mod subtitle;
pub mod timed;
