//! Batch assembly for the external correction model.
//!
//! Turns discovered transcription documents into the entry list the batch
//! invocation consumes, and turns the invocation's output back into whole
//! corrected documents:
//!
//! * [`document`] — a discovered transcription and its derived plain text
//! * [`entry`] — batch entries, padding records, and batch statistics
//! * [`builder`] — token-aware splitting and minimum-cardinality padding
//! * [`jsonl`] — the JSONL request/response wire codec
//! * [`merge`] — chunk reassembly keyed by record-id suffix

pub mod builder;
pub mod document;
pub mod entry;
pub mod jsonl;
pub mod merge;

pub use builder::{BatchBuildError, BatchBuilder};
pub use document::TranscriptionDocument;
pub use entry::{BatchEntry, BatchResultRecord, BatchStats, DUMMY_PREFIX};
pub use jsonl::{parse_output_jsonl, render_jsonl};
pub use merge::merge_records;
