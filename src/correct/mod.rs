//! Correction finalization: timestamp reinjection and artifact output.
//!
//! * [`reinject()`] — line-anchored, all-or-nothing timestamp reattachment
//! * [`ResultProcessor`] — per-document artifact finalization with the
//!   original-timing fallback when reinjection is impossible

pub mod processor;
pub mod reinject;

pub use processor::{ProcessError, ResultProcessor, SyncStatus};
pub use reinject::reinject;
