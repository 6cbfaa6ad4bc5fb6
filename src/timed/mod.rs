//! Timed-text parsing: the `"[n] start - end: text"` transcript format.
//!
//! This module provides:
//! * [`TimedSegment`] and [`parse`] / [`render`] for the timed-line grammar.
//! * [`strip_to_plain`], which drops the timestamps to produce the plain
//!   text sent for LLM correction.
//! * [`parse_timestamp`] / [`format_timestamp`] for the shared
//!   `HH:MM:SS.mmm` timestamp shape.
//! * [`find_long_segment`] / [`truncate_at_line`], the intake guard that
//!   cuts a document where forced alignment ran off the rails.
//!
//! # Quick start
//!
//! ```rust
//! use transcript_review::timed::{parse, strip_to_plain};
//!
//! let timed = "\
//! [1] 00:00:00.000 - 00:00:02.000: hello there
//! [2] 00:00:02.000 - 00:00:04.000: second line";
//!
//! let segments = parse(timed);
//! assert_eq!(segments.len(), 2);
//! assert_eq!(segments[1].text, "second line");
//!
//! assert_eq!(strip_to_plain(timed), "hello there\nsecond line");
//! ```

pub mod guard;
pub mod segment;
pub mod stamp;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use guard::{find_long_segment, truncate_at_line, DEFAULT_MAX_SEGMENT_SECS};
pub use segment::{parse, render, split_prefix, strip_to_plain, TimedSegment};
pub use stamp::{format_timestamp, parse_timestamp};
