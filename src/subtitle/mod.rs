//! Subtitle artifact rendering and truncation.
//!
//! * [`vtt`] — WebVTT documents (`WEBVTT` header, dot milliseconds)
//! * [`srt`] — SubRip documents (no header, comma milliseconds)
//!
//! Truncation serves the degradation analyzer: given the word index where
//! transcription quality collapsed, both formats drop every cue from the
//! one containing that word onwards.

mod cue;
pub mod srt;
pub mod vtt;

pub use srt::{to_srt, truncate_srt};
pub use vtt::{to_vtt, truncate_vtt};
