//! Word-confidence quality analysis.
//!
//! * [`words`] — parsing the forced aligner's word-confidence export
//! * [`analyzer`] — dual-method degradation detection (rolling average +
//!   CUSUM, conjunctive decision rule)

pub mod analyzer;
pub mod words;

pub use analyzer::{AnalysisOutcome, AnalysisRecord, DegradationReport, QualityAnalyzer};
pub use words::{parse_word_export, WordConfidence};
