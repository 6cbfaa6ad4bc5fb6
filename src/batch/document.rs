//! `TranscriptionDocument`: one source transcript prepared for correction.

use crate::timed::strip_to_plain;

// ---------------------------------------------------------------------------
// TranscriptionDocument
// ---------------------------------------------------------------------------

/// A transcript loaded for one pipeline invocation.
///
/// Holds both representations of the source: the timed text (timestamp
/// reinjection pairs corrected lines against it) and the plain text (what
/// actually goes to the LLM).  Documents are created at intake, consumed by
/// the batch builder, and discarded once correction completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptionDocument {
    /// Unique base identifier, shared across all artifact file variants.
    pub stem: String,
    /// Timestamp-free text, one line per segment.
    pub plain_text: String,
    /// Original timed-line source.
    pub timed_text: String,
    /// System instructions sent alongside the content.
    pub system_prompt: String,
    /// Number of plain-text lines.
    pub line_count: usize,
    /// Number of whitespace-separated words in the plain text.
    pub word_count: usize,
}

impl TranscriptionDocument {
    /// Build a document from its timed source.
    ///
    /// The plain text is derived by stripping timestamps; line and word
    /// counts are taken from the plain text so they match what the LLM
    /// receives.
    pub fn from_timed_text(
        stem: impl Into<String>,
        timed_text: impl Into<String>,
        system_prompt: impl Into<String>,
    ) -> Self {
        let timed_text = timed_text.into();
        let plain_text = strip_to_plain(&timed_text);
        let line_count = plain_text.lines().count();
        let word_count = plain_text.split_whitespace().count();

        Self {
            stem: stem.into(),
            plain_text,
            timed_text,
            system_prompt: system_prompt.into(),
            line_count,
            word_count,
        }
    }

    /// Whether the document carries no correctable text at all.
    pub fn is_empty(&self) -> bool {
        self.word_count == 0
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
