//! Token-aware batch construction: split oversized documents, pad to the
//! minimum batch cardinality.
//!
//! # Splitting
//!
//! Oversized documents are split on line boundaries using a **proportional
//! estimate**: `tokens_per_line = total_tokens / line_count`.  Lines
//! accumulate into a chunk until the next line would push the running
//! estimate over the budget.  Chunks are never re-measured, so the budget is
//! a soft cap; a single line whose own cost exceeds it still becomes one
//! oversized chunk.
//!
//! # Padding
//!
//! The external batch invocation requires a minimum number of entries.
//! After all real entries are emitted, `dummy_{i}` padding entries fill the
//! batch up to that floor, `i` being the absolute batch position.

use thiserror::Error;

use crate::config::BatchConfig;
use crate::llm::{TokenCounter, WordEstimateCounter};

use super::document::TranscriptionDocument;
use super::entry::BatchEntry;

// ---------------------------------------------------------------------------
// BatchBuildError
// ---------------------------------------------------------------------------

/// Errors surfaced to the caller by batch construction.
///
/// Token-counting failures are deliberately absent: counting degrades to the
/// word estimate instead of failing the build.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BatchBuildError {
    /// `build` was called with no documents at all.
    #[error("no documents to build a batch from")]
    EmptyDocumentSet,
}

// ---------------------------------------------------------------------------
// BatchBuilder
// ---------------------------------------------------------------------------

/// Turns documents into a flat entry list honouring the token budget and the
/// minimum-entries floor.
///
/// # Example
/// ```rust
/// use transcript_review::batch::{BatchBuilder, TranscriptionDocument};
/// use transcript_review::config::BatchConfig;
/// use transcript_review::llm::WordEstimateCounter;
///
/// let doc = TranscriptionDocument::from_timed_text(
///     "clip",
///     "[1] 00:00:00.000 - 00:00:02.000: hello there",
///     "fix the text",
/// );
///
/// let config = BatchConfig { min_total_entries: 3, ..BatchConfig::default() };
/// let builder = BatchBuilder::new(&config);
/// let entries = builder
///     .build(std::slice::from_ref(&doc), &WordEstimateCounter::default())
///     .unwrap();
///
/// // One real entry plus padding up to the floor.
/// assert_eq!(entries.len(), 3);
/// assert_eq!(entries[0].record_id, "clip");
/// assert!(entries[2].is_dummy());
/// ```
pub struct BatchBuilder {
    /// Soft token budget per entry (default: `60_000`).
    pub max_tokens_per_entry: usize,
    /// Minimum total entries after padding (default: `100`).
    pub min_total_entries: usize,
    fallback: WordEstimateCounter,
}

impl Default for BatchBuilder {
    fn default() -> Self {
        Self::new(&BatchConfig::default())
    }
}

impl BatchBuilder {
    /// Create a builder from batch configuration.
    pub fn new(config: &BatchConfig) -> Self {
        Self {
            max_tokens_per_entry: config.max_tokens_per_entry,
            min_total_entries: config.min_total_entries,
            fallback: WordEstimateCounter::new(config.fallback_tokens_per_word),
        }
    }

    /// Build batch entries for `documents`, in document order, padded to the
    /// minimum floor.
    ///
    /// # Errors
    ///
    /// [`BatchBuildError::EmptyDocumentSet`] when `documents` is empty.
    pub fn build(
        &self,
        documents: &[TranscriptionDocument],
        counter: &dyn TokenCounter,
    ) -> Result<Vec<BatchEntry>, BatchBuildError> {
        if documents.is_empty() {
            return Err(BatchBuildError::EmptyDocumentSet);
        }

        let mut entries = Vec::with_capacity(documents.len().max(self.min_total_entries));

        for doc in documents {
            let total_tokens = self.count_or_estimate(counter, &doc.plain_text);

            if total_tokens <= self.max_tokens_per_entry {
                entries.push(BatchEntry {
                    record_id: doc.stem.clone(),
                    system_prompt: doc.system_prompt.clone(),
                    content: doc.plain_text.clone(),
                    token_count: total_tokens,
                });
                continue;
            }

            log::info!(
                "document {} exceeds token budget ({total_tokens} > {}), splitting",
                doc.stem,
                self.max_tokens_per_entry
            );

            let chunks = self.split_by_tokens(&doc.plain_text, total_tokens);
            let single_chunk = chunks.len() == 1;

            for (i, (content, token_count)) in chunks.into_iter().enumerate() {
                // A document that still fits in one chunk keeps its bare stem.
                let record_id = if single_chunk {
                    doc.stem.clone()
                } else {
                    format!("{}_{}", doc.stem, i + 1)
                };

                entries.push(BatchEntry {
                    record_id,
                    system_prompt: doc.system_prompt.clone(),
                    content,
                    token_count,
                });
            }
        }

        // Pad with dummies up to the floor; i is the absolute batch position
        // so ids stay unique across the whole batch.
        for i in entries.len()..self.min_total_entries {
            entries.push(BatchEntry::dummy(i));
        }

        Ok(entries)
    }

    /// Count tokens via `counter`, or fall back to the word estimate on
    /// failure.  A counting failure must never fail the whole batch.
    fn count_or_estimate(&self, counter: &dyn TokenCounter, text: &str) -> usize {
        match counter.count(text) {
            Ok(count) => count,
            Err(err) => {
                log::warn!("token counting failed ({err}), using word estimate");
                self.fallback.estimate(text)
            }
        }
    }

    /// Split `content` into contiguous line chunks by the proportional
    /// per-line token estimate.  Returns `(chunk_text, estimated_tokens)`
    /// pairs in source order.
    fn split_by_tokens(&self, content: &str, total_tokens: usize) -> Vec<(String, usize)> {
        let lines: Vec<&str> = content.lines().collect();
        if lines.is_empty() {
            return Vec::new();
        }

        let tokens_per_line = total_tokens as f64 / lines.len() as f64;
        let budget = self.max_tokens_per_entry as f64;

        let mut chunks = Vec::new();
        let mut current_lines: Vec<&str> = Vec::new();
        let mut current_tokens = 0.0_f64;

        for line in lines {
            if current_tokens + tokens_per_line > budget && !current_lines.is_empty() {
                chunks.push((current_lines.join("\n"), current_tokens as usize));
                current_lines = Vec::new();
                current_tokens = 0.0;
            }
            current_lines.push(line);
            current_tokens += tokens_per_line;
        }

        if !current_lines.is_empty() {
            chunks.push((current_lines.join("\n"), current_tokens as usize));
        }

        chunks
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::TokenCountError;

    // -----------------------------------------------------------------------
    // Test doubles and helpers
    // -----------------------------------------------------------------------

    /// Counter that always fails, forcing the word-estimate fallback.
    struct FailCounter;

    impl TokenCounter for FailCounter {
        fn count(&self, _text: &str) -> Result<usize, TokenCountError> {
            Err(TokenCountError::Request("backend down".into()))
        }
    }

    /// Counter that bills a fixed number of tokens per line.
    struct PerLineCounter(usize);

    impl TokenCounter for PerLineCounter {
        fn count(&self, text: &str) -> Result<usize, TokenCountError> {
            Ok(text.lines().count() * self.0)
        }
    }

    fn make_doc(stem: impl Into<String>, lines: usize) -> TranscriptionDocument {
        let timed = (0..lines)
            .map(|i| {
                format!(
                    "[{}] 00:00:{:02}.000 - 00:00:{:02}.000: line number {} words",
                    i + 1,
                    i % 60,
                    (i + 1) % 60,
                    i + 1
                )
            })
            .collect::<Vec<_>>()
            .join("\n");
        TranscriptionDocument::from_timed_text(stem, timed, "fix")
    }

    fn config(max_tokens: usize, min_entries: usize) -> BatchConfig {
        BatchConfig {
            max_tokens_per_entry: max_tokens,
            min_total_entries: min_entries,
            ..BatchConfig::default()
        }
    }

    // -----------------------------------------------------------------------
    // Whole-document entries
    // -----------------------------------------------------------------------

    #[test]
    fn small_document_becomes_one_entry() {
        let builder = BatchBuilder::new(&config(60_000, 1));
        let doc = make_doc("clip", 3);
        let entries = builder
            .build(std::slice::from_ref(&doc), &PerLineCounter(100))
            .unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].record_id, "clip");
        assert_eq!(entries[0].content, doc.plain_text);
        assert_eq!(entries[0].token_count, 300);
    }

    #[test]
    fn exactly_at_budget_is_not_split() {
        let builder = BatchBuilder::new(&config(300, 1));
        let doc = make_doc("clip", 3);
        let entries = builder
            .build(std::slice::from_ref(&doc), &PerLineCounter(100))
            .unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].record_id, "clip");
    }

    // -----------------------------------------------------------------------
    // Splitting
    // -----------------------------------------------------------------------

    #[test]
    fn oversized_document_splits_into_suffixed_chunks() {
        // 10 lines at 100 tokens each against a 350-token budget:
        // chunks of 3 lines (300 tokens) each, then the remainder.
        let builder = BatchBuilder::new(&config(350, 1));
        let doc = make_doc("talk", 10);
        let entries = builder
            .build(std::slice::from_ref(&doc), &PerLineCounter(100))
            .unwrap();

        assert_eq!(entries.len(), 4);
        let ids: Vec<&str> = entries.iter().map(|e| e.record_id.as_str()).collect();
        assert_eq!(ids, vec!["talk_1", "talk_2", "talk_3", "talk_4"]);

        // Chunk contents re-join to the original document.
        let rejoined = entries
            .iter()
            .map(|e| e.content.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        assert_eq!(rejoined, doc.plain_text);

        // Each chunk's estimate stays within the soft budget.
        for entry in &entries {
            assert!(entry.token_count <= 350, "{} tokens", entry.token_count);
        }
    }

    #[test]
    fn single_line_over_budget_keeps_bare_stem() {
        // One line whose own cost exceeds the budget: the split loop can
        // never close a chunk early, so the document stays whole and keeps
        // its bare stem.
        let builder = BatchBuilder::new(&config(50, 1));
        let doc = make_doc("clip", 1);
        let entries = builder
            .build(std::slice::from_ref(&doc), &PerLineCounter(100))
            .unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].record_id, "clip");
        assert_eq!(entries[0].token_count, 100);
    }

    #[test]
    fn split_preserves_document_order() {
        let builder = BatchBuilder::new(&config(250, 1));
        let docs = vec![make_doc("a", 1), make_doc("b", 6), make_doc("c", 1)];
        let entries = builder.build(&docs, &PerLineCounter(100)).unwrap();

        let ids: Vec<&str> = entries.iter().map(|e| e.record_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b_1", "b_2", "b_3", "c"]);
    }

    // -----------------------------------------------------------------------
    // Padding
    // -----------------------------------------------------------------------

    #[test]
    fn pads_to_minimum_entries() {
        let builder = BatchBuilder::new(&config(60_000, 5));
        let docs = vec![make_doc("a", 2), make_doc("b", 2)];
        let entries = builder.build(&docs, &PerLineCounter(10)).unwrap();

        assert_eq!(entries.len(), 5);
        assert_eq!(entries[0].record_id, "a");
        assert_eq!(entries[1].record_id, "b");
        // Padding ids continue from the real entry count.
        assert_eq!(entries[2].record_id, "dummy_2");
        assert_eq!(entries[3].record_id, "dummy_3");
        assert_eq!(entries[4].record_id, "dummy_4");
    }

    #[test]
    fn no_padding_when_floor_already_met() {
        let builder = BatchBuilder::new(&config(60_000, 2));
        let docs = vec![make_doc("a", 1), make_doc("b", 1), make_doc("c", 1)];
        let entries = builder.build(&docs, &PerLineCounter(10)).unwrap();

        assert_eq!(entries.len(), 3);
        assert!(entries.iter().all(|e| !e.is_dummy()));
    }

    #[test]
    fn padding_invariant_holds_for_all_inputs() {
        for doc_count in 1..=7 {
            let builder = BatchBuilder::new(&config(60_000, 5));
            let docs: Vec<_> = (0..doc_count)
                .map(|i| make_doc(format!("d{i}"), 1))
                .collect();
            let entries = builder.build(&docs, &PerLineCounter(10)).unwrap();

            assert!(entries.len() >= 5, "doc_count={doc_count}");
            let dummies = entries.iter().filter(|e| e.is_dummy()).count();
            assert_eq!(dummies, 5usize.saturating_sub(doc_count));
        }
    }

    // -----------------------------------------------------------------------
    // Failure semantics
    // -----------------------------------------------------------------------

    #[test]
    fn empty_document_set_is_an_error() {
        let builder = BatchBuilder::new(&config(60_000, 5));
        let err = builder.build(&[], &PerLineCounter(10)).unwrap_err();
        assert_eq!(err, BatchBuildError::EmptyDocumentSet);
    }

    #[test]
    fn counter_failure_falls_back_to_word_estimate() {
        let builder = BatchBuilder::new(&config(60_000, 1));
        let doc = make_doc("clip", 2); // 2 lines x 4 words each
        let entries = builder
            .build(std::slice::from_ref(&doc), &FailCounter)
            .unwrap();

        assert_eq!(entries.len(), 1);
        // Word-estimate fallback: word count x 4.
        assert_eq!(entries[0].token_count, doc.word_count * 4);
    }
}
