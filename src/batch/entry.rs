//! Batch entry and result-record types shared across the correction flow.

/// Record-id prefix marking synthetic padding entries.
pub const DUMMY_PREFIX: &str = "dummy_";

/// Fixed trivial payload carried by padding entries.
const DUMMY_PAYLOAD: &str = "ok";

// ---------------------------------------------------------------------------
// BatchEntry
// ---------------------------------------------------------------------------

/// One unit of work submitted to the external correction step.
///
/// `record_id` is either a document stem (whole document), `"{stem}_{n}"`
/// with a 1-based chunk index (split document), or `"dummy_{i}"` (padding).
/// Entries are created by the builder and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchEntry {
    pub record_id: String,
    pub system_prompt: String,
    pub content: String,
    pub token_count: usize,
}

impl BatchEntry {
    /// A synthetic padding entry for absolute batch position `index`.
    ///
    /// Padding exists purely to satisfy the external invocation's minimum
    /// batch size and carries no semantic content.
    pub fn dummy(index: usize) -> Self {
        Self {
            record_id: format!("{DUMMY_PREFIX}{index}"),
            system_prompt: DUMMY_PAYLOAD.to_string(),
            content: DUMMY_PAYLOAD.to_string(),
            token_count: 2,
        }
    }

    /// Whether this entry is synthetic padding.
    pub fn is_dummy(&self) -> bool {
        self.record_id.starts_with(DUMMY_PREFIX)
    }
}

// ---------------------------------------------------------------------------
// BatchResultRecord
// ---------------------------------------------------------------------------

/// Corrected text returned by the LLM step for one batch entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchResultRecord {
    pub record_id: String,
    pub fixed_text: String,
}

impl BatchResultRecord {
    pub fn new(record_id: impl Into<String>, fixed_text: impl Into<String>) -> Self {
        Self {
            record_id: record_id.into(),
            fixed_text: fixed_text.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// BatchStats
// ---------------------------------------------------------------------------

/// Summary of a built batch, for logging and audit.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BatchStats {
    pub total_entries: usize,
    pub real_entries: usize,
    pub dummy_entries: usize,
    pub total_tokens: usize,
    pub real_tokens: usize,
}

impl BatchStats {
    /// Tally `entries` into a stats summary.
    pub fn from_entries(entries: &[BatchEntry]) -> Self {
        let mut stats = Self {
            total_entries: entries.len(),
            ..Self::default()
        };

        for entry in entries {
            stats.total_tokens += entry.token_count;
            if entry.is_dummy() {
                stats.dummy_entries += 1;
            } else {
                stats.real_entries += 1;
                stats.real_tokens += entry.token_count;
            }
        }

        stats
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn real_entry(id: &str, tokens: usize) -> BatchEntry {
        BatchEntry {
            record_id: id.to_string(),
            system_prompt: "fix".to_string(),
            content: "text".to_string(),
            token_count: tokens,
        }
    }

    // --- BatchEntry ---

    #[test]
    fn dummy_has_fixed_payload() {
        let entry = BatchEntry::dummy(7);
        assert_eq!(entry.record_id, "dummy_7");
        assert_eq!(entry.system_prompt, "ok");
        assert_eq!(entry.content, "ok");
        assert_eq!(entry.token_count, 2);
        assert!(entry.is_dummy());
    }

    #[test]
    fn real_entry_is_not_dummy() {
        assert!(!real_entry("clip", 100).is_dummy());
    }

    // --- BatchStats ---

    #[test]
    fn stats_split_real_and_dummy() {
        let entries = vec![
            real_entry("a", 500),
            real_entry("b_1", 300),
            BatchEntry::dummy(2),
            BatchEntry::dummy(3),
        ];
        let stats = BatchStats::from_entries(&entries);

        assert_eq!(stats.total_entries, 4);
        assert_eq!(stats.real_entries, 2);
        assert_eq!(stats.dummy_entries, 2);
        assert_eq!(stats.real_tokens, 800);
        assert_eq!(stats.total_tokens, 804);
    }

    #[test]
    fn stats_of_empty_batch_are_zero() {
        assert_eq!(BatchStats::from_entries(&[]), BatchStats::default());
    }
}
