//! Reassembly of corrected chunk results into whole documents.
//!
//! Record ids ending in `_{n}` are treated as split chunks of the same
//! document and re-joined in suffix order.  The suffix convention is purely
//! lexical: a source stem that itself ends in `_{n}` is indistinguishable
//! from a chunk id and will be grouped under the shorter base.  Upstream
//! naming avoids such stems.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use super::entry::{BatchResultRecord, DUMMY_PREFIX};

/// Matches a chunk id: base stem plus a numeric `_{n}` suffix.
static SPLIT_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.+)_(\d+)$").expect("split suffix regex is valid"));

/// Merge chunk results back into whole documents, keyed by stem.
///
/// Padding records are dropped.  Unsplit records pass through under their own
/// id; chunked records are gathered per base stem, ordered by their numeric
/// suffix, and joined with newlines.
pub fn merge_records(records: &[BatchResultRecord]) -> HashMap<String, String> {
    let mut whole: HashMap<String, String> = HashMap::new();
    let mut chunked: HashMap<String, Vec<(u64, &str)>> = HashMap::new();

    for record in records {
        if record.record_id.starts_with(DUMMY_PREFIX) {
            continue;
        }

        match split_chunk_id(&record.record_id) {
            Some((base, suffix)) => {
                chunked
                    .entry(base.to_string())
                    .or_default()
                    .push((suffix, record.fixed_text.as_str()));
            }
            None => {
                whole.insert(record.record_id.clone(), record.fixed_text.clone());
            }
        }
    }

    for (base, mut chunks) in chunked {
        chunks.sort_by_key(|(suffix, _)| *suffix);
        let text = chunks
            .iter()
            .map(|(_, text)| *text)
            .collect::<Vec<_>>()
            .join("\n");
        whole.insert(base, text);
    }

    whole
}

/// Split a record id into `(base, suffix)` when it carries the chunk suffix.
///
/// A suffix too large for `u64` is not a chunk id.
fn split_chunk_id(record_id: &str) -> Option<(&str, u64)> {
    let caps = SPLIT_SUFFIX.captures(record_id)?;
    let base = caps.get(1)?.as_str();
    let suffix: u64 = caps.get(2)?.as_str().parse().ok()?;
    Some((base, suffix))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
