//! Line-anchored timestamp reinjection.
//!
//! The correction model receives plain text, one line per timed segment, and
//! replies with corrected plain text.  As long as it preserves the line
//! structure, each corrected line can take back the timestamp prefix of its
//! positional counterpart in the original timed text.  If the model merged
//! or dropped lines there is no trustworthy pairing, so reinjection is
//! all-or-nothing.

use crate::timed::split_prefix;

/// Reattach the original timestamp prefixes to corrected text.
///
/// Both texts are reduced to their non-empty trimmed lines and paired
/// positionally.  Returns `None` on a line-count mismatch; no partial
/// reinjection is attempted, since a misaligned pairing would attach wrong
/// timestamps to every line after the first drift.
///
/// An original line without a timestamp prefix contributes its corrected
/// counterpart unprefixed.
pub fn reinject(fixed_text: &str, timed_text: &str) -> Option<String> {
    let fixed_lines: Vec<&str> = fixed_text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    let timed_lines: Vec<&str> = timed_text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    if fixed_lines.len() != timed_lines.len() {
        log::warn!(
            "line count mismatch (corrected {} vs timed {}), cannot reinject timestamps",
            fixed_lines.len(),
            timed_lines.len()
        );
        return None;
    }

    let merged = timed_lines
        .iter()
        .zip(&fixed_lines)
        .map(|(timed, fixed)| match split_prefix(timed) {
            Some((prefix, _)) => format!("{prefix}{fixed}"),
            None => (*fixed).to_string(),
        })
        .collect::<Vec<_>>()
        .join("\n");

    Some(merged)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
