//! Long-segment intake guard.
//!
//! A forced-alignment failure shows up as one absurdly long segment: the
//! aligner stalls and attributes a long audio span to a single line, and the
//! text at and after that line is unreliable.  [`find_long_segment`] locates
//! the first such line so callers can cut the document before paying for
//! LLM correction of a garbage tail.

use super::segment::parse_line;

/// Default duration ceiling in seconds; segments longer than this indicate
/// the aligner ran off the rails.
pub const DEFAULT_MAX_SEGMENT_SECS: f64 = 22.0;

// ---------------------------------------------------------------------------
// Detection
// ---------------------------------------------------------------------------

/// Return the 0-based line index of the first timed line whose duration
/// exceeds `max_secs`, or `None` when every segment is within bounds.
///
/// Lines that do not match the timed grammar are scanned past without
/// affecting the index, so the result can be fed straight to
/// [`truncate_at_line`] on the raw document.
pub fn find_long_segment(timed_text: &str, max_secs: f64) -> Option<usize> {
    for (line_index, line) in timed_text.lines().enumerate() {
        if let Some(segment) = parse_line(line) {
            if segment.duration() > max_secs {
                return Some(line_index);
            }
        }
    }
    None
}

// ---------------------------------------------------------------------------
// Truncation
// ---------------------------------------------------------------------------

/// Keep only the lines before `line_index`, joined with newlines.
pub fn truncate_at_line(content: &str, line_index: usize) -> String {
    content
        .lines()
        .take(line_index)
        .collect::<Vec<_>>()
        .join("\n")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const WITH_LONG_SEGMENT: &str = "\
[1] 00:00:00.000 - 00:00:02.000: fine
[2] 00:00:02.000 - 00:00:04.000: also fine
[3] 00:00:04.000 - 00:00:30.000: aligner drifted here
[4] 00:00:30.000 - 00:00:32.000: unreliable";

    // --- find_long_segment ---

    #[test]
    fn finds_first_long_segment() {
        assert_eq!(find_long_segment(WITH_LONG_SEGMENT, 22.0), Some(2));
    }

    #[test]
    fn none_when_all_segments_short() {
        let text = "[1] 00:00:00.000 - 00:00:02.000: a\n[2] 00:00:02.000 - 00:00:04.000: b";
        assert_eq!(find_long_segment(text, 22.0), None);
    }

    #[test]
    fn exactly_max_duration_is_not_long() {
        let text = "[1] 00:00:00.000 - 00:00:22.000: borderline";
        assert_eq!(find_long_segment(text, 22.0), None);
    }

    #[test]
    fn index_counts_non_matching_lines() {
        let text = "\
header line

[1] 00:00:00.000 - 00:01:00.000: long";
        assert_eq!(find_long_segment(text, 22.0), Some(2));
    }

    // --- truncate_at_line ---

    #[test]
    fn truncate_keeps_lines_before_index() {
        let truncated = truncate_at_line(WITH_LONG_SEGMENT, 2);
        assert_eq!(
            truncated,
            "[1] 00:00:00.000 - 00:00:02.000: fine\n[2] 00:00:02.000 - 00:00:04.000: also fine"
        );
    }

    #[test]
    fn truncate_at_zero_is_empty() {
        assert_eq!(truncate_at_line(WITH_LONG_SEGMENT, 0), "");
    }

    #[test]
    fn truncate_past_end_keeps_everything() {
        assert_eq!(truncate_at_line("a\nb", 10), "a\nb");
    }

    // --- combined ---

    #[test]
    fn guard_removes_long_tail() {
        let index = find_long_segment(WITH_LONG_SEGMENT, 22.0).unwrap();
        let truncated = truncate_at_line(WITH_LONG_SEGMENT, index);
        assert!(!truncated.contains("drifted"));
        assert!(!truncated.contains("unreliable"));
        assert!(truncated.contains("also fine"));
    }
}
