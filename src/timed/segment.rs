//! Timed-line grammar: `"[n] HH:MM:SS.mmm - HH:MM:SS.mmm: text"`.
//!
//! This format is the transcript's canonical timestamped representation.  It
//! is what the upstream transcriber emits (`.timed.txt`), what the `.time`
//! sidecar stores, and what timestamp reinjection pairs corrected text
//! against.
//!
//! [`parse`] is lenient: lines that do not match the grammar are skipped, so
//! a stray header or blank line never fails a whole document.

use once_cell::sync::Lazy;
use regex::Regex;

use super::stamp::{format_timestamp, parse_timestamp};

// ---------------------------------------------------------------------------
// Line grammar
// ---------------------------------------------------------------------------

/// Full timed line: bracketed index, start/end timestamps, text.
static TIMED_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\[(\d+)\]\s+(\d{2}:\d{2}:\d{2}\.\d{3})\s+-\s+(\d{2}:\d{2}:\d{2}\.\d{3}):\s*(.*)$")
        .expect("timed line regex is valid")
});

/// Same grammar split into (timestamp prefix, text), used by reinjection,
/// which keeps the prefix verbatim instead of re-rendering it.
static TIMED_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\[\d+\]\s+\d{2}:\d{2}:\d{2}\.\d{3}\s+-\s+\d{2}:\d{2}:\d{2}\.\d{3}:\s*)(.*)$")
        .expect("timed prefix regex is valid")
});

// ---------------------------------------------------------------------------
// TimedSegment
// ---------------------------------------------------------------------------

/// One parsed timed line.
///
/// `index` is 1-based and matches the bracketed number in the source line.
/// `start` and `end` are in seconds; well-formed sources satisfy
/// `start <= end`.
#[derive(Debug, Clone, PartialEq)]
pub struct TimedSegment {
    pub index: u32,
    pub start: f64,
    pub end: f64,
    pub text: String,
}

impl TimedSegment {
    /// Segment duration in seconds.
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

// ---------------------------------------------------------------------------
// Parsing / rendering
// ---------------------------------------------------------------------------

/// Parse a single line against the timed grammar.
pub(crate) fn parse_line(line: &str) -> Option<TimedSegment> {
    let caps = TIMED_LINE.captures(line.trim())?;
    Some(TimedSegment {
        index: caps[1].parse().ok()?,
        start: parse_timestamp(&caps[2])?,
        end: parse_timestamp(&caps[3])?,
        text: caps[4].to_string(),
    })
}

/// Parse a timed-text document into segments, in source order.
///
/// Lines that do not match the grammar (blank lines, headers, damage) are
/// skipped, not an error.
pub fn parse(timed_text: &str) -> Vec<TimedSegment> {
    timed_text.lines().filter_map(parse_line).collect()
}

/// Strip the timestamps from a timed document, leaving one text line per
/// segment in source order.  This plain form is what gets sent for
/// correction.
pub fn strip_to_plain(timed_text: &str) -> String {
    parse(timed_text)
        .into_iter()
        .map(|segment| segment.text)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render segments back to canonical timed-line form.
///
/// Inverse of [`parse`] for well-formed segments.
pub fn render(segments: &[TimedSegment]) -> String {
    segments
        .iter()
        .map(|segment| {
            format!(
                "[{}] {} - {}: {}",
                segment.index,
                format_timestamp(segment.start),
                format_timestamp(segment.end),
                segment.text
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Split a timed line into its timestamp prefix and text.
///
/// Returns `None` when the line does not match the grammar.  The prefix
/// includes the trailing `": "` so `prefix + text` reproduces a full line.
pub fn split_prefix(line: &str) -> Option<(&str, &str)> {
    let caps = TIMED_PREFIX.captures(line)?;
    let prefix = caps.get(1)?;
    let rest = caps.get(2)?;
    Some((
        &line[prefix.start()..prefix.end()],
        &line[rest.start()..rest.end()],
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
[1] 00:00:00.000 - 00:00:02.000: hello there
[2] 00:00:02.000 - 00:00:04.500: second line
[3] 00:00:04.500 - 00:00:07.000: third line";

    // --- parse ---

    #[test]
    fn parses_all_well_formed_lines() {
        let segments = parse(SAMPLE);
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0].index, 1);
        assert_eq!(segments[0].start, 0.0);
        assert_eq!(segments[0].end, 2.0);
        assert_eq!(segments[0].text, "hello there");
        assert_eq!(segments[2].text, "third line");
    }

    #[test]
    fn skips_blank_and_malformed_lines() {
        let text = "\
garbage header

[1] 00:00:00.000 - 00:00:02.000: kept
[x] 00:00:02.000 - 00:00:04.000: bad index";
        let segments = parse(text);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].text, "kept");
    }

    #[test]
    fn parses_empty_segment_text() {
        let segments = parse("[1] 00:00:00.000 - 00:00:02.000: ");
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].text, "");
    }

    #[test]
    fn duration_is_end_minus_start() {
        let segments = parse(SAMPLE);
        assert!((segments[1].duration() - 2.5).abs() < 1e-9);
    }

    // --- strip_to_plain ---

    #[test]
    fn strip_keeps_one_line_per_segment() {
        let plain = strip_to_plain(SAMPLE);
        assert_eq!(plain, "hello there\nsecond line\nthird line");
    }

    #[test]
    fn strip_is_deterministic() {
        assert_eq!(strip_to_plain(SAMPLE), strip_to_plain(SAMPLE));
    }

    // --- render ---

    #[test]
    fn render_round_trips_parse() {
        let segments = parse(SAMPLE);
        let rendered = render(&segments);
        let reparsed = parse(&rendered);
        assert_eq!(reparsed.len(), segments.len());
        assert_eq!(reparsed, segments);
    }

    #[test]
    fn render_empty_is_empty() {
        assert_eq!(render(&[]), "");
    }

    // --- split_prefix ---

    #[test]
    fn split_prefix_separates_timestamp_and_text() {
        let (prefix, text) =
            split_prefix("[1] 00:00:00.000 - 00:00:02.000: hello there").unwrap();
        assert_eq!(prefix, "[1] 00:00:00.000 - 00:00:02.000: ");
        assert_eq!(text, "hello there");
    }

    #[test]
    fn split_prefix_rejects_plain_text() {
        assert!(split_prefix("no timestamps here").is_none());
    }

    #[test]
    fn prefix_plus_text_reproduces_line() {
        let line = "[7] 00:01:00.000 - 00:01:03.250: какой-то текст";
        let (prefix, text) = split_prefix(line).unwrap();
        assert_eq!(format!("{prefix}{text}"), line);
    }
}
