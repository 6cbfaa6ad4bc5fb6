//! WebVTT rendering and degradation truncation.

use crate::timed::{format_timestamp, TimedSegment};

use super::cue::keep_until_word;

/// Render timed segments as a WebVTT document.
///
/// One cue per segment: index line, `start --> end` timestamp line, text
/// line, blank separator.  Ends with a trailing newline.
pub fn to_vtt(segments: &[TimedSegment]) -> String {
    let mut lines: Vec<String> = vec!["WEBVTT".into(), String::new()];
    for segment in segments {
        lines.push(segment.index.to_string());
        lines.push(format!(
            "{} --> {}",
            format_timestamp(segment.start),
            format_timestamp(segment.end)
        ));
        lines.push(segment.text.clone());
        lines.push(String::new());
    }
    lines.join("\n")
}

/// Drop every cue from the one containing the `word_index`-th spoken word
/// onwards, keeping the `WEBVTT` header block untouched.
///
/// `word_index` counts words across cues in order, as the degradation
/// analyzer does over the word-confidence export.
pub fn truncate_vtt(content: &str, word_index: usize) -> String {
    let mut blocks = content.trim().split("\n\n");

    let mut kept: Vec<&str> = Vec::new();
    // The header block carries no spoken words and always survives.
    if let Some(header) = blocks.next() {
        kept.push(header);
    }
    kept.extend(keep_until_word(blocks, word_index));

    let mut out = kept.join("\n\n");
    out.push('\n');
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
