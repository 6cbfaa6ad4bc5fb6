//! SubRip rendering and degradation truncation.
//!
//! Same cue blocks as the VTT side, minus the `WEBVTT` header and with
//! comma-separated milliseconds in the timestamps.

use crate::timed::{format_timestamp, TimedSegment};

use super::cue::keep_until_word;

/// `HH:MM:SS,mmm`: SubRip uses a decimal comma.
fn format_srt_timestamp(seconds: f64) -> String {
    format_timestamp(seconds).replace('.', ",")
}

/// Render timed segments as a SubRip document.
pub fn to_srt(segments: &[TimedSegment]) -> String {
    let mut lines: Vec<String> = Vec::new();
    for segment in segments {
        lines.push(segment.index.to_string());
        lines.push(format!(
            "{} --> {}",
            format_srt_timestamp(segment.start),
            format_srt_timestamp(segment.end)
        ));
        lines.push(segment.text.clone());
        lines.push(String::new());
    }
    lines.join("\n")
}

/// Drop every cue from the one containing the `word_index`-th spoken word
/// onwards.  See [`truncate_vtt`](super::truncate_vtt); SubRip has no header
/// block to preserve.
pub fn truncate_srt(content: &str, word_index: usize) -> String {
    let kept = keep_until_word(content.trim().split("\n\n"), word_index);

    let mut out = kept.join("\n\n");
    out.push('\n');
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timed::parse;

    const TIMED: &str = "\
[1] 00:00:01.000 - 00:00:03.500: hello world
[2] 00:00:03.500 - 00:00:07.250: this is a test";

    fn sample_srt() -> String {
        to_srt(&parse(TIMED))
    }

    // --- Rendering ---

    #[test]
    fn renders_cue_blocks_with_comma_milliseconds() {
        assert_eq!(
            sample_srt(),
            "\
1
00:00:01,000 --> 00:00:03,500
hello world

2
00:00:03,500 --> 00:00:07,250
this is a test
"
        );
    }

    #[test]
    fn empty_segments_render_empty_string() {
        assert_eq!(to_srt(&[]), "");
    }

    #[test]
    fn comma_replacement_touches_only_milliseconds() {
        assert_eq!(format_srt_timestamp(3661.5), "01:01:01,500");
    }

    // --- Truncation ---

    #[test]
    fn truncates_from_the_degraded_cue_onwards() {
        let truncated = truncate_srt(&sample_srt(), 3);

        assert_eq!(
            truncated,
            "\
1
00:00:01,000 --> 00:00:03,500
hello world
"
        );
    }

    #[test]
    fn index_past_all_words_keeps_every_cue() {
        let truncated = truncate_srt(&sample_srt(), 1000);
        assert!(truncated.contains("this is a test"));
    }

    #[test]
    fn index_zero_leaves_no_cues() {
        assert_eq!(truncate_srt(&sample_srt(), 0), "\n");
    }
}
