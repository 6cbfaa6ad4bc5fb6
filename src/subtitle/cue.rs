//! Cue-block scanning shared by the VTT and SRT truncators.
//!
//! A cue block is a run of lines separated from its neighbours by a blank
//! line.  Spoken text is everything after the `-->` timestamp line; index
//! and timestamp lines never count towards the word tally.

/// Count spoken words in one cue block.
pub(crate) fn spoken_word_count(block: &str) -> usize {
    let mut past_timing = false;
    let mut count = 0;
    for line in block.lines() {
        if past_timing {
            count += line.split_whitespace().count();
        } else if line.contains("-->") {
            past_timing = true;
        }
    }
    count
}

/// Keep cue blocks in order while the running word count stays below
/// `word_index`.  The block that would reach or exceed the index is dropped
/// along with everything after it.
pub(crate) fn keep_until_word<'a>(
    blocks: impl Iterator<Item = &'a str>,
    word_index: usize,
) -> Vec<&'a str> {
    let mut kept = Vec::new();
    let mut cumulative = 0;
    for block in blocks {
        let words = spoken_word_count(block);
        if cumulative + words >= word_index {
            break;
        }
        kept.push(block);
        cumulative += words;
    }
    kept
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_words_after_the_timestamp_line_only() {
        let block = "1\n00:00:00.000 --> 00:00:02.000\nhello there world";
        assert_eq!(spoken_word_count(block), 3);
    }

    #[test]
    fn counts_multiple_text_lines() {
        let block = "1\n00:00:00.000 --> 00:00:02.000\nfirst line\nsecond line";
        assert_eq!(spoken_word_count(block), 4);
    }

    #[test]
    fn block_without_timing_has_no_spoken_words() {
        assert_eq!(spoken_word_count("WEBVTT"), 0);
        assert_eq!(spoken_word_count(""), 0);
    }

    #[test]
    fn keeps_blocks_strictly_before_the_word_index() {
        let blocks = [
            "1\n00:00:00.000 --> 00:00:01.000\ntwo words",
            "2\n00:00:01.000 --> 00:00:02.000\ntwo more",
            "3\n00:00:02.000 --> 00:00:03.000\nnever reached",
        ];
        // Index 3 lands inside the second block (words 2..4), so only the
        // first block survives.
        let kept = keep_until_word(blocks.into_iter(), 3);
        assert_eq!(kept, vec![blocks[0]]);
    }

    #[test]
    fn index_past_the_end_keeps_everything() {
        let blocks = [
            "1\n00:00:00.000 --> 00:00:01.000\ntwo words",
            "2\n00:00:01.000 --> 00:00:02.000\ntwo more",
        ];
        let kept = keep_until_word(blocks.into_iter(), 100);
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn index_zero_keeps_nothing() {
        let blocks = ["1\n00:00:00.000 --> 00:00:01.000\ntwo words"];
        assert!(keep_until_word(blocks.into_iter(), 0).is_empty());
    }
}
