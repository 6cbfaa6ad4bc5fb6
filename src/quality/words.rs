//! Word-confidence export parsing.
//!
//! The forced aligner exports per-word confidence as JSON in its own shape,
//! `{"segments": [{"words": [{"word", "start", "end", "probability"}]}]}`.
//! Any field may be null; the analyzer decides what to do with the gaps.

use serde::Deserialize;

/// One aligned word with its confidence, flattened out of the export.
#[derive(Debug, Clone, PartialEq)]
pub struct WordConfidence {
    /// The word text, trimmed.
    pub word: String,
    /// Aligned start time in seconds.
    pub start_time: Option<f64>,
    /// Aligned end time in seconds.
    pub end_time: Option<f64>,
    /// Alignment confidence in `[0, 1]`; `None` when the aligner produced
    /// no estimate.
    pub probability: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct Export {
    #[serde(default)]
    segments: Vec<ExportSegment>,
}

#[derive(Debug, Deserialize)]
struct ExportSegment {
    #[serde(default)]
    words: Vec<ExportWord>,
}

#[derive(Debug, Deserialize)]
struct ExportWord {
    #[serde(default)]
    word: Option<String>,
    #[serde(default)]
    start: Option<f64>,
    #[serde(default)]
    end: Option<f64>,
    #[serde(default)]
    probability: Option<f64>,
}

/// Parse the aligner's word-confidence export, flattening all segments into
/// one word list in document order.
pub fn parse_word_export(json: &str) -> Result<Vec<WordConfidence>, serde_json::Error> {
    let export: Export = serde_json::from_str(json)?;
    Ok(export
        .segments
        .into_iter()
        .flat_map(|segment| segment.words)
        .map(|w| WordConfidence {
            word: w.word.unwrap_or_default().trim().to_string(),
            start_time: w.start,
            end_time: w.end,
            probability: w.probability,
        })
        .collect())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_the_aligner_shape() {
        let json = r#"{
            "segments": [
                {"words": [
                    {"word": " hello", "start": 0.0, "end": 0.5, "probability": 0.98},
                    {"word": "world ", "start": 0.5, "end": 1.0, "probability": 0.95}
                ]}
            ]
        }"#;
        let words = parse_word_export(json).unwrap();

        assert_eq!(words.len(), 2);
        assert_eq!(words[0].word, "hello");
        assert_eq!(words[0].start_time, Some(0.0));
        assert_eq!(words[0].end_time, Some(0.5));
        assert_eq!(words[0].probability, Some(0.98));
        assert_eq!(words[1].word, "world");
    }

    #[test]
    fn flattens_segments_in_order() {
        let json = r#"{
            "segments": [
                {"words": [{"word": "a", "start": 0.0, "end": 0.1, "probability": 0.9}]},
                {"words": [{"word": "b", "start": 0.1, "end": 0.2, "probability": 0.9}]}
            ]
        }"#;
        let words = parse_word_export(json).unwrap();

        let texts: Vec<&str> = words.iter().map(|w| w.word.as_str()).collect();
        assert_eq!(texts, vec!["a", "b"]);
    }

    #[test]
    fn null_fields_become_none() {
        let json = r#"{
            "segments": [
                {"words": [{"word": null, "start": null, "end": null, "probability": null}]}
            ]
        }"#;
        let words = parse_word_export(json).unwrap();

        assert_eq!(words[0].word, "");
        assert_eq!(words[0].start_time, None);
        assert_eq!(words[0].probability, None);
    }

    #[test]
    fn missing_fields_become_none() {
        let json = r#"{"segments": [{"words": [{"word": "x"}]}]}"#;
        let words = parse_word_export(json).unwrap();

        assert_eq!(words[0].word, "x");
        assert_eq!(words[0].start_time, None);
        assert_eq!(words[0].end_time, None);
        assert_eq!(words[0].probability, None);
    }

    #[test]
    fn empty_export_parses_to_no_words() {
        assert!(parse_word_export(r#"{"segments": []}"#).unwrap().is_empty());
        assert!(parse_word_export(r#"{}"#).unwrap().is_empty());
    }

    #[test]
    fn invalid_json_is_an_error() {
        assert!(parse_word_export("not json").is_err());
    }
}
