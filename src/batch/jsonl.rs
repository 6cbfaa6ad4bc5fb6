//! JSONL wire codec for the external batch invocation.
//!
//! One JSON object per line on both sides.  The input side carries the model
//! request envelope; the output side is parsed leniently: malformed lines,
//! padding records, and empty responses are logged and skipped, never fatal.

use serde_json::{json, Value};

use crate::config::BatchConfig;

use super::entry::{BatchEntry, BatchResultRecord, DUMMY_PREFIX};

/// Model API version carried in every request envelope.
const ANTHROPIC_VERSION: &str = "bedrock-2023-05-31";

/// Render batch entries as input JSONL, one request envelope per line, with
/// a trailing newline.
pub fn render_jsonl(entries: &[BatchEntry], config: &BatchConfig) -> String {
    let mut out = String::new();
    for entry in entries {
        let record = json!({
            "recordId": entry.record_id,
            "modelInput": {
                "anthropic_version": ANTHROPIC_VERSION,
                "max_tokens": config.max_tokens_per_entry,
                "temperature": config.temperature,
                "system": entry.system_prompt,
                "messages": [
                    {"role": "user", "content": entry.content}
                ],
            },
        });
        out.push_str(&record.to_string());
        out.push('\n');
    }
    out
}

/// Parse output JSONL into result records.
///
/// Keeps only real records with non-empty corrected text: padding records,
/// unparseable lines, and records missing an id or a response body are
/// warned about and dropped.
pub fn parse_output_jsonl(text: &str) -> Vec<BatchResultRecord> {
    let mut records = Vec::new();

    for (line_no, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let value: Value = match serde_json::from_str(line) {
            Ok(value) => value,
            Err(err) => {
                log::warn!("output line {}: unparseable JSON ({err})", line_no + 1);
                continue;
            }
        };

        let record_id = match value.get("recordId").and_then(Value::as_str) {
            Some(id) => id,
            None => {
                log::warn!("output line {}: missing recordId", line_no + 1);
                continue;
            }
        };

        if record_id.starts_with(DUMMY_PREFIX) {
            continue;
        }

        let fixed_text = value
            .pointer("/modelOutput/content/0/text")
            .and_then(Value::as_str)
            .unwrap_or("")
            .trim();

        if fixed_text.is_empty() {
            log::warn!("output line {}: record {record_id} has empty text", line_no + 1);
            continue;
        }

        records.push(BatchResultRecord::new(record_id, fixed_text));
    }

    records
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
