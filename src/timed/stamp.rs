//! `HH:MM:SS.mmm` timestamp parsing and formatting.
//!
//! The timed-line grammar, the subtitle formats and the `.time` sidecar all
//! share this one timestamp shape.  [`parse_timestamp`] and
//! [`format_timestamp`] are exact inverses for well-formed input.

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parse an `HH:MM:SS.mmm` timestamp into seconds.
///
/// Returns `None` when the input does not have exactly three `:`-separated
/// numeric fields.  No timezone or day-rollover handling; transcripts are
/// single files.
///
/// # Example
/// ```rust
/// use transcript_review::timed::parse_timestamp;
///
/// assert_eq!(parse_timestamp("00:01:30.500"), Some(90.5));
/// assert_eq!(parse_timestamp("not a time"), None);
/// ```
pub fn parse_timestamp(ts: &str) -> Option<f64> {
    let mut parts = ts.split(':');

    let hours: f64 = parts.next()?.trim().parse().ok()?;
    let minutes: f64 = parts.next()?.trim().parse().ok()?;
    let seconds: f64 = parts.next()?.trim().parse().ok()?;

    if parts.next().is_some() {
        return None;
    }

    Some(hours * 3600.0 + minutes * 60.0 + seconds)
}

// ---------------------------------------------------------------------------
// Formatting
// ---------------------------------------------------------------------------

/// Format seconds as `HH:MM:SS.mmm` (zero-padded, three fractional digits).
///
/// # Example
/// ```rust
/// use transcript_review::timed::format_timestamp;
///
/// assert_eq!(format_timestamp(90.5), "00:01:30.500");
/// assert_eq!(format_timestamp(3723.042), "01:02:03.042");
/// ```
pub fn format_timestamp(seconds: f64) -> String {
    let hours = (seconds / 3600.0) as u64;
    let minutes = ((seconds % 3600.0) / 60.0) as u64;
    let secs = seconds % 60.0;

    format!("{hours:02}:{minutes:02}:{secs:06.3}")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
