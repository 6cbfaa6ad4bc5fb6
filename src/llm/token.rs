//! `TokenCounter` trait and the word-count estimator.
//!
//! Exact token counting lives behind an external API and can fail or be
//! unavailable; batch construction must not.  [`WordEstimateCounter`] is the
//! local approximation (words times a fixed multiplier), and
//! [`FallbackCounter`] wraps any counter so that a counting failure degrades
//! to the estimate instead of failing the batch build.

use thiserror::Error;

/// Default tokens-per-word multiplier for the local estimate.
pub const DEFAULT_TOKENS_PER_WORD: f64 = 4.0;

// ---------------------------------------------------------------------------
// TokenCountError
// ---------------------------------------------------------------------------

/// Errors that can occur while counting tokens.
#[derive(Debug, Clone, Error)]
pub enum TokenCountError {
    /// The counting backend could not be reached or rejected the request.
    #[error("token count request failed: {0}")]
    Request(String),

    /// The backend response could not be interpreted as a count.
    #[error("failed to parse token count response: {0}")]
    Parse(String),
}

// ---------------------------------------------------------------------------
// TokenCounter trait
// ---------------------------------------------------------------------------

/// Thread-safe interface for token counting.
///
/// Implementors must be `Send + Sync` so they can be shared as
/// `Arc<dyn TokenCounter>`.  Counting is synchronous: it is called from the
/// middle of the pure batch-building pass, and approximate local counters
/// need no I/O at all.
pub trait TokenCounter: Send + Sync {
    /// Count (or estimate) the tokens in `text`.
    fn count(&self, text: &str) -> Result<usize, TokenCountError>;
}

// Compile-time assertion: Box<dyn TokenCounter> must be constructible.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn TokenCounter>) {}
};

// ---------------------------------------------------------------------------
// WordEstimateCounter
// ---------------------------------------------------------------------------

/// Approximate token counter: whitespace word count times a multiplier.
///
/// Never fails, so it doubles as the fallback of last resort.
///
/// # Example
/// ```rust
/// use transcript_review::llm::{TokenCounter, WordEstimateCounter};
///
/// let counter = WordEstimateCounter::default();
/// assert_eq!(counter.count("three short words").unwrap(), 12);
/// ```
#[derive(Debug, Clone)]
pub struct WordEstimateCounter {
    /// Multiplier applied to the whitespace word count (default: `4.0`).
    pub tokens_per_word: f64,
}

impl Default for WordEstimateCounter {
    fn default() -> Self {
        Self {
            tokens_per_word: DEFAULT_TOKENS_PER_WORD,
        }
    }
}

impl WordEstimateCounter {
    /// Create an estimator with an explicit multiplier.
    pub fn new(tokens_per_word: f64) -> Self {
        Self { tokens_per_word }
    }

    /// Estimate tokens for `text`.  Infallible.
    pub fn estimate(&self, text: &str) -> usize {
        (text.split_whitespace().count() as f64 * self.tokens_per_word) as usize
    }
}

impl TokenCounter for WordEstimateCounter {
    fn count(&self, text: &str) -> Result<usize, TokenCountError> {
        Ok(self.estimate(text))
    }
}

// ---------------------------------------------------------------------------
// FallbackCounter
// ---------------------------------------------------------------------------

/// A transparent wrapper around any [`TokenCounter`] that never returns an
/// error: on failure it falls back to the word-count estimate.
pub struct FallbackCounter<C: TokenCounter> {
    inner: C,
    estimate: WordEstimateCounter,
}

impl<C: TokenCounter> FallbackCounter<C> {
    /// Wrap `inner` with the default word-count estimate as fallback.
    pub fn new(inner: C) -> Self {
        Self {
            inner,
            estimate: WordEstimateCounter::default(),
        }
    }

    /// Wrap `inner` with an explicit tokens-per-word multiplier.
    pub fn with_multiplier(inner: C, tokens_per_word: f64) -> Self {
        Self {
            inner,
            estimate: WordEstimateCounter::new(tokens_per_word),
        }
    }

    /// Return a reference to the wrapped counter.
    pub fn inner(&self) -> &C {
        &self.inner
    }
}

impl<C: TokenCounter> TokenCounter for FallbackCounter<C> {
    /// Attempt an exact count; fall back to the estimate if any error occurs.
    ///
    /// This implementation **never** returns `Err(_)`.
    fn count(&self, text: &str) -> Result<usize, TokenCountError> {
        match self.inner.count(text) {
            Ok(count) => Ok(count),
            Err(err) => {
                log::warn!("token counting failed ({err}), using word estimate");
                Ok(self.estimate.estimate(text))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
