//! Core `LlmInvoker` trait: the external correction step.
//!
//! The invoker is opaque to the rest of the crate.  Whether a backend sends
//! entries one at a time (an online API) or submits a single asynchronous
//! batch job and polls for output, it surfaces the same contract: every
//! non-dummy entry comes back as a [`BatchResultRecord`].
//!
//! [`MockInvoker`] (available under `#[cfg(test)]`) returns a pre-configured
//! response, useful for unit-testing the pipeline without a backend.

use async_trait::async_trait;
use thiserror::Error;

use crate::batch::{BatchEntry, BatchResultRecord};

// ---------------------------------------------------------------------------
// InvokeError
// ---------------------------------------------------------------------------

/// Errors that can occur during LLM invocation.
#[derive(Debug, Clone, Error)]
pub enum InvokeError {
    /// Transport or connection error.
    #[error("LLM request failed: {0}")]
    Request(String),

    /// The invocation did not complete within the backend's time budget.
    #[error("LLM invocation timed out")]
    Timeout,

    /// The backend response could not be parsed as expected.
    #[error("failed to parse LLM response: {0}")]
    Parse(String),

    /// The backend returned no usable records.
    #[error("LLM returned an empty response")]
    EmptyResponse,
}

// ---------------------------------------------------------------------------
// LlmInvoker trait
// ---------------------------------------------------------------------------

/// Async trait for the external LLM correction step.
///
/// Implementors must be `Send + Sync` so they can be shared as
/// `Arc<dyn LlmInvoker>`.
///
/// # Contract
///
/// - One [`BatchResultRecord`] per non-dummy entry, carrying the same
///   `record_id` the entry was submitted with.
/// - Dummy entries may be answered or silently dropped; downstream merging
///   discards them either way.
#[async_trait]
pub trait LlmInvoker: Send + Sync {
    async fn invoke(&self, entries: &[BatchEntry]) -> Result<Vec<BatchResultRecord>, InvokeError>;
}

// Compile-time assertion: Box<dyn LlmInvoker> must be constructible.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn LlmInvoker>) {}
};

// ---------------------------------------------------------------------------
// MockInvoker  (test-only)
// ---------------------------------------------------------------------------

/// A test double that returns a pre-configured response without any backend.
#[cfg(test)]
pub struct MockInvoker {
    response: Result<Vec<BatchResultRecord>, InvokeError>,
}

#[cfg(test)]
impl MockInvoker {
    /// Create a mock that always returns `Ok(records)`.
    pub fn ok(records: Vec<BatchResultRecord>) -> Self {
        Self {
            response: Ok(records),
        }
    }

    /// Create a mock that always returns `Err(error)`.
    pub fn err(error: InvokeError) -> Self {
        Self {
            response: Err(error),
        }
    }
}

#[cfg(test)]
#[async_trait]
impl LlmInvoker for MockInvoker {
    async fn invoke(
        &self,
        _entries: &[BatchEntry],
    ) -> Result<Vec<BatchResultRecord>, InvokeError> {
        self.response.clone()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
