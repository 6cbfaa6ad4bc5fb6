//! LLM collaborator interfaces for transcript correction.
//!
//! This module provides:
//! * [`LlmInvoker`] — async trait implemented by correction backends
//!   (online per-entry or asynchronous batch job, the crate is agnostic).
//! * [`TokenCounter`] — token counting used to size batch entries.
//! * [`WordEstimateCounter`] — local word-count approximation.
//! * [`FallbackCounter`] — wraps any counter; degrades to the estimate on
//!   failure so batch building never fails.
//! * [`InvokeError`] / [`TokenCountError`] — error variants.
//!
//! The invocation transport itself (HTTP client, job submission, polling)
//! lives outside this crate; embedders implement [`LlmInvoker`] and inject
//! it into the pipeline as `Arc<dyn LlmInvoker>`.

pub mod invoker;
pub mod token;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use invoker::{InvokeError, LlmInvoker};
pub use token::{
    FallbackCounter, TokenCountError, TokenCounter, WordEstimateCounter, DEFAULT_TOKENS_PER_WORD,
};

// test-only re-export so pipeline tests can import MockInvoker without
// `use transcript_review::llm::invoker::MockInvoker`.
#[cfg(test)]
pub use invoker::MockInvoker;
