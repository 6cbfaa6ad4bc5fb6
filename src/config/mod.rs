//! Configuration module for the transcription review pipeline.
//!
//! Provides `ReviewConfig` (top-level settings), sub-configs for each
//! pipeline stage, and TOML persistence via `ReviewConfig::load_from` /
//! `ReviewConfig::save_to`.

pub mod settings;

pub use settings::{AnalysisConfig, BatchConfig, ConfigError, ReviewConfig, TimingConfig};
