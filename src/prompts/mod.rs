//! Prompt module for LLM-based operations.

pub mod summary;

pub use summary::*;
