//! Seoflow Core — transport-agnostic SEO workflow engine.
//!
//! This crate contains the workflow execution engine and everything it
//! needs to run a multi-step SEO analysis: the workflow and step
//! catalogs, the pluggable step executor (live Anthropic-compatible
//! API or deterministic mock), and the response normalizer that turns
//! whatever the model returns into a canonical step record.
//!
//! It has **no HTTP server dependency**, making it suitable for use in:
//!
//! - CLI tools (via `seoflow-cli`)
//! - HTTP servers serving rendered result documents
//! - Batch/demo scripts
//!
//! The only outbound dependency is the optional live API call made by
//! [`workflow::executor::LiveExecutor`].

pub mod error;
pub mod workflow;

// Convenience re-exports
pub use error::{EngineError, ExecutorError};
pub use workflow::engine::WorkflowEngine;
