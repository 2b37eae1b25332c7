//! SEO workflow engine — catalogs, executors, normalization, execution.
//!
//! A workflow is a named, ordered list of agent steps. The engine
//! threads an accumulating context through the steps: each step's
//! prompt is built from the merged outputs of every step before it,
//! sent to the executor (live API or deterministic mock), and the
//! normalized output is merged back into the context. The result is a
//! single JSON-renderable document with per-step inputs/outputs and an
//! execution trace.

pub mod catalog;
pub mod engine;
pub mod executor;
pub mod normalizer;
pub mod steps;

pub use catalog::{WorkflowCatalog, WorkflowDefinition};
pub use engine::{ApiMode, WorkflowEngine};
pub use executor::{LiveExecutor, MockExecutor, StepExecutor};
