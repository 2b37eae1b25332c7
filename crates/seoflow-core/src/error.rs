//! Core error types for the Seoflow engine.
//!
//! Two families: [`EngineError`] aborts a run and is surfaced to the
//! caller (bad workflow name, empty custom step list, cancellation).
//! [`ExecutorError`] is a live-call failure classified by cause; it is
//! caught at the per-step boundary inside the engine and never reaches
//! the caller — the engine degrades the step to mock output instead.

/// Errors that abort a workflow run before or between steps.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The requested workflow name is not in the catalog. Carries the
    /// valid names so a front end can show them to the user.
    #[error("Unknown workflow type: {name}. Available workflows: {available:?}")]
    UnknownWorkflow {
        name: String,
        available: Vec<String>,
    },

    /// A custom workflow was requested with an empty step list.
    #[error("Custom workflow requires at least one step")]
    NoSteps,

    /// The caller cancelled the run. Steps already executed are
    /// discarded; the engine never returns a partial document here.
    #[error("Workflow run cancelled before step '{next_step}'")]
    Cancelled { next_step: String },
}

/// Classified failure from the live step executor.
#[derive(Debug, thiserror::Error)]
pub enum ExecutorError {
    #[error("API request timed out after {0} seconds")]
    Timeout(u64),

    #[error("Authentication failed: check that the API key is valid and not expired")]
    Auth,

    #[error("API returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Malformed API response: {0}")]
    MalformedResponse(String),

    #[error("HTTP request failed: {0}")]
    Request(String),
}
