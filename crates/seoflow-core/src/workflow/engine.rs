//! Workflow engine — resolves a workflow request into a step sequence,
//! threads context through the steps, and assembles the result document.
//!
//! The engine:
//! 1. Resolves a workflow name (catalog) or a caller-supplied step list
//! 2. Builds each step's prompt from the accumulated context
//! 3. Invokes the step executor sequentially (later prompts depend on
//!    earlier outputs, so there is no parallelism within a run)
//! 4. Normalizes each output and merges it into the context
//! 5. Records a per-step trace and aggregate timing
//!
//! A live-call failure never aborts the run: after a bounded retry the
//! engine substitutes the deterministic mock record for that step,
//! tagged `_api_info.mock_data = true`, and continues. A degraded
//! document is always preferable to no document.

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use tokio_util::sync::CancellationToken;

use crate::error::{EngineError, ExecutorError};
use crate::workflow::catalog::{WorkflowCatalog, WorkflowDefinition};
use crate::workflow::executor::{LiveExecutor, MockExecutor, StepExecutor};
use crate::workflow::normalizer;
use crate::workflow::steps::StepCatalog;

const DEFAULT_MODEL: &str = "claude-3-opus-20240229";
const CUSTOM_DESCRIPTION: &str = "Custom workflow with user-selected steps";

/// Whether the engine calls the real API or runs fully offline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiMode {
    Live,
    Mock,
}

impl std::fmt::Display for ApiMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiMode::Live => write!(f, "live"),
            ApiMode::Mock => write!(f, "mock"),
        }
    }
}

/// One entry of the execution trace, appended per executed step.
#[derive(Debug, Clone, Serialize)]
pub struct ExecutionLogEntry {
    pub timestamp: DateTime<Utc>,
    pub agent: String,
    pub execution_time_seconds: f64,
    pub input_data_keys: Vec<String>,
    pub output_data_keys: Vec<String>,
}

/// The SEO workflow engine.
///
/// Holds only shared, read-only state (catalogs, executor); every run
/// gets its own context, so one engine value can serve concurrent runs.
pub struct WorkflowEngine {
    executor: Arc<dyn StepExecutor>,
    workflows: WorkflowCatalog,
    steps: StepCatalog,
    api_mode: ApiMode,
    model: String,
    api_version: String,
    /// Retries of a failed live call before degrading to mock output
    max_retries: u32,
}

impl WorkflowEngine {
    /// Fully offline engine backed by the deterministic mock executor.
    pub fn mock() -> Self {
        Self::with_executor(Arc::new(MockExecutor::new()), ApiMode::Mock, default_model())
    }

    /// Live engine calling the Messages API with the given credential.
    pub fn live(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        let model = model.into();
        let executor = LiveExecutor::new(api_key, model.clone());
        let api_version = executor.api_version().to_string();
        let mut engine = Self::with_executor(Arc::new(executor), ApiMode::Live, model);
        engine.api_version = api_version;
        engine
    }

    /// Engine with an externally supplied executor. Used by tests and
    /// by callers that bring their own transport.
    pub fn with_executor(
        executor: Arc<dyn StepExecutor>,
        api_mode: ApiMode,
        model: impl Into<String>,
    ) -> Self {
        tracing::info!("Initializing WorkflowEngine in {} mode", api_mode);
        Self {
            executor,
            workflows: WorkflowCatalog::new(),
            steps: StepCatalog::new(),
            api_mode,
            model: model.into(),
            api_version: "2023-06-01".to_string(),
            max_retries: 1,
        }
    }

    /// Override the retry budget for failed live calls.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// All predefined workflows as `(name, description)` pairs.
    pub fn list_workflows(&self) -> Vec<(String, String)> {
        self.workflows.descriptions()
    }

    /// All known steps as `(id, short description)` pairs, for building
    /// a custom-workflow picker.
    pub fn list_steps(&self) -> Vec<(String, String)> {
        self.steps.descriptions()
    }

    /// Run a predefined workflow template.
    pub async fn run(
        &self,
        workflow_type: &str,
        initial_data: &Map<String, Value>,
    ) -> Result<Map<String, Value>, EngineError> {
        self.run_with_cancel(workflow_type, initial_data, &CancellationToken::new())
            .await
    }

    /// Run a predefined workflow, checking the token before each step.
    pub async fn run_with_cancel(
        &self,
        workflow_type: &str,
        initial_data: &Map<String, Value>,
        cancel: &CancellationToken,
    ) -> Result<Map<String, Value>, EngineError> {
        tracing::info!("Running workflow: {}", workflow_type);
        let definition = self.workflows.resolve(workflow_type)?.clone();
        self.execute(&definition, initial_data, cancel).await
    }

    /// Run a custom workflow from a caller-supplied step list.
    pub async fn run_custom(
        &self,
        steps: &[String],
        initial_data: &Map<String, Value>,
    ) -> Result<Map<String, Value>, EngineError> {
        self.run_custom_with_cancel(steps, initial_data, &CancellationToken::new())
            .await
    }

    /// Run a custom workflow, checking the token before each step.
    pub async fn run_custom_with_cancel(
        &self,
        steps: &[String],
        initial_data: &Map<String, Value>,
        cancel: &CancellationToken,
    ) -> Result<Map<String, Value>, EngineError> {
        tracing::info!("Running custom workflow with steps: {:?}", steps);
        if steps.is_empty() {
            return Err(EngineError::NoSteps);
        }

        let definition = WorkflowDefinition {
            name: "custom".to_string(),
            description: CUSTOM_DESCRIPTION.to_string(),
            steps: steps.to_vec(),
        };
        self.execute(&definition, initial_data, cancel).await
    }

    /// The shared execution loop behind both entry points.
    async fn execute(
        &self,
        definition: &WorkflowDefinition,
        initial_data: &Map<String, Value>,
        cancel: &CancellationToken,
    ) -> Result<Map<String, Value>, EngineError> {
        let mut document = Map::new();
        document.insert(
            "workflow_type".to_string(),
            Value::String(definition.name.clone()),
        );
        document.insert(
            "workflow_description".to_string(),
            Value::String(definition.description.clone()),
        );
        document.insert(
            "api_mode".to_string(),
            Value::String(self.api_mode.to_string()),
        );

        // Initial data fields appear at the document top level
        for (key, value) in initial_data {
            document.insert(key.clone(), value.clone());
        }

        // Per-run context: a fresh clone, never the caller's map
        let mut current = initial_data.clone();
        let mut log: Vec<ExecutionLogEntry> = Vec::new();
        let mut total_time = 0.0_f64;

        for step in &definition.steps {
            if cancel.is_cancelled() {
                tracing::warn!("Run cancelled before step '{}'", step);
                return Err(EngineError::Cancelled {
                    next_step: step.clone(),
                });
            }

            let started = Instant::now();

            let system_prompt = self.steps.system_prompt(step);
            let prompt = self.steps.build_prompt(step, &current);

            let (raw_output, mock_data) = self.execute_step(step, &prompt, &system_prompt).await;
            let mut record = normalizer::normalize(Value::Object(raw_output));
            record.insert("_api_info".to_string(), self.api_info(mock_data));

            let elapsed = started.elapsed().as_secs_f64();
            total_time += elapsed;

            document.insert(
                format!("input_{step}"),
                Value::Object(current.clone()),
            );
            document.insert(
                format!("output_{step}"),
                Value::Object(record.clone()),
            );

            log.push(ExecutionLogEntry {
                timestamp: Utc::now(),
                agent: step.clone(),
                execution_time_seconds: elapsed,
                input_data_keys: current.keys().cloned().collect(),
                output_data_keys: record.keys().cloned().collect(),
            });

            // Merge step output onto the context; later keys overwrite
            for (key, value) in record {
                current.insert(key, value);
            }
        }

        let total_steps = log.len();
        let average = if total_steps > 0 {
            total_time / total_steps as f64
        } else {
            0.0
        };

        let mut summary = Map::new();
        summary.insert(
            "total_steps_executed".to_string(),
            Value::Number(total_steps.into()),
        );
        summary.insert(
            "total_execution_time_seconds".to_string(),
            json_f64(total_time),
        );
        summary.insert("average_step_time_seconds".to_string(), json_f64(average));
        summary.insert(
            "execution_log".to_string(),
            serde_json::to_value(&log).unwrap_or_else(|_| Value::Array(Vec::new())),
        );
        document.insert("execution_summary".to_string(), Value::Object(summary));

        Ok(document)
    }

    /// Execute one step, degrading to the canned mock record when the
    /// live call keeps failing. Returns the raw output and whether it
    /// is mock data.
    async fn execute_step(
        &self,
        step: &str,
        prompt: &str,
        system_prompt: &str,
    ) -> (Map<String, Value>, bool) {
        if self.api_mode == ApiMode::Mock {
            tracing::info!("Using mock API response for step '{}'", step);
            let output = match self.executor.execute(prompt, system_prompt).await {
                Ok(output) => output,
                // The mock executor never fails; a pluggable executor
                // that does gets the same canned fallback
                Err(e) => {
                    tracing::warn!("Mock-mode executor failed for step '{}': {}", step, e);
                    MockExecutor::canned_response(prompt)
                }
            };
            return (output, true);
        }

        let mut attempt = 0;
        loop {
            match self.executor.execute(prompt, system_prompt).await {
                Ok(output) => return (output, false),
                Err(e) => {
                    attempt += 1;
                    if attempt <= self.max_retries && e.retryable() {
                        tracing::warn!(
                            "Step '{}' attempt {} failed ({}), retrying",
                            step,
                            attempt,
                            e
                        );
                        continue;
                    }
                    tracing::error!("API call failed for step '{}': {}", step, e);
                    tracing::warn!("Falling back to mock output for step '{}'", step);
                    return (MockExecutor::canned_response(prompt), true);
                }
            }
        }
    }

    /// The `_api_info` metadata sub-record attached to every output.
    fn api_info(&self, mock_data: bool) -> Value {
        let version = if mock_data {
            "mock".to_string()
        } else {
            self.api_version.clone()
        };
        let mut info = Map::new();
        info.insert("model".to_string(), Value::String(self.model.clone()));
        info.insert("version".to_string(), Value::String(version));
        info.insert("mock_data".to_string(), Value::Bool(mock_data));
        Value::Object(info)
    }
}

impl ExecutorError {
    /// Auth failures and malformed bodies will not improve on retry.
    fn retryable(&self) -> bool {
        !matches!(
            self,
            ExecutorError::Auth | ExecutorError::MalformedResponse(_)
        )
    }
}

fn default_model() -> String {
    std::env::var("SEOFLOW_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string())
}

/// f64 → JSON number; non-finite values collapse to 0.
fn json_f64(value: f64) -> Value {
    serde_json::Number::from_f64(value)
        .map(Value::Number)
        .unwrap_or_else(|| Value::Number(0.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_mode_display() {
        assert_eq!(ApiMode::Live.to_string(), "live");
        assert_eq!(ApiMode::Mock.to_string(), "mock");
    }

    #[test]
    fn test_list_workflows_and_steps() {
        let engine = WorkflowEngine::mock();
        let workflows = engine.list_workflows();
        assert_eq!(workflows.len(), 4);
        assert_eq!(workflows[0].0, "content_strategy");

        let steps = engine.list_steps();
        assert_eq!(steps.len(), 6);
    }

    #[tokio::test]
    async fn test_run_custom_rejects_empty_steps() {
        let engine = WorkflowEngine::mock();
        let err = engine.run_custom(&[], &Map::new()).await.unwrap_err();
        assert!(matches!(err, EngineError::NoSteps));
    }
}
