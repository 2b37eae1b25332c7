//! Workflow catalog — the fixed table of predefined workflow templates.
//!
//! Each template is a description plus an ordered step list. The
//! catalog is immutable after construction and safe to share across
//! concurrent runs. Custom workflows are never stored here; the engine
//! synthesizes them per request from a caller-supplied step list.

use crate::error::EngineError;

/// A named, ordered sequence of agent steps.
#[derive(Debug, Clone)]
pub struct WorkflowDefinition {
    /// Workflow name (catalog key, or "custom")
    pub name: String,
    /// Human-readable description shown in result documents and UIs
    pub description: String,
    /// Ordered step identifiers
    pub steps: Vec<String>,
}

/// The fixed table of predefined workflows.
#[derive(Debug, Clone)]
pub struct WorkflowCatalog {
    templates: Vec<WorkflowDefinition>,
}

impl WorkflowCatalog {
    /// Build the default catalog of four SEO workflow templates.
    pub fn new() -> Self {
        let template = |name: &str, description: &str, steps: &[&str]| WorkflowDefinition {
            name: name.to_string(),
            description: description.to_string(),
            steps: steps.iter().map(|s| s.to_string()).collect(),
        };

        Self {
            templates: vec![
                template(
                    "content_strategy",
                    "Develop a comprehensive content strategy based on keyword research \
                     and content gap analysis",
                    &["keyword_research", "content_gap_analysis", "seo_strategy"],
                ),
                template(
                    "content_creation",
                    "Create high-quality, SEO-optimized content based on keyword research \
                     and a detailed content brief",
                    &["keyword_research", "content_brief", "content_writer"],
                ),
                template(
                    "technical_audit",
                    "Perform a technical SEO audit to identify issues and opportunities \
                     for improvement",
                    &["technical_seo", "seo_strategy"],
                ),
                template(
                    "full_seo_analysis",
                    "Comprehensive SEO analysis including keyword research, content gaps, \
                     and technical recommendations",
                    &[
                        "keyword_research",
                        "content_gap_analysis",
                        "technical_seo",
                        "seo_strategy",
                    ],
                ),
            ],
        }
    }

    /// Resolve a workflow name to its definition.
    ///
    /// The reserved name "custom" is never a catalog entry; the engine
    /// short-circuits custom runs before reaching the catalog, so it
    /// fails here like any other unknown name.
    pub fn resolve(&self, name: &str) -> Result<&WorkflowDefinition, EngineError> {
        self.templates
            .iter()
            .find(|t| t.name == name)
            .ok_or_else(|| EngineError::UnknownWorkflow {
                name: name.to_string(),
                available: self.names(),
            })
    }

    /// All workflow names, in catalog order.
    pub fn names(&self) -> Vec<String> {
        self.templates.iter().map(|t| t.name.clone()).collect()
    }

    /// All workflows as `(name, description)` pairs, in catalog order.
    pub fn descriptions(&self) -> Vec<(String, String)> {
        self.templates
            .iter()
            .map(|t| (t.name.clone(), t.description.clone()))
            .collect()
    }
}

impl Default for WorkflowCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_known_workflows() {
        let catalog = WorkflowCatalog::new();
        let wf = catalog.resolve("content_strategy").unwrap();
        assert_eq!(
            wf.steps,
            vec!["keyword_research", "content_gap_analysis", "seo_strategy"]
        );

        let wf = catalog.resolve("full_seo_analysis").unwrap();
        assert_eq!(wf.steps.len(), 4);
        assert_eq!(wf.steps[3], "seo_strategy");
    }

    #[test]
    fn test_resolve_unknown_workflow_lists_names() {
        let catalog = WorkflowCatalog::new();
        let err = catalog.resolve("not_a_real_workflow").unwrap_err();
        match err {
            EngineError::UnknownWorkflow { name, available } => {
                assert_eq!(name, "not_a_real_workflow");
                assert_eq!(
                    available,
                    vec![
                        "content_strategy",
                        "content_creation",
                        "technical_audit",
                        "full_seo_analysis"
                    ]
                );
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_custom_is_not_a_catalog_entry() {
        let catalog = WorkflowCatalog::new();
        assert!(catalog.resolve("custom").is_err());
    }
}
