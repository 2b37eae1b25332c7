//! Step executors — turn a (prompt, system prompt) pair into raw output.
//!
//! Two variants behind one trait: [`LiveExecutor`] calls the
//! Anthropic-compatible Messages API over HTTP, [`MockExecutor`]
//! returns deterministic canned records keyed on the prompt text so
//! demo and test runs never depend on network access.

use async_trait::async_trait;
use serde_json::{json, Map, Value};

use crate::error::ExecutorError;
use crate::workflow::normalizer;

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const DEFAULT_API_VERSION: &str = "2023-06-01";
const DEFAULT_TIMEOUT_SECS: u64 = 60;
const MAX_TOKENS: u32 = 4000;
const TEMPERATURE: f64 = 0.7;

/// A pluggable capability that executes one workflow step.
///
/// Implementations must always return a mapping or fail with a
/// classified [`ExecutorError`]; they must never block past their
/// transport timeout.
#[async_trait]
pub trait StepExecutor: Send + Sync {
    async fn execute(
        &self,
        prompt: &str,
        system_prompt: &str,
    ) -> Result<Map<String, Value>, ExecutorError>;
}

// ---------------------------------------------------------------------------
// Live executor
// ---------------------------------------------------------------------------

/// Calls the Anthropic-compatible Messages API.
///
/// POST {base_url}/v1/messages
/// Headers:
///   x-api-key: {api_key}
///   anthropic-version: {api_version}
///   content-type: application/json
pub struct LiveExecutor {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    api_version: String,
    timeout_secs: u64,
}

impl LiveExecutor {
    /// Create a live executor with a non-empty credential and model.
    ///
    /// The API version and request timeout can be overridden with the
    /// `ANTHROPIC_API_VERSION` and `SEOFLOW_REQUEST_TIMEOUT` env vars.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        let api_version = std::env::var("ANTHROPIC_API_VERSION")
            .unwrap_or_else(|_| DEFAULT_API_VERSION.to_string());
        let timeout_secs = std::env::var("SEOFLOW_REQUEST_TIMEOUT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let api_key = api_key.into();
        tracing::info!(
            "[LiveExecutor] Initialized (key: {}, version: {}, timeout: {}s)",
            mask_key(&api_key),
            api_version,
            timeout_secs
        );

        Self {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key,
            model: model.into(),
            api_version,
            timeout_secs,
        }
    }

    /// Override the API base URL (used by tests and proxy setups).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// The anthropic-version string sent with every request.
    pub fn api_version(&self) -> &str {
        &self.api_version
    }
}

#[async_trait]
impl StepExecutor for LiveExecutor {
    async fn execute(
        &self,
        prompt: &str,
        system_prompt: &str,
    ) -> Result<Map<String, Value>, ExecutorError> {
        let url = format!("{}/v1/messages", self.base_url.trim_end_matches('/'));

        let mut body = json!({
            "model": self.model,
            "messages": [
                { "role": "user", "content": prompt }
            ],
            "max_tokens": MAX_TOKENS,
            "temperature": TEMPERATURE,
        });
        if !system_prompt.is_empty() {
            body["system"] = Value::String(system_prompt.to_string());
        }

        tracing::info!(
            "[LiveExecutor] Calling {} (model: {}, version: {})",
            url,
            self.model,
            self.api_version
        );

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", &self.api_version)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ExecutorError::Timeout(self.timeout_secs)
                } else {
                    ExecutorError::Request(e.to_string())
                }
            })?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .map_err(|e| ExecutorError::Request(format!("failed to read response body: {e}")))?;

        if !status.is_success() {
            tracing::error!("[LiveExecutor] API returned {}: {}", status, response_text);
            if status.as_u16() == 401 {
                return Err(ExecutorError::Auth);
            }
            return Err(ExecutorError::Http {
                status: status.as_u16(),
                body: response_text,
            });
        }

        let response_json: Value = serde_json::from_str(&response_text)
            .map_err(|e| ExecutorError::MalformedResponse(format!("invalid JSON body: {e}")))?;

        // The primary text lives in the first content block
        let content = response_json
            .get("content")
            .and_then(|c| c.as_array())
            .and_then(|blocks| blocks.first())
            .and_then(|block| block.get("text"))
            .and_then(|t| t.as_str())
            .ok_or_else(|| {
                ExecutorError::MalformedResponse("response missing content text".to_string())
            })?;

        Ok(normalizer::parse_structured_text(content))
    }
}

/// Mask an API key for logging, keeping four characters at each end.
/// The key is an opaque string, so slicing must respect char boundaries.
fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() > 8 {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{head}...{tail}")
    } else {
        "****".to_string()
    }
}

// ---------------------------------------------------------------------------
// Mock executor
// ---------------------------------------------------------------------------

/// Deterministic offline executor.
///
/// Routes on domain keywords found in the lowercased prompt, in a fixed
/// priority order, and returns one of five canned structured records
/// (or a generic one). Repeated calls with the same prompt return
/// identical output. Never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockExecutor;

impl MockExecutor {
    pub fn new() -> Self {
        Self
    }

    /// The canned record for a prompt. Exposed so the engine can reuse
    /// it as the fallback output when a live call fails.
    pub fn canned_response(prompt: &str) -> Map<String, Value> {
        let lower = prompt.to_lowercase();

        let record = if lower.contains("keyword") {
            json!({
                "analysis": "Analyzed target keywords for potential search traffic and user intent.",
                "recommendations": [
                    "Focus on long-tail keywords with lower competition",
                    "Include semantic variants in your content",
                    "Target question-based keywords for featured snippets"
                ],
                "keyword_groups": {
                    "high_intent": ["buy online", "best price", "near me"],
                    "informational": ["how to", "guide", "tutorial"]
                }
            })
        } else if lower.contains("content") && lower.contains("brief") {
            json!({
                "analysis": "Created a comprehensive content brief based on target keywords and competitor analysis.",
                "recommendations": [
                    "Structure content with clear H2 and H3 headings",
                    "Include FAQ section to target question-based searches",
                    "Add data visualizations to improve engagement"
                ],
                "content_structure": {
                    "title_options": [
                        "Complete Guide to [Topic]",
                        "How to [Achieve Goal] with [Topic]"
                    ],
                    "sections": [
                        "Introduction",
                        "What is [Topic]",
                        "Benefits of [Topic]",
                        "How to Get Started",
                        "Common Challenges",
                        "Best Practices",
                        "Conclusion"
                    ]
                }
            })
        } else if lower.contains("technical") || lower.contains("audit") {
            json!({
                "analysis": "Performed a technical SEO audit to identify issues affecting performance and crawlability.",
                "recommendations": [
                    "Fix broken links and redirect chains",
                    "Optimize image sizes and implement lazy loading",
                    "Implement schema markup for rich snippets"
                ],
                "issues": {
                    "critical": [
                        "Slow page speed on mobile devices",
                        "Missing meta descriptions on 12 pages",
                        "Duplicate content on product variations"
                    ],
                    "warning": [
                        "Non-optimized images",
                        "Missing alt text on 8 images",
                        "Shallow content on category pages"
                    ]
                }
            })
        } else if lower.contains("gap") || lower.contains("competitor") {
            json!({
                "analysis": "Identified content gaps by analyzing competitor content and user search behavior.",
                "recommendations": [
                    "Create content addressing user questions not currently covered",
                    "Expand content on high-value topics with limited current coverage",
                    "Update outdated content with fresh information and statistics"
                ],
                "content_opportunities": [
                    "Beginner's guide to [Topic]",
                    "Comparison of [Topic] vs alternatives",
                    "Case studies showing results from [Topic]"
                ]
            })
        } else if lower.contains("strategy") {
            json!({
                "analysis": "Developed a comprehensive SEO strategy based on all available data and insights.",
                "recommendations": [
                    "Prioritize technical fixes with highest impact on crawlability",
                    "Create content calendar focused on identified gaps",
                    "Implement structured data to enhance SERP visibility"
                ],
                "priority_actions": [
                    "Fix critical technical issues within 2 weeks",
                    "Produce 3 cornerstone content pieces within 1 month",
                    "Optimize top 10 existing pages for improved conversions"
                ]
            })
        } else {
            json!({
                "analysis": "Processed the input data and generated insights.",
                "recommendations": [
                    "Follow best practices for on-page SEO",
                    "Improve content quality and relevance",
                    "Focus on user experience metrics"
                ]
            })
        };

        match record {
            Value::Object(map) => map,
            _ => unreachable!("canned records are JSON objects"),
        }
    }
}

#[async_trait]
impl StepExecutor for MockExecutor {
    async fn execute(
        &self,
        prompt: &str,
        _system_prompt: &str,
    ) -> Result<Map<String, Value>, ExecutorError> {
        tracing::debug!("[MockExecutor] Generating canned response");
        Ok(Self::canned_response(prompt))
    }
}
