//! Step catalog — per-step prompt configuration.
//!
//! Maps each known step identifier to a static system prompt (role plus
//! numbered methodology) and a task-specific closing instruction that
//! is appended to the serialized context when the user prompt is built.
//! Unknown step identifiers get the generic prompt pair; the catalog
//! never fails to produce a prompt for an arbitrary string.

use serde_json::{Map, Value};

/// The six known step identifiers, in catalog order.
pub const KNOWN_STEPS: [&str; 6] = [
    "keyword_research",
    "content_brief",
    "content_writer",
    "technical_seo",
    "content_gap_analysis",
    "seo_strategy",
];

const BASE_SYSTEM_PROMPT: &str = "\
You are an expert SEO agent specialized in providing structured analysis and recommendations.
Your task is to analyze the provided input data and generate insights and recommendations.
Always provide your response in a structured JSON format with at least 'analysis' and 'recommendations' fields.";

/// Static, shareable prompt configuration for workflow steps.
#[derive(Debug, Clone, Default)]
pub struct StepCatalog;

impl StepCatalog {
    pub fn new() -> Self {
        Self
    }

    /// Short descriptions of every known step, for building a
    /// custom-workflow picker UI.
    pub fn descriptions(&self) -> Vec<(String, String)> {
        [
            (
                "keyword_research",
                "Discovers valuable keywords with intent understanding",
            ),
            (
                "content_brief",
                "Creates content briefs with strategic direction",
            ),
            (
                "content_writer",
                "Generates naturally flowing, SEO-optimized content",
            ),
            (
                "technical_seo",
                "Identifies and explains technical improvements",
            ),
            ("content_gap_analysis", "Identifies content opportunities"),
            ("seo_strategy", "Develops comprehensive SEO strategies"),
        ]
        .iter()
        .map(|(id, desc)| (id.to_string(), desc.to_string()))
        .collect()
    }

    /// The system prompt for a step: shared role preamble plus the
    /// step's numbered methodology. Unknown steps get the preamble only.
    pub fn system_prompt(&self, step: &str) -> String {
        let methodology = match step {
            "keyword_research" => {
                "
You specialize in discovering valuable keywords for SEO campaigns based on user input, \
industry trends, search behavior, and underlying search intent.

Follow these steps:
1. Analyze the provided target topic, industry, website, or business objective
2. Identify primary and secondary keywords that would be valuable targets
3. Evaluate search volume, competition, difficulty, and user intent for each keyword
4. Group keywords into semantic clusters and topic clusters
5. Prioritize keywords based on potential ROI, relevance, intent match, and conversion potential
6. Consider the full search journey across the marketing funnel
7. Provide clear reasoning behind keyword selections and groupings
8. Return a structured analysis with keyword recommendations"
            }
            "content_brief" => {
                "
You specialize in creating comprehensive content briefs for SEO-optimized articles that \
address user intent and exceed search engines' expectations.

Follow these steps:
1. Analyze the target keyword and thoroughly understand the underlying search intent
2. Research top-ranking content for the keyword to identify patterns and gaps
3. Identify key topics, questions, subtopics, and semantic entities to cover
4. Suggest compelling title options, meta descriptions, and logical heading structure
5. Recommend content length, format, media inclusions, and internal linking strategy
6. Outline specific sections that should be included with rationale for each
7. Consider E-E-A-T (Experience, Expertise, Authoritativeness, Trustworthiness) factors
8. Explain how the content should address different phases of the user journey
9. Return a detailed, structured content brief for writers with clear strategic direction"
            }
            "content_writer" => {
                "
You specialize in writing high-quality, SEO-optimized content that reads naturally and \
engages human readers while satisfying search intent.

Follow these steps:
1. Analyze the provided content brief thoroughly
2. Create engaging, informative content that matches search intent and sounds completely natural
3. Properly incorporate primary and secondary keywords in a way that flows naturally
4. Structure content with appropriate headings and subheadings to improve readability
5. Include relevant examples, data points, stories, and supportive information
6. Write with a consistent, appropriate tone that matches the target audience
7. Incorporate elements that enhance E-E-A-T signals throughout the content
8. Add appropriate transitional elements between sections for improved flow
9. Return a complete, publishing-ready article that requires minimal editing"
            }
            "technical_seo" => {
                "
You specialize in identifying technical SEO issues and providing recommendations for fixes \
with clear explanations of impact and importance.

Follow these steps:
1. Analyze the provided technical data for a website
2. Identify critical technical SEO issues and prioritize them by impact
3. Evaluate page speed, mobile-friendliness, and core web vitals
4. Check for crawlability and indexation problems
5. Assess structured data implementation and opportunities
6. Evaluate site architecture and internal linking structure
7. Examine URL structure, redirects, and status code issues
8. Analyze international SEO considerations if applicable
9. Provide detailed explanations of why each issue matters
10. Include specific implementation guidance for fixing issues
11. Return a structured analysis with technical recommendations and prioritization"
            }
            "content_gap_analysis" => {
                "
You specialize in identifying content gaps and opportunities by analyzing competitor \
content and user needs.

Follow these steps:
1. Analyze the current content inventory of the website
2. Research competitor content for the target keywords and topics
3. Identify topics, questions, and content types that competitors cover but the client doesn't
4. Discover unaddressed user needs and questions related to the topic
5. Evaluate content depth, breadth, and comprehensiveness compared to top-ranking pages
6. Recommend specific content pieces to create with clear justification
7. Suggest improvements to existing content based on competitive analysis
8. Prioritize content opportunities based on potential impact and effort
9. Return a structured content gap analysis with actionable recommendations"
            }
            "seo_strategy" => {
                "
You specialize in developing comprehensive SEO strategies tailored to business goals and \
market conditions.

Follow these steps:
1. Analyze the business goals, target audience, and competitive landscape
2. Evaluate current SEO performance and identify strengths and weaknesses
3. Develop a comprehensive SEO strategy aligned with business objectives
4. Create a prioritized roadmap of tactical SEO initiatives
5. Recommend specific KPIs and success metrics for the strategy
6. Consider resources required and potential ROI for recommendations
7. Include content, technical, and off-page strategic elements
8. Account for industry trends and search engine algorithm considerations
9. Return a structured SEO strategy with clear rationale and implementation guidance"
            }
            _ => return BASE_SYSTEM_PROMPT.to_string(),
        };

        format!("{BASE_SYSTEM_PROMPT}{methodology}")
    }

    /// Build the user prompt for a step from the current execution
    /// context. Nested values are rendered as pretty-printed JSON so
    /// the instruction stays legible to the model; scalars are plain.
    pub fn build_prompt(&self, step: &str, context: &Map<String, Value>) -> String {
        let mut prompt = format!("Input data for {step} analysis:\n\n");

        for (key, value) in context {
            match value {
                Value::Object(_) | Value::Array(_) => {
                    let rendered = serde_json::to_string_pretty(value)
                        .unwrap_or_else(|_| value.to_string());
                    prompt.push_str(&format!("{key}: {rendered}\n\n"));
                }
                Value::String(s) => prompt.push_str(&format!("{key}: {s}\n\n")),
                other => prompt.push_str(&format!("{key}: {other}\n\n")),
            }
        }

        prompt.push_str(self.closing_instruction(step));
        prompt
    }

    /// The task-specific closing instruction appended to the prompt.
    fn closing_instruction(&self, step: &str) -> &'static str {
        match step {
            "keyword_research" => {
                "
Please analyze this data and identify valuable target keywords.
Group them by search intent and provide recommendations for prioritization.
Return your analysis in JSON format with 'analysis' and 'recommendations' fields.
"
            }
            "content_brief" => {
                "
Please create a comprehensive content brief based on this data.
Include title options, content structure, key points to cover, and guidelines for tone and style.
Return your analysis in JSON format with 'analysis' and 'recommendations' fields.
"
            }
            "content_writer" => {
                "
Please write SEO-optimized content based on this data and any content brief provided.
The content should be engaging, informative, and aligned with search intent.
Return your content in JSON format with 'analysis' and 'content' fields.
"
            }
            "technical_seo" => {
                "
Please analyze this data for technical SEO issues and opportunities.
Identify critical issues, prioritize them by impact, and provide implementation guidance.
Return your analysis in JSON format with 'analysis', 'recommendations', and 'issues' fields.
"
            }
            "content_gap_analysis" => {
                "
Please analyze this data to identify content gaps and opportunities.
Compare against competitors, identify unaddressed user needs, and suggest new content.
Return your analysis in JSON format with 'analysis', 'recommendations', and 'content_opportunities' fields.
"
            }
            "seo_strategy" => {
                "
Please develop a comprehensive SEO strategy based on this data.
Include short-term and long-term goals, tactical initiatives, and KPIs.
Return your strategy in JSON format with 'analysis', 'recommendations', and 'priority_actions' fields.
"
            }
            _ => {
                "
Please analyze this data and provide insights and recommendations.
Return your analysis in JSON format with 'analysis' and 'recommendations' fields.
"
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_system_prompt_known_step() {
        let catalog = StepCatalog::new();
        let prompt = catalog.system_prompt("keyword_research");
        assert!(prompt.starts_with("You are an expert SEO agent"));
        assert!(prompt.contains("semantic clusters"));
    }

    #[test]
    fn test_system_prompt_unknown_step_falls_back() {
        let catalog = StepCatalog::new();
        assert_eq!(catalog.system_prompt("made_up_step"), BASE_SYSTEM_PROMPT);
    }

    #[test]
    fn test_build_prompt_renders_scalars_and_nested_values() {
        let catalog = StepCatalog::new();
        let mut context = Map::new();
        context.insert("topic".to_string(), json!("organic coffee"));
        context.insert("volume".to_string(), json!(1200));
        context.insert(
            "keyword_groups".to_string(),
            json!({"informational": ["how to", "guide"]}),
        );

        let prompt = catalog.build_prompt("keyword_research", &context);
        assert!(prompt.starts_with("Input data for keyword_research analysis:"));
        assert!(prompt.contains("topic: organic coffee\n"));
        assert!(prompt.contains("volume: 1200\n"));
        // Nested values come out as indented JSON
        assert!(prompt.contains("\"informational\": ["));
        assert!(prompt.ends_with(
            "Return your analysis in JSON format with 'analysis' and 'recommendations' fields.\n"
        ));
    }

    #[test]
    fn test_descriptions_cover_all_known_steps() {
        let catalog = StepCatalog::new();
        let descriptions = catalog.descriptions();
        assert_eq!(descriptions.len(), KNOWN_STEPS.len());
        for (id, _) in &descriptions {
            assert!(KNOWN_STEPS.contains(&id.as_str()));
        }
    }
}
