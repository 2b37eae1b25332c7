//! `seoflow run` / `seoflow custom` — execute a workflow and emit the
//! result document.

use serde_json::{Map, Value};

use seoflow_core::WorkflowEngine;

/// Run a predefined workflow template.
pub async fn predefined(
    workflow: &str,
    input: &str,
    live: bool,
    model: &str,
    output: Option<&str>,
) -> Result<(), String> {
    let initial_data = parse_initial_data(input)?;
    let engine = build_engine(live, model)?;

    print_banner(workflow, live);

    let document = engine
        .run(workflow, &initial_data)
        .await
        .map_err(|e| e.to_string())?;

    print_summary(&document);
    emit(&document, output)
}

/// Run a custom workflow from an explicit step list.
pub async fn custom(
    steps: &[String],
    input: &str,
    live: bool,
    model: &str,
    output: Option<&str>,
) -> Result<(), String> {
    let initial_data = parse_initial_data(input)?;
    let engine = build_engine(live, model)?;

    print_banner(&format!("custom ({} steps)", steps.len()), live);

    let document = engine
        .run_custom(steps, &initial_data)
        .await
        .map_err(|e| e.to_string())?;

    print_summary(&document);
    emit(&document, output)
}

fn build_engine(live: bool, model: &str) -> Result<WorkflowEngine, String> {
    if live {
        let api_key = std::env::var("ANTHROPIC_API_KEY")
            .ok()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                "No API key found. Set the ANTHROPIC_API_KEY env var (or put it in .env) \
                 to use --live, or drop --live to run in mock mode."
                    .to_string()
            })?;
        Ok(WorkflowEngine::live(api_key, model))
    } else {
        Ok(WorkflowEngine::mock())
    }
}

fn parse_initial_data(input: &str) -> Result<Map<String, Value>, String> {
    match serde_json::from_str::<Value>(input) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err("--input must be a JSON object, e.g. '{\"topic\": \"coffee\"}'".to_string()),
        Err(e) => Err(format!("Failed to parse --input as JSON: {e}")),
    }
}

fn print_banner(workflow: &str, live: bool) {
    let mode = if live { "live" } else { "mock" };
    println!("╔══════════════════════════════════════════════════════════╗");
    println!("║  Seoflow Workflow Engine                                 ║");
    println!("╠══════════════════════════════════════════════════════════╣");
    println!("║  Workflow : {:<44} ║", truncate(workflow, 44));
    println!("║  API mode : {:<44} ║", mode);
    println!("╚══════════════════════════════════════════════════════════╝");
    println!();
}

fn print_summary(document: &Map<String, Value>) {
    let summary = &document["execution_summary"];
    let log = summary["execution_log"].as_array();

    if let Some(entries) = log {
        for (i, entry) in entries.iter().enumerate() {
            let agent = entry["agent"].as_str().unwrap_or("?");
            let secs = entry["execution_time_seconds"].as_f64().unwrap_or(0.0);
            let mock = document
                .get(&format!("output_{agent}"))
                .and_then(|o| o.get("_api_info"))
                .and_then(|i| i.get("mock_data"))
                .and_then(|m| m.as_bool())
                .unwrap_or(false);
            let tag = if mock { " [mock]" } else { "" };
            println!("── Step {}/{}: {} ({:.2}s){}", i + 1, entries.len(), agent, secs, tag);
        }
    }

    println!();
    println!("═══════════════════════════════════════════════════════════");
    println!(
        "  Workflow complete: {} step(s) in {:.2}s (avg {:.2}s)",
        summary["total_steps_executed"].as_u64().unwrap_or(0),
        summary["total_execution_time_seconds"]
            .as_f64()
            .unwrap_or(0.0),
        summary["average_step_time_seconds"].as_f64().unwrap_or(0.0),
    );
    println!("═══════════════════════════════════════════════════════════");
    println!();
}

/// Write the result document as pretty JSON to a file or stdout.
fn emit(document: &Map<String, Value>, output: Option<&str>) -> Result<(), String> {
    let rendered = serde_json::to_string_pretty(&Value::Object(document.clone()))
        .map_err(|e| format!("Failed to serialize result document: {e}"))?;

    match output {
        Some(path) => {
            std::fs::write(path, rendered)
                .map_err(|e| format!("Failed to write '{path}': {e}"))?;
            println!("Result document written to {path}");
            Ok(())
        }
        None => {
            println!("{rendered}");
            Ok(())
        }
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_initial_data() {
        assert!(parse_initial_data("{}").unwrap().is_empty());
        let map = parse_initial_data(r#"{"topic": "coffee"}"#).unwrap();
        assert_eq!(map["topic"], "coffee");

        assert!(parse_initial_data("[1,2]").is_err());
        assert!(parse_initial_data("not json").is_err());
    }

    #[test]
    fn test_build_engine_mock_needs_no_key() {
        assert!(build_engine(false, "claude-3-opus-20240229").is_ok());
    }
}
