//! Seoflow CLI — run SEO analysis workflows from the command line.
//!
//! Reuses the same core engine (seoflow-core) that a server front end
//! would embed: predefined workflow templates, custom step lists, live
//! or mock execution, JSON result documents.

mod commands;

use clap::{Parser, Subcommand};

/// Seoflow CLI — SEO workflow orchestration
#[derive(Parser)]
#[command(name = "seoflow", version, about = "Seoflow CLI — SEO workflow orchestration")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a predefined workflow template
    Run {
        /// Workflow name (see `seoflow workflows`)
        workflow: String,
        /// Initial data as a JSON object string
        #[arg(long, default_value = "{}")]
        input: String,
        /// Call the live API (requires ANTHROPIC_API_KEY) instead of mock mode
        #[arg(long)]
        live: bool,
        /// Model to use in live mode
        #[arg(long, env = "SEOFLOW_MODEL", default_value = "claude-3-opus-20240229")]
        model: String,
        /// Write the result document to this file instead of stdout
        #[arg(long, short = 'o')]
        output: Option<String>,
    },

    /// Run a custom workflow from an explicit step list
    Custom {
        /// Ordered step identifiers (comma-separated)
        #[arg(value_delimiter = ',', required = true)]
        steps: Vec<String>,
        /// Initial data as a JSON object string
        #[arg(long, default_value = "{}")]
        input: String,
        /// Call the live API (requires ANTHROPIC_API_KEY) instead of mock mode
        #[arg(long)]
        live: bool,
        /// Model to use in live mode
        #[arg(long, env = "SEOFLOW_MODEL", default_value = "claude-3-opus-20240229")]
        model: String,
        /// Write the result document to this file instead of stdout
        #[arg(long, short = 'o')]
        output: Option<String>,
    },

    /// List predefined workflow templates
    Workflows,

    /// List available agent steps (for building custom workflows)
    Steps,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "seoflow_core=warn,seoflow=info".into()),
        )
        .init();

    // Load .env / .env.local if present (for API keys, etc.)
    load_dotenv();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            workflow,
            input,
            live,
            model,
            output,
        } => commands::run::predefined(&workflow, &input, live, &model, output.as_deref()).await,

        Commands::Custom {
            steps,
            input,
            live,
            model,
            output,
        } => commands::run::custom(&steps, &input, live, &model, output.as_deref()).await,

        Commands::Workflows => commands::list::workflows(),

        Commands::Steps => commands::list::steps(),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Load .env and .env.local files for environment variables.
/// .env.local is read first; existing env vars always take priority.
fn load_dotenv() {
    for filename in [".env.local", ".env"] {
        let Ok(content) = std::fs::read_to_string(filename) else {
            continue;
        };

        let mut loaded = 0;
        for line in content.lines() {
            let Some((key, value)) = parse_env_line(line) else {
                continue;
            };
            if std::env::var(key).is_err() {
                std::env::set_var(key, value);
                loaded += 1;
            }
        }

        if loaded > 0 {
            tracing::info!("Loaded {} variable(s) from '{}'", loaded, filename);
        }
    }
}

/// Parse one dotenv line into a KEY=VALUE pair. Comments, blank lines,
/// and lines without `=` yield None; surrounding quotes are stripped.
fn parse_env_line(line: &str) -> Option<(&str, &str)> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let (key, value) = line.split_once('=')?;
    let value = value.trim();
    let unquoted = value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
        .unwrap_or(value);

    Some((key.trim(), unquoted))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_env_line() {
        assert_eq!(
            parse_env_line("ANTHROPIC_API_KEY=sk-ant-123"),
            Some(("ANTHROPIC_API_KEY", "sk-ant-123"))
        );
        assert_eq!(
            parse_env_line("  MODEL = \"claude-3-opus-20240229\"  "),
            Some(("MODEL", "claude-3-opus-20240229"))
        );
        assert_eq!(parse_env_line("QUOTED='single'"), Some(("QUOTED", "single")));
        // Mismatched quotes stay as-is
        assert_eq!(parse_env_line("ODD=\"half"), Some(("ODD", "\"half")));
        assert_eq!(parse_env_line("# comment"), None);
        assert_eq!(parse_env_line(""), None);
        assert_eq!(parse_env_line("no_equals_sign"), None);
    }
}
