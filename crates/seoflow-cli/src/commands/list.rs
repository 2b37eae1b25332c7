//! `seoflow workflows` / `seoflow steps` — catalog listings.

use seoflow_core::WorkflowEngine;

/// Print the predefined workflow templates.
pub fn workflows() -> Result<(), String> {
    let engine = WorkflowEngine::mock();

    println!("Available workflows:");
    println!();
    for (name, description) in engine.list_workflows() {
        println!("  {name}");
        println!("      {description}");
        println!();
    }
    println!("Run one with: seoflow run <workflow>");
    Ok(())
}

/// Print the known agent steps for building custom workflows.
pub fn steps() -> Result<(), String> {
    let engine = WorkflowEngine::mock();

    println!("┌──────────────────────┬──────────────────────────────────────────────────┐");
    println!("│ Step                 │ Description                                      │");
    println!("├──────────────────────┼──────────────────────────────────────────────────┤");
    for (id, description) in engine.list_steps() {
        println!("│ {:<20} │ {:<48} │", id, description);
    }
    println!("└──────────────────────┴──────────────────────────────────────────────────┘");
    println!();
    println!("Run a custom sequence with: seoflow custom <step,step,...>");
    Ok(())
}
