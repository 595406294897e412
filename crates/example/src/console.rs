//! Terminal output for the demo.

use toolscope_callbacks::{Reporter, RunInfo, ToolOutcome};
use toolscope_models::Role;

/// [`Reporter`] that prints to stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn tool_started(&self, info: &RunInfo, arguments: &str) {
        println!("[TOOL] {}: {}", info.name, arguments);
    }

    fn tool_finished(&self, info: &RunInfo, outcome: ToolOutcome, preview: &str) {
        println!("[TOOL] {}: result = {}", info.name, preview);
        match outcome {
            ToolOutcome::Succeeded => println!("[TOOL] {}: execution succeeded", info.name),
            ToolOutcome::Failed => println!("[TOOL] {}: execution failed", info.name),
            ToolOutcome::Unknown => {}
        }
    }

    fn component_failed(&self, info: &RunInfo, error: &dyn core::error::Error) {
        println!("[ERROR] [{info}] {error}");
    }

    fn assistant_content(&self, _info: &RunInfo, text: &str) {
        println!("{}: {}", Role::Assistant, text);
    }
}
