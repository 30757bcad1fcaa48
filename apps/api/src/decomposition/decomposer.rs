//! Decomposer — maps an instruction to ordered "Step N: ..." micro-instructions.

use std::sync::Arc;

use tracing::debug;

use crate::rules::RuleBook;

#[derive(Debug, Clone)]
pub struct Decomposer {
    rules: Arc<RuleBook>,
}

impl Decomposer {
    pub fn new(rules: Arc<RuleBook>) -> Self {
        Self { rules }
    }

    /// Selects the first matching step list (or the default one) and renders it.
    /// Always returns at least one step.
    pub fn decompose(&self, instruction: &str) -> Vec<String> {
        let selected = self.rules.catalog.select(instruction);
        debug!(
            keyword = selected.keyword.unwrap_or("<default>"),
            steps = selected.steps.len(),
            "Decomposed instruction"
        );
        render_steps(selected.steps)
    }

    /// Wraps the instruction and its rendered steps in a work-through prompt.
    pub fn create_decomposed_prompt(&self, instruction: &str) -> String {
        let steps = self.decompose(instruction);
        format!(
            "Task: {instruction}\n\nLet's approach this systematically:\n\n{}\n\nNow, work through each step:\n",
            steps.join("\n")
        )
    }
}

/// "Step {n}: {Phrase}" with a 1-based index and the first letter upper-cased.
pub fn render_steps(steps: &[String]) -> Vec<String> {
    steps
        .iter()
        .enumerate()
        .map(|(i, step)| format!("Step {}: {}", i + 1, capitalize_first(step)))
        .collect()
}

fn capitalize_first(phrase: &str) -> String {
    let mut chars = phrase.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
