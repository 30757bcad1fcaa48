//! Rewrite techniques. Each is a pure `prompt -> prompt` function whose
//! presence checks make a second application a no-op.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::rules::{contains_any, RuleBook, TaskRule, TaskType};

/// A named rewrite the optimizer can apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Technique {
    GeneralOptimization,
    CodingOptimization,
    AnalysisOptimization,
    CreativeOptimization,
    ChainOfThought,
    OutputFormat,
}

impl Technique {
    pub fn for_task(task: TaskType) -> Self {
        match task {
            TaskType::General => Technique::GeneralOptimization,
            TaskType::Coding => Technique::CodingOptimization,
            TaskType::Analysis => Technique::AnalysisOptimization,
            TaskType::Creative => Technique::CreativeOptimization,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Technique::GeneralOptimization => "general_optimization",
            Technique::CodingOptimization => "coding_optimization",
            Technique::AnalysisOptimization => "analysis_optimization",
            Technique::CreativeOptimization => "creative_optimization",
            Technique::ChainOfThought => "chain_of_thought",
            Technique::OutputFormat => "output_format",
        }
    }
}

impl fmt::Display for Technique {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Applies a task rule: optional preamble, then the suggestions whose triggers
/// are all absent from the incoming prompt.
pub fn apply_task_rule(rule: &TaskRule, prompt: &str) -> String {
    let lowered = prompt.to_lowercase();

    let mut optimized = match &rule.preamble {
        Some(preamble) if !contains_any(&lowered, &preamble.triggers) => {
            format!("{}\n\n{prompt}", preamble.text)
        }
        _ => prompt.to_string(),
    };

    let fired: Vec<&str> = rule
        .checks
        .iter()
        .filter(|check| !contains_any(&lowered, &check.triggers))
        .map(|check| check.suggestion.as_str())
        .collect();

    if fired.is_empty() {
        return optimized;
    }

    match &rule.heading {
        Some(heading) => {
            let bullets: Vec<String> = fired.iter().map(|s| format!("- {s}")).collect();
            optimized.push_str(&format!("\n\n{heading}:\n{}", bullets.join("\n")));
        }
        None => {
            for suggestion in fired {
                optimized.push_str("\n\n");
                optimized.push_str(suggestion);
            }
        }
    }

    optimized
}

/// Appends the chain-of-thought sentence. `None` when the trigger is already present.
pub fn apply_chain_of_thought(rules: &RuleBook, prompt: &str) -> Option<String> {
    if rules.has_chain_of_thought(prompt) {
        return None;
    }
    Some(format!("{prompt}\n\n{}", rules.chain_of_thought.sentence))
}

/// Appends the task's output-format suffix. `None` when a format is already named.
pub fn apply_output_format(rules: &RuleBook, task: TaskType, prompt: &str) -> Option<String> {
    if rules.has_output_format(prompt) {
        return None;
    }
    Some(format!("{prompt}\n\n{}", rules.format_suffixes.get(task)))
}
