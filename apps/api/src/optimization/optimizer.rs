//! PromptOptimizer — iterative, task-aware prompt rewriting.
//!
//! Each iteration applies, in order:
//! 1. the task-type rule (technique always recorded)
//! 2. chain-of-thought, when "step by step" is absent
//! 3. the output-format suffix, when no format indicator is present
//!
//! Every rule checks for its own output before inserting, so only the first
//! iteration grows the prompt; later ones leave it unchanged.

use std::collections::BTreeSet;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::history::History;
use crate::optimization::model::{LanguageModel, NoopModel};
use crate::optimization::techniques::{
    apply_chain_of_thought, apply_output_format, apply_task_rule, Technique,
};
use crate::rules::{RuleBook, TaskType};

const LENGTH_GAIN: f64 = 0.1;
const CHAIN_OF_THOUGHT_GAIN: f64 = 0.2;
const OUTPUT_FORMAT_GAIN: f64 = 0.2;
const ROLE_GAIN: f64 = 0.1;
const ROLE_MARKER: &str = "you are";

pub const DEFAULT_TARGET_IMPROVEMENT: f64 = 0.2;
pub const DEFAULT_MAX_ITERATIONS: u32 = 5;

/// When the iteration loop stops.
///
/// `FixedIterations` always runs `max_iterations` passes and ignores
/// `target_improvement`. `StopAtTarget` stops after the first pass whose
/// improvement estimate reaches the target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConvergencePolicy {
    #[default]
    FixedIterations,
    StopAtTarget,
}

impl FromStr for ConvergencePolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "fixed" | "fixed_iterations" => Ok(ConvergencePolicy::FixedIterations),
            "stop_at_target" => Ok(ConvergencePolicy::StopAtTarget),
            other => Err(format!(
                "unknown convergence policy '{other}' (expected fixed or stop_at_target)"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OptimizeOptions {
    pub task_type: TaskType,
    pub target_improvement: f64,
    pub max_iterations: u32,
}

impl Default for OptimizeOptions {
    fn default() -> Self {
        Self {
            task_type: TaskType::General,
            target_improvement: DEFAULT_TARGET_IMPROVEMENT,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationResult {
    pub original_prompt: String,
    pub optimized_prompt: String,
    /// Heuristic estimate in [0, 1].
    pub improvement_score: f64,
    pub techniques_applied: BTreeSet<Technique>,
    pub iterations: u32,
}

pub struct PromptOptimizer {
    rules: Arc<RuleBook>,
    /// Reserved for model-in-the-loop scoring; `optimize` never calls it.
    model: Arc<dyn LanguageModel>,
    convergence: ConvergencePolicy,
    history: History<OptimizationResult>,
}

impl PromptOptimizer {
    pub fn new(rules: Arc<RuleBook>) -> Self {
        Self {
            rules,
            model: Arc::new(NoopModel),
            convergence: ConvergencePolicy::default(),
            history: History::default(),
        }
    }

    pub fn with_model(mut self, model: Arc<dyn LanguageModel>) -> Self {
        self.model = model;
        self
    }

    pub fn with_convergence(mut self, convergence: ConvergencePolicy) -> Self {
        self.convergence = convergence;
        self
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    pub fn convergence(&self) -> ConvergencePolicy {
        self.convergence
    }

    /// Rewrites `prompt`, records the result in history and returns it.
    pub fn optimize(&mut self, prompt: &str, options: &OptimizeOptions) -> OptimizationResult {
        let mut current = prompt.to_string();
        let mut techniques = BTreeSet::new();
        let mut iterations = 0;

        while iterations < options.max_iterations {
            current = self.run_iteration(&current, options.task_type, &mut techniques);
            iterations += 1;

            debug!(
                iteration = iterations,
                length = current.len(),
                "Optimizer pass complete"
            );

            if self.convergence == ConvergencePolicy::StopAtTarget
                && estimate_improvement(&self.rules, prompt, &current)
                    >= options.target_improvement
            {
                break;
            }
        }

        let improvement_score = estimate_improvement(&self.rules, prompt, &current);

        info!(
            task_type = %options.task_type,
            iterations,
            improvement_score,
            techniques = techniques.len(),
            "Optimized prompt"
        );

        let result = OptimizationResult {
            original_prompt: prompt.to_string(),
            optimized_prompt: current,
            improvement_score,
            techniques_applied: techniques,
            iterations,
        };
        self.history.push(result.clone());
        result
    }

    pub fn history(&self) -> &History<OptimizationResult> {
        &self.history
    }

    fn run_iteration(
        &self,
        prompt: &str,
        task: TaskType,
        techniques: &mut BTreeSet<Technique>,
    ) -> String {
        let mut current = apply_task_rule(self.rules.task_rules.get(task), prompt);
        techniques.insert(Technique::for_task(task));

        if let Some(rewritten) = apply_chain_of_thought(&self.rules, &current) {
            current = rewritten;
            techniques.insert(Technique::ChainOfThought);
        }

        if let Some(rewritten) = apply_output_format(&self.rules, task, &current) {
            current = rewritten;
            techniques.insert(Technique::OutputFormat);
        }

        current
    }
}

/// Structural gain of `optimized` over `original`, capped at 1.0.
pub fn estimate_improvement(rules: &RuleBook, original: &str, optimized: &str) -> f64 {
    let mut score = 0.0;

    if optimized.chars().count() > original.chars().count() {
        score += LENGTH_GAIN;
    }
    if rules.has_chain_of_thought(optimized) && !rules.has_chain_of_thought(original) {
        score += CHAIN_OF_THOUGHT_GAIN;
    }
    if rules.has_output_format(optimized) && !rules.has_output_format(original) {
        score += OUTPUT_FORMAT_GAIN;
    }
    let has_role = |text: &str| text.to_lowercase().contains(ROLE_MARKER);
    if has_role(optimized) && !has_role(original) {
        score += ROLE_GAIN;
    }

    f64::min(score, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::model::ModelError;
    use async_trait::async_trait;

    fn optimizer() -> PromptOptimizer {
        PromptOptimizer::new(Arc::new(RuleBook::default()))
    }

    fn options(task_type: TaskType, max_iterations: u32) -> OptimizeOptions {
        OptimizeOptions {
            task_type,
            max_iterations,
            ..OptimizeOptions::default()
        }
    }

    #[test]
    fn test_coding_single_iteration() {
        let mut opt = optimizer();
        let result = opt.optimize("Write code to sort a list", &options(TaskType::Coding, 1));
        let lowered = result.optimized_prompt.to_lowercase();

        assert!(lowered.contains("step by step"));
        assert!(RuleBook::default().has_output_format(&result.optimized_prompt));
        assert!(lowered.contains("comment"));
        assert!(lowered.contains("error"));
        assert!(lowered.contains("example"));
        assert!(result.techniques_applied.contains(&Technique::CodingOptimization));
        assert!(result.techniques_applied.contains(&Technique::ChainOfThought));
        assert!(result.techniques_applied.contains(&Technique::OutputFormat));
        assert_eq!(result.iterations, 1);
    }

    #[test]
    fn test_later_iterations_do_not_grow_prompt() {
        for task in TaskType::ALL {
            let once = optimizer().optimize("Describe the water cycle", &options(task, 1));
            let five = optimizer().optimize("Describe the water cycle", &options(task, 5));
            assert_eq!(once.optimized_prompt, five.optimized_prompt, "{task}");
            assert_eq!(once.techniques_applied, five.techniques_applied, "{task}");
            assert_eq!(five.iterations, 5);
        }
    }

    #[test]
    fn test_reoptimizing_output_adds_no_new_rewrites() {
        let mut opt = optimizer();
        let first = opt.optimize("Analyze churn drivers", &options(TaskType::Analysis, 1));
        let second = opt.optimize(&first.optimized_prompt, &options(TaskType::Analysis, 1));

        assert_eq!(second.optimized_prompt, first.optimized_prompt);
        assert!(!second.techniques_applied.contains(&Technique::ChainOfThought));
        assert!(!second.techniques_applied.contains(&Technique::OutputFormat));
        assert_eq!(
            second.techniques_applied,
            BTreeSet::from([Technique::AnalysisOptimization])
        );
    }

    #[test]
    fn test_general_improvement_score() {
        let mut opt = optimizer();
        let result = opt.optimize("Tell me about dolphins", &OptimizeOptions::default());
        // length + chain-of-thought + format + role
        assert!((result.improvement_score - 0.6).abs() < 1e-9);
        assert!(result.optimized_prompt.starts_with("You are a helpful AI assistant."));
        assert!(result.techniques_applied.contains(&Technique::GeneralOptimization));
    }

    #[test]
    fn test_already_structured_prompt_scores_zero() {
        let mut opt = optimizer();
        let prompt = "You are a reviewer. Think step by step and respond with JSON. Include comments, handle every error, add an example.";
        let result = opt.optimize(prompt, &options(TaskType::Coding, 3));
        assert_eq!(result.optimized_prompt, prompt);
        assert_eq!(result.improvement_score, 0.0);
        assert_eq!(
            result.techniques_applied,
            BTreeSet::from([Technique::CodingOptimization])
        );
    }

    #[test]
    fn test_improvement_is_bounded() {
        let rules = RuleBook::default();
        for (a, b) in [
            ("", "You are x. step by step. Format: y"),
            ("same", "same"),
            ("long original text", "short"),
        ] {
            let score = estimate_improvement(&rules, a, b);
            assert!((0.0..=1.0).contains(&score));
        }
    }

    #[test]
    fn test_zero_iterations_returns_original() {
        let mut opt = optimizer();
        let result = opt.optimize("Hello", &options(TaskType::Creative, 0));
        assert_eq!(result.optimized_prompt, "Hello");
        assert!(result.techniques_applied.is_empty());
        assert_eq!(result.improvement_score, 0.0);
        assert_eq!(result.iterations, 0);
    }

    #[test]
    fn test_fixed_iterations_ignore_target() {
        let mut opt = optimizer();
        let opts = OptimizeOptions {
            task_type: TaskType::Coding,
            target_improvement: 0.0,
            max_iterations: 4,
        };
        assert_eq!(opt.optimize("Write a CLI", &opts).iterations, 4);
    }

    #[test]
    fn test_stop_at_target_ends_early() {
        let mut opt = optimizer().with_convergence(ConvergencePolicy::StopAtTarget);
        let opts = OptimizeOptions {
            task_type: TaskType::Coding,
            target_improvement: 0.2,
            max_iterations: 5,
        };
        let result = opt.optimize("Write a CLI", &opts);
        assert_eq!(result.iterations, 1);
        assert!(result.improvement_score >= 0.2);
    }

    #[test]
    fn test_stop_at_target_runs_all_when_unreachable() {
        let mut opt = optimizer().with_convergence(ConvergencePolicy::StopAtTarget);
        let opts = OptimizeOptions {
            task_type: TaskType::Coding,
            target_improvement: 0.9,
            max_iterations: 3,
        };
        assert_eq!(opt.optimize("Write a CLI", &opts).iterations, 3);
    }

    #[test]
    fn test_history_appends_each_call() {
        let mut opt = optimizer();
        opt.optimize("a", &OptimizeOptions::default());
        opt.optimize("b", &OptimizeOptions::default());
        assert_eq!(opt.history().len(), 2);
        assert_eq!(opt.history().latest().unwrap().original_prompt, "b");
    }

    struct PanickingModel;

    #[async_trait]
    impl LanguageModel for PanickingModel {
        fn name(&self) -> &str {
            "panicking"
        }

        async fn score_prompt(&self, _prompt: &str) -> Result<Option<f64>, ModelError> {
            panic!("optimize must not call the model");
        }
    }

    #[test]
    fn test_injected_model_is_never_invoked() {
        let mut opt = optimizer().with_model(Arc::new(PanickingModel));
        assert_eq!(opt.model_name(), "panicking");
        let result = opt.optimize("Write a poem", &options(TaskType::Creative, 2));
        assert!(result.optimized_prompt.contains("Creative guidelines:"));
    }

    #[test]
    fn test_default_model_is_noop() {
        assert_eq!(optimizer().model_name(), "noop");
    }

    #[test]
    fn test_convergence_policy_from_str() {
        assert_eq!(
            "fixed".parse::<ConvergencePolicy>().unwrap(),
            ConvergencePolicy::FixedIterations
        );
        assert_eq!(
            "stop_at_target".parse::<ConvergencePolicy>().unwrap(),
            ConvergencePolicy::StopAtTarget
        );
        assert!("forever".parse::<ConvergencePolicy>().is_err());
    }

    #[test]
    fn test_result_serializes_technique_names() {
        let mut opt = optimizer();
        let result = opt.optimize("Write code", &options(TaskType::Coding, 1));
        let json = serde_json::to_value(&result).unwrap();
        let names: Vec<&str> = json["techniques_applied"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        assert!(names.contains(&"coding_optimization"));
        assert!(names.contains(&"chain_of_thought"));
        assert!(names.contains(&"output_format"));
    }
}
