//! PromptEvaluator — scores prompt/response pairs and keeps an evaluation history.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::evaluation::metrics::{
    self, CLARITY, PROMPT_LENGTH, RESPONSE_LENGTH, SIMILARITY, SPECIFICITY,
};
use crate::history::History;
use crate::rules::RuleBook;

const CLARITY_FLOOR: f64 = 0.5;
const SPECIFICITY_FLOOR: f64 = 0.5;

const SIMPLIFY_FEEDBACK: &str = "Consider simplifying the prompt structure";
const SPECIFICITY_FEEDBACK: &str = "Add more specific requirements";
const APPROVAL_FEEDBACK: &str = "Prompt looks good!";

/// How the overall score aggregates the metric map.
///
/// `Raw` averages every metric, so the unnormalised length counts dominate.
/// `BoundedOnly` averages only the [0, 1] metrics; lengths are still reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScorePolicy {
    #[default]
    Raw,
    BoundedOnly,
}

impl FromStr for ScorePolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "raw" => Ok(ScorePolicy::Raw),
            "bounded_only" => Ok(ScorePolicy::BoundedOnly),
            other => Err(format!(
                "unknown score policy '{other}' (expected raw or bounded_only)"
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub prompt: String,
    /// Mean of the metrics selected by the score policy. Not clamped.
    pub score: f64,
    pub metrics: BTreeMap<String, f64>,
    pub feedback: String,
}

pub struct PromptEvaluator {
    rules: Arc<RuleBook>,
    policy: ScorePolicy,
    history: History<EvaluationResult>,
}

impl PromptEvaluator {
    pub fn new(rules: Arc<RuleBook>) -> Self {
        Self {
            rules,
            policy: ScorePolicy::default(),
            history: History::default(),
        }
    }

    pub fn with_policy(mut self, policy: ScorePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> ScorePolicy {
        self.policy
    }

    /// Computes every metric, aggregates, appends to history and returns the result.
    /// `similarity` is only computed when a non-empty ground truth is supplied.
    pub fn evaluate(
        &mut self,
        prompt: &str,
        response: &str,
        ground_truth: Option<&str>,
    ) -> EvaluationResult {
        let mut scores = BTreeMap::new();
        scores.insert(PROMPT_LENGTH.to_string(), metrics::char_length(prompt));
        scores.insert(RESPONSE_LENGTH.to_string(), metrics::char_length(response));
        scores.insert(CLARITY.to_string(), metrics::clarity(prompt));
        scores.insert(
            SPECIFICITY.to_string(),
            metrics::specificity(prompt, &self.rules.specificity_terms),
        );
        if let Some(truth) = ground_truth.filter(|t| !t.is_empty()) {
            scores.insert(SIMILARITY.to_string(), metrics::similarity(response, truth));
        }

        let score = aggregate(&scores, self.policy);
        let feedback = generate_feedback(&scores);

        debug!(score, metrics = scores.len(), "Evaluated prompt");

        let result = EvaluationResult {
            prompt: prompt.to_string(),
            score,
            metrics: scores,
            feedback,
        };
        self.history.push(result.clone());
        result
    }

    /// Evaluates prompts and responses pairwise, stopping at the shorter list,
    /// and returns the results best first. Equal scores keep their input order.
    pub fn compare_prompts<P, R>(&mut self, prompts: &[P], responses: &[R]) -> Vec<EvaluationResult>
    where
        P: AsRef<str>,
        R: AsRef<str>,
    {
        let mut results: Vec<EvaluationResult> = prompts
            .iter()
            .zip(responses)
            .map(|(prompt, response)| self.evaluate(prompt.as_ref(), response.as_ref(), None))
            .collect();

        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        results
    }

    pub fn history(&self) -> &History<EvaluationResult> {
        &self.history
    }
}

/// Arithmetic mean over the metrics the policy admits.
fn aggregate(scores: &BTreeMap<String, f64>, policy: ScorePolicy) -> f64 {
    let selected: Vec<f64> = scores
        .iter()
        .filter(|(name, _)| policy == ScorePolicy::Raw || metrics::is_bounded(name))
        .map(|(_, value)| *value)
        .collect();

    if selected.is_empty() {
        return 0.0;
    }
    selected.iter().sum::<f64>() / selected.len() as f64
}

fn generate_feedback(scores: &BTreeMap<String, f64>) -> String {
    let mut feedback = Vec::new();

    if scores.get(CLARITY).is_some_and(|&c| c < CLARITY_FLOOR) {
        feedback.push(SIMPLIFY_FEEDBACK);
    }
    if scores.get(SPECIFICITY).is_some_and(|&s| s < SPECIFICITY_FLOOR) {
        feedback.push(SPECIFICITY_FEEDBACK);
    }
    if feedback.is_empty() {
        feedback.push(APPROVAL_FEEDBACK);
    }

    feedback.join(". ")
}
