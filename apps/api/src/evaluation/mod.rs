// Prompt evaluation: independent text heuristics combined into one score plus feedback.
// No model is consulted; every metric is a pure function of its text inputs.

pub mod evaluator;
pub mod handlers;
pub mod metrics;
