// Prompt optimization: iterative, rule-driven rewriting with a heuristic improvement estimate.
// The injected LanguageModel is reserved; no optimization path calls it today.

pub mod handlers;
pub mod model;
pub mod optimizer;
pub mod techniques;
