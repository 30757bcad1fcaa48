//! RuleBook — every hand-authored keyword table the engine consults.
//!
//! Control flow never hard-codes a keyword: the decomposer, optimizer and
//! evaluator all read from a `RuleBook`, which is either the built-in tables
//! (`RuleBook::default()`) or a JSON document loaded with `RuleBook::from_path`.

pub mod catalog;
pub mod defaults;

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

pub use catalog::PatternCatalog;
use defaults::*;

// ────────────────────────────────────────────────────────────────────────────
// Task types
// ────────────────────────────────────────────────────────────────────────────

/// The kind of task a prompt describes. Selects the rewrite rule and format suffix.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    #[default]
    General,
    Coding,
    Analysis,
    Creative,
}

impl TaskType {
    pub const ALL: [TaskType; 4] = [
        TaskType::General,
        TaskType::Coding,
        TaskType::Analysis,
        TaskType::Creative,
    ];

    /// Total parse: anything unrecognised is treated as `General`.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "coding" => TaskType::Coding,
            "analysis" => TaskType::Analysis,
            "creative" => TaskType::Creative,
            _ => TaskType::General,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskType::General => "general",
            TaskType::Coding => "coding",
            TaskType::Analysis => "analysis",
            TaskType::Creative => "creative",
        }
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One value per task type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerTask<T> {
    pub general: T,
    pub coding: T,
    pub analysis: T,
    pub creative: T,
}

impl<T> PerTask<T> {
    pub fn get(&self, task: TaskType) -> &T {
        match task {
            TaskType::General => &self.general,
            TaskType::Coding => &self.coding,
            TaskType::Analysis => &self.analysis,
            TaskType::Creative => &self.creative,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Rule data
// ────────────────────────────────────────────────────────────────────────────

/// A suggestion added when none of its trigger keywords is present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleCheck {
    pub triggers: Vec<String>,
    pub suggestion: String,
}

/// Text prepended when none of its trigger keywords is present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preamble {
    pub triggers: Vec<String>,
    pub text: String,
}

/// Task-type rewrite rule. Checks are evaluated against the prompt as it was
/// before the rule ran; fired suggestions are appended under `heading` when set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRule {
    #[serde(default)]
    pub preamble: Option<Preamble>,
    #[serde(default)]
    pub heading: Option<String>,
    pub checks: Vec<RuleCheck>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainOfThought {
    pub trigger: String,
    pub sentence: String,
}

fn task_rule(
    heading: Option<&str>,
    checks: &[Check],
    preamble: Option<(&[&str], &str)>,
) -> TaskRule {
    TaskRule {
        preamble: preamble.map(|(triggers, text)| Preamble {
            triggers: to_strings(triggers),
            text: text.to_string(),
        }),
        heading: heading.map(str::to_string),
        checks: checks
            .iter()
            .map(|(triggers, suggestion)| RuleCheck {
                triggers: to_strings(triggers),
                suggestion: suggestion.to_string(),
            })
            .collect(),
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

// ────────────────────────────────────────────────────────────────────────────
// RuleBook
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum RulesError {
    #[error("Failed to read rules file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse rules file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Step pattern #{index} has no steps")]
    EmptyStepList { index: usize },

    #[error("Default step list is empty")]
    EmptyDefaultSteps,

    #[error("{task} rule suggestion '{suggestion}' contains none of its own triggers")]
    NonIdempotentCheck { task: TaskType, suggestion: String },

    #[error("{task} rule preamble contains none of its own triggers")]
    NonIdempotentPreamble { task: TaskType },

    #[error("{task} output format suffix contains no format indicator")]
    UndetectableFormat { task: TaskType },

    #[error("Chain-of-thought sentence does not contain its trigger '{0}'")]
    UndetectableChainOfThought(String),

    #[error("Blank keyword in {0}")]
    BlankKeyword(String),
}

/// All keyword tables, loaded once at startup and shared read-only.
///
/// Missing top-level sections in a JSON document fall back to the built-in tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleBook {
    pub catalog: PatternCatalog,
    pub format_indicators: Vec<String>,
    pub specificity_terms: Vec<String>,
    pub chain_of_thought: ChainOfThought,
    pub task_rules: PerTask<TaskRule>,
    pub format_suffixes: PerTask<String>,
}

impl Default for RuleBook {
    fn default() -> Self {
        Self {
            catalog: PatternCatalog::default(),
            format_indicators: to_strings(FORMAT_INDICATORS),
            specificity_terms: to_strings(SPECIFICITY_TERMS),
            chain_of_thought: ChainOfThought {
                trigger: CHAIN_OF_THOUGHT_TRIGGER.to_string(),
                sentence: CHAIN_OF_THOUGHT_SENTENCE.to_string(),
            },
            task_rules: PerTask {
                general: task_rule(None, GENERAL_CHECKS, Some((ROLE_TRIGGERS, ROLE_PREAMBLE))),
                coding: task_rule(Some(CODING_HEADING), CODING_CHECKS, None),
                analysis: task_rule(Some(ANALYSIS_HEADING), ANALYSIS_CHECKS, None),
                creative: task_rule(Some(CREATIVE_HEADING), CREATIVE_CHECKS, None),
            },
            format_suffixes: PerTask {
                general: GENERAL_FORMAT.to_string(),
                coding: CODING_FORMAT.to_string(),
                analysis: ANALYSIS_FORMAT.to_string(),
                creative: CREATIVE_FORMAT.to_string(),
            },
        }
    }
}

impl RuleBook {
    /// Loads and validates a RuleBook from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, RulesError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| RulesError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let rules = Self::from_json(&raw)?;
        info!(
            "Loaded rule book from {} ({} decomposition patterns)",
            path.display(),
            rules.catalog.patterns.len()
        );
        Ok(rules)
    }

    pub fn from_json(raw: &str) -> Result<Self, RulesError> {
        let rules: RuleBook = serde_json::from_str(raw)?;
        rules.validate()?;
        Ok(rules)
    }

    /// Checks the structural invariants the engine relies on.
    ///
    /// Every step list is non-empty, and every inserted text satisfies its own
    /// presence check, which is what keeps repeated optimizer passes from
    /// growing the prompt after the first one.
    pub fn validate(&self) -> Result<(), RulesError> {
        if let Some(index) = self.catalog.patterns.iter().position(|p| p.steps.is_empty()) {
            return Err(RulesError::EmptyStepList { index });
        }
        if self.catalog.default_steps.is_empty() {
            return Err(RulesError::EmptyDefaultSteps);
        }

        // A blank keyword matches every text and would silently disable its rule.
        for (index, pattern) in self.catalog.patterns.iter().enumerate() {
            reject_blank(&pattern.keywords, || format!("step pattern #{index}"))?;
        }
        reject_blank(&self.format_indicators, || "format_indicators".to_string())?;
        reject_blank(&self.specificity_terms, || "specificity_terms".to_string())?;
        if self.chain_of_thought.trigger.trim().is_empty() {
            return Err(RulesError::BlankKeyword("chain_of_thought".to_string()));
        }

        for task in TaskType::ALL {
            let rule = self.task_rules.get(task);
            if let Some(preamble) = &rule.preamble {
                reject_blank(&preamble.triggers, || format!("{task} rule preamble"))?;
                if !contains_any(&preamble.text.to_lowercase(), &preamble.triggers) {
                    return Err(RulesError::NonIdempotentPreamble { task });
                }
            }
            for check in &rule.checks {
                reject_blank(&check.triggers, || format!("{task} rule check"))?;
                if !contains_any(&check.suggestion.to_lowercase(), &check.triggers) {
                    return Err(RulesError::NonIdempotentCheck {
                        task,
                        suggestion: check.suggestion.clone(),
                    });
                }
            }
            if !self.has_output_format(self.format_suffixes.get(task)) {
                return Err(RulesError::UndetectableFormat { task });
            }
        }

        let cot = &self.chain_of_thought;
        if !cot.sentence.to_lowercase().contains(&cot.trigger.to_lowercase()) {
            return Err(RulesError::UndetectableChainOfThought(cot.trigger.clone()));
        }

        Ok(())
    }

    /// True when the text already names an output format.
    pub fn has_output_format(&self, text: &str) -> bool {
        contains_any(&text.to_lowercase(), &self.format_indicators)
    }

    /// True when the chain-of-thought trigger is present.
    pub fn has_chain_of_thought(&self, text: &str) -> bool {
        text.to_lowercase()
            .contains(&self.chain_of_thought.trigger.to_lowercase())
    }
}

fn reject_blank(keywords: &[String], location: impl FnOnce() -> String) -> Result<(), RulesError> {
    if keywords.iter().any(|k| k.trim().is_empty()) {
        return Err(RulesError::BlankKeyword(location()));
    }
    Ok(())
}

/// `haystack` must already be lowercased; needles are lowercased here.
pub fn contains_any(haystack: &str, needles: &[String]) -> bool {
    needles
        .iter()
        .any(|needle| haystack.contains(&needle.to_lowercase()))
}
