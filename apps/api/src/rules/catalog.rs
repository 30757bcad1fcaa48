//! PatternCatalog — keyword-triggered step lists for instruction decomposition.

use serde::{Deserialize, Serialize};

use crate::rules::defaults::{DECOMPOSITION_PATTERNS, DEFAULT_STEPS};

/// One ordered step list and the keywords that select it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepPattern {
    pub keywords: Vec<String>,
    pub steps: Vec<String>,
}

/// Patterns are scanned in declaration order; `default_steps` covers everything else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternCatalog {
    pub patterns: Vec<StepPattern>,
    pub default_steps: Vec<String>,
}

/// The step list chosen for an instruction. `keyword` is `None` for the default list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CatalogMatch<'a> {
    pub keyword: Option<&'a str>,
    pub steps: &'a [String],
}

impl Default for PatternCatalog {
    fn default() -> Self {
        Self {
            patterns: DECOMPOSITION_PATTERNS
                .iter()
                .map(|(keyword, steps)| StepPattern {
                    keywords: vec![keyword.to_string()],
                    steps: steps.iter().map(|s| s.to_string()).collect(),
                })
                .collect(),
            default_steps: DEFAULT_STEPS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl PatternCatalog {
    /// Returns the first pattern whose keyword occurs (case-insensitively) in the instruction.
    pub fn select(&self, instruction: &str) -> CatalogMatch<'_> {
        let lowered = instruction.to_lowercase();

        for pattern in &self.patterns {
            if let Some(keyword) = pattern
                .keywords
                .iter()
                .find(|k| lowered.contains(&k.to_lowercase()))
            {
                return CatalogMatch {
                    keyword: Some(keyword.as_str()),
                    steps: &pattern.steps,
                };
            }
        }

        CatalogMatch {
            keyword: None,
            steps: &self.default_steps,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_keeps_insertion_order() {
        let catalog = PatternCatalog::default();
        let keywords: Vec<&str> = catalog
            .patterns
            .iter()
            .map(|p| p.keywords[0].as_str())
            .collect();
        assert_eq!(keywords, vec!["analyze", "create", "compare", "explain", "solve"]);
    }

    #[test]
    fn test_select_is_case_insensitive() {
        let catalog = PatternCatalog::default();
        let m = catalog.select("EXPLAIN how tides work");
        assert_eq!(m.keyword, Some("explain"));
        assert_eq!(m.steps.len(), 4);
    }

    #[test]
    fn test_first_pattern_wins_when_several_match() {
        let catalog = PatternCatalog::default();
        // "analyze" precedes "compare" in the catalog
        let m = catalog.select("Compare and analyze both proposals");
        assert_eq!(m.keyword, Some("analyze"));
    }

    #[test]
    fn test_keyword_matches_as_substring() {
        let catalog = PatternCatalog::default();
        // "recreate" contains "create"
        let m = catalog.select("Recreate the landing page");
        assert_eq!(m.keyword, Some("create"));
    }

    #[test]
    fn test_no_match_falls_back_to_default() {
        let catalog = PatternCatalog::default();
        let m = catalog.select("Translate this paragraph into French");
        assert_eq!(m.keyword, None);
        assert_eq!(m.steps, catalog.default_steps.as_slice());
        assert_eq!(m.steps.len(), 5);
    }

    #[test]
    fn test_pattern_with_several_keywords() {
        let catalog = PatternCatalog {
            patterns: vec![StepPattern {
                keywords: vec!["debug".to_string(), "fix".to_string()],
                steps: vec!["reproduce the bug".to_string()],
            }],
            default_steps: vec!["do the task".to_string()],
        };
        let m = catalog.select("Please fix the login form");
        assert_eq!(m.keyword, Some("fix"));
        assert_eq!(m.steps, &["reproduce the bug".to_string()]);
    }
}
