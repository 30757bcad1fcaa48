use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::evaluation::evaluator::ScorePolicy;
use crate::optimization::optimizer::ConvergencePolicy;

/// Application configuration loaded from environment variables.
/// Every variable is optional; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// JSON RuleBook overriding the built-in keyword tables.
    pub rules_path: Option<PathBuf>,
    pub score_policy: ScorePolicy,
    pub convergence: ConvergencePolicy,
    /// Upper bound on `max_iterations` accepted over HTTP.
    pub max_iterations_limit: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            rust_log: "info".to_string(),
            rules_path: None,
            score_policy: ScorePolicy::default(),
            convergence: ConvergencePolicy::default(),
            max_iterations_limit: 20,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = Config::default();

        Ok(Config {
            port: optional_env("PORT")
                .map(|v| v.parse::<u16>())
                .transpose()
                .context("PORT must be a valid port number")?
                .unwrap_or(defaults.port),
            rust_log: optional_env("RUST_LOG").unwrap_or(defaults.rust_log),
            rules_path: optional_env("RULES_PATH").map(PathBuf::from),
            score_policy: optional_env("SCORE_POLICY")
                .map(|v| v.parse::<ScorePolicy>())
                .transpose()
                .map_err(anyhow::Error::msg)
                .context("SCORE_POLICY is invalid")?
                .unwrap_or(defaults.score_policy),
            convergence: optional_env("CONVERGENCE")
                .map(|v| v.parse::<ConvergencePolicy>())
                .transpose()
                .map_err(anyhow::Error::msg)
                .context("CONVERGENCE is invalid")?
                .unwrap_or(defaults.convergence),
            max_iterations_limit: optional_env("MAX_ITERATIONS_LIMIT")
                .map(|v| v.parse::<u32>())
                .transpose()
                .context("MAX_ITERATIONS_LIMIT must be a non-negative integer")?
                .unwrap_or(defaults.max_iterations_limit),
        })
    }
}

/// Unset and blank variables are both treated as absent.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.score_policy, ScorePolicy::Raw);
        assert_eq!(config.convergence, ConvergencePolicy::FixedIterations);
        assert_eq!(config.max_iterations_limit, 20);
        assert!(config.rules_path.is_none());
    }

    #[test]
    fn test_blank_env_var_is_absent() {
        std::env::set_var("MICROPROMPT_TEST_BLANK_VAR", "   ");
        assert_eq!(optional_env("MICROPROMPT_TEST_BLANK_VAR"), None);
        std::env::set_var("MICROPROMPT_TEST_SET_VAR", "raw");
        assert_eq!(
            optional_env("MICROPROMPT_TEST_SET_VAR"),
            Some("raw".to_string())
        );
    }
}
