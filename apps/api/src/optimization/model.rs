#![allow(dead_code)]

//! Model capability slot for the optimizer.
//!
//! `PromptOptimizer` carries an `Arc<dyn LanguageModel>` so a model-in-the-loop
//! scorer can be plugged in later without touching callers. The default
//! `NoopModel` has no opinion about any prompt.

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Model unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait LanguageModel: Send + Sync {
    fn name(&self) -> &str;

    /// Estimated quality of a prompt in [0, 1], or `None` when the model abstains.
    async fn score_prompt(&self, prompt: &str) -> Result<Option<f64>, ModelError>;
}

/// Default model: abstains on everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopModel;

#[async_trait]
impl LanguageModel for NoopModel {
    fn name(&self) -> &str {
        "noop"
    }

    async fn score_prompt(&self, _prompt: &str) -> Result<Option<f64>, ModelError> {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_noop_model_abstains() {
        let model = NoopModel;
        assert_eq!(model.name(), "noop");
        assert!(model.score_prompt("anything").await.unwrap().is_none());
    }
}
