use std::sync::{Arc, Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};

use anyhow::anyhow;

use crate::config::Config;
use crate::decomposition::decomposer::Decomposer;
use crate::errors::AppError;
use crate::evaluation::evaluator::PromptEvaluator;
use crate::optimization::optimizer::PromptOptimizer;
use crate::rules::RuleBook;
use crate::templates::TemplateRegistry;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// The optimizer and evaluator own append-only histories, so shared access goes
/// through a mutex. The decomposer is stateless.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub rules: Arc<RuleBook>,
    pub decomposer: Decomposer,
    pub optimizer: Arc<Mutex<PromptOptimizer>>,
    pub evaluator: Arc<Mutex<PromptEvaluator>>,
    pub templates: Arc<RwLock<TemplateRegistry>>,
}

impl AppState {
    pub fn new(config: Config, rules: RuleBook) -> Self {
        let rules = Arc::new(rules);
        let optimizer =
            PromptOptimizer::new(rules.clone()).with_convergence(config.convergence);
        let evaluator = PromptEvaluator::new(rules.clone()).with_policy(config.score_policy);

        Self {
            decomposer: Decomposer::new(rules.clone()),
            optimizer: Arc::new(Mutex::new(optimizer)),
            evaluator: Arc::new(Mutex::new(evaluator)),
            templates: Arc::new(RwLock::new(TemplateRegistry::default())),
            rules,
            config,
        }
    }

    pub fn lock_optimizer(&self) -> Result<MutexGuard<'_, PromptOptimizer>, AppError> {
        self.optimizer
            .lock()
            .map_err(|_| AppError::Internal(anyhow!("optimizer lock poisoned")))
    }

    pub fn lock_evaluator(&self) -> Result<MutexGuard<'_, PromptEvaluator>, AppError> {
        self.evaluator
            .lock()
            .map_err(|_| AppError::Internal(anyhow!("evaluator lock poisoned")))
    }

    pub fn read_templates(&self) -> Result<RwLockReadGuard<'_, TemplateRegistry>, AppError> {
        self.templates
            .read()
            .map_err(|_| AppError::Internal(anyhow!("template registry lock poisoned")))
    }

    pub fn write_templates(&self) -> Result<RwLockWriteGuard<'_, TemplateRegistry>, AppError> {
        self.templates
            .write()
            .map_err(|_| AppError::Internal(anyhow!("template registry lock poisoned")))
    }
}
