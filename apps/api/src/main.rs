mod config;
mod decomposition;
mod errors;
mod evaluation;
mod history;
mod optimization;
mod routes;
mod rules;
mod state;
mod templates;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::routes::build_router;
use crate::rules::RuleBook;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting microprompt API v{}", env!("CARGO_PKG_VERSION"));

    // Load rule tables (built-in unless RULES_PATH is set)
    let rules = match &config.rules_path {
        Some(path) => RuleBook::from_path(path)
            .with_context(|| format!("Failed to load rules from {}", path.display()))?,
        None => {
            let rules = RuleBook::default();
            rules.validate().context("Built-in rule tables are invalid")?;
            info!("Using built-in rule tables");
            rules
        }
    };

    let state = AppState::new(config.clone(), rules);

    if let Ok(optimizer) = state.optimizer.lock() {
        info!(
            "Optimizer ready (model: {}, convergence: {:?}, max iterations limit: {})",
            optimizer.model_name(),
            optimizer.convergence(),
            config.max_iterations_limit
        );
    }
    if let Ok(evaluator) = state.evaluator.lock() {
        info!("Evaluator ready (score policy: {:?})", evaluator.policy());
    }

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
