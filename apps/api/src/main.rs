mod config;
mod db;
mod embedding_client;
mod errors;
mod extraction;
mod matching;
mod models;
mod routes;
mod scoring;
mod sentence_model;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::DefaultBodyLimit;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, EmbeddingBackend};
use crate::db::create_pool;
use crate::embedding_client::HttpEmbedder;
use crate::matching::storage::ResumeStorage;
use crate::routes::build_router;
use crate::scoring::{Embedder, HashingEmbedder, ScoringEngine, SkillVocabulary};
use crate::sentence_model::SentenceEmbedder;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing or malformed env vars)
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

    info!("Starting Matcher API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;

    // Initialize resume storage
    let storage = ResumeStorage::new(&config.resume_dir);
    storage
        .init()
        .await
        .with_context(|| format!("Cannot create resume directory {}", config.resume_dir.display()))?;

    // Initialize the embedding backend once; it is shared read-only afterwards
    let embedder = build_embedder(&config).await?;
    info!(
        "Embedding backend ready (model: {}, max tokens: {})",
        embedder.model_name(),
        embedder.max_input_tokens()
    );

    // Skill vocabulary: built-in unless SKILL_VOCABULARY_PATH points elsewhere
    let vocabulary = match &config.skill_vocabulary_path {
        Some(path) => SkillVocabulary::from_path(path)
            .with_context(|| format!("Cannot load skill vocabulary from {}", path.display()))?,
        None => SkillVocabulary::default(),
    };
    info!("Skill vocabulary loaded ({} entries)", vocabulary.len());

    let engine = ScoringEngine::new(embedder, vocabulary, config.weights.clone());
    info!("Scoring weights: {:?}", engine.weights());

    // Build app state
    let state = AppState {
        db,
        engine,
        storage,
    };

    // Build router
    let app = build_router(state)
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn build_embedder(config: &Config) -> Result<Arc<dyn Embedder>> {
    let embedder: Arc<dyn Embedder> = match &config.embedding {
        EmbeddingBackend::Sentence { model_dir } => {
            let model_dir = model_dir.clone();
            let max_tokens = config.embedding_max_tokens;
            // Model download and libtorch init block; keep them off the runtime
            let embedder = tokio::task::spawn_blocking(move || {
                SentenceEmbedder::load(model_dir.as_deref(), max_tokens)
            })
            .await
            .context("Sentence model loader panicked")?
            .context("Failed to load sentence embedding model")?;
            Arc::new(embedder)
        }
        EmbeddingBackend::Hashing { dimensions } => Arc::new(HashingEmbedder::new(
            *dimensions,
            config.embedding_max_tokens,
        )),
        EmbeddingBackend::Http {
            url,
            api_key,
            model,
        } => Arc::new(
            HttpEmbedder::new(
                url.clone(),
                api_key.clone(),
                model.clone(),
                config.embedding_max_tokens,
            )
            .context("Failed to build embedding HTTP client")?,
        ),
    };
    Ok(embedder)
}
