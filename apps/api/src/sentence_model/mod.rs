/// Sentence Model — in-process pretrained backend for the relevance scorer.
///
/// Runs a sentence-transformers model (all-MiniLM-L6-v2 by default) through
/// rust-bert on libtorch. The weights are fetched into the local cache on
/// first start, or read from `EMBEDDING_MODEL_DIR` when set. Loaded once at
/// startup and shared; inference is CPU-bound and runs on the blocking pool
/// behind a mutex.
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rust_bert::pipelines::sentence_embeddings::{
    SentenceEmbeddingsBuilder, SentenceEmbeddingsModel, SentenceEmbeddingsModelType,
};
use rust_bert::RustBertError;
use thiserror::Error;
use tracing::{debug, info};

use crate::scoring::relevance::{Embedder, EmbeddingError};

pub const DEFAULT_MODEL_NAME: &str = "sentence-transformers/all-MiniLM-L6-v2";

/// Files a local sentence-transformers export must contain.
const REQUIRED_FILES: &[&str] = &["modules.json", "config.json"];

#[derive(Debug, Error)]
pub enum SentenceModelError {
    #[error("model directory {} is missing {file}", .dir.display())]
    MissingFile { dir: PathBuf, file: &'static str },

    #[error("model error: {0}")]
    Model(#[from] RustBertError),

    #[error("model lock poisoned by an earlier panic")]
    Poisoned,

    #[error("model returned no embedding")]
    EmptyOutput,

    #[error("inference task failed: {0}")]
    Task(String),
}

impl From<SentenceModelError> for EmbeddingError {
    fn from(e: SentenceModelError) -> Self {
        EmbeddingError::Unavailable(e.to_string())
    }
}

#[derive(Clone)]
pub struct SentenceEmbedder {
    model: Arc<Mutex<SentenceEmbeddingsModel>>,
    name: String,
    max_tokens: usize,
}

impl SentenceEmbedder {
    /// Blocking. Downloads the default model when `model_dir` is `None`.
    pub fn load(model_dir: Option<&Path>, max_tokens: usize) -> Result<Self, SentenceModelError> {
        let (model, name) = match model_dir {
            Some(dir) => {
                check_model_dir(dir)?;
                let model = SentenceEmbeddingsBuilder::local(dir.to_path_buf()).create_model()?;
                (model, dir.display().to_string())
            }
            None => {
                let model =
                    SentenceEmbeddingsBuilder::remote(SentenceEmbeddingsModelType::AllMiniLmL6V2)
                        .create_model()?;
                (model, DEFAULT_MODEL_NAME.to_string())
            }
        };
        info!("Loaded sentence embedding model {name}");

        Ok(Self {
            model: Arc::new(Mutex::new(model)),
            name,
            max_tokens: max_tokens.max(1),
        })
    }
}

fn check_model_dir(dir: &Path) -> Result<(), SentenceModelError> {
    for &file in REQUIRED_FILES {
        if !dir.join(file).is_file() {
            return Err(SentenceModelError::MissingFile {
                dir: dir.to_path_buf(),
                file,
            });
        }
    }
    Ok(())
}

#[async_trait]
impl Embedder for SentenceEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let model = Arc::clone(&self.model);
        let text = text.to_string();

        let embedding = tokio::task::spawn_blocking(move || -> Result<Vec<f32>, SentenceModelError> {
            let guard = model.lock().map_err(|_| SentenceModelError::Poisoned)?;
            guard
                .encode(&[text.as_str()])?
                .into_iter()
                .next()
                .ok_or(SentenceModelError::EmptyOutput)
        })
        .await
        .map_err(|e| SentenceModelError::Task(e.to_string()))??;

        debug!("Sentence embedding computed ({} dims)", embedding.len());
        Ok(embedding)
    }

    fn model_name(&self) -> &str {
        &self.name
    }

    fn max_input_tokens(&self) -> usize {
        self.max_tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::relevance::cosine_similarity;

    #[test]
    fn test_incomplete_model_dir_is_rejected_before_loading() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("modules.json"), "[]").unwrap();

        let err = SentenceEmbedder::load(Some(dir.path()), 256).err().unwrap();
        assert!(matches!(
            err,
            SentenceModelError::MissingFile {
                file: "config.json",
                ..
            }
        ));
    }

    #[test]
    fn test_errors_surface_as_unavailable() {
        let err: EmbeddingError = SentenceModelError::Poisoned.into();
        assert!(matches!(err, EmbeddingError::Unavailable(msg) if msg.contains("poisoned")));
    }

    #[tokio::test]
    #[ignore = "downloads all-MiniLM-L6-v2 and needs libtorch"]
    async fn test_synonyms_score_closer_than_unrelated_text() {
        let embedder = SentenceEmbedder::load(None, 256).unwrap();
        let job = embedder.embed("software developer").await.unwrap();
        let synonym = embedder.embed("programmer").await.unwrap();
        let unrelated = embedder.embed("pastry chef").await.unwrap();

        let close = cosine_similarity(&job, &synonym).unwrap();
        let far = cosine_similarity(&job, &unrelated).unwrap();
        assert!(close > 0.0);
        assert!(close > far);
    }
}
