use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{bail, Context, Result};

use crate::scoring::ScoringWeights;

/// Which `Embedder` backs the relevance scorer.
#[derive(Debug, Clone, PartialEq)]
pub enum EmbeddingBackend {
    /// Pretrained sentence-transformers model run in-process. `None` fetches
    /// all-MiniLM-L6-v2 into the local cache.
    Sentence { model_dir: Option<PathBuf> },
    /// Lexical feature hashing. Offline fallback; not semantic.
    Hashing { dimensions: usize },
    /// OpenAI-compatible `/embeddings` endpoint.
    Http {
        url: String,
        api_key: Option<String>,
        model: String,
    },
}

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub rust_log: String,
    pub resume_dir: PathBuf,
    pub max_upload_bytes: usize,
    pub embedding: EmbeddingBackend,
    pub embedding_max_tokens: usize,
    pub weights: ScoringWeights,
    pub skill_vocabulary_path: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let embedding = match get("EMBEDDING_BACKEND").as_deref().unwrap_or("sentence") {
            "sentence" => EmbeddingBackend::Sentence {
                model_dir: get("EMBEDDING_MODEL_DIR").map(PathBuf::from),
            },
            "hashing" => EmbeddingBackend::Hashing {
                dimensions: parse_or(&get, "EMBEDDING_DIMENSIONS", 1024)?,
            },
            "http" => EmbeddingBackend::Http {
                url: get("EMBEDDING_API_URL").with_context(|| {
                    "Required environment variable 'EMBEDDING_API_URL' is not set \
                     (needed when EMBEDDING_BACKEND=http)"
                        .to_string()
                })?,
                api_key: get("EMBEDDING_API_KEY"),
                model: get("EMBEDDING_MODEL").unwrap_or_else(|| "all-MiniLM-L6-v2".to_string()),
            },
            other => bail!("EMBEDDING_BACKEND must be 'sentence', 'hashing' or 'http', got '{other}'"),
        };

        let weights = ScoringWeights {
            quality: parse_or(&get, "WEIGHT_QUALITY", 5.0)?,
            relevance: parse_or(&get, "WEIGHT_RELEVANCE", 50.0)?,
            experience: parse_or(&get, "WEIGHT_EXPERIENCE", 10.0)?,
            location: parse_or(&get, "WEIGHT_LOCATION", 10.0)?,
            renormalize: parse_or(&get, "WEIGHTS_RENORMALIZE", true)?,
            experience_cap_years: parse_or(&get, "EXPERIENCE_CAP_YEARS", 10.0)?,
        };
        if let Err(msg) = weights.validate() {
            bail!("Invalid scoring weights: {msg}");
        }

        Ok(Config {
            database_url: get("DATABASE_URL").with_context(|| {
                "Required environment variable 'DATABASE_URL' is not set".to_string()
            })?,
            port: parse_or(&get, "PORT", 8080)?,
            rust_log: get("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            resume_dir: get("RESUME_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./data")),
            max_upload_bytes: parse_or(&get, "MAX_UPLOAD_BYTES", 10 * 1024 * 1024)?,
            embedding,
            embedding_max_tokens: parse_or(&get, "EMBEDDING_MAX_TOKENS", 512)?,
            weights,
            skill_vocabulary_path: get("SKILL_VOCABULARY_PATH").map(PathBuf::from),
        })
    }
}

fn parse_or<T, G>(get: &G, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value '{raw}'")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> Result<Config> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let c = config(&[("DATABASE_URL", "postgres://localhost/matcher")]).unwrap();
        assert_eq!(c.port, 8080);
        assert_eq!(c.rust_log, "info");
        assert_eq!(c.resume_dir, PathBuf::from("./data"));
        assert_eq!(c.max_upload_bytes, 10_485_760);
        assert_eq!(c.embedding, EmbeddingBackend::Sentence { model_dir: None });
        assert_eq!(c.embedding_max_tokens, 512);
        assert_eq!(c.weights, ScoringWeights::default());
        assert!(c.skill_vocabulary_path.is_none());
    }

    #[test]
    fn test_missing_database_url_fails() {
        let err = config(&[]).unwrap_err();
        assert!(err.to_string().contains("DATABASE_URL"));
    }

    #[test]
    fn test_local_sentence_model_and_hashing_fallback() {
        let c = config(&[
            ("DATABASE_URL", "postgres://x"),
            ("EMBEDDING_MODEL_DIR", "/models/all-MiniLM-L6-v2"),
        ])
        .unwrap();
        assert_eq!(
            c.embedding,
            EmbeddingBackend::Sentence {
                model_dir: Some(PathBuf::from("/models/all-MiniLM-L6-v2"))
            }
        );

        let c = config(&[
            ("DATABASE_URL", "postgres://x"),
            ("EMBEDDING_BACKEND", "hashing"),
            ("EMBEDDING_DIMENSIONS", "256"),
        ])
        .unwrap();
        assert_eq!(c.embedding, EmbeddingBackend::Hashing { dimensions: 256 });
    }

    #[test]
    fn test_http_backend_requires_url() {
        let err = config(&[
            ("DATABASE_URL", "postgres://x"),
            ("EMBEDDING_BACKEND", "http"),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("EMBEDDING_API_URL"));

        let c = config(&[
            ("DATABASE_URL", "postgres://x"),
            ("EMBEDDING_BACKEND", "http"),
            ("EMBEDDING_API_URL", "http://embed:8000/v1/embeddings"),
            ("EMBEDDING_API_KEY", "sk-test"),
        ])
        .unwrap();
        assert_eq!(
            c.embedding,
            EmbeddingBackend::Http {
                url: "http://embed:8000/v1/embeddings".to_string(),
                api_key: Some("sk-test".to_string()),
                model: "all-MiniLM-L6-v2".to_string(),
            }
        );
    }

    #[test]
    fn test_weight_overrides_and_validation() {
        let c = config(&[
            ("DATABASE_URL", "postgres://x"),
            ("WEIGHT_RELEVANCE", "40"),
            ("WEIGHTS_RENORMALIZE", "false"),
        ])
        .unwrap();
        assert_eq!(c.weights.relevance, 40.0);
        assert!(!c.weights.renormalize);

        let err = config(&[("DATABASE_URL", "postgres://x"), ("WEIGHT_LOCATION", "-2")])
            .unwrap_err();
        assert!(err.to_string().contains("Invalid scoring weights"));
    }

    #[test]
    fn test_malformed_number_names_the_variable() {
        let err = config(&[("DATABASE_URL", "postgres://x"), ("PORT", "eighty")]).unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn test_unknown_backend_fails() {
        let err = config(&[("DATABASE_URL", "postgres://x"), ("EMBEDDING_BACKEND", "magic")])
            .unwrap_err();
        assert!(err.to_string().contains("magic"));
    }
}
