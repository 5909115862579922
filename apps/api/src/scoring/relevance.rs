//! Relevance Scorer — semantic similarity between a resume and a job
//! description, via a pluggable embedding backend.
//!
//! Backends:
//! - `SentenceEmbedder` in `sentence_model` (default): pretrained
//!   sentence-transformers model run in-process.
//! - `HttpEmbedder` in `embedding_client`: any OpenAI-compatible `/embeddings`
//!   endpoint.
//! - `HashingEmbedder` here: lexical feature hashing, deterministic and
//!   offline. It only sees shared words, not meaning ("programmer" and
//!   "software developer" score 0); use it for tests or air-gapped runs.
//!
//! The engine holds an `Arc<dyn Embedder>`, chosen at startup via config.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use super::normalizer::word_tokens;

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("embedding backend unavailable: {0}")]
    Unavailable(String),

    #[error("embedding dimensions differ ({left} vs {right})")]
    DimensionMismatch { left: usize, right: usize },
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Turns text into a fixed-size vector. Implement this to swap the model
/// without touching the engine or the handlers.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    /// Reported alongside scores for transparency.
    fn model_name(&self) -> &str;

    /// Inputs are truncated to this many leading whitespace tokens.
    fn max_input_tokens(&self) -> usize;
}

// ────────────────────────────────────────────────────────────────────────────
// HashingEmbedder — offline lexical fallback
// ────────────────────────────────────────────────────────────────────────────

pub const DEFAULT_DIMENSIONS: usize = 1024;
pub const DEFAULT_MAX_TOKENS: usize = 512;

const STOPWORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "been", "but", "by", "for", "from", "has",
    "have", "he", "her", "his", "i", "in", "into", "is", "it", "its", "me", "my", "of", "on",
    "or", "our", "she", "so", "that", "the", "their", "them", "they", "this", "to", "was",
    "we", "were", "will", "with", "you", "your",
];

/// Bag of stemmed unigrams and bigrams hashed into a fixed number of buckets
/// (FNV-1a, signed), sublinear term frequency, L2-normalized.
pub struct HashingEmbedder {
    dimensions: usize,
    max_tokens: usize,
}

impl HashingEmbedder {
    pub fn new(dimensions: usize, max_tokens: usize) -> Self {
        Self {
            dimensions: dimensions.max(1),
            max_tokens: max_tokens.max(1),
        }
    }

    fn features(text: &str) -> HashMap<String, u32> {
        let stems: Vec<String> = word_tokens(text)
            .into_iter()
            .filter(|t| !STOPWORDS.contains(&t.as_str()))
            .map(|t| stem(&t))
            .collect();

        let mut counts: HashMap<String, u32> = HashMap::new();
        for stem in &stems {
            *counts.entry(stem.clone()).or_default() += 1;
        }
        for pair in stems.windows(2) {
            *counts.entry(format!("{} {}", pair[0], pair[1])).or_default() += 1;
        }
        counts
    }

    pub fn vectorize(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimensions];
        for (feature, count) in Self::features(text) {
            let hash = fnv1a(feature.as_bytes());
            let bucket = (hash % self.dimensions as u64) as usize;
            let sign = if hash >> 63 == 0 { 1.0 } else { -1.0 };
            vector[bucket] += sign * (1.0 + (count as f32).ln());
        }

        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut vector {
                *v /= norm;
            }
        }
        vector
    }
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_DIMENSIONS, DEFAULT_MAX_TOKENS)
    }
}

#[async_trait]
impl Embedder for HashingEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        Ok(self.vectorize(text))
    }

    fn model_name(&self) -> &str {
        "hashing-bow"
    }

    fn max_input_tokens(&self) -> usize {
        self.max_tokens
    }
}

fn fnv1a(bytes: &[u8]) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for b in bytes {
        hash ^= *b as u64;
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash
}

/// Light suffix stripping so `engineering`/`engineered`/`engineers` collide.
fn stem(token: &str) -> String {
    if token.len() <= 4 || !token.chars().all(|c| c.is_alphabetic()) {
        return token.to_string();
    }
    for suffix in ["ations", "ation", "ings", "ing", "ies", "ed", "es", "ly", "s"] {
        if let Some(root) = token.strip_suffix(suffix) {
            if root.chars().count() >= 3 {
                return match suffix {
                    "ies" => format!("{root}y"),
                    _ => root.to_string(),
                };
            }
        }
    }
    token.to_string()
}

// ────────────────────────────────────────────────────────────────────────────
// Scorer
// ────────────────────────────────────────────────────────────────────────────

/// Keeps the first `max_tokens` whitespace-separated tokens.
pub fn truncate_tokens(text: &str, max_tokens: usize) -> String {
    text.split_whitespace()
        .take(max_tokens)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Cosine similarity clamped to `[0, 1]`. Zero vectors give 0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f64, EmbeddingError> {
    if a.len() != b.len() {
        return Err(EmbeddingError::DimensionMismatch {
            left: a.len(),
            right: b.len(),
        });
    }
    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (x, y) in a.iter().zip(b) {
        let (x, y) = (*x as f64, *y as f64);
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }
    Ok((dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(0.0, 1.0))
}

/// Scores resume/job relevance on a 0–100 scale. Symmetric in its inputs.
#[derive(Clone)]
pub struct RelevanceScorer {
    embedder: Arc<dyn Embedder>,
}

impl RelevanceScorer {
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self { embedder }
    }

    pub fn model_name(&self) -> &str {
        self.embedder.model_name()
    }

    /// Embeds the truncated text. `None` for blank input, which never reaches
    /// the backend.
    pub async fn embed(&self, text: &str) -> Result<Option<Vec<f32>>, EmbeddingError> {
        let truncated = truncate_tokens(text, self.embedder.max_input_tokens());
        if truncated.is_empty() {
            return Ok(None);
        }
        self.embedder.embed(&truncated).await.map(Some)
    }

    pub async fn score(&self, resume_text: &str, job_text: &str) -> Result<f64, EmbeddingError> {
        let (resume, job) = tokio::try_join!(self.embed(resume_text), self.embed(job_text))?;
        score_vectors(resume.as_deref(), job.as_deref())
    }

    /// Scores against a job vector embedded earlier (see `embed`).
    pub async fn score_against(
        &self,
        resume_text: &str,
        job_vector: Option<&[f32]>,
    ) -> Result<f64, EmbeddingError> {
        if job_vector.is_none() {
            return Ok(0.0);
        }
        let resume = self.embed(resume_text).await?;
        score_vectors(resume.as_deref(), job_vector)
    }
}

fn score_vectors(a: Option<&[f32]>, b: Option<&[f32]>) -> Result<f64, EmbeddingError> {
    match (a, b) {
        (Some(a), Some(b)) => {
            let similarity = cosine_similarity(a, b)?;
            Ok((similarity * 10_000.0).round() / 100.0)
        }
        _ => Ok(0.0),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn scorer() -> RelevanceScorer {
        RelevanceScorer::new(Arc::new(HashingEmbedder::default()))
    }

    /// Counts calls so tests can check what reaches the backend.
    struct CountingEmbedder {
        calls: AtomicUsize,
        inputs: std::sync::Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Embedder for CountingEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inputs.lock().unwrap().push(text.to_string());
            Ok(vec![1.0, 0.0])
        }
        fn model_name(&self) -> &str {
            "counting"
        }
        fn max_input_tokens(&self) -> usize {
            3
        }
    }

    #[tokio::test]
    async fn test_identical_text_scores_full() {
        let text = "Senior backend engineer building distributed systems in Rust";
        let score = scorer().score(text, text).await.unwrap();
        assert!((score - 100.0).abs() < 0.01, "got {score}");
    }

    #[tokio::test]
    async fn test_related_text_beats_unrelated_text() {
        let job = "Backend engineer for distributed systems, Python, Kubernetes, microservices";
        let related = "Built distributed systems and microservices in Python on Kubernetes";
        let unrelated = "Pastry chef experienced in cooking, baking bread and menu planning";
        let s = scorer();
        let related_score = s.score(related, job).await.unwrap();
        let unrelated_score = s.score(unrelated, job).await.unwrap();
        assert!(
            related_score > unrelated_score,
            "{related_score} <= {unrelated_score}"
        );
        assert!(related_score > 20.0);
    }

    #[tokio::test]
    async fn test_score_is_symmetric_and_bounded() {
        let a = "rust tokio axum postgres";
        let b = "python django postgres redis";
        let s = scorer();
        let ab = s.score(a, b).await.unwrap();
        let ba = s.score(b, a).await.unwrap();
        assert_eq!(ab, ba);
        assert!((0.0..=100.0).contains(&ab));
    }

    #[tokio::test]
    async fn test_empty_text_scores_zero_without_calling_backend() {
        let embedder = Arc::new(CountingEmbedder {
            calls: AtomicUsize::new(0),
            inputs: Default::default(),
        });
        let s = RelevanceScorer::new(embedder.clone());
        assert_eq!(s.score("", "some job").await.unwrap(), 0.0);
        assert_eq!(s.score("   \n", "").await.unwrap(), 0.0);
        assert_eq!(embedder.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_input_is_truncated_to_backend_limit() {
        let embedder = Arc::new(CountingEmbedder {
            calls: AtomicUsize::new(0),
            inputs: Default::default(),
        });
        let s = RelevanceScorer::new(embedder.clone());
        s.embed("one two three four five").await.unwrap();
        assert_eq!(embedder.inputs.lock().unwrap()[0], "one two three");
    }

    #[test]
    fn test_cosine_similarity_edges() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]).unwrap(), 0.0);
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]).unwrap(), 0.0);
        assert!(matches!(
            cosine_similarity(&[1.0], &[1.0, 0.0]),
            Err(EmbeddingError::DimensionMismatch { left: 1, right: 2 })
        ));
    }

    #[test]
    fn test_stem_collapses_inflections() {
        assert_eq!(stem("engineering"), stem("engineers"));
        assert_eq!(stem("technologies"), "technology");
        assert_eq!(stem("rust"), "rust");
        assert_eq!(stem("node.js"), "node.js");
    }

    #[test]
    fn test_vectorize_is_unit_length_or_zero() {
        let e = HashingEmbedder::default();
        let v = e.vectorize("distributed systems engineer");
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-4);
        assert!(e.vectorize("the and of").iter().all(|x| *x == 0.0));
    }
}
