//! Composite Ranking Engine — combines the four sub-scores into one comparable
//! number and orders candidates for a job.
//!
//! Per resume: normalize, then run relevance (async, possibly remote) alongside
//! the lexical signals (quality, experience, location). Across resumes the work
//! is spread over a `JoinSet`; the job description is embedded once.
//!
//! The engine is `Clone` and cheap to share: every part sits behind an `Arc`.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tokio::task::JoinSet;
use tracing::{debug, info};

use super::experience::{ExperienceExtractor, ExtractedProfile, SkillVocabulary};
use super::gazetteer::Gazetteer;
use super::location::{self, LocationMatch, LocationTier};
use super::normalizer::normalize_text;
use super::quality::{self, QualityReport};
use super::relevance::{Embedder, EmbeddingError, RelevanceScorer};
use super::weights::ScoringWeights;

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("embedding model unavailable: {0}")]
    EmbeddingUnavailable(#[from] EmbeddingError),

    #[error("scoring task failed: {0}")]
    TaskFailed(String),
}

// ────────────────────────────────────────────────────────────────────────────
// Input / output data models
// ────────────────────────────────────────────────────────────────────────────

/// The engine's view of a job.
#[derive(Debug, Clone)]
pub struct JobPosting {
    pub id: i64,
    pub description: String,
    pub location: String,
}

#[derive(Debug, Clone)]
pub struct Candidate {
    pub resume_id: i64,
    /// Raw extracted text; normalized by the engine.
    pub text: String,
    /// Supplied at upload. Falls back to a location found in the text.
    pub location: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub quality: f64,
    pub relevance: f64,
    pub experience: f64,
    pub location: f64,
    pub composite: f64,
    pub location_tier: LocationTier,
    pub profile: ExtractedProfile,
    pub embedding_model: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedCandidate {
    pub resume_id: i64,
    pub composite: f64,
    pub breakdown: ScoreBreakdown,
}

// ────────────────────────────────────────────────────────────────────────────
// Engine
// ────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct ScoringEngine {
    relevance: RelevanceScorer,
    extractor: Arc<ExperienceExtractor>,
    gazetteer: Arc<Gazetteer>,
    weights: Arc<ScoringWeights>,
}

impl ScoringEngine {
    pub fn new(
        embedder: Arc<dyn Embedder>,
        vocabulary: SkillVocabulary,
        weights: ScoringWeights,
    ) -> Self {
        Self {
            relevance: RelevanceScorer::new(embedder),
            extractor: Arc::new(ExperienceExtractor::new(vocabulary)),
            gazetteer: Arc::new(Gazetteer::default()),
            weights: Arc::new(weights),
        }
    }

    /// Replaces the experience extractor (e.g. one pinned to a reference date).
    pub fn with_extractor(mut self, extractor: ExperienceExtractor) -> Self {
        self.extractor = Arc::new(extractor);
        self
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    pub fn model_name(&self) -> &str {
        self.relevance.model_name()
    }

    pub fn evaluate_quality(&self, raw_text: &str) -> QualityReport {
        quality::evaluate_quality(&normalize_text(raw_text))
    }

    /// Skills, years of experience and the location mentioned in the text.
    pub fn extract_profile(&self, raw_text: &str) -> ExtractedProfile {
        let text = normalize_text(raw_text);
        let mut profile = self.extractor.extract(&text);
        profile.location = location::extract_location(&self.gazetteer, &text);
        profile
    }

    pub fn match_location(&self, candidate: &str, job: &str) -> LocationMatch {
        location::match_location(&self.gazetteer, candidate, job)
    }

    pub async fn score_relevance(
        &self,
        job_text: &str,
        resume_text: &str,
    ) -> Result<f64, ScoringError> {
        let score = self
            .relevance
            .score(&normalize_text(resume_text), &normalize_text(job_text))
            .await?;
        Ok(score)
    }

    /// Full breakdown for one resume against one job.
    pub async fn compute_composite(
        &self,
        job: &JobPosting,
        resume_text: &str,
        candidate_location: Option<&str>,
    ) -> Result<ScoreBreakdown, ScoringError> {
        let job_vector = self.relevance.embed(&normalize_text(&job.description)).await?;
        self.score_against(job, job_vector.as_deref(), resume_text, candidate_location)
            .await
    }

    /// Scores every candidate and orders them by composite, best first. Ties
    /// go to the lower resume id. Exactly one entry per candidate.
    pub async fn rank_candidates(
        &self,
        job: &JobPosting,
        candidates: Vec<Candidate>,
    ) -> Result<Vec<RankedCandidate>, ScoringError> {
        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        let job_vector = Arc::new(self.relevance.embed(&normalize_text(&job.description)).await?);
        let job = Arc::new(job.clone());
        let total = candidates.len();

        let mut set = JoinSet::new();
        for candidate in candidates {
            let engine = self.clone();
            let job = Arc::clone(&job);
            let job_vector = Arc::clone(&job_vector);
            set.spawn(async move {
                let breakdown = engine
                    .score_against(
                        &job,
                        job_vector.as_deref(),
                        &candidate.text,
                        candidate.location.as_deref(),
                    )
                    .await?;
                Ok::<_, ScoringError>(RankedCandidate {
                    resume_id: candidate.resume_id,
                    composite: breakdown.composite,
                    breakdown,
                })
            });
        }

        let mut ranked = Vec::with_capacity(total);
        while let Some(joined) = set.join_next().await {
            let entry = joined.map_err(|e| ScoringError::TaskFailed(e.to_string()))??;
            ranked.push(entry);
        }

        ranked.sort_by(|a, b| {
            b.composite
                .total_cmp(&a.composite)
                .then(a.resume_id.cmp(&b.resume_id))
        });

        info!(
            "Ranked {} candidates for job {} (top composite {:.2})",
            ranked.len(),
            job.id,
            ranked.first().map(|r| r.composite).unwrap_or(0.0)
        );

        Ok(ranked)
    }

    async fn score_against(
        &self,
        job: &JobPosting,
        job_vector: Option<&[f32]>,
        resume_text: &str,
        candidate_location: Option<&str>,
    ) -> Result<ScoreBreakdown, ScoringError> {
        let text = normalize_text(resume_text);

        let relevance = self.relevance.score_against(&text, job_vector);
        let lexical = async { self.lexical_signals(&text, job, candidate_location) };
        let (relevance, (quality, profile, location)) = tokio::join!(relevance, lexical);
        let relevance = relevance?;

        let experience = self.weights.experience_score(profile.years_experience);
        let composite = self
            .weights
            .combine(quality.score, relevance, experience, location.score);

        debug!(
            job_id = job.id,
            quality = quality.score,
            relevance,
            experience,
            location = location.score,
            composite,
            "Scored resume"
        );

        Ok(ScoreBreakdown {
            quality: quality.score,
            relevance,
            experience,
            location: location.score,
            composite,
            location_tier: location.tier,
            profile,
            embedding_model: self.model_name().to_string(),
        })
    }

    /// Quality, profile and location for already-normalized text.
    fn lexical_signals(
        &self,
        text: &str,
        job: &JobPosting,
        candidate_location: Option<&str>,
    ) -> (QualityReport, ExtractedProfile, LocationMatch) {
        let quality = quality::evaluate_quality(text);
        let mut profile = self.extractor.extract(text);

        profile.location = candidate_location
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .or_else(|| location::extract_location(&self.gazetteer, text));

        let location = location::match_location(
            &self.gazetteer,
            profile.location.as_deref().unwrap_or(""),
            &job.location,
        );

        (quality, profile, location)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
