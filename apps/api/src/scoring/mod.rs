// Scoring core: pure analyzers plus the async composite engine.
// Nothing in here touches the database, the filesystem or HTTP; callers hand
// in raw text and job records.

pub mod engine;
pub mod experience;
pub mod gazetteer;
pub mod location;
pub mod normalizer;
pub mod quality;
pub mod relevance;
pub mod weights;

pub use engine::{Candidate, JobPosting, RankedCandidate, ScoreBreakdown, ScoringEngine, ScoringError};
pub use experience::{ExtractedProfile, SkillVocabulary};
pub use location::LocationMatch;
pub use quality::QualityReport;
pub use relevance::{Embedder, EmbeddingError, HashingEmbedder};
pub use weights::ScoringWeights;
