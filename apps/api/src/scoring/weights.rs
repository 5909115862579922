use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum WeightsError {
    #[error("weight '{name}' must be a non-negative number, got {value}")]
    InvalidWeight { name: &'static str, value: f64 },

    #[error("at least one weight must be positive")]
    AllZero,

    #[error("experience cap must be positive, got {0}")]
    InvalidExperienceCap(f64),
}

/// Relative importance of each sub-score in the composite.
///
/// Weights are applied to 0–100 sub-scores. With `renormalize` on, the
/// weighted sum is divided by the sum of weights so the composite stays on the
/// 0–100 scale whatever the weights add up to. Otherwise it is divided by 100
/// and tops out at the weight total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub quality: f64,
    pub relevance: f64,
    pub experience: f64,
    pub location: f64,
    pub renormalize: bool,
    /// Years of experience at which the experience sub-score saturates.
    pub experience_cap_years: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            quality: 5.0,
            relevance: 50.0,
            experience: 10.0,
            location: 10.0,
            renormalize: true,
            experience_cap_years: 10.0,
        }
    }
}

impl ScoringWeights {
    pub fn total(&self) -> f64 {
        self.quality + self.relevance + self.experience + self.location
    }

    /// Rejects negative or non-finite weights and an all-zero set when
    /// renormalizing.
    pub fn validate(&self) -> Result<(), WeightsError> {
        let named = [
            ("quality", self.quality),
            ("relevance", self.relevance),
            ("experience", self.experience),
            ("location", self.location),
        ];
        for (name, value) in named {
            if !value.is_finite() || value < 0.0 {
                return Err(WeightsError::InvalidWeight { name, value });
            }
        }
        if self.renormalize && self.total() == 0.0 {
            return Err(WeightsError::AllZero);
        }
        if !self.experience_cap_years.is_finite() || self.experience_cap_years <= 0.0 {
            return Err(WeightsError::InvalidExperienceCap(self.experience_cap_years));
        }
        Ok(())
    }

    /// Linear map from years to 0–100, saturating at the cap.
    pub fn experience_score(&self, years: f64) -> f64 {
        if years <= 0.0 || !years.is_finite() {
            return 0.0;
        }
        (years.min(self.experience_cap_years) / self.experience_cap_years * 100.0).clamp(0.0, 100.0)
    }

    /// Weighted combination of the four sub-scores, rounded to 2 decimals.
    pub fn combine(&self, quality: f64, relevance: f64, experience: f64, location: f64) -> f64 {
        let weighted = self.quality * quality
            + self.relevance * relevance
            + self.experience * experience
            + self.location * location;
        let total = self.total();
        let composite = if self.renormalize && total > 0.0 {
            weighted / total
        } else {
            weighted / 100.0
        };
        round2(composite)
    }
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights() {
        let w = ScoringWeights::default();
        assert_eq!(w.total(), 75.0);
        assert!(w.renormalize);
        assert!(w.validate().is_ok());
    }

    #[test]
    fn test_combine_renormalizes_to_100_scale() {
        let w = ScoringWeights::default();
        assert_eq!(w.combine(100.0, 100.0, 100.0, 100.0), 100.0);
        assert_eq!(w.combine(0.0, 0.0, 0.0, 0.0), 0.0);
        // (5*80 + 50*60 + 10*50 + 10*100) / 75 = 4900 / 75
        assert_eq!(w.combine(80.0, 60.0, 50.0, 100.0), 65.33);
    }

    #[test]
    fn test_combine_without_renormalization_tops_out_at_weight_total() {
        let w = ScoringWeights {
            renormalize: false,
            ..Default::default()
        };
        assert_eq!(w.combine(100.0, 100.0, 100.0, 100.0), 75.0);
        assert_eq!(w.combine(0.0, 40.0, 0.0, 0.0), 20.0);
    }

    #[test]
    fn test_combine_is_monotonic_in_each_input() {
        let w = ScoringWeights::default();
        let base = w.combine(50.0, 50.0, 50.0, 50.0);
        assert!(w.combine(60.0, 50.0, 50.0, 50.0) > base);
        assert!(w.combine(50.0, 60.0, 50.0, 50.0) > base);
        assert!(w.combine(50.0, 50.0, 60.0, 50.0) > base);
        assert!(w.combine(50.0, 50.0, 50.0, 60.0) > base);
    }

    #[test]
    fn test_experience_score_saturates_at_cap() {
        let w = ScoringWeights::default();
        assert_eq!(w.experience_score(0.0), 0.0);
        assert_eq!(w.experience_score(5.0), 50.0);
        assert_eq!(w.experience_score(10.0), 100.0);
        assert_eq!(w.experience_score(25.0), 100.0);
        assert_eq!(w.experience_score(-3.0), 0.0);
    }

    #[test]
    fn test_validate_rejects_bad_weights() {
        let negative = ScoringWeights {
            quality: -1.0,
            ..Default::default()
        };
        assert_eq!(
            negative.validate(),
            Err(WeightsError::InvalidWeight {
                name: "quality",
                value: -1.0
            })
        );

        let zero = ScoringWeights {
            quality: 0.0,
            relevance: 0.0,
            experience: 0.0,
            location: 0.0,
            ..Default::default()
        };
        assert_eq!(zero.validate(), Err(WeightsError::AllZero));

        let no_cap = ScoringWeights {
            experience_cap_years: 0.0,
            ..Default::default()
        };
        assert_eq!(no_cap.validate(), Err(WeightsError::InvalidExperienceCap(0.0)));
    }
}
