//! Prediction output types and the decision rule.

use serde::{Deserialize, Serialize};

/// Final approval decision for a loan application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoanStatus {
    Approved,
    Rejected,
}

/// Fixed decision threshold applied to scalar classifier scores.
pub const DECISION_THRESHOLD: f64 = 0.5;

/// Raw classifier output, before the decision rule is applied.
///
/// The two variants mirror what trained classifiers actually expose:
/// per-class probabilities (index 1 = approved, matching the training
/// label encoding) or a single P(approved) score.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassifierOutput {
    Probabilities(Vec<f64>),
    Score(f64),
}

/// Prediction returned on the inference request boundary.
///
/// Created per request, never persisted by this service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    /// Approval decision
    pub prediction: LoanStatus,

    /// Probability mass assigned to the predicted class (0.0 - 1.0)
    pub confidence: f64,
}

impl Prediction {
    /// Apply the decision rule to a classifier output.
    ///
    /// Probabilities take the arg-max class with that class's probability as
    /// confidence. A scalar score is thresholded: score >= threshold means
    /// Approved with confidence = score, otherwise Rejected with
    /// confidence = 1 - score.
    pub fn from_output(output: &ClassifierOutput, threshold: f64) -> Self {
        match output {
            ClassifierOutput::Probabilities(probs) => {
                if probs.len() < 2 {
                    // Degenerate single-probability output, treat as a score
                    return Self::from_score(probs.first().copied().unwrap_or(0.0), threshold);
                }
                let (class, confidence) = probs
                    .iter()
                    .copied()
                    .enumerate()
                    .fold((0, f64::MIN), |best, (i, p)| {
                        if p > best.1 {
                            (i, p)
                        } else {
                            best
                        }
                    });
                let prediction = if class == 1 {
                    LoanStatus::Approved
                } else {
                    LoanStatus::Rejected
                };
                Self {
                    prediction,
                    confidence: confidence.clamp(0.0, 1.0),
                }
            }
            ClassifierOutput::Score(score) => Self::from_score(*score, threshold),
        }
    }

    fn from_score(score: f64, threshold: f64) -> Self {
        let score = score.clamp(0.0, 1.0);
        if score >= threshold {
            Self {
                prediction: LoanStatus::Approved,
                confidence: score,
            }
        } else {
            Self {
                prediction: LoanStatus::Rejected,
                confidence: 1.0 - score,
            }
        }
    }
}
