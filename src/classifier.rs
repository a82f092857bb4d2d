//! Label decoding and accuracy reporting on top of a trained model.
use crate::dataset::Dataset;
use crate::error::{Error, Result};
use crate::network::MlpModel;

/// One evaluated sample: the continuous score, the decoded label, and the
/// ground truth.
#[derive(Debug, Clone, Copy)]
pub struct Prediction {
    pub score: f64,
    pub predicted: i64,
    pub actual: usize,
}

/// Per-sample predictions plus the aggregate hit count.
#[derive(Debug, Clone)]
pub struct EvalReport {
    pub predictions: Vec<Prediction>,
    pub correct: usize,
}

impl EvalReport {
    /// Fraction of correct predictions in [0, 1]. An empty report counts
    /// as 0.0, never NaN.
    pub fn accuracy(&self) -> f64 {
        if self.predictions.is_empty() {
            return 0.0;
        }
        self.correct as f64 / self.predictions.len() as f64
    }

    pub fn accuracy_percent(&self) -> f64 {
        self.accuracy() * 100.0
    }
}

/// Read-only wrapper turning a model's scalar score into a class label.
///
/// The decoding rule is round-to-nearest with no range clamp: an input far
/// from every training class can decode to an integer outside the valid
/// class range, and that is surfaced as-is.
#[derive(Debug, Clone, Copy)]
pub struct Classifier<'m> {
    model: &'m MlpModel,
}

impl<'m> Classifier<'m> {
    pub fn new(model: &'m MlpModel) -> Self {
        Self { model }
    }

    /// The continuous prediction score for one feature vector.
    pub fn score(&self, features: &[f64]) -> Result<f64> {
        self.model.forward(features)
    }

    /// The decoded class label: score rounded to the nearest integer.
    pub fn predict(&self, features: &[f64]) -> Result<i64> {
        Ok(self.score(features)?.round() as i64)
    }

    /// Evaluate every sample of a labeled dataset.
    pub fn evaluate(&self, dataset: &Dataset) -> Result<EvalReport> {
        if dataset.is_empty() {
            return Err(Error::EmptyDataset);
        }
        let mut predictions = Vec::with_capacity(dataset.len());
        let mut correct = 0;
        for sample in dataset.samples() {
            let score = self.score(&sample.features)?;
            let predicted = score.round() as i64;
            if predicted == sample.label as i64 {
                correct += 1;
            }
            predictions.push(Prediction {
                score,
                predicted,
                actual: sample.label,
            });
        }
        let report = EvalReport {
            predictions,
            correct,
        };
        tracing::info!(
            samples = report.predictions.len(),
            correct = report.correct,
            accuracy_percent = report.accuracy_percent(),
            "evaluation finished"
        );
        Ok(report)
    }
}
