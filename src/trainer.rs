//! Backpropagation training loop.
use crate::dataset::Dataset;
use crate::error::{Error, Result};
use crate::network::{MlpModel, OutputScale};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Termination criteria: stop at `max_iter` epochs OR once the epoch mean
/// squared error drops to `epsilon`, whichever happens first.
#[derive(Debug, Clone, Copy)]
pub struct TermCriteria {
    pub max_iter: usize,
    pub epsilon: f64,
}

impl TermCriteria {
    pub fn new(max_iter: usize, epsilon: f64) -> Self {
        // A zero iteration bound would never run an epoch; one is the floor.
        Self {
            max_iter: max_iter.max(1),
            epsilon,
        }
    }
}

/// How a training run ended. Hitting the iteration bound is a normal
/// termination path, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The iteration bound was reached before the error threshold.
    IterLimit,
    /// The epoch mean squared error dropped to the threshold.
    EpsilonReached,
}

/// Outcome of one training run.
#[derive(Debug, Clone)]
pub struct TrainReport {
    pub epochs: usize,
    pub final_mse: f64,
    /// Mean squared error tracked once per epoch, in raw output space.
    pub epoch_mse: Vec<f64>,
    pub stop: StopReason,
}

/// Runs online gradient descent against a dataset, mutating the model in
/// place. Sample order is reshuffled every epoch from `seed`, so a run is
/// reproducible from (model seed, trainer seed).
#[derive(Debug, Clone, Copy)]
pub struct Trainer {
    pub learning_rate: f64,
    pub criteria: TermCriteria,
    pub seed: u64,
}

impl Trainer {
    pub fn new(learning_rate: f64, criteria: TermCriteria, seed: u64) -> Self {
        Self {
            learning_rate,
            criteria,
            seed,
        }
    }

    /// Train `model` on `dataset` until a termination bound triggers.
    ///
    /// Labels are compressed into the bounded activation range before
    /// fitting; the fitted [`OutputScale`] is stored on the model so that
    /// prediction restores label-space scores.
    pub fn train(&self, model: &mut MlpModel, dataset: &Dataset) -> Result<TrainReport> {
        if dataset.is_empty() {
            return Err(Error::EmptyDataset);
        }
        // Fail on a bad feature vector before touching any weights.
        for sample in dataset.samples() {
            if sample.features.len() != model.input_size() {
                return Err(Error::ShapeMismatch {
                    expected: model.input_size(),
                    actual: sample.features.len(),
                });
            }
        }

        let labels: Vec<f64> = dataset.samples().iter().map(|s| s.label as f64).collect();
        model.output_scale = OutputScale::from_labels(&labels, model.activation().alpha);
        let targets: Vec<f64> = labels
            .iter()
            .map(|&l| model.output_scale.compress(l))
            .collect();

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut indices: Vec<usize> = (0..dataset.len()).collect();
        let mut epoch_mse = Vec::new();

        // Re-apply the floor here in case the criteria were built literally.
        let max_iter = self.criteria.max_iter.max(1);
        for epoch in 1..=max_iter {
            indices.shuffle(&mut rng);
            let mut total_sq_err = 0.0;
            for &idx in &indices {
                let sample = &dataset.samples()[idx];
                let target = targets[idx];

                let (zs, activations) = model.forward_cached(&sample.features)?;
                let raw = activations.last().expect("at least one layer")[0];
                total_sq_err += (raw - target) * (raw - target);

                // Output delta from the squared-error derivative; hidden
                // deltas via W^T back-substitution and the chain rule.
                let act = *model.activation();
                let mut delta = vec![2.0 * (raw - target)];
                for layer_idx in (0..model.layers.len()).rev() {
                    let dz: Vec<f64> = delta
                        .iter()
                        .zip(&zs[layer_idx])
                        .map(|(&d, &z)| d * act.derivative(z))
                        .collect();
                    let a_prev = &activations[layer_idx];
                    // Propagate delta = W^T * dz before the weights move.
                    let mut next_delta = vec![0.0; a_prev.len()];
                    for (i, row) in model.layers[layer_idx].weights.iter().enumerate() {
                        for (j, &w) in row.iter().enumerate() {
                            next_delta[j] += w * dz[i];
                        }
                    }
                    model.layers[layer_idx].update(a_prev, &dz, self.learning_rate);
                    delta = next_delta;
                }
            }
            let mse = total_sq_err / dataset.len() as f64;
            epoch_mse.push(mse);
            tracing::debug!(epoch, mse, "epoch finished");

            if mse <= self.criteria.epsilon {
                tracing::info!(epoch, mse, "training stopped: error threshold reached");
                return Ok(TrainReport {
                    epochs: epoch,
                    final_mse: mse,
                    epoch_mse,
                    stop: StopReason::EpsilonReached,
                });
            }
        }

        let final_mse = *epoch_mse.last().expect("at least one epoch");
        tracing::info!(
            epochs = max_iter,
            final_mse,
            "training stopped: iteration bound reached"
        );
        Ok(TrainReport {
            epochs: max_iter,
            final_mse,
            epoch_mse,
            stop: StopReason::IterLimit,
        })
    }
}
