//! Fruit-image classification from hue histograms with a small backprop MLP:
//! feature extraction, dataset assembly, training, evaluation, persistence.
//!
//! - 180-bin hue histogram features from decoded BGR pixel grids
//! - MLP with symmetric sigmoid activation and per-sample SGD backprop
//! - Seeded weight init and epoch shuffling for reproducible runs
//! - Gzipped-JSON model persistence with shape-validated loading

pub mod activations;
pub mod classifier;
pub mod dataset;
pub mod error;
pub mod histogram;
pub mod layers;
pub mod metrics;
pub mod network;
pub mod trainer;

pub use activations::SymmetricSigmoid;
pub use classifier::{Classifier, EvalReport, Prediction};
pub use dataset::{Dataset, ImageSource, Sample};
pub use error::{Error, Result};
pub use histogram::{bgr_to_hue, hue_histogram, BgrImage, HIST_BINS};
pub use layers::DenseLayer;
pub use metrics::confusion_matrix;
pub use network::{MlpModel, OutputScale, TrainMethod};
pub use trainer::{StopReason, TermCriteria, TrainReport, Trainer};
