//! Multilayer perceptron with forward evaluation and persistence.
use crate::activations::SymmetricSigmoid;
use crate::error::{Error, Result};
use crate::layers::DenseLayer;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

/// Persisted-format version tag.
const MODEL_VERSION: u32 = 1;

/// Training method identifier recorded in the persisted model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrainMethod {
    Backprop,
}

/// Linear map between label space and the bounded activation range.
///
/// The output activation is confined to (-alpha, alpha), so class indices
/// beyond the first two would be unreachable as raw outputs. Training fits
/// this map from the label range and prediction inverts it:
/// `score = raw * scale + shift`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutputScale {
    pub scale: f64,
    pub shift: f64,
}

impl Default for OutputScale {
    fn default() -> Self {
        Self {
            scale: 1.0,
            shift: 0.0,
        }
    }
}

impl OutputScale {
    /// Fit the map so [min label, max label] covers ±0.95·alpha of raw
    /// output. A degenerate label range (single class) maps to raw 0.
    pub fn from_labels(labels: &[f64], alpha: f64) -> Self {
        let lo = labels.iter().copied().fold(f64::INFINITY, f64::min);
        let hi = labels.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mid = (hi + lo) / 2.0;
        let radius = (hi - lo) / 2.0;
        if radius > 0.0 {
            Self {
                scale: radius / (0.95 * alpha),
                shift: mid,
            }
        } else {
            Self {
                scale: 1.0,
                shift: mid,
            }
        }
    }

    /// Label space -> raw activation space.
    pub fn compress(&self, label: f64) -> f64 {
        (label - self.shift) / self.scale
    }

    /// Raw activation space -> label space.
    pub fn restore(&self, raw: f64) -> f64 {
        raw * self.scale + self.shift
    }
}

/// Feed-forward MLP: one dense layer per consecutive pair of `layer_sizes`,
/// symmetric sigmoid at every layer including the output.
#[derive(Debug, Clone)]
pub struct MlpModel {
    /// Ordered list of dense layers from input to output.
    pub layers: Vec<DenseLayer>,
    layer_sizes: Vec<usize>,
    activation: SymmetricSigmoid,
    train_method: TrainMethod,
    pub(crate) output_scale: OutputScale,
}

impl MlpModel {
    /// Create a model with small random weights drawn from `seed`.
    ///
    /// `layer_sizes` runs input-first, e.g. `[180, 60, 20, 1]`. The output
    /// layer must be a single neuron; the prediction score is a scalar.
    pub fn new(layer_sizes: &[usize], activation: SymmetricSigmoid, seed: u64) -> Result<Self> {
        validate_sizes(layer_sizes).map_err(Error::InvalidTopology)?;
        let mut rng = StdRng::seed_from_u64(seed);
        let layers = layer_sizes
            .windows(2)
            .map(|pair| DenseLayer::new(pair[0], pair[1], &mut rng))
            .collect();
        Ok(Self {
            layers,
            layer_sizes: layer_sizes.to_vec(),
            activation,
            train_method: TrainMethod::Backprop,
            output_scale: OutputScale::default(),
        })
    }

    pub fn layer_sizes(&self) -> &[usize] {
        &self.layer_sizes
    }

    pub fn input_size(&self) -> usize {
        self.layer_sizes[0]
    }

    pub fn activation(&self) -> &SymmetricSigmoid {
        &self.activation
    }

    pub fn train_method(&self) -> TrainMethod {
        self.train_method
    }

    pub fn output_scale(&self) -> &OutputScale {
        &self.output_scale
    }

    fn check_input(&self, input: &[f64]) -> Result<()> {
        if input.len() != self.input_size() {
            return Err(Error::ShapeMismatch {
                expected: self.input_size(),
                actual: input.len(),
            });
        }
        Ok(())
    }

    /// Forward pass from input to the scalar prediction score.
    ///
    /// Pure and bit-deterministic in (input, weights). The raw output
    /// activation is mapped back to label space through the output scale.
    pub fn forward(&self, input: &[f64]) -> Result<f64> {
        Ok(self.output_scale.restore(self.forward_raw(input)?))
    }

    /// Forward pass returning the raw output activation, before the output
    /// scale is applied. This is the value backprop trains against.
    pub(crate) fn forward_raw(&self, input: &[f64]) -> Result<f64> {
        self.check_input(input)?;
        let mut current = input.to_vec();
        for layer in &self.layers {
            let (_, a) = layer.forward(&current, &self.activation);
            current = a;
        }
        Ok(current[0])
    }

    /// Forward pass caching every layer's pre-activations and activations.
    /// `activations[0]` is the raw input; `zs[l]` pairs with layer `l`.
    pub(crate) fn forward_cached(&self, input: &[f64]) -> Result<(Vec<Vec<f64>>, Vec<Vec<f64>>)> {
        self.check_input(input)?;
        let mut activations = vec![input.to_vec()];
        let mut zs = Vec::with_capacity(self.layers.len());
        let mut current = input.to_vec();
        for layer in &self.layers {
            let (z, a) = layer.forward(&current, &self.activation);
            zs.push(z);
            activations.push(a.clone());
            current = a;
        }
        Ok((zs, activations))
    }

    /// Save to gzipped JSON.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let dto = ModelDto::from_model(self);
        let json = serde_json::to_vec(&dto)
            .map_err(|e| Error::ModelLoad(format!("serialize: {}", e)))?;
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = File::create(path)?;
        let mut enc = GzEncoder::new(file, Compression::default());
        enc.write_all(&json)?;
        enc.finish()?;
        Ok(())
    }

    /// Load from gzipped JSON. Every declared shape is validated before a
    /// model is constructed; a malformed file never yields a partial model.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let mut dec = GzDecoder::new(file);
        let mut buf = Vec::new();
        dec.read_to_end(&mut buf)
            .map_err(|e| Error::ModelLoad(format!("not a gzip stream: {}", e)))?;
        let dto: ModelDto = serde_json::from_slice(&buf)
            .map_err(|e| Error::ModelLoad(format!("malformed json: {}", e)))?;
        dto.into_model()
    }
}

impl fmt::Display for MlpModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MlpModel: {:?}", self.layer_sizes)
    }
}

fn validate_sizes(sizes: &[usize]) -> std::result::Result<(), String> {
    if sizes.len() < 2 {
        return Err(format!("need at least 2 layer sizes, got {}", sizes.len()));
    }
    if sizes.iter().any(|&s| s == 0) {
        return Err(format!("layer sizes must be positive: {:?}", sizes));
    }
    if *sizes.last().expect("nonempty") != 1 {
        return Err(format!(
            "output layer must be a single neuron, got {}",
            sizes.last().expect("nonempty")
        ));
    }
    Ok(())
}

// ============ Persistence DTOs ============

#[derive(Debug, Serialize, Deserialize)]
struct LayerDto {
    weights: Vec<Vec<f64>>, // [output_size][input_size]
    bias: Vec<f64>,         // [output_size]
}

#[derive(Debug, Serialize, Deserialize)]
struct ModelDto {
    version: u32,
    layer_sizes: Vec<usize>,
    activation: SymmetricSigmoid,
    train_method: TrainMethod,
    output_scale: OutputScale,
    layers: Vec<LayerDto>,
}

impl ModelDto {
    fn from_model(model: &MlpModel) -> Self {
        let layers = model
            .layers
            .iter()
            .map(|layer| LayerDto {
                weights: layer.weights.clone(),
                bias: layer.bias.clone(),
            })
            .collect();
        Self {
            version: MODEL_VERSION,
            layer_sizes: model.layer_sizes.clone(),
            activation: model.activation,
            train_method: model.train_method,
            output_scale: model.output_scale,
            layers,
        }
    }

    fn into_model(self) -> Result<MlpModel> {
        let fail = |msg: String| Err(Error::ModelLoad(msg));
        if self.version != MODEL_VERSION {
            return fail(format!("unsupported model version {}", self.version));
        }
        if let Err(msg) = validate_sizes(&self.layer_sizes) {
            return fail(msg);
        }
        if self.layers.len() != self.layer_sizes.len() - 1 {
            return fail(format!(
                "expected {} layers for sizes {:?}, got {}",
                self.layer_sizes.len() - 1,
                self.layer_sizes,
                self.layers.len()
            ));
        }
        if !(self.activation.alpha > 0.0 && self.activation.beta > 0.0) {
            return fail(format!(
                "activation scalars must be positive: alpha={}, beta={}",
                self.activation.alpha, self.activation.beta
            ));
        }
        for (idx, (pair, layer)) in self.layer_sizes.windows(2).zip(&self.layers).enumerate() {
            let (fan_in, fan_out) = (pair[0], pair[1]);
            if layer.weights.len() != fan_out {
                return fail(format!(
                    "layer {}: expected {} weight rows, got {}",
                    idx,
                    fan_out,
                    layer.weights.len()
                ));
            }
            if let Some(row) = layer.weights.iter().find(|row| row.len() != fan_in) {
                return fail(format!(
                    "layer {}: expected weight rows of length {}, got {}",
                    idx,
                    fan_in,
                    row.len()
                ));
            }
            if layer.bias.len() != fan_out {
                return fail(format!(
                    "layer {}: expected bias of length {}, got {}",
                    idx,
                    fan_out,
                    layer.bias.len()
                ));
            }
        }
        let layers = self
            .layers
            .into_iter()
            .map(|dto| DenseLayer {
                weights: dto.weights,
                bias: dto.bias,
            })
            .collect();
        Ok(MlpModel {
            layers,
            layer_sizes: self.layer_sizes,
            activation: self.activation,
            train_method: self.train_method,
            output_scale: self.output_scale,
        })
    }
}
