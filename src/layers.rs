//! Dense layer implementation with weights and bias.
use crate::activations::SymmetricSigmoid;
use rand::rngs::StdRng;
use rand::Rng;

/// Matrix type
pub type Matrix = Vec<Vec<f64>>;

/// A fully-connected (dense) layer. Weights are `[output_size][input_size]`.
/// The activation lives on the network, not the layer, because one (alpha,
/// beta) pair is shared by every layer.
#[derive(Debug, Clone)]
pub struct DenseLayer {
    pub weights: Matrix,
    pub bias: Vec<f64>,
}

impl DenseLayer {
    /// Create a new dense layer using He (Kaiming) uniform initialization
    /// drawn from the caller's seeded generator, and small positive bias.
    pub fn new(input_size: usize, output_size: usize, rng: &mut StdRng) -> Self {
        // He uniform: U(-sqrt(6/fan_in), sqrt(6/fan_in))
        let limit = (6.0f64 / (input_size as f64)).sqrt();
        let weights: Matrix = (0..output_size)
            .map(|_| {
                (0..input_size)
                    .map(|_| rng.gen_range(-limit..limit))
                    .collect()
            })
            .collect();
        let bias = vec![0.01; output_size];
        Self { weights, bias }
    }

    pub fn input_size(&self) -> usize {
        self.weights.first().map_or(0, |row| row.len())
    }

    pub fn output_size(&self) -> usize {
        self.bias.len()
    }

    /// Forward pass: pre-activations `z = W·x + b` and activations `a = f(z)`.
    pub fn forward(&self, input: &[f64], act: &SymmetricSigmoid) -> (Vec<f64>, Vec<f64>) {
        let z: Vec<f64> = self
            .weights
            .iter()
            .zip(&self.bias)
            .map(|(row, &b)| row.iter().zip(input).map(|(&w, &i)| w * i).sum::<f64>() + b)
            .collect();
        let a: Vec<f64> = z.iter().map(|&val| act.apply(val)).collect();
        (z, a)
    }

    /// Parameter update: `W -= lr * (dz ⊗ input)`, `b -= lr * dz`.
    pub fn update(&mut self, input: &[f64], dz: &[f64], lr: f64) {
        for (b, &d) in self.bias.iter_mut().zip(dz) {
            *b -= lr * d;
        }
        for (i, row) in self.weights.iter_mut().enumerate() {
            for (j, w) in row.iter_mut().enumerate() {
                *w -= lr * dz[i] * input[j];
            }
        }
    }
}
