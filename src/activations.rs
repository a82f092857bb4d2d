//! Symmetric sigmoid activation used at every layer of the network.
use serde::{Deserialize, Serialize};

/// Symmetric sigmoid `f(x) = alpha * tanh(beta * x)`, bounded in
/// (-alpha, alpha). The pair (alpha, beta) is fixed per model and travels
/// with the persisted form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SymmetricSigmoid {
    pub alpha: f64,
    pub beta: f64,
}

impl Default for SymmetricSigmoid {
    /// Classic constants from the symmetric-sigmoid MLP literature.
    fn default() -> Self {
        Self {
            alpha: 1.7159,
            beta: 2.0 / 3.0,
        }
    }
}

impl SymmetricSigmoid {
    pub fn apply(&self, x: f64) -> f64 {
        self.alpha * (self.beta * x).tanh()
    }

    /// `f'(x) = alpha * beta * (1 - tanh^2(beta * x))`
    pub fn derivative(&self, x: f64) -> f64 {
        let t = (self.beta * x).tanh();
        self.alpha * self.beta * (1.0 - t * t)
    }
}
