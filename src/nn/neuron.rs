//! A single affine unit: `bias + sum(w_i * x_i)`.

use rand::Rng;
use rand_distr::Distribution;

use crate::autograd::{Graph, NodeId, Value};
use crate::error::GradError;

/// Weights and bias of one neuron, stored as parameter ids in the owning graph.
#[derive(Clone, Debug)]
pub struct Neuron {
    weights: Vec<NodeId>,
    bias: NodeId,
}

impl Neuron {
    /// Creates `features` weights and a bias as leaves in `graph`, sampled from `init`.
    pub fn new<D, R>(graph: &Graph, features: usize, init: &D, rng: &mut R) -> Self
    where
        D: Distribution<f64>,
        R: Rng + ?Sized,
    {
        let weights = (0..features)
            .map(|_| graph.leaf(init.sample(&mut *rng)).id())
            .collect();
        let bias = graph.leaf(init.sample(rng)).id();
        Neuron { weights, bias }
    }

    /// Builds a neuron from existing parameter nodes.
    #[must_use]
    pub fn from_parts(weights: Vec<NodeId>, bias: NodeId) -> Self {
        Neuron { weights, bias }
    }

    /// Weight ids, one per input feature.
    #[must_use]
    pub fn weights(&self) -> &[NodeId] {
        &self.weights
    }

    /// Bias id.
    #[must_use]
    pub fn bias(&self) -> NodeId {
        self.bias
    }

    /// Number of input features.
    #[must_use]
    pub fn features(&self) -> usize {
        self.weights.len()
    }

    /// Computes `bias + sum(w_i * x_i)`.
    ///
    /// # Errors
    ///
    /// [`GradError::LengthMismatch`] if `x` does not have one entry per weight.
    pub fn forward<'g>(&self, graph: &'g Graph, x: &[Value<'g>]) -> Result<Value<'g>, GradError> {
        if x.len() != self.weights.len() {
            return Err(GradError::LengthMismatch {
                context: "neuron forward",
                expected: self.weights.len(),
                actual: x.len(),
            });
        }
        let bias = graph.value(self.bias);
        Ok(self
            .weights
            .iter()
            .zip(x)
            .fold(bias, |acc, (&w, &xi)| acc + graph.value(w) * xi))
    }

    /// Weights followed by the bias.
    pub fn parameters(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.weights.iter().copied().chain(std::iter::once(self.bias))
    }
}
