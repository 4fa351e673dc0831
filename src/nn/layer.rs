//! A fully connected layer of independent neurons.

use rand::Rng;
use rand_distr::Distribution;

use super::neuron::Neuron;
use crate::autograd::{Graph, NodeId, Value};
use crate::error::GradError;

/// `outputs` neurons sharing the same inputs, each with its own parameters.
#[derive(Clone, Debug)]
pub struct Layer {
    neurons: Vec<Neuron>,
}

impl Layer {
    /// Creates a layer mapping `features` inputs to `outputs` values.
    pub fn new<D, R>(graph: &Graph, features: usize, outputs: usize, init: &D, rng: &mut R) -> Self
    where
        D: Distribution<f64>,
        R: Rng + ?Sized,
    {
        Layer {
            neurons: (0..outputs)
                .map(|_| Neuron::new(graph, features, init, &mut *rng))
                .collect(),
        }
    }

    /// Builds a layer from existing neurons.
    #[must_use]
    pub fn from_neurons(neurons: Vec<Neuron>) -> Self {
        Layer { neurons }
    }

    /// Neurons in output order.
    #[must_use]
    pub fn neurons(&self) -> &[Neuron] {
        &self.neurons
    }

    /// Number of outputs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.neurons.len()
    }

    /// Whether the layer has no neurons.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.neurons.is_empty()
    }

    /// One output per neuron.
    ///
    /// # Errors
    ///
    /// [`GradError::LengthMismatch`] if `x` does not match the layer's input width.
    pub fn forward<'g>(
        &self,
        graph: &'g Graph,
        x: &[Value<'g>],
    ) -> Result<Vec<Value<'g>>, GradError> {
        self.neurons.iter().map(|n| n.forward(graph, x)).collect()
    }

    /// Parameters of every neuron, in neuron order.
    pub fn parameters(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.neurons.iter().flat_map(Neuron::parameters)
    }
}
