//! Multilayer perceptron: a stack of layers, each followed by the same activation.

use std::fmt;

use log::debug;
use rand::Rng;
use rand_distr::Uniform;

use super::activation::Activation;
use super::layer::Layer;
use crate::autograd::{Graph, NodeId, Value};
use crate::error::GradError;

/// Bounds of the uniform distribution used for weights and biases.
const INIT_LOW: f64 = -1.0;
const INIT_HIGH: f64 = 1.0;

/// Stack of fully connected layers.
///
/// Parameters are leaves in the graph passed to [`Mlp::new`], held by id. Nodes created by
/// a forward pass sit above [`Graph::len`] as measured right after construction, so a
/// training loop can truncate back to that mark after each step.
#[derive(Clone, Debug)]
pub struct Mlp {
    input_size: usize,
    layers: Vec<Layer>,
    activation: Activation,
}

impl Mlp {
    /// Creates an MLP with `input_size` inputs and one layer per entry of `layer_sizes`.
    ///
    /// Weights and biases are drawn from Uniform(-1, 1).
    ///
    /// # Errors
    ///
    /// [`GradError::Init`] if the initialisation distribution cannot be built.
    pub fn new<R: Rng + ?Sized>(
        graph: &Graph,
        input_size: usize,
        layer_sizes: &[usize],
        activation: Activation,
        rng: &mut R,
    ) -> Result<Self, GradError> {
        let init =
            Uniform::new(INIT_LOW, INIT_HIGH).map_err(|e| GradError::Init(e.to_string()))?;

        let mut layers = Vec::with_capacity(layer_sizes.len());
        let mut features = input_size;
        for &outputs in layer_sizes {
            layers.push(Layer::new(graph, features, outputs, &init, rng));
            features = outputs;
        }

        let mlp = Mlp {
            input_size,
            layers,
            activation,
        };
        debug!("built {mlp} with {} parameters", mlp.num_params());
        Ok(mlp)
    }

    /// Builds an MLP from existing layers.
    #[must_use]
    pub fn from_layers(input_size: usize, layers: Vec<Layer>, activation: Activation) -> Self {
        Mlp {
            input_size,
            layers,
            activation,
        }
    }

    /// Layers in forward order.
    #[must_use]
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Activation applied after every layer.
    #[must_use]
    pub fn activation(&self) -> Activation {
        self.activation
    }

    /// Runs every layer, applying the activation to each output.
    ///
    /// # Errors
    ///
    /// [`GradError::LengthMismatch`] if `x` does not have `input_size` entries.
    pub fn forward<'g>(
        &self,
        graph: &'g Graph,
        x: &[Value<'g>],
    ) -> Result<Vec<Value<'g>>, GradError> {
        let mut x = x.to_vec();
        for layer in &self.layers {
            x = layer
                .forward(graph, &x)?
                .into_iter()
                .map(|v| self.activation.apply(v))
                .collect();
        }
        Ok(x)
    }

    /// Like [`Mlp::forward`], promoting raw inputs to leaves first.
    ///
    /// # Errors
    ///
    /// [`GradError::LengthMismatch`] if `x` does not have `input_size` entries.
    pub fn forward_raw<'g>(
        &self,
        graph: &'g Graph,
        x: &[f64],
    ) -> Result<Vec<Value<'g>>, GradError> {
        let leaves: Vec<_> = x.iter().map(|&xi| graph.leaf(xi)).collect();
        self.forward(graph, &leaves)
    }

    /// Every parameter id, layer by layer.
    #[must_use]
    pub fn parameters(&self) -> Vec<NodeId> {
        self.layers.iter().flat_map(Layer::parameters).collect()
    }

    /// Total number of parameters.
    #[must_use]
    pub fn num_params(&self) -> usize {
        self.layers.iter().map(|l| l.parameters().count()).sum()
    }

    /// Sets every parameter gradient to 0.0.
    pub fn zero_grad(&self, graph: &Graph) {
        graph.zero_grad(self.parameters());
    }

    /// Plain gradient descent: `value -= lr * grad` for every parameter.
    pub fn step(&self, graph: &Graph, lr: f64) {
        for p in self.parameters() {
            graph.set_data(p, graph.data(p) - lr * graph.grad(p));
        }
    }
}

impl fmt::Display for Mlp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MLP(")?;
        let mut features = self.input_size;
        for (i, layer) in self.layers.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "Layer({features} -> {}, {})", layer.len(), self.activation)?;
            features = layer.len();
        }
        write!(f, ")")
    }
}
