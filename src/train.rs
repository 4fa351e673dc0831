//! Hand-rolled training loop: full-batch gradient descent on a tiny regression set.

use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::autograd::{Graph, Value};
use crate::config::TrainConfig;
use crate::error::GradError;
use crate::loss::mse_loss;
use crate::nn::Mlp;

/// One training example: input features and a scalar target.
#[derive(Clone, Debug, PartialEq)]
pub struct Example {
    /// Model inputs, one per input feature.
    pub features: Vec<f64>,
    /// Expected model output.
    pub target: f64,
}

/// Four 3-feature examples with targets in {-1, 1}.
#[must_use]
pub fn toy_dataset() -> Vec<Example> {
    [
        ([2.0, 3.0, -1.0], 1.0),
        ([3.0, -1.0, 0.5], -1.0),
        ([0.5, 1.0, 1.0], -1.0),
        ([1.0, 1.0, -1.0], 1.0),
    ]
    .into_iter()
    .map(|(features, target)| Example {
        features: features.to_vec(),
        target,
    })
    .collect()
}

/// Outcome of [`run`].
#[derive(Clone, Debug)]
pub struct TrainReport {
    /// Loss at every epoch, measured before that epoch's update.
    pub losses: Vec<f64>,
    /// First model output per example after the last update.
    pub predictions: Vec<f64>,
    /// Number of trainable parameters.
    pub num_params: usize,
    /// Largest graph size seen during an epoch, parameters included.
    pub peak_graph_len: usize,
    /// Graph size after the last epoch's truncation.
    pub retained_graph_len: usize,
}

impl TrainReport {
    /// Loss of the last epoch, if any ran.
    #[must_use]
    pub fn final_loss(&self) -> Option<f64> {
        self.losses.last().copied()
    }
}

/// Trains on [`toy_dataset`].
///
/// # Errors
///
/// - [`GradError::Config`] if the config fails validation.
/// - [`GradError::LengthMismatch`] if `input_size` is not 3, the dataset's width.
pub fn run(config: &TrainConfig) -> Result<TrainReport, GradError> {
    run_on(config, &toy_dataset())
}

/// Trains an MLP on `data` with full-batch gradient descent.
///
/// Each epoch builds a fresh graph on top of the parameters, takes one step, and truncates
/// the graph back to the parameters, so memory does not grow with the number of epochs.
///
/// # Errors
///
/// - [`GradError::Config`] if the config fails validation.
/// - [`GradError::LengthMismatch`] if an example does not have `input_size` features.
/// - [`GradError::EmptyInput`] if `data` is empty.
pub fn run_on(config: &TrainConfig, data: &[Example]) -> Result<TrainReport, GradError> {
    config.validate()?;

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut graph = Graph::new();
    let model = Mlp::new(
        &graph,
        config.input_size,
        &config.layer_sizes,
        config.activation,
        &mut rng,
    )?;
    let mark = graph.len();
    info!("model: {model}");
    info!("num params: {}", model.num_params());

    let targets: Vec<f64> = data.iter().map(|e| e.target).collect();
    let mut losses = Vec::with_capacity(config.epochs);
    let mut peak_graph_len = graph.len();

    for epoch in 0..config.epochs {
        let loss_val = {
            let preds = predict(&graph, &model, data)?;
            let loss = mse_loss(&targets, &preds)?;
            model.zero_grad(&graph);
            loss.backward();
            model.step(&graph, config.learning_rate);
            loss.data()
        };
        debug!("epoch {} graph size: {} nodes", epoch + 1, graph.len());
        peak_graph_len = peak_graph_len.max(graph.len());
        graph.truncate(mark);

        losses.push(loss_val);
        if (epoch + 1) % config.log_every == 0 || epoch + 1 == config.epochs {
            info!("epoch {:4} / {:4} | loss {:.6}", epoch + 1, config.epochs, loss_val);
        }
    }

    let retained_graph_len = graph.len();
    let predictions = predict(&graph, &model, data)?
        .iter()
        .map(|p| p.data())
        .collect();

    Ok(TrainReport {
        losses,
        predictions,
        num_params: model.num_params(),
        peak_graph_len,
        retained_graph_len,
    })
}

/// First output of the model for every example.
fn predict<'g>(
    graph: &'g Graph,
    model: &Mlp,
    data: &[Example],
) -> Result<Vec<Value<'g>>, GradError> {
    data.iter()
        .map(|example| {
            let out = model.forward_raw(graph, &example.features)?;
            out.first().copied().ok_or(GradError::EmptyInput {
                context: "model output",
            })
        })
        .collect()
}
