//! Finite-difference gradient checking.
//!
//! The function under test builds its expression from leaf handles on a fresh graph.
//! Numerical partials use the forward difference `(f(x + eps) - f(x)) / eps`.

use thiserror::Error;

use super::graph::Graph;
use super::value::Value;

/// Failure of a gradient check.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GradCheckError {
    #[error("gradient mismatch at input {index}: analytical {analytical} vs numerical {numerical}")]
    GradientMismatch {
        /// Position of the offending input.
        index: usize,
        /// Gradient from the backward pass.
        analytical: f64,
        /// Finite-difference estimate.
        numerical: f64,
    },

    #[error("non-finite gradient at input {index}: {value}")]
    NonFinite {
        /// Position of the offending input.
        index: usize,
        /// The non-finite gradient.
        value: f64,
    },
}

fn forward<F>(f: &F, inputs: &[f64]) -> f64
where
    F: for<'g> Fn(&'g Graph, &[Value<'g>]) -> Value<'g>,
{
    let graph = Graph::new();
    let leaves: Vec<_> = inputs.iter().map(|&x| graph.leaf(x)).collect();
    let out = f(&graph, &leaves);
    out.data()
}

/// Gradients of `f` at `inputs` from a single backward pass.
pub fn analytical_gradient<F>(f: F, inputs: &[f64]) -> Vec<f64>
where
    F: for<'g> Fn(&'g Graph, &[Value<'g>]) -> Value<'g>,
{
    let graph = Graph::new();
    let leaves: Vec<_> = inputs.iter().map(|&x| graph.leaf(x)).collect();
    f(&graph, &leaves).backward();
    leaves.iter().map(Value::grad).collect()
}

/// Forward-difference estimate of the gradient of `f` at `inputs`.
pub fn numerical_gradient<F>(f: F, inputs: &[f64], eps: f64) -> Vec<f64>
where
    F: for<'g> Fn(&'g Graph, &[Value<'g>]) -> Value<'g>,
{
    let base = forward(&f, inputs);
    let mut shifted = inputs.to_vec();
    (0..inputs.len())
        .map(|i| {
            shifted[i] = inputs[i] + eps;
            let up = forward(&f, &shifted);
            shifted[i] = inputs[i];
            (up - base) / eps
        })
        .collect()
}

/// Compares analytical and numerical gradients of `f` at `inputs`.
///
/// # Errors
///
/// - [`GradCheckError::NonFinite`] if either estimate is NaN or infinite.
/// - [`GradCheckError::GradientMismatch`] for the first input whose estimates differ by
///   more than `tol`.
pub fn check_gradients<F>(f: F, inputs: &[f64], eps: f64, tol: f64) -> Result<(), GradCheckError>
where
    F: for<'g> Fn(&'g Graph, &[Value<'g>]) -> Value<'g>,
{
    let analytical = analytical_gradient(&f, inputs);
    let numerical = numerical_gradient(&f, inputs, eps);

    for (index, (&a, &n)) in analytical.iter().zip(numerical.iter()).enumerate() {
        if !a.is_finite() {
            return Err(GradCheckError::NonFinite { index, value: a });
        }
        if !n.is_finite() {
            return Err(GradCheckError::NonFinite { index, value: n });
        }
        if (a - n).abs() > tol {
            return Err(GradCheckError::GradientMismatch {
                index,
                analytical: a,
                numerical: n,
            });
        }
    }
    Ok(())
}
