//! Loss functions over lists of scalar nodes.

use crate::autograd::{Operand, Value};
use crate::error::GradError;

/// Mean squared error: `sum((y_pred_i - y_true_i)^2) / n`.
///
/// Targets may be plain numbers or nodes; predictions are nodes, and the result lives in
/// their graph.
///
/// # Errors
///
/// - [`GradError::LengthMismatch`] if the two lists differ in length.
/// - [`GradError::EmptyInput`] if they are empty.
pub fn mse_loss<'g, T>(y_true: &[T], y_pred: &[Value<'g>]) -> Result<Value<'g>, GradError>
where
    T: Into<Operand<'g>> + Copy,
{
    if y_true.len() != y_pred.len() {
        return Err(GradError::LengthMismatch {
            context: "mse loss",
            expected: y_true.len(),
            actual: y_pred.len(),
        });
    }
    let Some((first, rest)) = y_pred.split_first() else {
        return Err(GradError::EmptyInput {
            context: "mse loss",
        });
    };

    let squared = |yp: Value<'g>, yt: T| yp.sub(yt).pow(2.0);
    let sum = rest
        .iter()
        .zip(&y_true[1..])
        .fold(squared(*first, y_true[0]), |acc, (&yp, &yt)| {
            acc + squared(yp, yt)
        });
    Ok(sum / y_pred.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    use crate::autograd::Graph;

    #[test]
    fn mse_of_perfect_predictions_is_zero() {
        let g = Graph::new();
        let preds = [g.leaf(1.0), g.leaf(-1.0)];
        let loss = mse_loss(&[1.0, -1.0], &preds).unwrap();
        assert_eq!(loss.data(), 0.0);
    }

    #[test]
    fn mse_value_and_gradient() {
        let g = Graph::new();
        let preds = [g.leaf(0.5), g.leaf(2.0)];
        let loss = mse_loss(&[1.0, 0.0], &preds).unwrap();
        // ((0.5-1)^2 + (2-0)^2) / 2
        assert_abs_diff_eq!(loss.data(), (0.25 + 4.0) / 2.0, epsilon = 1e-12);
        loss.backward();
        // d/dp (p - t)^2 / n = 2 (p - t) / n
        assert_abs_diff_eq!(preds[0].grad(), -0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(preds[1].grad(), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn mse_accepts_node_targets() {
        let g = Graph::new();
        let targets = [g.leaf(3.0)];
        let preds = [g.leaf(1.0)];
        let loss = mse_loss(&targets, &preds).unwrap();
        assert_eq!(loss.data(), 4.0);
        loss.backward();
        assert_abs_diff_eq!(targets[0].grad(), 4.0, epsilon = 1e-12);
    }

    #[test]
    fn mse_rejects_length_mismatch() {
        let g = Graph::new();
        let preds = [g.leaf(1.0)];
        let err = mse_loss(&[1.0, 2.0], &preds).unwrap_err();
        assert!(matches!(
            err,
            GradError::LengthMismatch {
                expected: 2,
                actual: 1,
                ..
            }
        ));
    }

    #[test]
    fn mse_rejects_empty_input() {
        let preds: [Value<'_>; 0] = [];
        let err = mse_loss::<f64>(&[], &preds).unwrap_err();
        assert!(matches!(err, GradError::EmptyInput { .. }));
    }
}
