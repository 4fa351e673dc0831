//! Crate-level error type.
//!
//! Graph construction itself is infallible apart from [`GradError::UnsupportedOperand`];
//! the remaining variants come from the model, loss and configuration layers built on top.

use thiserror::Error;

use crate::config::ConfigError;

/// Errors produced by the engine and the layers that consume it.
///
/// # Variants
///
/// - **UnsupportedOperand**: an operation received an operand kind it cannot differentiate,
///   e.g. a node-valued exponent passed to [`Value::try_pow`](crate::autograd::Value::try_pow).
///   No node is created when this is returned.
/// - **LengthMismatch**: a list-of-scalars wrapper (neuron forward, loss) got inputs whose
///   lengths disagree.
/// - **EmptyInput**: a reduction (e.g. mean squared error) was asked to average nothing.
/// - **Init**: a parameter distribution could not be constructed.
/// - **Config**: configuration could not be loaded or failed validation.
#[derive(Debug, Error)]
pub enum GradError {
    /// The operation does not accept this operand kind.
    #[error("unsupported operand for {op}: {operand}")]
    UnsupportedOperand {
        /// Operation that rejected the operand (e.g. `"pow"`).
        op: &'static str,
        /// Description of the rejected operand.
        operand: String,
    },

    /// Two sequences that must pair up element-wise have different lengths.
    #[error("{context}: length mismatch, expected {expected}, got {actual}")]
    LengthMismatch {
        /// Where the mismatch was detected.
        context: &'static str,
        /// Length required by the receiver (e.g. number of weights).
        expected: usize,
        /// Length actually supplied.
        actual: usize,
    },

    /// A reduction received no elements.
    #[error("{context}: empty input")]
    EmptyInput {
        /// Where the empty input was detected.
        context: &'static str,
    },

    /// Parameter initialisation failed (e.g. invalid distribution bounds).
    #[error("parameter init: {0}")]
    Init(String),

    /// Configuration error.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
