//! Operation tags and their local derivative rules.
//!
//! Every non-leaf node records the [`Op`] that produced it together with the ids of its
//! operands. The backward driver dispatches on the tag; there is no per-node closure.

use std::borrow::Cow;
use std::f64::consts::PI;

use super::graph::NodeId;

/// Coefficient of the cubic term in the tanh approximation of GELU.
const GELU_COEFF: f64 = 0.044_715;

/// The operation that produced a node, with its operand ids in slot order.
///
/// Operands keep their multiplicity: `a + a` is `Add(a, a)`, and the backward pass
/// visits both slots, so each use site contributes its own edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Op {
    /// Input or constant; no operands.
    Leaf,
    /// `lhs + rhs`.
    Add(NodeId, NodeId),
    /// `lhs * rhs`.
    Mul(NodeId, NodeId),
    /// `base ** exponent` with a constant exponent.
    Pow(NodeId, f64),
    /// Hyperbolic tangent.
    Tanh(NodeId),
    /// `max(0, x)`.
    Relu(NodeId),
    /// Tanh-approximate GELU.
    Gelu(NodeId),
    /// `e^x`.
    Exp(NodeId),
    /// Natural logarithm.
    Log(NodeId),
}

impl Op {
    /// Operand ids in slot order, repeated ids included.
    pub fn operands(&self) -> impl Iterator<Item = NodeId> {
        let (first, second) = match *self {
            Op::Leaf => (None, None),
            Op::Add(a, b) | Op::Mul(a, b) => (Some(a), Some(b)),
            Op::Pow(a, _) | Op::Tanh(a) | Op::Relu(a) | Op::Gelu(a) | Op::Exp(a) | Op::Log(a) => {
                (Some(a), None)
            }
        };
        first.into_iter().chain(second)
    }

    /// Whether this node has no operands.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        matches!(self, Op::Leaf)
    }

    /// Diagnostic operator tag (`"+"`, `"*"`, `"**2"`, `"tanh"`, ...). Empty for leaves.
    #[must_use]
    pub fn symbol(&self) -> Cow<'static, str> {
        match self {
            Op::Leaf => Cow::Borrowed(""),
            Op::Add(..) => Cow::Borrowed("+"),
            Op::Mul(..) => Cow::Borrowed("*"),
            Op::Pow(_, k) => Cow::Owned(format!("**{k}")),
            Op::Tanh(_) => Cow::Borrowed("tanh"),
            Op::Relu(_) => Cow::Borrowed("relu"),
            Op::Gelu(_) => Cow::Borrowed("gelu"),
            Op::Exp(_) => Cow::Borrowed("exp"),
            Op::Log(_) => Cow::Borrowed("log"),
        }
    }

    /// Local partial derivative of the output with respect to each operand slot.
    ///
    /// `out` is the node's own forward value and `value_of` reads an operand's forward
    /// value. One entry per slot; `Mul(a, a)` yields `a` twice, each with `a.value`.
    pub(crate) fn partials(
        &self,
        out: f64,
        value_of: impl Fn(NodeId) -> f64,
    ) -> [Option<(NodeId, f64)>; 2] {
        match *self {
            Op::Leaf => [None, None],
            Op::Add(a, b) => [Some((a, 1.0)), Some((b, 1.0))],
            Op::Mul(a, b) => [Some((a, value_of(b))), Some((b, value_of(a)))],
            Op::Pow(a, k) => [Some((a, k * value_of(a).powf(k - 1.0))), None],
            Op::Tanh(a) => [Some((a, 1.0 - out * out)), None],
            Op::Relu(a) => {
                let d = if value_of(a) > 0.0 { 1.0 } else { 0.0 };
                [Some((a, d)), None]
            }
            Op::Gelu(a) => [Some((a, gelu_derivative(value_of(a)))), None],
            Op::Exp(a) => [Some((a, out)), None],
            Op::Log(a) => [Some((a, 1.0 / value_of(a))), None],
        }
    }
}

fn gelu_inner(x: f64) -> f64 {
    (2.0 / PI).sqrt() * (x + GELU_COEFF * x.powi(3))
}

/// `0.5 * x * (1 + tanh(sqrt(2/pi) * (x + 0.044715 x^3)))`.
pub(crate) fn gelu(x: f64) -> f64 {
    0.5 * x * (1.0 + gelu_inner(x).tanh())
}

/// Product rule over `0.5 * x` and `1 + tanh(inner(x))`.
pub(crate) fn gelu_derivative(x: f64) -> f64 {
    let t = gelu_inner(x).tanh();
    let inner_prime = (2.0 / PI).sqrt() * (1.0 + 3.0 * GELU_COEFF * x * x);
    0.5 * (1.0 + t) + 0.5 * x * (1.0 - t * t) * inner_prime
}
