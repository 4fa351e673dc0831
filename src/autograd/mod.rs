//! Autograd: scalar computation graphs with reverse-mode differentiation.
//!
//! Nodes live in an arena ([`Graph`]) and are addressed by [`NodeId`]; [`Value`] is a
//! copyable handle used to build expressions with ordinary operators. Each node records
//! the [`Op`] that produced it, and [`Graph::backward`] walks the graph in reverse
//! topological order, dispatching on that tag to apply the chain rule.
//!
//! # Repeated operands
//!
//! When the same node appears in both slots of an operation (`a + a`, `a * a`), each slot
//! is a separate edge and contributes separately to `a`'s gradient. `a + a` therefore adds
//! `1 * grad` twice and `a * a` adds `a.data * grad` twice, giving `2` and `2a` with no
//! special casing. A per-node multiplier or a hard-coded factor of two for `self is other`
//! gets `a * a` (or a third use) wrong; neither is used here.
//!
//! # Gradient lifetime
//!
//! Gradients are plain accumulators. A backward pass seeds its root with 1.0 and adds into
//! everything else; resetting is the caller's job ([`Graph::zero_grad`]).

mod backward;
pub mod grad_check;
mod graph;
mod op;
mod value;

pub use graph::{Graph, NodeId};
pub use op::Op;
pub use value::{Operand, Value};

/// A differentiable scalar node in the computation graph.
///
/// Use [`ScalarNode::data`] for the forward value and [`ScalarNode::grad`] after
/// [`ScalarNode::backward`].
pub trait ScalarNode: Clone {
    /// Returns the forward pass value.
    fn data(&self) -> f64;

    /// Returns the gradient of the backward root with respect to this node.
    fn grad(&self) -> f64;

    /// Runs backpropagation from this node (e.g. the loss) to everything it depends on.
    fn backward(&self);

    /// Zeros the gradient at this node (e.g. after an optimizer step).
    fn zero_grad(&self);
}
