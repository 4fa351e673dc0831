//! Scalar node handles and the operations that build the graph.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Add, Div, Mul, Neg, Sub};

use crate::autograd::ScalarNode;
use crate::error::GradError;

use super::graph::{Graph, NodeId};
use super::op::{self, Op};

/// Handle to a scalar node in a [`Graph`].
///
/// Cheap to copy. Equality and hashing are by identity (same graph, same node), never by
/// value: two leaves holding `2.0` are different nodes.
#[derive(Clone, Copy)]
pub struct Value<'g> {
    graph: &'g Graph,
    id: NodeId,
}

/// Right-hand side of an operation: an existing node or a plain number.
///
/// Numbers are promoted to anonymous leaves in the receiver's graph.
#[derive(Clone, Copy, Debug)]
pub enum Operand<'g> {
    /// An existing node.
    Node(Value<'g>),
    /// A constant to be promoted to a leaf.
    Constant(f64),
}

impl<'g> From<Value<'g>> for Operand<'g> {
    fn from(v: Value<'g>) -> Self {
        Operand::Node(v)
    }
}

impl<'g> From<&Value<'g>> for Operand<'g> {
    fn from(v: &Value<'g>) -> Self {
        Operand::Node(*v)
    }
}

impl From<f64> for Operand<'_> {
    fn from(c: f64) -> Self {
        Operand::Constant(c)
    }
}

impl<'g> Value<'g> {
    pub(crate) fn from_parts(graph: &'g Graph, id: NodeId) -> Self {
        Value { graph, id }
    }

    /// Id of this node in its graph.
    #[must_use]
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The graph this node lives in.
    #[must_use]
    pub fn graph(&self) -> &'g Graph {
        self.graph
    }

    /// Forward value.
    #[must_use]
    pub fn data(&self) -> f64 {
        self.graph.data(self.id)
    }

    /// Overwrites the forward value (e.g. an SGD update on a parameter leaf).
    pub fn set_data(&self, data: f64) {
        self.graph.set_data(self.id, data);
    }

    /// Accumulated gradient; 0.0 until a backward pass reaches this node.
    #[must_use]
    pub fn grad(&self) -> f64 {
        self.graph.grad(self.id)
    }

    /// Sets this node's gradient to 0.0.
    pub fn zero_grad(&self) {
        self.graph.set_grad(self.id, 0.0);
    }

    /// Label, if set.
    #[must_use]
    pub fn label(&self) -> Option<String> {
        self.graph.label(self.id)
    }

    /// Sets the label and returns the same handle.
    #[must_use]
    pub fn with_label(self, label: impl Into<String>) -> Self {
        self.graph.set_label(self.id, label);
        self
    }

    /// Operation that produced this node.
    #[must_use]
    pub fn op(&self) -> Op {
        self.graph.op(self.id)
    }

    /// Operand handles in slot order; `a * a` lists `a` twice.
    #[must_use]
    pub fn operands(&self) -> Vec<Value<'g>> {
        self.graph
            .operands(self.id)
            .into_iter()
            .map(|id| Value::from_parts(self.graph, id))
            .collect()
    }

    /// Runs backpropagation from this node. See [`Graph::backward`].
    pub fn backward(&self) {
        self.graph.backward(self.id);
    }

    /// Resolves an operand to a node in this graph, promoting constants to leaves.
    fn lift(self, rhs: impl Into<Operand<'g>>) -> Value<'g> {
        match rhs.into() {
            Operand::Node(v) => {
                assert!(
                    self.id.graph == v.id.graph,
                    "operands {} and {} belong to different graphs",
                    self.id,
                    v.id
                );
                v
            }
            Operand::Constant(c) => self.graph.leaf(c),
        }
    }

    fn derive(self, data: f64, op: Op) -> Value<'g> {
        let id = self.graph.push(data, op, None);
        Value::from_parts(self.graph, id)
    }

    /// `self + rhs`.
    pub fn add(self, rhs: impl Into<Operand<'g>>) -> Value<'g> {
        let rhs = self.lift(rhs);
        self.derive(self.data() + rhs.data(), Op::Add(self.id, rhs.id))
    }

    /// `self * rhs`.
    pub fn mul(self, rhs: impl Into<Operand<'g>>) -> Value<'g> {
        let rhs = self.lift(rhs);
        self.derive(self.data() * rhs.data(), Op::Mul(self.id, rhs.id))
    }

    /// `-self`, as `self * -1`.
    pub fn neg(self) -> Value<'g> {
        self.mul(-1.0)
    }

    /// `self - rhs`, as `self + (-rhs)`.
    pub fn sub(self, rhs: impl Into<Operand<'g>>) -> Value<'g> {
        let rhs = self.lift(rhs);
        self.add(rhs.neg())
    }

    /// `self / rhs`, as `self * rhs ** -1`.
    pub fn div(self, rhs: impl Into<Operand<'g>>) -> Value<'g> {
        let rhs = self.lift(rhs);
        self.mul(rhs.pow(-1.0))
    }

    /// `self ** exp` for a constant exponent.
    ///
    /// A non-positive base with a fractional or negative exponent yields NaN or infinity;
    /// no domain check is made.
    pub fn pow(self, exp: f64) -> Value<'g> {
        self.derive(self.data().powf(exp), Op::Pow(self.id, exp))
    }

    /// `self ** exp`, rejecting node-valued exponents.
    ///
    /// # Errors
    ///
    /// [`GradError::UnsupportedOperand`] if `exp` is a node. Nothing is added to the graph
    /// in that case.
    pub fn try_pow(self, exp: impl Into<Operand<'g>>) -> Result<Value<'g>, GradError> {
        match exp.into() {
            Operand::Constant(k) => Ok(self.pow(k)),
            Operand::Node(v) => Err(GradError::UnsupportedOperand {
                op: "pow",
                operand: format!("node {} (only constant exponents are supported)", v.id),
            }),
        }
    }

    /// Hyperbolic tangent.
    pub fn tanh(self) -> Value<'g> {
        self.derive(self.data().tanh(), Op::Tanh(self.id))
    }

    /// `max(0, self)`.
    pub fn relu(self) -> Value<'g> {
        self.derive(self.data().max(0.0), Op::Relu(self.id))
    }

    /// GELU, tanh approximation.
    pub fn gelu(self) -> Value<'g> {
        self.derive(op::gelu(self.data()), Op::Gelu(self.id))
    }

    /// `e^self`.
    pub fn exp(self) -> Value<'g> {
        self.derive(self.data().exp(), Op::Exp(self.id))
    }

    /// Natural log. Non-positive inputs give NaN or `-inf`, unguarded.
    pub fn log(self) -> Value<'g> {
        self.derive(self.data().ln(), Op::Log(self.id))
    }
}

impl ScalarNode for Value<'_> {
    fn data(&self) -> f64 {
        Value::data(self)
    }

    fn grad(&self) -> f64 {
        Value::grad(self)
    }

    fn backward(&self) {
        Value::backward(self);
    }

    fn zero_grad(&self) {
        Value::zero_grad(self);
    }
}

impl PartialEq for Value<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Value<'_> {}

impl Hash for Value<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Value(data={}, grad={}, label={}, op={})",
            self.data(),
            self.grad(),
            self.label().unwrap_or_default(),
            self.op().symbol()
        )
    }
}

impl fmt::Debug for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Value")
            .field("id", &self.id)
            .field("data", &self.data())
            .field("grad", &self.grad())
            .field("op", &self.op().symbol())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// std::ops — x + y, x - y, x * y, x / y, -x, with f64 on either side
// -----------------------------------------------------------------------------

macro_rules! impl_binary_op {
    ($trait:ident, $method:ident) => {
        impl<'g> $trait<Value<'g>> for Value<'g> {
            type Output = Value<'g>;

            fn $method(self, rhs: Value<'g>) -> Value<'g> {
                Value::$method(self, rhs)
            }
        }

        impl<'g> $trait<&Value<'g>> for &Value<'g> {
            type Output = Value<'g>;

            fn $method(self, rhs: &Value<'g>) -> Value<'g> {
                Value::$method(*self, *rhs)
            }
        }

        impl<'g> $trait<f64> for Value<'g> {
            type Output = Value<'g>;

            fn $method(self, rhs: f64) -> Value<'g> {
                Value::$method(self, rhs)
            }
        }
    };
}

impl_binary_op!(Add, add);
impl_binary_op!(Sub, sub);
impl_binary_op!(Mul, mul);
impl_binary_op!(Div, div);

impl<'g> Add<Value<'g>> for f64 {
    type Output = Value<'g>;

    fn add(self, rhs: Value<'g>) -> Value<'g> {
        rhs.add(self)
    }
}

impl<'g> Mul<Value<'g>> for f64 {
    type Output = Value<'g>;

    fn mul(self, rhs: Value<'g>) -> Value<'g> {
        rhs.mul(self)
    }
}

impl<'g> Sub<Value<'g>> for f64 {
    type Output = Value<'g>;

    fn sub(self, rhs: Value<'g>) -> Value<'g> {
        rhs.neg().add(self)
    }
}

impl<'g> Div<Value<'g>> for f64 {
    type Output = Value<'g>;

    fn div(self, rhs: Value<'g>) -> Value<'g> {
        rhs.pow(-1.0).mul(self)
    }
}

impl<'g> Neg for Value<'g> {
    type Output = Value<'g>;

    fn neg(self) -> Value<'g> {
        Value::neg(self)
    }
}

impl<'g> Neg for &Value<'g> {
    type Output = Value<'g>;

    fn neg(self) -> Value<'g> {
        Value::neg(*self)
    }
}
