//! # nodegrad
//!
//! Minimal reverse-mode automatic differentiation over scalar nodes. Expressions are built
//! with ordinary operators on [`autograd::Value`] handles into an arena-backed
//! [`autograd::Graph`]; one `backward()` call fills in the gradient of every node the
//! result depends on. A toy MLP, an MSE loss and a training loop sit on top as consumers.

pub mod autograd;
pub mod config;
pub mod error;
pub mod loss;
pub mod nn;
pub mod train;

pub use autograd::{Graph, NodeId, Op, Operand, ScalarNode, Value};
pub use error::GradError;
