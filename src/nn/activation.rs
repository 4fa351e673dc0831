//! Element-wise activations applied between layers.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::autograd::Value;

/// Nonlinearity applied to every output of a layer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Activation {
    /// Hyperbolic tangent.
    #[default]
    Tanh,
    /// Rectified linear unit.
    Relu,
    /// Tanh-approximate GELU.
    Gelu,
    /// No activation.
    Identity,
}

impl Activation {
    /// Applies the activation to one node.
    pub fn apply<'g>(self, x: Value<'g>) -> Value<'g> {
        match self {
            Activation::Tanh => x.tanh(),
            Activation::Relu => x.relu(),
            Activation::Gelu => x.gelu(),
            Activation::Identity => x,
        }
    }

    /// Lower-case name, as accepted by [`FromStr`].
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Activation::Tanh => "tanh",
            Activation::Relu => "relu",
            Activation::Gelu => "gelu",
            Activation::Identity => "identity",
        }
    }
}

impl fmt::Display for Activation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when parsing an unknown activation name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown activation {0:?} (expected tanh, relu, gelu or identity)")]
pub struct ParseActivationError(pub String);

impl FromStr for Activation {
    type Err = ParseActivationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tanh" => Ok(Activation::Tanh),
            "relu" => Ok(Activation::Relu),
            "gelu" => Ok(Activation::Gelu),
            "identity" | "none" => Ok(Activation::Identity),
            _ => Err(ParseActivationError(s.to_string())),
        }
    }
}
