use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

/// The supported model families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    LogisticRegression,
    Mlp,
}

/// How a parameter group should be treated during initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupRole {
    Weight,
    Bias,
}

/// A single named block of parameters inside a flat vector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamGroup {
    pub name: String,
    pub len: usize,
    pub role: GroupRole,
}

impl ParamGroup {
    fn new(name: &str, len: usize, role: GroupRole) -> Self {
        Self {
            name: name.to_string(),
            len,
            role,
        }
    }
}

/// Immutable descriptor of a model's parameters.
///
/// The declared group order is the sole basis for flatten/reconstruct
/// correctness: every producer and consumer of a flat vector for a given
/// model must work from the same shape, which the coordinator distributes
/// inside the contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelShape {
    pub kind: ModelKind,
    pub groups: Vec<ParamGroup>,
}

impl ModelShape {
    /// Shape for a binary logistic regression over `input_size` features.
    ///
    /// Flat layout: `[beta (input_size), beta_0 (1)]`.
    pub fn logistic_regression(input_size: NonZeroUsize) -> Self {
        Self {
            kind: ModelKind::LogisticRegression,
            groups: vec![
                ParamGroup::new("beta", input_size.get(), GroupRole::Weight),
                ParamGroup::new("beta_0", 1, GroupRole::Bias),
            ],
        }
    }

    /// Shape for a one-hidden-layer MLP with a single output unit.
    ///
    /// Flat layout: `[w_ih (input*hidden), b_h (hidden), w_ho (hidden), b_o (1)]`.
    pub fn mlp(input_size: NonZeroUsize, hidden_size: NonZeroUsize) -> Self {
        let (input, hidden) = (input_size.get(), hidden_size.get());

        Self {
            kind: ModelKind::Mlp,
            groups: vec![
                ParamGroup::new("w_ih", input * hidden, GroupRole::Weight),
                ParamGroup::new("b_h", hidden, GroupRole::Bias),
                ParamGroup::new("w_ho", hidden, GroupRole::Weight),
                ParamGroup::new("b_o", 1, GroupRole::Bias),
            ],
        }
    }

    /// The only valid length for a flat vector of this shape.
    pub fn total_len(&self) -> usize {
        self.groups.iter().map(|g| g.len).sum()
    }
}
