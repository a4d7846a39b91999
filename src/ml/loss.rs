// ============================================================
// Layer 5 — Target Losses
// ============================================================
// Losses that compare a score matrix against a dense target
// distribution of the same shape [batch, num_entities].
//
//   SoftCrossEntropy — -Σ target · log_softmax(logits), mean over rows
//   MultiLabelBce    — binary cross entropy with logits, mean over cells
//
// Burn's CrossEntropyLoss takes class indices; multi-label rows
// need the probability-target form, so both are written here
// directly on tensors.

use std::fmt;
use std::str::FromStr;

use burn::{prelude::*, tensor::activation};
use serde::{Deserialize, Serialize};

/// A loss over a score matrix and a same-shaped target matrix.
/// Returns a single-element tensor.
pub trait TargetLoss<B: Backend> {
    fn forward(&self, logits: Tensor<B, 2>, targets: Tensor<B, 2>) -> Tensor<B, 1>;
}

/// Cross entropy against a (possibly multi-hot) target distribution.
#[derive(Debug, Clone, Copy, Default)]
pub struct SoftCrossEntropy;

impl<B: Backend> TargetLoss<B> for SoftCrossEntropy {
    fn forward(&self, logits: Tensor<B, 2>, targets: Tensor<B, 2>) -> Tensor<B, 1> {
        let log_probs = activation::log_softmax(logits, 1);
        (targets * log_probs).sum_dim(1).mean().neg()
    }
}

/// Independent sigmoid per entity.
#[derive(Debug, Clone, Copy, Default)]
pub struct MultiLabelBce;

impl<B: Backend> TargetLoss<B> for MultiLabelBce {
    fn forward(&self, logits: Tensor<B, 2>, targets: Tensor<B, 2>) -> Tensor<B, 1> {
        // log σ(x) for positives, log σ(-x) = log(1 - σ(x)) for negatives
        let pos = activation::log_sigmoid(logits.clone());
        let neg = activation::log_sigmoid(logits.neg());
        let not_targets = targets.clone().neg().add_scalar(1.0);
        (targets * pos + not_targets * neg).mean().neg()
    }
}

/// Loss selection as it appears in configuration files and flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LossKind {
    #[default]
    CrossEntropy,
    Bce,
}

impl<B: Backend> TargetLoss<B> for LossKind {
    fn forward(&self, logits: Tensor<B, 2>, targets: Tensor<B, 2>) -> Tensor<B, 1> {
        match self {
            LossKind::CrossEntropy => SoftCrossEntropy.forward(logits, targets),
            LossKind::Bce          => MultiLabelBce.forward(logits, targets),
        }
    }
}

impl fmt::Display for LossKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LossKind::CrossEntropy => f.write_str("cross-entropy"),
            LossKind::Bce          => f.write_str("bce"),
        }
    }
}

impl FromStr for LossKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cross-entropy" | "ce" => Ok(LossKind::CrossEntropy),
            "bce"                  => Ok(LossKind::Bce),
            other => Err(format!("unknown loss '{other}', expected cross-entropy | bce")),
        }
    }
}
