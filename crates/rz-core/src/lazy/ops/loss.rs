use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::ir::Attrs;
use crate::lazy::op_kind::symbols;
use crate::lazy::ops::Operation;
use crate::lazy::{GraphContext, OpKind, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReductionMode {
    None,
    Mean,
    Sum,
}

impl ReductionMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ReductionMode::None => "none",
            ReductionMode::Mean => "mean",
            ReductionMode::Sum => "sum",
        }
    }
}

/// Operands are `grad_output, logits, labels` optionally followed by the
/// `weight, total_weight` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NllLossBackward {
    reduction: ReductionMode,
    ignore_index: i64,
}

impl NllLossBackward {
    pub fn new(reduction: ReductionMode, ignore_index: i64) -> Self {
        Self {
            reduction,
            ignore_index,
        }
    }

    pub fn reduction(&self) -> ReductionMode {
        self.reduction
    }

    pub fn ignore_index(&self) -> i64 {
        self.ignore_index
    }
}

impl Operation for NllLossBackward {
    fn kind(&self) -> OpKind {
        OpKind::new(symbols::NLL_LOSS_BACKWARD)
    }

    fn check_operands(&self, operands: &[Value]) -> Result<()> {
        match operands.len() {
            3 | 5 => Ok(()),
            count => Err(Error::invalid_operand(
                symbols::NLL_LOSS_BACKWARD,
                format!(
                    "expected 3 operands, or 5 with weight and total_weight, got {}",
                    count
                ),
            )),
        }
    }

    fn attrs(&self) -> Attrs {
        Attrs::new()
            .with("reduction", self.reduction.as_str())
            .with("ignore_index", self.ignore_index)
    }
}

impl GraphContext {
    #[allow(clippy::too_many_arguments)]
    pub fn nll_loss_backward(
        &self,
        grad_output: &Value,
        logits: &Value,
        labels: &Value,
        weight: Option<&Value>,
        total_weight: Option<&Value>,
        reduction: ReductionMode,
        ignore_index: i64,
    ) -> Result<Value> {
        let mut operands = vec![grad_output.clone(), logits.clone(), labels.clone()];
        match (weight, total_weight) {
            (Some(weight), Some(total_weight)) => {
                operands.push(weight.clone());
                operands.push(total_weight.clone());
            }
            (None, None) => {}
            _ => {
                return Err(Error::invalid_operand(
                    symbols::NLL_LOSS_BACKWARD,
                    "weight and total_weight must be given together",
                ))
            }
        }
        let op = NllLossBackward::new(reduction, ignore_index);
        Ok(Value::from(self.make_node(op, operands)?))
    }
}
