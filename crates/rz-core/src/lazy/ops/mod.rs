//! Operator catalog for lazy nodes.
//!
//! Every operator is a variant of [`NodeOp`] carrying its construction-time
//! parameters. Behaviour is provided through the [`Operation`] capability
//! trait, so [`Node`](super::Node) never needs to know which operator it
//! wraps: it validates, hashes, describes and re-creates itself purely
//! through this interface.

use std::fmt::Debug;

use derive_more::From;

use crate::error::Result;
use crate::hash::{hash_value, HashValue};
use crate::ir::Attrs;
use crate::lazy::{OpKind, Shape, Value};

mod device_data;
mod gather;
mod generic;
mod loss;
mod pooling;
mod reduction;
mod softmax;
mod upsample;
mod view_update;

pub use device_data::DeviceData;
pub use gather::Gather;
pub use generic::Generic;
pub use loss::{NllLossBackward, ReductionMode};
pub use pooling::MaxPoolNd;
pub use reduction::{GetDimensionsSize, MaxInDim};
pub use softmax::{LogSoftmaxBackwardUseIn, Softmax, SoftmaxBackward};
pub use upsample::UpsampleNearestBackward;
pub use view_update::{AsStridedViewUpdate, DiagonalViewUpdate};

/// Where a node gets its output shapes from.
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeRule {
    /// Ask the injected inference backend on first access.
    Backend,
    /// Reuse the shape of one operand, without consulting the backend.
    SameAsOperand(usize),
    /// Shapes known at construction.
    Fixed(Vec<Shape>),
}

pub trait Operation: Debug {
    fn kind(&self) -> OpKind;

    fn num_outputs(&self) -> usize {
        1
    }

    /// Validate the operand list against the operator's arity.
    fn check_operands(&self, operands: &[Value]) -> Result<()>;

    /// Parameters in declaration order, used for describing and lowering.
    fn attrs(&self) -> Attrs;

    /// Hash of the parameters that distinguish two nodes of the same kind.
    fn params_hash(&self) -> HashValue {
        hash_value(&self.attrs())
    }

    fn shape_rule(&self) -> ShapeRule {
        ShapeRule::Backend
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, From)]
pub enum NodeOp {
    DeviceData(DeviceData),
    Generic(Generic),
    Gather(Gather),
    Softmax(Softmax),
    SoftmaxBackward(SoftmaxBackward),
    LogSoftmaxBackwardUseIn(LogSoftmaxBackwardUseIn),
    MaxPoolNd(MaxPoolNd),
    MaxInDim(MaxInDim),
    GetDimensionsSize(GetDimensionsSize),
    AsStridedViewUpdate(AsStridedViewUpdate),
    DiagonalViewUpdate(DiagonalViewUpdate),
    NllLossBackward(NllLossBackward),
    UpsampleNearestBackward(UpsampleNearestBackward),
}

impl NodeOp {
    pub fn operation(&self) -> &dyn Operation {
        match self {
            NodeOp::DeviceData(op) => op,
            NodeOp::Generic(op) => op,
            NodeOp::Gather(op) => op,
            NodeOp::Softmax(op) => op,
            NodeOp::SoftmaxBackward(op) => op,
            NodeOp::LogSoftmaxBackwardUseIn(op) => op,
            NodeOp::MaxPoolNd(op) => op,
            NodeOp::MaxInDim(op) => op,
            NodeOp::GetDimensionsSize(op) => op,
            NodeOp::AsStridedViewUpdate(op) => op,
            NodeOp::DiagonalViewUpdate(op) => op,
            NodeOp::NllLossBackward(op) => op,
            NodeOp::UpsampleNearestBackward(op) => op,
        }
    }
}

pub(crate) fn expect_operands(op: &OpKind, operands: &[Value], expected: usize) -> Result<()> {
    if operands.len() != expected {
        return Err(crate::error::Error::invalid_operand(
            op.as_str(),
            format!("expected {} operand(s), got {}", expected, operands.len()),
        ));
    }
    Ok(())
}
