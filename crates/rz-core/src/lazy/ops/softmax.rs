use crate::error::Result;
use crate::ir::Attrs;
use crate::lazy::op_kind::symbols;
use crate::lazy::ops::{expect_operands, Operation, ShapeRule};
use crate::lazy::{ElementType, GraphContext, OpKind, Value};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Softmax {
    dim: i64,
    dtype: Option<ElementType>,
}

impl Softmax {
    pub fn new(dim: i64, dtype: Option<ElementType>) -> Self {
        Self { dim, dtype }
    }

    pub fn dim(&self) -> i64 {
        self.dim
    }

    pub fn dtype(&self) -> Option<ElementType> {
        self.dtype
    }
}

impl Operation for Softmax {
    fn kind(&self) -> OpKind {
        OpKind::new(symbols::SOFTMAX)
    }

    fn check_operands(&self, operands: &[Value]) -> Result<()> {
        expect_operands(&self.kind(), operands, 1)
    }

    fn attrs(&self) -> Attrs {
        Attrs::new().with("dim", self.dim).with("dtype", self.dtype)
    }
}

/// Gradient of softmax. Its output has the shape of `grad_output`, so the
/// backend is never consulted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SoftmaxBackward {
    dim: i64,
}

impl SoftmaxBackward {
    pub fn new(dim: i64) -> Self {
        Self { dim }
    }

    pub fn dim(&self) -> i64 {
        self.dim
    }
}

impl Operation for SoftmaxBackward {
    fn kind(&self) -> OpKind {
        OpKind::new(symbols::SOFTMAX_BACKWARD)
    }

    fn check_operands(&self, operands: &[Value]) -> Result<()> {
        expect_operands(&self.kind(), operands, 2)
    }

    fn attrs(&self) -> Attrs {
        Attrs::new().with("dim", self.dim)
    }

    fn shape_rule(&self) -> ShapeRule {
        ShapeRule::SameAsOperand(0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LogSoftmaxBackwardUseIn {
    // The dimension along which the result is computed.
    dim: i64,
}

impl LogSoftmaxBackwardUseIn {
    pub fn new(dim: i64) -> Self {
        Self { dim }
    }

    pub fn dim(&self) -> i64 {
        self.dim
    }
}

impl Operation for LogSoftmaxBackwardUseIn {
    fn kind(&self) -> OpKind {
        OpKind::new(symbols::LOG_SOFTMAX_BACKWARD)
    }

    fn check_operands(&self, operands: &[Value]) -> Result<()> {
        expect_operands(&self.kind(), operands, 2)
    }

    fn attrs(&self) -> Attrs {
        Attrs::new().with("dim", self.dim)
    }
}

impl GraphContext {
    pub fn softmax(&self, input: &Value, dim: i64, dtype: Option<ElementType>) -> Result<Value> {
        let node = self.make_node(Softmax::new(dim, dtype), vec![input.clone()])?;
        Ok(Value::from(node))
    }

    pub fn softmax_backward(&self, grad: &Value, output: &Value, dim: i64) -> Result<Value> {
        let operands = vec![grad.clone(), output.clone()];
        let node = self.make_node(SoftmaxBackward::new(dim), operands)?;
        Ok(Value::from(node))
    }

    pub fn log_softmax_backward(
        &self,
        grad_output: &Value,
        output: &Value,
        dim: i64,
    ) -> Result<Value> {
        let operands = vec![grad_output.clone(), output.clone()];
        Ok(Value::from(
            self.make_node(LogSoftmaxBackwardUseIn::new(dim), operands)?,
        ))
    }
}
