use crate::error::Result;
use crate::ir::Attrs;
use crate::lazy::op_kind::symbols;
use crate::lazy::ops::{expect_operands, Operation};
use crate::lazy::{GraphContext, OpKind, Value};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Gather {
    dim: i64,
}

impl Gather {
    pub fn new(dim: i64) -> Self {
        Self { dim }
    }

    pub fn dim(&self) -> i64 {
        self.dim
    }
}

impl Operation for Gather {
    fn kind(&self) -> OpKind {
        OpKind::new(symbols::GATHER)
    }

    fn check_operands(&self, operands: &[Value]) -> Result<()> {
        expect_operands(&self.kind(), operands, 2)
    }

    fn attrs(&self) -> Attrs {
        Attrs::new().with("dim", self.dim)
    }
}

impl GraphContext {
    pub fn gather(&self, input: &Value, dim: i64, index: &Value) -> Result<Value> {
        let node = self.make_node(Gather::new(dim), vec![input.clone(), index.clone()])?;
        Ok(Value::from(node))
    }
}
