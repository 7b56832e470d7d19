use crate::error::Result;
use crate::ir::Attrs;
use crate::lazy::op_kind::symbols;
use crate::lazy::ops::{expect_operands, Operation};
use crate::lazy::{GraphContext, NodePtr, OpKind, Value};

/// Maximum along one dimension; outputs the values and their indices.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MaxInDim {
    dim: i64,
    keepdim: bool,
}

impl MaxInDim {
    pub fn new(dim: i64, keepdim: bool) -> Self {
        Self { dim, keepdim }
    }

    pub fn dim(&self) -> i64 {
        self.dim
    }

    pub fn keepdim(&self) -> bool {
        self.keepdim
    }
}

impl Operation for MaxInDim {
    fn kind(&self) -> OpKind {
        OpKind::new(symbols::MAX_IN_DIM)
    }

    fn num_outputs(&self) -> usize {
        2
    }

    fn check_operands(&self, operands: &[Value]) -> Result<()> {
        expect_operands(&self.kind(), operands, 1)
    }

    fn attrs(&self) -> Attrs {
        Attrs::new()
            .with("dim", self.dim)
            .with("keepdim", self.keepdim)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GetDimensionsSize {
    dimensions: Vec<i64>,
}

impl GetDimensionsSize {
    pub fn new(dimensions: Vec<i64>) -> Self {
        Self { dimensions }
    }

    pub fn dimensions(&self) -> &[i64] {
        &self.dimensions
    }
}

impl Operation for GetDimensionsSize {
    fn kind(&self) -> OpKind {
        OpKind::new(symbols::GET_DIMENSIONS_SIZE)
    }

    fn check_operands(&self, operands: &[Value]) -> Result<()> {
        expect_operands(&self.kind(), operands, 1)
    }

    fn attrs(&self) -> Attrs {
        Attrs::new().with("dimensions", self.dimensions.clone())
    }
}

impl GraphContext {
    pub fn max_in_dim(&self, input: &Value, dim: i64, keepdim: bool) -> Result<NodePtr> {
        self.make_node(MaxInDim::new(dim, keepdim), vec![input.clone()])
    }

    pub fn get_dimensions_size(&self, input: &Value, dimensions: Vec<i64>) -> Result<Value> {
        let node = self.make_node(GetDimensionsSize::new(dimensions), vec![input.clone()])?;
        Ok(Value::from(node))
    }
}
