use crate::error::Result;
use crate::ir::Attrs;
use crate::lazy::op_kind::symbols;
use crate::lazy::ops::{expect_operands, Operation};
use crate::lazy::{GraphContext, OpKind, Value};

/// Writes `input` into the strided view of `target`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AsStridedViewUpdate {
    size: Vec<i64>,
    stride: Vec<i64>,
    storage_offset: i64,
}

impl AsStridedViewUpdate {
    pub fn new(size: Vec<i64>, stride: Vec<i64>, storage_offset: i64) -> Self {
        Self {
            size,
            stride,
            storage_offset,
        }
    }

    pub fn size(&self) -> &[i64] {
        &self.size
    }

    pub fn stride(&self) -> &[i64] {
        &self.stride
    }

    pub fn storage_offset(&self) -> i64 {
        self.storage_offset
    }
}

impl Operation for AsStridedViewUpdate {
    fn kind(&self) -> OpKind {
        OpKind::new(symbols::AS_STRIDED_VIEW_UPDATE)
    }

    fn check_operands(&self, operands: &[Value]) -> Result<()> {
        expect_operands(&self.kind(), operands, 2)
    }

    fn attrs(&self) -> Attrs {
        Attrs::new()
            .with("size", self.size.clone())
            .with("stride", self.stride.clone())
            .with("storage_offset", self.storage_offset)
    }
}

/// Writes `input` into the diagonal of `target`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DiagonalViewUpdate {
    offset: i64,
    dim1: i64,
    dim2: i64,
}

impl DiagonalViewUpdate {
    pub fn new(offset: i64, dim1: i64, dim2: i64) -> Self {
        Self { offset, dim1, dim2 }
    }

    pub fn offset(&self) -> i64 {
        self.offset
    }

    pub fn dim1(&self) -> i64 {
        self.dim1
    }

    pub fn dim2(&self) -> i64 {
        self.dim2
    }
}

impl Operation for DiagonalViewUpdate {
    fn kind(&self) -> OpKind {
        OpKind::new(symbols::DIAGONAL_VIEW_UPDATE)
    }

    fn check_operands(&self, operands: &[Value]) -> Result<()> {
        expect_operands(&self.kind(), operands, 2)
    }

    fn attrs(&self) -> Attrs {
        Attrs::new()
            .with("offset", self.offset)
            .with("dim1", self.dim1)
            .with("dim2", self.dim2)
    }
}

impl GraphContext {
    pub fn as_strided_view_update(
        &self,
        target: &Value,
        input: &Value,
        size: Vec<i64>,
        stride: Vec<i64>,
        storage_offset: i64,
    ) -> Result<Value> {
        let op = AsStridedViewUpdate::new(size, stride, storage_offset);
        let node = self.make_node(op, vec![target.clone(), input.clone()])?;
        Ok(Value::from(node))
    }

    pub fn diagonal_view_update(
        &self,
        target: &Value,
        input: &Value,
        offset: i64,
        dim1: i64,
        dim2: i64,
    ) -> Result<Value> {
        let op = DiagonalViewUpdate::new(offset, dim1, dim2);
        let node = self.make_node(op, vec![target.clone(), input.clone()])?;
        Ok(Value::from(node))
    }
}
