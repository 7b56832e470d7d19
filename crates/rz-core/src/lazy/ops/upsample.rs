use crate::error::{Error, Result};
use crate::ir::Attrs;
use crate::lazy::op_kind::symbols;
use crate::lazy::ops::{expect_operands, Operation};
use crate::lazy::{GraphContext, OpKind, Value};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UpsampleNearestBackward {
    output_size: Vec<i64>,
    input_size: Vec<i64>,
}

impl UpsampleNearestBackward {
    pub fn new(output_size: Vec<i64>, input_size: Vec<i64>) -> Result<Self> {
        if output_size.len() != 2 {
            return Err(Error::UnsupportedConfiguration(format!(
                "upsample_nearest2d_backward expects a 2-d output_size, got {:?}",
                output_size
            )));
        }
        if input_size.len() != 4 {
            return Err(Error::UnsupportedConfiguration(format!(
                "upsample_nearest2d_backward expects a 4-d input_size, got {:?}",
                input_size
            )));
        }
        Ok(Self {
            output_size,
            input_size,
        })
    }

    pub fn output_size(&self) -> &[i64] {
        &self.output_size
    }

    pub fn input_size(&self) -> &[i64] {
        &self.input_size
    }
}

impl Operation for UpsampleNearestBackward {
    fn kind(&self) -> OpKind {
        OpKind::new(symbols::UPSAMPLE_NEAREST2D_BACKWARD)
    }

    fn check_operands(&self, operands: &[Value]) -> Result<()> {
        expect_operands(&self.kind(), operands, 1)
    }

    fn attrs(&self) -> Attrs {
        Attrs::new()
            .with("output_size", self.output_size.clone())
            .with("input_size", self.input_size.clone())
    }
}

impl GraphContext {
    pub fn upsample_nearest_backward(
        &self,
        input: &Value,
        output_size: Vec<i64>,
        input_size: Vec<i64>,
    ) -> Result<Value> {
        let op = UpsampleNearestBackward::new(output_size, input_size)?;
        Ok(Value::from(self.make_node(op, vec![input.clone()])?))
    }
}
