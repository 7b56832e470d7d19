use crate::error::Result;
use crate::ir::Attrs;
use crate::lazy::op_kind::symbols;
use crate::lazy::ops::{expect_operands, Operation, ShapeRule};
use crate::lazy::{GraphContext, OpKind, Shape, Value};

/// Leaf holding device-resident data, e.g. a graph input.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeviceData {
    name: String,
    shape: Shape,
}

impl DeviceData {
    pub fn new(name: impl Into<String>, shape: Shape) -> Self {
        Self {
            name: name.into(),
            shape,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }
}

impl Operation for DeviceData {
    fn kind(&self) -> OpKind {
        OpKind::new(symbols::DEVICE_DATA)
    }

    fn check_operands(&self, operands: &[Value]) -> Result<()> {
        expect_operands(&self.kind(), operands, 0)
    }

    fn attrs(&self) -> Attrs {
        Attrs::new()
            .with("name", self.name.as_str())
            .with("shape", self.shape.dims.clone())
            .with("dtype", self.shape.element_type)
    }

    fn shape_rule(&self) -> ShapeRule {
        ShapeRule::Fixed(vec![self.shape.clone()])
    }
}

impl GraphContext {
    pub fn device_data(&self, name: impl Into<String>, shape: Shape) -> Result<Value> {
        let node = self.make_node(DeviceData::new(name, shape), Vec::new())?;
        Ok(Value::from(node))
    }
}
