use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementType {
    Bool,
    I8,
    I32,
    I64,
    F16,
    BF16,
    F32,
    F64,
}

impl ElementType {
    pub fn as_str(self) -> &'static str {
        match self {
            ElementType::Bool => "bool",
            ElementType::I8 => "i8",
            ElementType::I32 => "i32",
            ElementType::I64 => "i64",
            ElementType::F16 => "f16",
            ElementType::BF16 => "bf16",
            ElementType::F32 => "f32",
            ElementType::F64 => "f64",
        }
    }
}

impl Display for ElementType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Element type plus dimension extents of one node output.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Shape {
    pub element_type: ElementType,
    pub dims: Vec<i64>,
}

impl Shape {
    pub fn new(element_type: ElementType, dims: impl Into<Vec<i64>>) -> Self {
        Self {
            element_type,
            dims: dims.into(),
        }
    }

    pub fn scalar(element_type: ElementType) -> Self {
        Self::new(element_type, Vec::new())
    }

    pub fn rank(&self) -> usize {
        self.dims.len()
    }

    /// `None` when the product of the extents overflows `i64`.
    pub fn num_elements(&self) -> Option<i64> {
        self.dims
            .iter()
            .try_fold(1i64, |count, dim| count.checked_mul(*dim))
    }

    pub fn with_element_type(&self, element_type: ElementType) -> Self {
        Self::new(element_type, self.dims.clone())
    }
}

impl Display for Shape {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.element_type, self.dims.iter().join(","))
    }
}
