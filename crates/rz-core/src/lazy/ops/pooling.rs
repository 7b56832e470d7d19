use crate::error::{Error, Result};
use crate::ir::Attrs;
use crate::lazy::op_kind::symbols;
use crate::lazy::ops::{expect_operands, Operation};
use crate::lazy::{GraphContext, NodePtr, OpKind, Value};

/// N-dimensional max pooling. Produces the pooled values and the argmax
/// indices, hence two outputs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MaxPoolNd {
    spatial_dim_count: i64,
    kernel_size: Vec<i64>,
    stride: Vec<i64>,
    padding: Vec<i64>,
    ceil_mode: bool,
}

impl MaxPoolNd {
    pub fn new(
        spatial_dim_count: i64,
        kernel_size: Vec<i64>,
        stride: Vec<i64>,
        padding: Vec<i64>,
        ceil_mode: bool,
    ) -> Result<Self> {
        if !(1..=3).contains(&spatial_dim_count) {
            return Err(Error::UnsupportedConfiguration(format!(
                "Invalid number of spatial dimensions: {}",
                spatial_dim_count
            )));
        }
        let pool = Self {
            spatial_dim_count,
            kernel_size,
            stride,
            padding,
            ceil_mode,
        };
        for (label, values) in [
            ("kernel_size", &pool.kernel_size),
            ("stride", &pool.stride),
            ("padding", &pool.padding),
        ] {
            if values.len() as i64 != spatial_dim_count {
                return Err(Error::invalid_operand(
                    pool.kind().as_str(),
                    format!(
                        "{} has {} entries, expected {}",
                        label,
                        values.len(),
                        spatial_dim_count
                    ),
                ));
            }
        }
        Ok(pool)
    }

    pub fn spatial_dim_count(&self) -> i64 {
        self.spatial_dim_count
    }

    pub fn kernel_size(&self) -> &[i64] {
        &self.kernel_size
    }

    pub fn stride(&self) -> &[i64] {
        &self.stride
    }

    pub fn padding(&self) -> &[i64] {
        &self.padding
    }

    pub fn ceil_mode(&self) -> bool {
        self.ceil_mode
    }
}

impl Operation for MaxPoolNd {
    fn kind(&self) -> OpKind {
        OpKind::new(match self.spatial_dim_count {
            1 => symbols::MAX_POOL1D,
            2 => symbols::MAX_POOL2D,
            _ => symbols::MAX_POOL3D,
        })
    }

    fn num_outputs(&self) -> usize {
        2
    }

    fn check_operands(&self, operands: &[Value]) -> Result<()> {
        expect_operands(&self.kind(), operands, 1)
    }

    fn attrs(&self) -> Attrs {
        Attrs::new()
            .with("spatial_dim_count", self.spatial_dim_count)
            .with("kernel_size", self.kernel_size.clone())
            .with("stride", self.stride.clone())
            .with("padding", self.padding.clone())
            .with("ceil_mode", self.ceil_mode)
    }
}

impl GraphContext {
    pub fn max_pool_nd(
        &self,
        input: &Value,
        spatial_dim_count: i64,
        kernel_size: Vec<i64>,
        stride: Vec<i64>,
        padding: Vec<i64>,
        ceil_mode: bool,
    ) -> Result<NodePtr> {
        let pool = MaxPoolNd::new(spatial_dim_count, kernel_size, stride, padding, ceil_mode)?;
        self.make_node(pool, vec![input.clone()])
    }
}
