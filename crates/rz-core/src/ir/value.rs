use bytes::{BufMut, Bytes, BytesMut};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

use crate::error::{Error, Result};
use crate::lazy::ElementType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceKind {
    Cpu,
    Cuda,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Device {
    pub kind: DeviceKind,
    pub id: u32,
}

impl Device {
    pub fn cpu(id: u32) -> Self {
        Self {
            kind: DeviceKind::Cpu,
            id,
        }
    }

    pub fn cuda(id: u32) -> Self {
        Self {
            kind: DeviceKind::Cuda,
            id,
        }
    }
}

impl Default for Device {
    fn default() -> Self {
        Device::cpu(0)
    }
}

impl Display for Device {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            DeviceKind::Cpu => "cpu",
            DeviceKind::Cuda => "cuda",
        };
        write!(f, "{}({})", kind, self.id)
    }
}

/// Materialized tensor: dense little-endian payload on a device.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TensorValue {
    pub dtype: ElementType,
    pub shape: Vec<i64>,
    pub device: Device,
    pub data: Bytes,
}

impl TensorValue {
    /// Tensor of the given shape with every element set to `fill`.
    pub fn filled(device: Device, dtype: ElementType, shape: Vec<i64>, fill: f64) -> Result<Self> {
        if let Some(dim) = shape.iter().find(|dim| **dim < 0) {
            return Err(Error::UnsupportedConfiguration(format!(
                "negative extent {} in constant shape {:?}",
                dim, shape
            )));
        }
        let overflow = || {
            Error::UnsupportedConfiguration(format!(
                "constant shape {:?} of {} overflows the addressable size",
                shape, dtype
            ))
        };
        let count = checked_element_count(&shape).ok_or_else(overflow)?;
        let num_bytes = count
            .checked_mul(element_size(dtype))
            .filter(|bytes| isize::try_from(*bytes).is_ok())
            .ok_or_else(overflow)?;
        let mut buffer = BytesMut::with_capacity(num_bytes);
        for _ in 0..count {
            match dtype {
                ElementType::Bool => buffer.put_u8(u8::from(fill != 0.0)),
                ElementType::I8 => buffer.put_i8(fill as i8),
                ElementType::I32 => buffer.put_i32_le(fill as i32),
                ElementType::I64 => buffer.put_i64_le(fill as i64),
                ElementType::BF16 => buffer.put_u16_le(((fill as f32).to_bits() >> 16) as u16),
                ElementType::F32 => buffer.put_f32_le(fill as f32),
                ElementType::F64 => buffer.put_f64_le(fill),
                ElementType::F16 => {
                    return Err(Error::UnsupportedConfiguration(
                        "cannot materialize f16 constants".to_string(),
                    ))
                }
            }
        }
        Ok(Self {
            dtype,
            shape,
            device,
            data: buffer.freeze(),
        })
    }

    pub fn ones(device: Device, dtype: ElementType, shape: Vec<i64>) -> Result<Self> {
        Self::filled(device, dtype, shape, 1.0)
    }

    /// Counted from the payload, so it never overflows.
    pub fn num_elements(&self) -> usize {
        self.data.len() / element_size(self.dtype)
    }
}

/// Product of the extents, or `None` when an extent is negative or the
/// product does not fit in `usize`.
pub fn checked_element_count(shape: &[i64]) -> Option<usize> {
    shape.iter().try_fold(1usize, |count, dim| {
        count.checked_mul(usize::try_from(*dim).ok()?)
    })
}

pub fn element_size(dtype: ElementType) -> usize {
    match dtype {
        ElementType::Bool | ElementType::I8 => 1,
        ElementType::F16 | ElementType::BF16 => 2,
        ElementType::I32 | ElementType::F32 => 4,
        ElementType::I64 | ElementType::F64 => 8,
    }
}

impl Display for TensorValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[{}] @ {}",
            self.dtype,
            self.shape.iter().join(", "),
            self.device
        )
    }
}
