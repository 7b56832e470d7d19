use rz_core::ir::{Device, TensorValue};
use rz_core::lazy::ElementType;
use rz_core::Result;

/// Creates constant tensors on a device chosen by the implementation.
pub trait TensorMaterializer: Send + Sync {
    fn device(&self) -> Device;

    fn ones(&self, dtype: ElementType, shape: &[i64]) -> Result<TensorValue> {
        TensorValue::ones(self.device(), dtype, shape.to_vec())
    }
}

/// Materializes on `cpu(0)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultDeviceMaterializer;

impl TensorMaterializer for DefaultDeviceMaterializer {
    fn device(&self) -> Device {
        Device::default()
    }
}
