//! Module pass interface.
//!
//! A pass is a pure function of a module: it reads the input module and the
//! explicit [`PassContext`] and returns a new module. Nothing is looked up
//! from process-wide state, so a manager may reorder or re-run passes.

use std::sync::Arc;

use rz_core::ir::{IRModule, OpRegistry};
use rz_core::Result;

use crate::config::PassConfig;
use crate::materialize::{DefaultDeviceMaterializer, TensorMaterializer};

mod manager;
mod registry;

pub use manager::{PassManager, PassReport};
pub use registry::{PassFactory, PassRegistry};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassInfo {
    pub name: String,
    /// Lowest optimization level the pass runs at; also its scheduling
    /// priority.
    pub opt_level: u8,
    pub required: bool,
}

impl PassInfo {
    pub fn new(name: impl Into<String>, opt_level: u8) -> Self {
        Self {
            name: name.into(),
            opt_level,
            required: false,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

pub trait ModulePass: Send + Sync {
    fn info(&self) -> PassInfo;

    fn run(&self, module: &IRModule, ctx: &PassContext) -> Result<IRModule>;
}

/// Dependencies handed to every pass.
#[derive(Clone)]
pub struct PassContext {
    config: PassConfig,
    ops: Arc<OpRegistry>,
    materializer: Arc<dyn TensorMaterializer>,
}

impl PassContext {
    pub fn new(
        config: PassConfig,
        ops: Arc<OpRegistry>,
        materializer: Arc<dyn TensorMaterializer>,
    ) -> Self {
        Self {
            config,
            ops,
            materializer,
        }
    }

    /// Default operator catalog and a `cpu(0)` materializer.
    pub fn with_config(config: PassConfig) -> Self {
        Self::new(
            config,
            Arc::new(OpRegistry::with_defaults()),
            Arc::new(DefaultDeviceMaterializer),
        )
    }

    pub fn config(&self) -> &PassConfig {
        &self.config
    }

    pub fn ops(&self) -> &OpRegistry {
        &self.ops
    }

    pub fn materializer(&self) -> &dyn TensorMaterializer {
        self.materializer.as_ref()
    }
}

impl Default for PassContext {
    fn default() -> Self {
        Self::with_config(PassConfig::default())
    }
}
