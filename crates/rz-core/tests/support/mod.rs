//! Shared fixtures for rz-core integration tests.
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Once};

use rz_core::lazy::ops::NodeOp;
use rz_core::lazy::{ElementType, GraphContext, Node, Shape, ShapeInference, Value};
use rz_core::{Error, Result};

static TRACING: Once = Once::new();

pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Propagates the first operand's shape to every output and counts calls.
#[derive(Default)]
pub struct CountingBackend {
    calls: AtomicUsize,
}

impl CountingBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ShapeInference for CountingBackend {
    fn infer(&self, node: &Node) -> Result<Vec<Shape>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let shape = match node.operands().first() {
            Some(operand) => operand.shape()?,
            None => Shape::scalar(ElementType::F32),
        };
        let shape = match node.op() {
            NodeOp::Softmax(op) => match op.dtype() {
                Some(dtype) => shape.with_element_type(dtype),
                None => shape,
            },
            _ => shape,
        };
        Ok(vec![shape; node.num_outputs()])
    }
}

/// Rejects every node.
pub struct FailingBackend;

impl ShapeInference for FailingBackend {
    fn infer(&self, node: &Node) -> Result<Vec<Shape>> {
        Err(Error::shape_inference(
            node.kind().as_str(),
            "malformed operand shapes",
        ))
    }
}

pub fn f32_shape(dims: &[i64]) -> Shape {
    Shape::new(ElementType::F32, dims.to_vec())
}

pub fn context(backend: Arc<dyn ShapeInference>) -> GraphContext {
    init_tracing();
    GraphContext::new(backend)
}

pub fn input(ctx: &GraphContext, name: &str, dims: &[i64]) -> Value {
    ctx.device_data(name, f32_shape(dims))
        .expect("device data has no operands to validate")
}
