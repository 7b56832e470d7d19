mod support;

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

use pretty_assertions::assert_eq;
use rz_core::lazy::{ElementType, Node, NodePtr, Shape, Value};
use rz_core::{Error, Result};
use support::{context, f32_shape, input, CountingBackend, FailingBackend};

#[test]
fn shape_is_inferred_once() -> Result<()> {
    let backend = CountingBackend::new();
    let ctx = context(backend.clone());
    let x = input(&ctx, "x", &[2, 3]);
    let softmax = ctx.softmax(&x, 1, None)?;

    assert!(!softmax.node().is_shape_evaluated());
    for _ in 0..5 {
        assert_eq!(softmax.shape()?, f32_shape(&[2, 3]));
    }
    assert!(softmax.node().is_shape_evaluated());
    assert_eq!(backend.calls(), 1);
    Ok(())
}

#[test]
fn softmax_dtype_reaches_the_backend() -> Result<()> {
    let ctx = context(CountingBackend::new());
    let x = input(&ctx, "x", &[2, 3]);
    let softmax = ctx.softmax(&x, 1, Some(ElementType::F64))?;
    assert_eq!(softmax.shape()?, Shape::new(ElementType::F64, vec![2, 3]));
    Ok(())
}

#[test]
fn construction_does_not_infer_shapes() -> Result<()> {
    let backend = CountingBackend::new();
    let ctx = context(backend.clone());
    let x = input(&ctx, "x", &[1, 3, 8, 8]);
    let pool = ctx.max_pool_nd(&x, 2, vec![2, 2], vec![2, 2], vec![0, 0], false)?;
    let _indices = Value::new(pool.clone(), 1)?;
    let _copy = pool.clone_with(pool.operands())?;
    assert_eq!(backend.calls(), 0);
    Ok(())
}

#[test]
fn device_data_shape_is_known_at_construction() -> Result<()> {
    let backend = CountingBackend::new();
    let ctx = context(backend.clone());
    let x = input(&ctx, "x", &[7]);
    assert!(x.node().is_shape_evaluated());
    assert_eq!(x.shape()?, f32_shape(&[7]));
    assert_eq!(backend.calls(), 0);
    Ok(())
}

#[test]
fn softmax_backward_takes_the_gradient_shape_without_backend() -> Result<()> {
    let backend = CountingBackend::new();
    let ctx = context(backend.clone());
    let grad = ctx.device_data("grad", Shape::new(ElementType::BF16, vec![4, 10]))?;
    let output = input(&ctx, "output", &[4, 10]);
    let backward = ctx.softmax_backward(&grad, &output, 1)?;

    assert_eq!(backward.shape()?, Shape::new(ElementType::BF16, vec![4, 10]));
    assert_eq!(backend.calls(), 0);
    Ok(())
}

#[test]
fn concurrent_first_access_infers_once() -> Result<()> {
    const READERS: usize = 8;
    let backend = CountingBackend::new();
    let ctx = context(backend.clone());
    let x = input(&ctx, "x", &[16, 16]);
    let node: NodePtr = ctx.max_in_dim(&x, 0, true)?;

    let barrier = Arc::new(Barrier::new(READERS));
    let handles: Vec<_> = (0..READERS)
        .map(|i| {
            let node = node.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                node.shape(i % 2)
            })
        })
        .collect();

    for handle in handles {
        let shape = handle.join().expect("reader thread panicked")?;
        assert_eq!(shape, f32_shape(&[16, 16]));
    }
    assert_eq!(backend.calls(), 1);
    Ok(())
}

#[test]
fn inference_failure_is_reported_and_cached() -> Result<()> {
    let ctx = context(Arc::new(FailingBackend));
    let x = input(&ctx, "x", &[3]);
    let gather = ctx.gather(&x, 0, &x)?;

    let first = gather.shape().unwrap_err();
    assert!(matches!(first, Error::ShapeInferenceFailure { .. }), "{first}");
    assert_eq!(gather.shape().unwrap_err(), first);

    // Hashing, describing and cloning never touch the shape.
    let copy = gather.node().clone_with(gather.node().operands())?;
    assert_eq!(copy.hash(), gather.node().hash());
    assert_eq!(copy.describe(), "aten::gather, dim=0");
    Ok(())
}

#[test]
fn wrong_number_of_shapes_is_a_failure() -> Result<()> {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let ctx = context(Arc::new(move |_: &Node| -> Result<Vec<Shape>> {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(vec![Shape::scalar(ElementType::F32)])
    }));
    let x = input(&ctx, "x", &[5, 5]);
    let max = ctx.max_in_dim(&x, 1, false)?;

    assert!(matches!(
        max.shape(0),
        Err(Error::ShapeInferenceFailure { .. })
    ));
    assert!(matches!(
        max.shape(1),
        Err(Error::ShapeInferenceFailure { .. })
    ));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    Ok(())
}

#[test]
fn re_entrant_evaluation_is_detected() -> Result<()> {
    let ctx = context(Arc::new(|node: &Node| -> Result<Vec<Shape>> {
        // Asks for the very shape that is being computed.
        node.shapes().map(|shapes| shapes.to_vec())
    }));
    let x = input(&ctx, "x", &[2]);
    let softmax = ctx.softmax(&x, 0, None)?;

    match softmax.shape() {
        Err(Error::MalformedProgram(message)) => assert!(message.contains("re-entrant")),
        other => panic!("expected a re-entrancy error, got {:?}", other),
    }
    Ok(())
}

#[test]
fn panicking_backend_leaves_a_failure_behind() -> Result<()> {
    let ctx = context(Arc::new(|_: &Node| -> Result<Vec<Shape>> {
        panic!("backend exploded")
    }));
    let x = input(&ctx, "x", &[2]);
    let softmax = ctx.softmax(&x, 0, None)?;

    let caught = panic::catch_unwind(AssertUnwindSafe(|| softmax.shape()));
    assert!(caught.is_err());
    assert!(softmax.node().is_shape_evaluated());
    assert!(matches!(
        softmax.shape(),
        Err(Error::ShapeInferenceFailure { .. })
    ));
    Ok(())
}
