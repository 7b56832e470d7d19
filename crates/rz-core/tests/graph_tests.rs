mod support;

use std::sync::Arc;

use pretty_assertions::assert_eq;
use rz_core::ir::{pretty, well_formed, Expr, ExplicitLetList, PrettyOptions, Type};
use rz_core::lazy::{lower_graph, post_order, Value};
use rz_core::{Error, Result};
use support::{context, input, CountingBackend, FailingBackend};

#[test]
fn post_order_visits_operands_first_and_once() -> Result<()> {
    let ctx = context(CountingBackend::new());
    let x = input(&ctx, "x", &[4, 4]);
    let a = ctx.softmax(&x, 0, None)?;
    let b = ctx.gather(&a, 1, &x)?;
    let c = ctx.softmax_backward(&b, &a, 1)?;

    let order = post_order(&[c.clone(), a.clone()]);
    let kinds: Vec<_> = order.iter().map(|node| node.kind().as_str()).collect();
    assert_eq!(
        kinds,
        vec![
            "prim::device_data",
            "aten::softmax",
            "aten::gather",
            "aten::_softmax_backward_data",
        ]
    );
    assert!(Arc::ptr_eq(&order[3], c.node()));
    Ok(())
}

#[test]
fn post_order_handles_deep_chains() -> Result<()> {
    let ctx = context(CountingBackend::new());
    let mut value = input(&ctx, "x", &[8]);
    for _ in 0..2_000 {
        value = ctx.softmax(&value, 0, None)?;
    }
    assert_eq!(post_order(&[value]).len(), 2_001);
    Ok(())
}

#[test]
fn lowering_binds_each_node_once() -> Result<()> {
    let ctx = context(CountingBackend::new());
    let x = input(&ctx, "x", &[1, 3, 8, 8]);
    let pool = ctx.max_pool_nd(&x, 2, vec![2, 2], vec![2, 2], vec![0, 0], false)?;
    let values = Value::new(pool.clone(), 0)?;
    let indices = Value::new(pool, 1)?;
    let softmax = ctx.softmax(&values, 1, None)?;

    let function = lower_graph(&[softmax, indices.clone(), indices])?;
    well_formed::check_function(&function)?;
    assert_eq!(function.params.len(), 1);
    assert_eq!(function.params[0].name_hint(), "x");

    let tensor = Type::tensor(vec![1, 3, 8, 8], rz_core::lazy::ElementType::F32);
    assert_eq!(
        function.ret_type,
        Some(Type::Tuple(vec![tensor.clone(), tensor.clone(), tensor]))
    );

    let options = PrettyOptions {
        show_types: false,
        ..Default::default()
    };
    let rendered = pretty(&function, options).to_string();
    let expected = "\
fn(%x: Tensor[(1, 3, 8, 8), f32]) -> (Tensor[(1, 3, 8, 8), f32], Tensor[(1, 3, 8, 8), f32], Tensor[(1, 3, 8, 8), f32]) {
    let %v0 = aten::max_pool2d(%x, spatial_dim_count=2, kernel_size=(2, 2), stride=(2, 2), padding=(0, 0), ceil_mode=false);
    let %v1 = %v0.0;
    let %v2 = aten::softmax(%v1, dim=1, dtype=null);
    let %v3 = %v0.1;
    let %v4 = (%v2, %v3, %v3);
    %v4
}
";
    assert_eq!(rendered, expected);
    Ok(())
}

#[test]
fn single_output_graph_returns_its_variable() -> Result<()> {
    let ctx = context(CountingBackend::new());
    let x = input(&ctx, "x", &[3]);
    let y = ctx.softmax(&x, 0, None)?;
    let function = lower_graph(&[y])?;

    let chain = ExplicitLetList::make(&function.body);
    assert_eq!(chain.len(), 1);
    assert_eq!(chain.ret, chain.vars[0]);
    assert!(matches!(chain.exprs[0], Expr::Call(_)));
    Ok(())
}

#[test]
fn lowering_needs_outputs() {
    assert!(matches!(lower_graph(&[]), Err(Error::MalformedProgram(_))));
}

#[test]
fn shape_failures_abort_lowering() -> Result<()> {
    let ctx = context(Arc::new(FailingBackend));
    let x = input(&ctx, "x", &[2, 5]);
    let y = ctx.softmax(&x, 1, None)?;

    match lower_graph(&[y]) {
        Err(Error::ShapeInferenceFailure { op, message }) => {
            assert_eq!(op, "aten::softmax");
            assert!(message.contains("malformed operand shapes"), "{}", message);
        }
        other => panic!("expected a shape inference failure, got {:?}", other),
    }
    Ok(())
}
