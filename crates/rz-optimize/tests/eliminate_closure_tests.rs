mod support;

use std::sync::Arc;

use pretty_assertions::assert_eq;
use rz_core::ir::op::names;
use rz_core::ir::{
    pretty, Call, Device, ExplicitLetList, Expr, Function, IRModule, LetList, OpDef, OpRegistry,
    PrettyOptions, PrimType, Type, Var,
};
use rz_core::{Error, Result};
use rz_optimize::{
    ClosureEliminator, ClosurePlaceholderPolicy, EliminateClosure, ModulePass, PassConfig,
    PassContext, TensorMaterializer,
};
use support::{bind, bind_closure, closure, init_tracing, module_with, placeholder, tensor};

fn without_types(function: &Function) -> String {
    let options = PrettyOptions {
        show_types: false,
        ..Default::default()
    };
    pretty(function, options).to_string()
}

/// `fn(%x) { let %c = @helper; let %t = (%x, %c); %t }`
fn tensor_and_closure() -> Result<Function> {
    let x = Var::typed("x", tensor());
    let mut ll = LetList::new();
    let c = bind_closure(&mut ll, "c")?;
    let t = bind(
        &mut ll,
        "t",
        Type::tuple(vec![tensor(), closure()]),
        Expr::Tuple(vec![x.clone().into(), c.into()]),
    )?;
    Ok(Function::new(
        vec![x],
        ll.get(t),
        Some(Type::tuple(vec![tensor(), closure()])),
        Vec::new(),
    ))
}

fn run_pass(module: &IRModule, ctx: &PassContext) -> Result<Function> {
    let output = EliminateClosure.run(module, ctx)?;
    Ok(output.lookup("main")?.clone())
}

#[test]
fn closure_leaf_becomes_abs_of_ones() -> Result<()> {
    init_tracing();
    let main = tensor_and_closure()?;
    let module = module_with(main.clone())?;
    let rewritten = run_pass(&module, &PassContext::default())?;

    assert_eq!(
        rewritten.ret_type,
        Some(Type::tuple(vec![tensor(), placeholder()]))
    );
    assert_eq!(rewritten.params, main.params);
    assert_eq!(
        without_types(&rewritten),
        "\
fn(%x: Tensor[(2), f32]) -> (Tensor[(2), f32], Tensor[(1), f32]) {
    let %c = @helper;
    let %t = (%x, %c);
    let %ce0 = %t.0;
    let %ce1 = %t.1;
    let %ce2 = razor.op.abs(const(f32[1] @ cpu(0)));
    let %ce3 = (%ce0, %ce2);
    %ce3
}
"
    );

    // Existing bindings keep their position and content.
    let before = ExplicitLetList::make(&main.body);
    let after = ExplicitLetList::make(&rewritten.body);
    assert_eq!(&after.vars[..2], &before.vars[..]);
    assert_eq!(&after.exprs[..2], &before.exprs[..]);
    assert_eq!(after.ret.checked_type(), rewritten.ret_type.as_ref());
    Ok(())
}

#[test]
fn bare_closure_result_becomes_a_tensor() -> Result<()> {
    let f = Var::typed("f", closure());
    let main = Function::new(vec![f.clone()], f, None, Vec::new());
    let rewritten = run_pass(&module_with(main)?, &PassContext::default())?;

    assert_eq!(rewritten.ret_type, Some(placeholder()));
    assert_eq!(
        without_types(&rewritten),
        "\
fn(%f: fn(Tensor[(2), f32]) -> Tensor[(2), f32]) -> Tensor[(1), f32] {
    let %ce0 = razor.op.abs(const(f32[1] @ cpu(0)));
    %ce0
}
"
    );
    Ok(())
}

#[test]
fn nested_closures_are_replaced_and_tensors_pass_through() -> Result<()> {
    let x = Var::typed("x", tensor());
    let y = Var::typed("y", tensor());
    let inner_type = Type::tuple(vec![closure(), tensor()]);
    let outer_type = Type::tuple(vec![tensor(), inner_type.clone()]);

    let mut ll = LetList::new();
    let c = bind_closure(&mut ll, "c")?;
    let inner = bind(
        &mut ll,
        "inner",
        inner_type,
        Expr::Tuple(vec![c.into(), y.clone().into()]),
    )?;
    let outer = bind(
        &mut ll,
        "outer",
        outer_type,
        Expr::Tuple(vec![x.clone().into(), inner.into()]),
    )?;
    let main = Function::new(vec![x, y], ll.get(outer), None, Vec::new());

    let rewritten = run_pass(&module_with(main)?, &PassContext::default())?;
    assert_eq!(
        rewritten.ret_type,
        Some(Type::tuple(vec![
            tensor(),
            Type::tuple(vec![placeholder(), tensor()]),
        ]))
    );
    assert_eq!(
        without_types(&rewritten),
        "\
fn(%x: Tensor[(2), f32], %y: Tensor[(2), f32]) -> (Tensor[(2), f32], (Tensor[(1), f32], Tensor[(2), f32])) {
    let %c = @helper;
    let %inner = (%c, %y);
    let %outer = (%x, %inner);
    let %ce0 = %outer.0;
    let %ce1 = %outer.1;
    let %ce2 = %ce1.0;
    let %ce3 = razor.op.abs(const(f32[1] @ cpu(0)));
    let %ce4 = %ce1.1;
    let %ce5 = (%ce3, %ce4);
    let %ce6 = (%ce0, %ce5);
    %ce6
}
"
    );
    Ok(())
}

#[test]
fn tensor_results_are_left_alone() -> Result<()> {
    let registry = OpRegistry::with_defaults();
    let x = Var::typed("x", tensor());
    let mut ll = LetList::new();
    let relu = Call::op(registry.get(names::RELU)?, vec![x.clone().into()]);
    let y = ll.push_typed(relu, tensor());
    let main = Function::new(vec![x], ll.get(y), Some(tensor()), Vec::new());
    let ctx = PassContext::default();

    let once = run_pass(&module_with(main.clone())?, &ctx)?;
    let twice = run_pass(&module_with(once.clone())?, &ctx)?;
    assert_eq!(once, main);
    assert_eq!(twice, once);
    assert_eq!(
        ExplicitLetList::make(&twice.body).len(),
        ExplicitLetList::make(&main.body).len()
    );
    Ok(())
}

#[test]
fn tensor_only_tuples_are_not_re_projected() -> Result<()> {
    let x = Var::typed("x", tensor());
    let pair = Type::tuple(vec![tensor(), tensor()]);
    let body = Expr::Tuple(vec![x.clone().into(), x.clone().into()]);
    let main = Function::new(vec![x], body, Some(pair.clone()), Vec::new());
    let ctx = PassContext::default();

    let once = run_pass(&module_with(main)?, &ctx)?;
    let twice = run_pass(&module_with(once.clone())?, &ctx)?;
    assert_eq!(once.ret_type, Some(pair));
    assert_eq!(ExplicitLetList::make(&once.body).len(), 1);
    assert_eq!(twice, once);
    Ok(())
}

#[test]
fn rewriting_is_idempotent() -> Result<()> {
    let ctx = PassContext::default();
    let once = run_pass(&module_with(tensor_and_closure()?)?, &ctx)?;
    let twice = run_pass(&module_with(once.clone())?, &ctx)?;
    assert_eq!(twice, once);
    Ok(())
}

#[test]
fn primitive_results_are_rejected() -> Result<()> {
    let flag = Var::typed("flag", Type::Prim(PrimType::Bool));
    let main = Function::new(vec![flag.clone()], flag, None, Vec::new());
    let err = run_pass(&module_with(main)?, &PassContext::default()).unwrap_err();
    assert_eq!(err, Error::UnsupportedResultType("bool".to_string()));
    Ok(())
}

#[test]
fn primitive_leaf_fails_before_anything_is_rewritten() -> Result<()> {
    let x = Var::typed("x", tensor());
    let n = Var::typed("n", Type::Prim(PrimType::Int));
    let mut ll = LetList::new();
    let c = bind_closure(&mut ll, "c")?;
    let t = bind(
        &mut ll,
        "t",
        Type::tuple(vec![closure(), Type::Prim(PrimType::Int)]),
        Expr::Tuple(vec![c.into(), n.clone().into()]),
    )?;
    let main = Function::new(vec![x, n], ll.get(t), None, Vec::new());
    let module = module_with(main)?;
    let snapshot = module.clone();

    let result = EliminateClosure.run(&module, &PassContext::default());
    assert!(matches!(result, Err(Error::UnsupportedResultType(_))));
    assert_eq!(module, snapshot);
    Ok(())
}

#[test]
fn only_the_entry_function_is_replaced() -> Result<()> {
    let module = module_with(tensor_and_closure()?)?;
    let snapshot = module.clone();
    let output = EliminateClosure.run(&module, &PassContext::default())?;

    assert_eq!(module, snapshot);
    assert_eq!(output.len(), 2);
    assert_eq!(output.lookup("helper")?, module.lookup("helper")?);
    assert_ne!(output.lookup("main")?, module.lookup("main")?);
    let order: Vec<_> = output.functions().map(|(global, _)| global.name()).collect();
    assert_eq!(order, vec!["helper", "main"]);
    Ok(())
}

#[test]
fn entry_function_is_configurable() -> Result<()> {
    let module = IRModule::from_functions([("forward", tensor_and_closure()?)])?;

    let missing = EliminateClosure.run(&module, &PassContext::default());
    assert!(matches!(missing, Err(Error::MalformedProgram(_))));

    let config = PassConfig {
        entry_function: "forward".to_string(),
        ..PassConfig::default()
    };
    let output = EliminateClosure.run(&module, &PassContext::with_config(config))?;
    assert_eq!(
        output.lookup("forward")?.ret_type,
        Some(Type::tuple(vec![tensor(), placeholder()]))
    );
    Ok(())
}

#[test]
fn untyped_result_is_malformed() -> Result<()> {
    let x = Var::new("x", None);
    let main = Function::new(vec![x.clone()], x, None, Vec::new());
    let ctx = PassContext::default();
    let eliminator = ClosureEliminator::from_context(&ctx);
    assert!(matches!(
        eliminator.eliminate(&main),
        Err(Error::MalformedProgram(_))
    ));
    Ok(())
}

struct CudaMaterializer;

impl TensorMaterializer for CudaMaterializer {
    fn device(&self) -> Device {
        Device::cuda(1)
    }
}

#[test]
fn placeholder_policy_and_device_are_injected() -> Result<()> {
    let config = PassConfig {
        closure_placeholder: ClosurePlaceholderPolicy::Ones,
        ..PassConfig::default()
    };
    let ctx = PassContext::new(
        config,
        Arc::new(OpRegistry::new()),
        Arc::new(CudaMaterializer),
    );
    let rewritten = run_pass(&module_with(tensor_and_closure()?)?, &ctx)?;

    let chain = ExplicitLetList::make(&rewritten.body);
    let constants: Vec<_> = chain
        .exprs
        .iter()
        .filter_map(|expr| match expr {
            Expr::Constant(value) => Some(value),
            _ => None,
        })
        .collect();
    assert_eq!(constants.len(), 1);
    assert_eq!(constants[0].device, Device::cuda(1));
    assert!(!without_types(&rewritten).contains("razor.op.abs"));
    Ok(())
}

#[test]
fn abs_placeholder_needs_the_operator() -> Result<()> {
    let ctx = PassContext::new(
        PassConfig::default(),
        Arc::new(OpRegistry::new()),
        Arc::new(CudaMaterializer),
    );
    let result = run_pass(&module_with(tensor_and_closure()?)?, &ctx);
    assert!(matches!(result, Err(Error::MalformedProgram(_))));
    Ok(())
}

#[test]
fn abs_placeholder_must_be_pure_and_unary() -> Result<()> {
    let impure = OpDef::new(names::ABS, Some(1)).impure();
    let binary = OpDef::new(names::ABS, Some(2));
    for def in [impure, binary] {
        let mut ops = OpRegistry::new();
        ops.register(def)?;
        let ctx = PassContext::new(
            PassConfig::default(),
            Arc::new(ops),
            Arc::new(CudaMaterializer),
        );
        let result = run_pass(&module_with(tensor_and_closure()?)?, &ctx);
        assert!(
            matches!(result, Err(Error::UnsupportedConfiguration(_))),
            "{:?}",
            result
        );
    }
    Ok(())
}
