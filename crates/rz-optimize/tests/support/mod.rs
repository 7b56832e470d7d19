//! Program builders shared by the pass tests.
#![allow(dead_code)]

use std::sync::Once;

use rz_core::ir::{Expr, Function, GlobalVar, IRModule, LetList, Type, Var};
use rz_core::lazy::ElementType;
use rz_core::Result;

static TRACING: Once = Once::new();

pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

pub fn tensor() -> Type {
    Type::tensor(vec![2], ElementType::F32)
}

pub fn placeholder() -> Type {
    Type::tensor(vec![1], ElementType::F32)
}

pub fn closure() -> Type {
    Type::func(vec![tensor()], tensor())
}

/// Binds a reference to the global `@helper` as a closure-typed value.
pub fn bind_closure(ll: &mut LetList, name: &str) -> Result<Var> {
    ll.push_var(
        Var::typed(name, closure()),
        Expr::GlobalVar(GlobalVar::new("helper")),
    )
}

pub fn bind(ll: &mut LetList, name: &str, ty: Type, value: impl Into<Expr>) -> Result<Var> {
    ll.push_var(Var::typed(name, ty), value)
}

pub fn helper() -> Function {
    let y = Var::typed("y", tensor());
    Function::new(vec![y.clone()], y, Some(tensor()), Vec::new())
}

pub fn module_with(main: Function) -> Result<IRModule> {
    IRModule::from_functions([("helper", helper()), ("main", main)])
}
