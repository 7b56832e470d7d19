//! Let-normal-form construction.
//!
//! A [`LetList`] accumulates `(var, expr)` bindings in insertion order and
//! wraps them around a final body. Bindings are never reordered or merged:
//! the caller pushes operands before the bindings that use them.

use std::collections::HashSet;

use crate::error::Result;
use crate::ir::{Expr, Type, Var};

pub struct LetList {
    bindings: Vec<(Var, Expr)>,
    bound: HashSet<Var>,
    prefix: String,
    counter: usize,
}

impl Default for LetList {
    fn default() -> Self {
        Self::new()
    }
}

impl LetList {
    pub fn new() -> Self {
        Self::with_prefix("t")
    }

    /// Builder whose fresh variables are named `<prefix>0`, `<prefix>1`, ...
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            bindings: Vec::new(),
            bound: HashSet::new(),
            prefix: prefix.into(),
            counter: 0,
        }
    }

    fn fresh_var(&mut self, ty: Option<Type>) -> Var {
        let name = format!("{}{}", self.prefix, self.counter);
        self.counter += 1;
        Var::new(name, ty)
    }

    /// Bind `expr` to a fresh untyped variable.
    pub fn push(&mut self, expr: impl Into<Expr>) -> Var {
        let var = self.fresh_var(None);
        self.bind(var.clone(), expr.into());
        var
    }

    /// Bind `expr` to a fresh variable carrying `ty` as its checked type.
    pub fn push_typed(&mut self, expr: impl Into<Expr>, ty: Type) -> Var {
        let var = self.fresh_var(Some(ty));
        self.bind(var.clone(), expr.into());
        var
    }

    /// Bind `expr` to an existing variable. A variable may be bound once.
    pub fn push_var(&mut self, var: Var, expr: impl Into<Expr>) -> Result<Var> {
        crate::ensure_wellformed!(!self.bound.contains(&var), "{} is bound twice", var);
        self.bind(var.clone(), expr.into());
        Ok(var)
    }

    fn bind(&mut self, var: Var, expr: Expr) {
        self.bound.insert(var.clone());
        self.bindings.push((var, expr));
    }

    pub fn bindings(&self) -> &[(Var, Expr)] {
        &self.bindings
    }

    pub fn last(&self) -> Option<&(Var, Expr)> {
        self.bindings.last()
    }

    pub fn lookup(&self, var: &Var) -> Option<&Expr> {
        self.bindings
            .iter()
            .rev()
            .find(|(bound, _)| bound == var)
            .map(|(_, expr)| expr)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Wrap every binding, first pushed outermost, around `body`.
    pub fn get(self, body: impl Into<Expr>) -> Expr {
        self.bindings
            .into_iter()
            .rev()
            .fold(body.into(), |body, (var, value)| {
                Expr::let_in(var, value, body)
            })
    }

    /// Run `build` against a fresh builder and wrap what it pushed around the
    /// expression it returns. The builder cannot outlive the call.
    pub fn with<F>(build: F) -> Result<Expr>
    where
        F: FnOnce(&mut LetList) -> Result<Expr>,
    {
        Self::with_builder(LetList::new(), build)
    }

    pub fn with_builder<F>(mut builder: LetList, build: F) -> Result<Expr>
    where
        F: FnOnce(&mut LetList) -> Result<Expr>,
    {
        let body = build(&mut builder)?;
        Ok(builder.get(body))
    }
}

/// A let chain taken apart: bound variables, their expressions, and the
/// variable the chain returns.
#[derive(Debug, Clone)]
pub struct ExplicitLetList {
    pub vars: Vec<Var>,
    pub exprs: Vec<Expr>,
    pub ret: Var,
}

impl ExplicitLetList {
    /// Flatten nested lets. A tail that is not a variable is bound to a fresh
    /// untyped `ret` variable so the chain always ends in a variable.
    pub fn make(body: &Expr) -> Self {
        let mut vars = Vec::new();
        let mut exprs = Vec::new();
        let mut cursor = body;
        while let Expr::Let(binding) = cursor {
            vars.push(binding.var.clone());
            exprs.push(binding.value.as_ref().clone());
            cursor = binding.body.as_ref();
        }
        let ret = match cursor {
            Expr::Var(var) => var.clone(),
            tail => {
                let var = Var::new("ret", None);
                vars.push(var.clone());
                exprs.push(tail.clone());
                var
            }
        };
        Self { vars, exprs, ret }
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Call, Op};

    #[test]
    fn get_nests_first_binding_outermost() {
        let mut ll = LetList::new();
        let a = ll.push(Expr::Tuple(Vec::new()));
        let b = ll.push(Call::op(Op::new("razor.op.abs"), vec![a.clone().into()]));
        let expr = ll.get(b.clone());

        let Expr::Let(outer) = &expr else {
            panic!("expected let, got {}", expr);
        };
        assert_eq!(outer.var, a);
        let Expr::Let(inner) = outer.body.as_ref() else {
            panic!("expected nested let");
        };
        assert_eq!(inner.var, b);
        assert_eq!(inner.body.as_ref(), &Expr::Var(b));
    }

    #[test]
    fn non_variable_tail_gets_bound() {
        let x = Var::new("x", None);
        let body = Expr::Tuple(vec![x.clone().into(), x.into()]);
        let ell = ExplicitLetList::make(&body);
        assert_eq!(ell.len(), 1);
        assert_eq!(ell.vars[0], ell.ret);
        assert_eq!(ell.exprs[0], body);
    }
}
