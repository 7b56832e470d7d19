//! Scoping checks for let-normal-form programs.

use std::collections::HashSet;

use crate::error::{Error, Result};
use crate::ir::{CallTarget, Expr, Function, Var};

struct ScopeChecker {
    in_scope: Vec<Var>,
    ever_bound: HashSet<Var>,
}

impl ScopeChecker {
    fn new() -> Self {
        Self {
            in_scope: Vec::new(),
            ever_bound: HashSet::new(),
        }
    }

    fn bind(&mut self, var: &Var) -> Result<()> {
        if !self.ever_bound.insert(var.clone()) {
            return Err(Error::malformed(format!("{} is bound more than once", var)));
        }
        self.in_scope.push(var.clone());
        Ok(())
    }

    fn check_function(&mut self, function: &Function) -> Result<()> {
        let depth = self.in_scope.len();
        for param in &function.params {
            self.bind(param)?;
        }
        self.check(&function.body)?;
        self.in_scope.truncate(depth);
        Ok(())
    }

    fn check(&mut self, expr: &Expr) -> Result<()> {
        match expr {
            Expr::Var(var) => {
                if self.in_scope.contains(var) {
                    Ok(())
                } else {
                    Err(Error::malformed(format!(
                        "{} is used before it is bound",
                        var
                    )))
                }
            }
            Expr::GlobalVar(_) | Expr::Constant(_) => Ok(()),
            Expr::Call(call) => {
                if let CallTarget::Expr(callee) = &call.target {
                    self.check(callee)?;
                }
                call.args.iter().try_for_each(|arg| self.check(arg))
            }
            Expr::Tuple(fields) => fields.iter().try_for_each(|field| self.check(field)),
            Expr::TupleGetItem(item) => self.check(&item.tuple),
            Expr::Let(_) => {
                let depth = self.in_scope.len();
                let mut cursor = expr;
                while let Expr::Let(binding) = cursor {
                    self.check(&binding.value)?;
                    self.bind(&binding.var)?;
                    cursor = binding.body.as_ref();
                }
                self.check(cursor)?;
                self.in_scope.truncate(depth);
                Ok(())
            }
            Expr::Function(function) => self.check_function(function),
        }
    }
}

/// Every variable is bound exactly once and only referenced after its
/// binding (or as a parameter of an enclosing function).
pub fn check_function(function: &Function) -> Result<()> {
    ScopeChecker::new().check_function(function)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::LetList;

    #[test]
    fn forward_reference_is_rejected() {
        let x = Var::new("x", None);
        let later = Var::new("later", None);
        let mut ll = LetList::new();
        let early = ll.push(Expr::Tuple(vec![later.clone().into()]));
        ll.push_var(later, Expr::Tuple(vec![x.clone().into()]))
            .expect("fresh variable");
        let function = Function::new(vec![x], ll.get(early), None, Vec::new());
        assert!(matches!(
            check_function(&function),
            Err(Error::MalformedProgram(_))
        ));
    }
}
