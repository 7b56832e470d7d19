use itertools::Itertools;

use crate::ir::{Expr, FuncType, Type, TypeVar, Var};

#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub params: Vec<Var>,
    pub body: Expr,
    /// Checked result type; `None` until type checking has run.
    pub ret_type: Option<Type>,
    pub type_params: Vec<TypeVar>,
}

impl Function {
    pub fn new(
        params: Vec<Var>,
        body: impl Into<Expr>,
        ret_type: Option<Type>,
        type_params: Vec<TypeVar>,
    ) -> Self {
        Self {
            params,
            body: body.into(),
            ret_type,
            type_params,
        }
    }

    /// Function type, available once every parameter and the result are typed.
    pub fn checked_type(&self) -> Option<FuncType> {
        let params = self
            .params
            .iter()
            .map(|param| param.checked_type().cloned())
            .collect::<Option<Vec<_>>>()?;
        let ret = self.ret_type.clone()?;
        Some(FuncType {
            params,
            ret: Box::new(ret),
            type_params: self.type_params.clone(),
        })
    }

    pub fn signature(&self) -> String {
        let params = self
            .params
            .iter()
            .map(|param| match param.checked_type() {
                Some(ty) => format!("{}: {}", param, ty),
                None => param.to_string(),
            })
            .join(", ");
        let type_params = if self.type_params.is_empty() {
            String::new()
        } else {
            let names = self.type_params.iter().map(|var| &var.name).join(", ");
            format!("<{}>", names)
        };
        match &self.ret_type {
            Some(ret) => format!("fn{}({}) -> {}", type_params, params, ret),
            None => format!("fn{}({})", type_params, params),
        }
    }
}
