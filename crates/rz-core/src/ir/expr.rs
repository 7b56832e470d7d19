use std::fmt::{self, Display, Formatter};
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use derive_more::From;
use itertools::Itertools;

use crate::ir::{Attrs, Function, Op, TensorValue, Type};

#[derive(Debug)]
struct VarNode {
    name_hint: String,
    checked_type: Option<Type>,
}

/// Local variable. Identity is the allocation, not the name: two variables
/// with the same hint are still distinct.
#[derive(Debug, Clone)]
pub struct Var(Arc<VarNode>);

impl Var {
    pub fn new(name_hint: impl Into<String>, checked_type: Option<Type>) -> Self {
        Var(Arc::new(VarNode {
            name_hint: name_hint.into(),
            checked_type,
        }))
    }

    pub fn typed(name_hint: impl Into<String>, ty: Type) -> Self {
        Var::new(name_hint, Some(ty))
    }

    pub fn name_hint(&self) -> &str {
        &self.0.name_hint
    }

    pub fn checked_type(&self) -> Option<&Type> {
        self.0.checked_type.as_ref()
    }

    pub fn ptr_eq(&self, other: &Var) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for Var {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Var {}

impl Hash for Var {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (Arc::as_ptr(&self.0) as usize).hash(state);
    }
}

impl Display for Var {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "%{}", self.name_hint())
    }
}

/// Module-level function name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GlobalVar {
    name: String,
}

impl GlobalVar {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Display for GlobalVar {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CallTarget {
    Op(Op),
    Expr(Box<Expr>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub target: CallTarget,
    pub args: Vec<Expr>,
    pub attrs: Attrs,
}

impl Call {
    pub fn op(op: Op, args: Vec<Expr>) -> Self {
        Self {
            target: CallTarget::Op(op),
            args,
            attrs: Attrs::new(),
        }
    }

    pub fn callee(callee: Expr, args: Vec<Expr>) -> Self {
        Self {
            target: CallTarget::Expr(Box::new(callee)),
            args,
            attrs: Attrs::new(),
        }
    }

    pub fn with_attrs(mut self, attrs: Attrs) -> Self {
        self.attrs = attrs;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TupleGetItem {
    pub tuple: Box<Expr>,
    pub index: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Let {
    pub var: Var,
    pub value: Box<Expr>,
    pub body: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq, From)]
pub enum Expr {
    Var(Var),
    GlobalVar(GlobalVar),
    Constant(TensorValue),
    Call(Call),
    Tuple(Vec<Expr>),
    TupleGetItem(TupleGetItem),
    Let(Let),
    Function(Box<Function>),
}

impl Expr {
    pub fn tuple_get_item(tuple: impl Into<Expr>, index: usize) -> Self {
        Expr::TupleGetItem(TupleGetItem {
            tuple: Box::new(tuple.into()),
            index,
        })
    }

    pub fn let_in(var: Var, value: impl Into<Expr>, body: impl Into<Expr>) -> Self {
        Expr::Let(Let {
            var,
            value: Box::new(value.into()),
            body: Box::new(body.into()),
        })
    }
}

impl From<Function> for Expr {
    fn from(function: Function) -> Self {
        Expr::Function(Box::new(function))
    }
}

impl Display for Call {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.target {
            CallTarget::Op(op) => write!(f, "{}", op)?,
            CallTarget::Expr(callee) => write!(f, "{}", callee)?,
        }
        write!(f, "({}", self.args.iter().join(", "))?;
        if !self.attrs.is_empty() {
            write!(f, ", {}", self.attrs)?;
        }
        f.write_str(")")
    }
}

/// Single-line rendering. Nested lets and functions are printed inline;
/// use the pretty printer for block layout.
impl Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Var(var) => write!(f, "{}", var),
            Expr::GlobalVar(global) => write!(f, "{}", global),
            Expr::Constant(value) => write!(f, "const({})", value),
            Expr::Call(call) => write!(f, "{}", call),
            Expr::Tuple(fields) if fields.len() == 1 => write!(f, "({},)", fields[0]),
            Expr::Tuple(fields) => write!(f, "({})", fields.iter().join(", ")),
            Expr::TupleGetItem(item) => write!(f, "{}.{}", item.tuple, item.index),
            Expr::Let(binding) => write!(
                f,
                "let {} = {}; {}",
                binding.var, binding.value, binding.body
            ),
            Expr::Function(function) => write!(f, "{}", function.signature()),
        }
    }
}
