use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

use crate::lazy::{ElementType, Shape};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TensorType {
    pub shape: Vec<i64>,
    pub dtype: ElementType,
}

impl TensorType {
    pub fn new(shape: impl Into<Vec<i64>>, dtype: ElementType) -> Self {
        Self {
            shape: shape.into(),
            dtype,
        }
    }
}

impl From<&Shape> for TensorType {
    fn from(shape: &Shape) -> Self {
        TensorType::new(shape.dims.clone(), shape.element_type)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeVar {
    pub name: String,
}

impl TypeVar {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FuncType {
    pub params: Vec<Type>,
    pub ret: Box<Type>,
    pub type_params: Vec<TypeVar>,
}

impl FuncType {
    pub fn new(params: Vec<Type>, ret: Type) -> Self {
        Self {
            params,
            ret: Box::new(ret),
            type_params: Vec::new(),
        }
    }
}

/// Scalar types that live outside tensors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrimType {
    Bool,
    Int,
    Float,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Type {
    Tensor(TensorType),
    Tuple(Vec<Type>),
    Func(FuncType),
    Prim(PrimType),
    TypeVar(TypeVar),
}

impl Type {
    pub fn tensor(shape: impl Into<Vec<i64>>, dtype: ElementType) -> Self {
        Type::Tensor(TensorType::new(shape, dtype))
    }

    pub fn tuple(fields: Vec<Type>) -> Self {
        Type::Tuple(fields)
    }

    pub fn func(params: Vec<Type>, ret: Type) -> Self {
        Type::Func(FuncType::new(params, ret))
    }

    pub fn is_tensor(&self) -> bool {
        matches!(self, Type::Tensor(_))
    }

    /// Whether any component, however deeply nested in tuples, is a function.
    pub fn contains_func(&self) -> bool {
        match self {
            Type::Func(_) => true,
            Type::Tuple(fields) => fields.iter().any(Type::contains_func),
            Type::Tensor(_) | Type::Prim(_) | Type::TypeVar(_) => false,
        }
    }
}

impl Display for PrimType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PrimType::Bool => "bool",
            PrimType::Int => "int64",
            PrimType::Float => "float64",
        })
    }
}

impl Display for TensorType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Tensor[({}), {}]",
            self.shape.iter().join(", "),
            self.dtype
        )
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Type::Tensor(tensor) => write!(f, "{}", tensor),
            Type::Tuple(fields) => write!(f, "({})", fields.iter().join(", ")),
            Type::Func(func) => {
                if !func.type_params.is_empty() {
                    write!(
                        f,
                        "fn<{}>",
                        func.type_params.iter().map(|var| &var.name).join(", ")
                    )?;
                } else {
                    f.write_str("fn")?;
                }
                write!(f, "({}) -> {}", func.params.iter().join(", "), func.ret)
            }
            Type::Prim(prim) => write!(f, "{}", prim),
            Type::TypeVar(var) => write!(f, "{}", var.name),
        }
    }
}
