use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

use crate::ir::pretty::escape_string;
use crate::lazy::ElementType;

/// Scalar or list parameter attached to an operator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Attr {
    None,
    Bool(bool),
    Int(i64),
    Ints(Vec<i64>),
    Str(String),
    Dtype(ElementType),
}

impl Display for Attr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Attr::None => f.write_str("null"),
            Attr::Bool(value) => write!(f, "{}", value),
            Attr::Int(value) => write!(f, "{}", value),
            Attr::Ints(values) => write!(f, "({})", values.iter().join(", ")),
            Attr::Str(value) => write!(f, "\"{}\"", escape_string(value)),
            Attr::Dtype(dtype) => write!(f, "{}", dtype),
        }
    }
}

impl From<bool> for Attr {
    fn from(value: bool) -> Self {
        Attr::Bool(value)
    }
}

impl From<i64> for Attr {
    fn from(value: i64) -> Self {
        Attr::Int(value)
    }
}

impl From<&[i64]> for Attr {
    fn from(values: &[i64]) -> Self {
        Attr::Ints(values.to_vec())
    }
}

impl From<Vec<i64>> for Attr {
    fn from(values: Vec<i64>) -> Self {
        Attr::Ints(values)
    }
}

impl From<&str> for Attr {
    fn from(value: &str) -> Self {
        Attr::Str(value.to_string())
    }
}

impl From<ElementType> for Attr {
    fn from(value: ElementType) -> Self {
        Attr::Dtype(value)
    }
}

impl<T: Into<Attr>> From<Option<T>> for Attr {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Attr::None)
    }
}

/// Ordered name/value parameter list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Attrs {
    entries: Vec<(String, Attr)>,
}

impl Attrs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<Attr>) -> Self {
        self.entries.push((name.into(), value.into()));
        self
    }

    pub fn get(&self, name: &str) -> Option<&Attr> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Attr)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl Display for Attrs {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let rendered = self
            .entries
            .iter()
            .map(|(key, value)| format!("{}={}", key, value))
            .join(", ");
        f.write_str(&rendered)
    }
}
