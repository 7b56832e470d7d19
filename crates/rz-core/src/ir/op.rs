//! Primitive operators and the registry they are resolved from.
//!
//! The registry is an ordinary value handed to whoever needs to resolve an
//! operator by name; there is no process-wide table.

use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Handle to a registered primitive operator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Op {
    name: String,
}

impl Op {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Display for Op {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpDef {
    pub name: String,
    /// `None` for variadic operators.
    pub num_inputs: Option<usize>,
    /// Free of side effects, so a call may be dropped or duplicated.
    pub pure: bool,
}

impl OpDef {
    pub fn new(name: impl Into<String>, num_inputs: Option<usize>) -> Self {
        Self {
            name: name.into(),
            num_inputs,
            pure: true,
        }
    }

    pub fn impure(mut self) -> Self {
        self.pure = false;
        self
    }
}

pub mod names {
    pub const ABS: &str = "razor.op.abs";
    pub const ADD: &str = "razor.op.add";
    pub const MULTIPLY: &str = "razor.op.multiply";
    pub const RELU: &str = "razor.op.relu";
    pub const NEGATIVE: &str = "razor.op.negative";
    pub const ZEROS_LIKE: &str = "razor.op.zeros_like";
    pub const ONES_LIKE: &str = "razor.op.ones_like";
    pub const MATMUL: &str = "razor.op.matmul";
}

#[derive(Debug, Clone, Default)]
pub struct OpRegistry {
    ops: BTreeMap<String, OpDef>,
}

impl OpRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-populated with the elementwise catalog.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        let defaults = [
            OpDef::new(names::ABS, Some(1)),
            OpDef::new(names::ADD, Some(2)),
            OpDef::new(names::MULTIPLY, Some(2)),
            OpDef::new(names::RELU, Some(1)),
            OpDef::new(names::NEGATIVE, Some(1)),
            OpDef::new(names::ZEROS_LIKE, Some(1)),
            OpDef::new(names::ONES_LIKE, Some(1)),
            OpDef::new(names::MATMUL, Some(2)),
        ];
        for def in defaults {
            registry.ops.insert(def.name.clone(), def);
        }
        registry
    }

    pub fn register(&mut self, def: OpDef) -> Result<()> {
        if self.ops.contains_key(&def.name) {
            return Err(Error::UnsupportedConfiguration(format!(
                "operator {} is already registered",
                def.name
            )));
        }
        self.ops.insert(def.name.clone(), def);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<Op> {
        self.ops
            .get(name)
            .map(|def| Op::new(def.name.clone()))
            .ok_or_else(|| Error::malformed(format!("unknown operator {}", name)))
    }

    pub fn def(&self, name: &str) -> Option<&OpDef> {
        self.ops.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.ops.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.ops.keys().map(String::as_str)
    }
}
