use crate::error::Result;
use crate::hash::HashValue;
use crate::ir::Attrs;
use crate::lazy::ops::{expect_operands, Operation};
use crate::lazy::{OpKind, Value};

/// Operator without typed parameters; an explicit hash seed stands in for
/// whatever distinguishes two instances of the same kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Generic {
    kind: OpKind,
    num_operands: usize,
    num_outputs: usize,
    hash_seed: HashValue,
}

impl Generic {
    pub fn new(
        kind: impl Into<OpKind>,
        num_operands: usize,
        num_outputs: usize,
        hash_seed: HashValue,
    ) -> Self {
        Self {
            kind: kind.into(),
            num_operands,
            num_outputs,
            hash_seed,
        }
    }

    pub fn hash_seed(&self) -> HashValue {
        self.hash_seed
    }
}

impl Operation for Generic {
    fn kind(&self) -> OpKind {
        self.kind.clone()
    }

    fn num_outputs(&self) -> usize {
        self.num_outputs
    }

    fn check_operands(&self, operands: &[Value]) -> Result<()> {
        expect_operands(&self.kind, operands, self.num_operands)
    }

    fn attrs(&self) -> Attrs {
        Attrs::new()
    }

    fn params_hash(&self) -> HashValue {
        self.hash_seed
    }
}
