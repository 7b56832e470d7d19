use std::fmt::{self, Display, Formatter};
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::hash::{hash_combine, HashValue};
use crate::lazy::ops::{Generic, NodeOp, ShapeRule};
use crate::lazy::shape_cache::{ShapeCell, ShapeInference};
use crate::lazy::{OpKind, Shape};

pub type NodePtr = Arc<Node>;

/// Ordered operand list of a node.
pub type OpList = Vec<Value>;

/// One output of a (possibly multi-output) node.
#[derive(Debug, Clone)]
pub struct Value {
    node: NodePtr,
    index: usize,
}

impl Value {
    pub fn new(node: NodePtr, index: usize) -> Result<Self> {
        if index >= node.num_outputs() {
            return Err(Error::IndexOutOfRange {
                op: node.kind().to_string(),
                index,
                num_outputs: node.num_outputs(),
            });
        }
        Ok(Self { node, index })
    }

    pub fn node(&self) -> &NodePtr {
        &self.node
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn kind(&self) -> &OpKind {
        self.node.kind()
    }

    pub fn hash(&self) -> HashValue {
        hash_combine(self.node.hash(), self.index as HashValue)
    }

    pub fn shape(&self) -> Result<Shape> {
        self.node.shape(self.index)
    }
}

impl From<NodePtr> for Value {
    fn from(node: NodePtr) -> Self {
        Value { node, index: 0 }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.node, &other.node) && self.index == other.index
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.node.hash());
        state.write_usize(self.index);
    }
}

/// Immutable lazy IR node.
pub struct Node {
    kind: OpKind,
    operands: OpList,
    num_outputs: usize,
    /// Hash of the operator kind and its parameters only.
    node_hash: HashValue,
    /// `node_hash` folded with the hashes of all operands.
    hash: HashValue,
    op: NodeOp,
    shape: ShapeCell,
    inference: Option<Arc<dyn ShapeInference>>,
}

impl Node {
    /// Build a node for `op`. Operands are validated and the shape is either
    /// fixed now or deferred according to the operator's [`ShapeRule`].
    pub fn build(
        op: impl Into<NodeOp>,
        operands: OpList,
        inference: Option<Arc<dyn ShapeInference>>,
    ) -> Result<NodePtr> {
        let op = op.into();
        let operation = op.operation();
        let kind = operation.kind();
        operation.check_operands(&operands)?;

        let num_outputs = operation.num_outputs();
        if num_outputs == 0 {
            return Err(Error::invalid_operand(
                kind.as_str(),
                "a node must have at least one output",
            ));
        }

        let node_hash = crate::mhash!(kind, num_outputs, operation.params_hash());
        let hash = operands
            .iter()
            .fold(node_hash, |acc, operand| hash_combine(acc, operand.hash()));

        let shape = match operation.shape_rule() {
            ShapeRule::Fixed(shapes) => {
                if shapes.len() != num_outputs {
                    return Err(Error::invalid_operand(
                        kind.as_str(),
                        format!("{} shape(s) for {} output(s)", shapes.len(), num_outputs),
                    ));
                }
                ShapeCell::ready(shapes)
            }
            ShapeRule::SameAsOperand(position) => {
                if position >= operands.len() {
                    return Err(Error::invalid_operand(
                        kind.as_str(),
                        format!("shape source operand {} does not exist", position),
                    ));
                }
                ShapeCell::deferred(Box::new(move |node: &Node| {
                    let shape = node.operands()[position].shape()?;
                    Ok(vec![shape; node.num_outputs()])
                }))
            }
            ShapeRule::Backend => {
                let Some(backend) = inference.clone() else {
                    return Err(Error::invalid_operand(
                        kind.as_str(),
                        "deferred shape requires an inference backend",
                    ));
                };
                ShapeCell::deferred(Box::new(move |node: &Node| {
                    crate::debug!("inferring shape of {}", node.kind());
                    backend.infer(node)
                }))
            }
        };

        crate::trace!("built node {} (hash {:016x})", kind, hash);
        Ok(Arc::new(Node {
            kind,
            operands,
            num_outputs,
            node_hash,
            hash,
            op,
            shape,
            inference,
        }))
    }

    /// Operator-agnostic node: kind, operands, output arity and an explicit
    /// hash seed standing in for the parameters.
    pub fn new(
        kind: impl Into<OpKind>,
        operands: OpList,
        num_outputs: usize,
        hash_seed: HashValue,
        inference: Arc<dyn ShapeInference>,
    ) -> Result<NodePtr> {
        let generic = Generic::new(kind, operands.len(), num_outputs, hash_seed);
        Node::build(generic, operands, Some(inference))
    }

    pub fn kind(&self) -> &OpKind {
        &self.kind
    }

    pub fn operands(&self) -> &[Value] {
        &self.operands
    }

    pub fn operand(&self, index: usize) -> Result<&Value> {
        self.operands.get(index).ok_or_else(|| {
            Error::invalid_operand(
                self.kind.as_str(),
                format!(
                    "operand {} requested from a node with {} operand(s)",
                    index,
                    self.operands.len()
                ),
            )
        })
    }

    pub fn num_outputs(&self) -> usize {
        self.num_outputs
    }

    pub fn hash(&self) -> HashValue {
        self.hash
    }

    pub fn node_hash(&self) -> HashValue {
        self.node_hash
    }

    pub fn op(&self) -> &NodeOp {
        &self.op
    }

    pub fn inference(&self) -> Option<&Arc<dyn ShapeInference>> {
        self.inference.as_ref()
    }

    pub fn shapes(&self) -> Result<Arc<[Shape]>> {
        self.shape.get_or_compute(self)
    }

    pub fn shape(&self, output_index: usize) -> Result<Shape> {
        if output_index >= self.num_outputs {
            return Err(Error::IndexOutOfRange {
                op: self.kind.to_string(),
                index: output_index,
                num_outputs: self.num_outputs,
            });
        }
        let shapes = self.shapes()?;
        Ok(shapes[output_index].clone())
    }

    pub fn is_shape_evaluated(&self) -> bool {
        self.shape.is_evaluated()
    }

    /// New node with the same operator parameters but other operands. The
    /// shape of the clone is deferred afresh.
    pub fn clone_with(&self, operands: &[Value]) -> Result<NodePtr> {
        Node::build(self.op.clone(), operands.to_vec(), self.inference.clone())
    }

    /// Same operator, same parameters and identical operands.
    pub fn structurally_eq(&self, other: &Node) -> bool {
        self.hash == other.hash
            && self.kind == other.kind
            && self.num_outputs == other.num_outputs
            && self.op == other.op
            && self.operands == other.operands
    }

    /// Deterministic text form: operator kind followed by every parameter.
    pub fn describe(&self) -> String {
        let attrs = self.op.operation().attrs();
        if attrs.is_empty() {
            self.kind.to_string()
        } else {
            format!("{}, {}", self.kind, attrs)
        }
    }
}

impl Display for Node {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("kind", &self.kind)
            .field("num_outputs", &self.num_outputs)
            .field("hash", &format_args!("{:016x}", self.hash))
            .field("op", &self.op)
            .field("operands", &self.operands.len())
            .field("shape", &self.shape)
            .finish()
    }
}
