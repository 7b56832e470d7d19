use std::sync::Arc;

use crate::error::Result;
use crate::hash::HashValue;
use crate::lazy::ops::NodeOp;
use crate::lazy::{Node, NodeCache, NodePtr, OpKind, OpList, ShapeInference};

/// Everything node construction needs: the shape inference backend every
/// deferred shape is delegated to and an optional interning cache.
#[derive(Clone)]
pub struct GraphContext {
    inference: Arc<dyn ShapeInference>,
    cache: Option<Arc<NodeCache>>,
}

impl GraphContext {
    pub fn new(inference: Arc<dyn ShapeInference>) -> Self {
        Self {
            inference,
            cache: None,
        }
    }

    pub fn with_cache(mut self, cache: Arc<NodeCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn inference(&self) -> &Arc<dyn ShapeInference> {
        &self.inference
    }

    pub fn cache(&self) -> Option<&Arc<NodeCache>> {
        self.cache.as_ref()
    }

    pub fn make_node(&self, op: impl Into<NodeOp>, operands: OpList) -> Result<NodePtr> {
        let node = Node::build(op, operands, Some(self.inference.clone()))?;
        Ok(match &self.cache {
            Some(cache) => cache.intern(node),
            None => node,
        })
    }

    pub fn generic(
        &self,
        kind: impl Into<OpKind>,
        operands: OpList,
        num_outputs: usize,
        hash_seed: HashValue,
    ) -> Result<NodePtr> {
        let op = crate::lazy::ops::Generic::new(kind, operands.len(), num_outputs, hash_seed);
        self.make_node(op, operands)
    }
}
