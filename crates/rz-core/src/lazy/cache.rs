//! Hash-consing of lazy nodes.
//!
//! Backed by `dashmap::DashMap` so independent subgraphs can be built from
//! several threads against one cache.

use dashmap::DashMap;

use crate::hash::HashValue;
use crate::lazy::NodePtr;

#[derive(Default)]
pub struct NodeCache {
    buckets: DashMap<HashValue, Vec<NodePtr>>,
}

impl NodeCache {
    pub fn new() -> Self {
        Self {
            buckets: DashMap::new(),
        }
    }

    /// Return the cached node structurally equal to `node`, or cache and
    /// return `node` itself.
    pub fn intern(&self, node: NodePtr) -> NodePtr {
        let mut bucket = self.buckets.entry(node.hash()).or_default();
        if let Some(existing) = bucket.iter().find(|cached| cached.structurally_eq(&node)) {
            crate::trace!("reusing cached node {}", existing.kind());
            return existing.clone();
        }
        bucket.push(node.clone());
        node
    }

    pub fn lookup(&self, hash: HashValue) -> Vec<NodePtr> {
        self.buckets
            .get(&hash)
            .map(|entry| entry.value().clone())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.buckets.iter().map(|entry| entry.value().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.buckets.clear();
    }
}
