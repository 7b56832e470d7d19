use std::collections::HashSet;
use std::sync::Arc;

use crate::lazy::{Node, NodePtr, Value};

fn node_id(node: &NodePtr) -> *const Node {
    Arc::as_ptr(node)
}

/// Every node reachable from `roots`, operands before their consumers, each
/// node exactly once.
pub fn post_order(roots: &[Value]) -> Vec<NodePtr> {
    let mut order = Vec::new();
    let mut emitted: HashSet<*const Node> = HashSet::new();
    let mut visiting: HashSet<*const Node> = HashSet::new();
    let mut stack: Vec<(NodePtr, bool)> = roots
        .iter()
        .rev()
        .map(|value| (value.node().clone(), false))
        .collect();

    while let Some((node, expanded)) = stack.pop() {
        let id = node_id(&node);
        if emitted.contains(&id) {
            continue;
        }
        if expanded {
            visiting.remove(&id);
            emitted.insert(id);
            order.push(node);
            continue;
        }
        if !visiting.insert(id) {
            // Already on the stack below us; it is emitted when unwound.
            continue;
        }
        stack.push((node.clone(), true));
        for operand in node.operands().iter().rev() {
            if !emitted.contains(&node_id(operand.node())) {
                stack.push((operand.node().clone(), false));
            }
        }
    }
    order
}
