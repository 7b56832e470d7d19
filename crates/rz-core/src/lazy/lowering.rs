//! Lowering of a lazy node DAG into a let-normal-form function.
//!
//! Device data leaves become parameters, every other node becomes one
//! binding calling an operator named after the node kind. Multi-output nodes
//! bind a tuple once and project each output that is actually used.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::ir::{Call, Expr, Function, LetList, Op, TensorType, Type, Var};
use crate::lazy::ops::NodeOp;
use crate::lazy::{post_order, Node, NodePtr, Value};

fn node_type(node: &Node) -> Result<Type> {
    let shapes = node.shapes()?;
    Ok(match shapes.as_ref() {
        [single] => Type::Tensor(TensorType::from(single)),
        many => Type::Tuple(
            many.iter()
                .map(|shape| Type::Tensor(TensorType::from(shape)))
                .collect(),
        ),
    })
}

struct GraphLowering {
    params: Vec<Var>,
    builder: LetList,
    node_vars: HashMap<*const Node, Var>,
    projections: HashMap<(*const Node, usize), Var>,
}

impl GraphLowering {
    fn new() -> Self {
        Self {
            params: Vec::new(),
            builder: LetList::with_prefix("v"),
            node_vars: HashMap::new(),
            projections: HashMap::new(),
        }
    }

    fn value_expr(&mut self, value: &Value) -> Result<Expr> {
        let node = value.node();
        let key = Arc::as_ptr(node);
        let var = self.node_vars.get(&key).cloned().ok_or_else(|| {
            Error::malformed(format!("{} is used before it is lowered", node.kind()))
        })?;
        if node.num_outputs() == 1 {
            return Ok(var.into());
        }
        if let Some(projection) = self.projections.get(&(key, value.index())) {
            return Ok(projection.clone().into());
        }
        let ty = Type::Tensor(TensorType::from(&value.shape()?));
        let projection = self
            .builder
            .push_typed(Expr::tuple_get_item(var, value.index()), ty);
        self.projections
            .insert((key, value.index()), projection.clone());
        Ok(projection.into())
    }

    fn lower_node(&mut self, node: &NodePtr) -> Result<()> {
        let var = match node.op() {
            NodeOp::DeviceData(data) => {
                let ty = Type::Tensor(TensorType::from(data.shape()));
                let param = Var::typed(data.name(), ty);
                self.params.push(param.clone());
                param
            }
            op => {
                let args = node
                    .operands()
                    .iter()
                    .map(|operand| self.value_expr(operand))
                    .collect::<Result<Vec<_>>>()?;
                let call = Call::op(Op::new(node.kind().as_str()), args)
                    .with_attrs(op.operation().attrs());
                self.builder.push_typed(call, node_type(node)?)
            }
        };
        self.node_vars.insert(Arc::as_ptr(node), var);
        Ok(())
    }
}

/// Lower the graph reachable from `outputs` into a function returning them,
/// as a tuple when there is more than one.
pub fn lower_graph(outputs: &[Value]) -> Result<Function> {
    if outputs.is_empty() {
        return Err(Error::malformed("cannot lower a graph without outputs"));
    }
    let mut lowering = GraphLowering::new();
    let order = post_order(outputs);
    crate::debug!("lowering {} lazy node(s)", order.len());
    for node in &order {
        lowering.lower_node(node)?;
    }

    let mut results = Vec::with_capacity(outputs.len());
    let mut result_types = Vec::with_capacity(outputs.len());
    for output in outputs {
        results.push(lowering.value_expr(output)?);
        result_types.push(Type::Tensor(TensorType::from(&output.shape()?)));
    }
    let (ret, ret_type) = if results.len() == 1 {
        (results.remove(0), result_types.remove(0))
    } else {
        let ty = Type::Tuple(result_types);
        let var = lowering.builder.push_typed(Expr::Tuple(results), ty.clone());
        (var.into(), ty)
    };

    let GraphLowering { params, builder, .. } = lowering;
    Ok(Function::new(params, builder.get(ret), Some(ret_type), Vec::new()))
}
