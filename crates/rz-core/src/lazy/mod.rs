//! Deferred-execution tensor graph: immutable nodes, their output handles,
//! and lazily inferred shapes.

pub mod cache;
pub mod context;
pub mod lowering;
pub mod node;
pub mod op_kind;
pub mod ops;
pub mod shape;
pub mod shape_cache;
pub mod traversal;

pub use cache::NodeCache;
pub use context::GraphContext;
pub use lowering::lower_graph;
pub use node::{Node, NodePtr, OpList, Value};
pub use op_kind::OpKind;
pub use shape::{ElementType, Shape};
pub use shape_cache::{ShapeCell, ShapeInference, ShapeThunk};
pub use traversal::post_order;
