//! Let-normal-form program IR consumed by module passes.

pub mod attrs;
pub mod expr;
pub mod function;
pub mod let_list;
pub mod module;
pub mod op;
pub mod pretty;
pub mod ty;
pub mod value;
pub mod well_formed;

pub use attrs::{Attr, Attrs};
pub use expr::{Call, CallTarget, Expr, GlobalVar, Let, TupleGetItem, Var};
pub use function::Function;
pub use let_list::{ExplicitLetList, LetList};
pub use module::IRModule;
pub use op::{Op, OpDef, OpRegistry};
pub use pretty::{pretty, Pretty, PrettyOptions, Printable};
pub use ty::{FuncType, PrimType, TensorType, Type, TypeVar};
pub use value::{Device, DeviceKind, TensorValue};
