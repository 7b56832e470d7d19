//! Removes function-typed leaves from a function's result.
//!
//! The lowering target can neither represent nor return closures, so every
//! function-typed leaf of the result type, however deeply nested in tuples,
//! is replaced by a tensor placeholder. The substitution is lossy: the
//! closure's behaviour is dropped and only its slot in the result is kept
//! well typed. Tuples without function-typed leaves are left as they are,
//! which makes the rewrite idempotent.

use rz_core::ir::op::names;
use rz_core::ir::{
    well_formed, Call, ExplicitLetList, Expr, Function, IRModule, LetList, Op, OpRegistry, Type,
};
use rz_core::lazy::ElementType;
use rz_core::{Error, Result};

use crate::config::ClosurePlaceholderPolicy;
use crate::error::unsupported_result_type;
use crate::materialize::TensorMaterializer;
use crate::pass::{ModulePass, PassContext, PassInfo};

const PLACEHOLDER_SHAPE: [i64; 1] = [1];

/// Rewrites a single function. Holds only borrowed dependencies; the input
/// function is never modified.
pub struct ClosureEliminator<'a> {
    ops: &'a OpRegistry,
    materializer: &'a dyn TensorMaterializer,
    policy: ClosurePlaceholderPolicy,
}

impl<'a> ClosureEliminator<'a> {
    pub fn new(
        ops: &'a OpRegistry,
        materializer: &'a dyn TensorMaterializer,
        policy: ClosurePlaceholderPolicy,
    ) -> Self {
        Self {
            ops,
            materializer,
            policy,
        }
    }

    pub fn from_context(ctx: &'a PassContext) -> Self {
        Self::new(
            ctx.ops(),
            ctx.materializer(),
            ctx.config().closure_placeholder,
        )
    }

    pub fn eliminate(&self, function: &Function) -> Result<Function> {
        let chain = ExplicitLetList::make(&function.body);
        let result_type = chain
            .ret
            .checked_type()
            .or(function.ret_type.as_ref())
            .cloned()
            .ok_or_else(|| {
                Error::malformed(format!(
                    "cannot eliminate closures: {} has no checked type",
                    chain.ret
                ))
            })?;
        ensure_eliminable(&result_type)?;

        let ExplicitLetList { vars, exprs, ret } = chain;
        let mut rewritten_type = None;
        let body = LetList::with_builder(LetList::with_prefix("ce"), |ll| {
            for (var, expr) in vars.into_iter().zip(exprs) {
                ll.push_var(var, expr)?;
            }
            let (value, ty) = self.rewrite(ll, ret.into(), &result_type)?;
            rewritten_type = Some(ty);
            Ok(value)
        })?;

        Ok(Function::new(
            function.params.clone(),
            body,
            rewritten_type,
            function.type_params.clone(),
        ))
    }

    /// Replacement for `value` of type `ty`, together with its new type.
    fn rewrite(&self, ll: &mut LetList, value: Expr, ty: &Type) -> Result<(Expr, Type)> {
        match ty {
            Type::Tensor(_) => Ok((value, ty.clone())),
            Type::Tuple(_) if !ty.contains_func() => Ok((value, ty.clone())),
            Type::Tuple(fields) => {
                let mut values = Vec::with_capacity(fields.len());
                let mut types = Vec::with_capacity(fields.len());
                for (index, field) in fields.iter().enumerate() {
                    let projection =
                        ll.push_typed(Expr::tuple_get_item(value.clone(), index), field.clone());
                    let (field_value, field_type) = self.rewrite(ll, projection.into(), field)?;
                    values.push(field_value);
                    types.push(field_type);
                }
                let tuple_type = Type::Tuple(types);
                let tuple = ll.push_typed(Expr::Tuple(values), tuple_type.clone());
                Ok((tuple.into(), tuple_type))
            }
            Type::Func(_) => {
                rz_core::warn!(
                    "replacing closure {} of type {} with a {:?} placeholder",
                    value,
                    ty,
                    self.policy
                );
                self.placeholder(ll)
            }
            Type::Prim(_) | Type::TypeVar(_) => Err(unsupported_result_type(ty)),
        }
    }

    fn placeholder(&self, ll: &mut LetList) -> Result<(Expr, Type)> {
        let ones = self
            .materializer
            .ones(ElementType::F32, &PLACEHOLDER_SHAPE)?;
        let ty = Type::tensor(ones.shape.clone(), ones.dtype);
        let var = match self.policy {
            ClosurePlaceholderPolicy::Ones => ll.push_typed(Expr::Constant(ones), ty.clone()),
            ClosurePlaceholderPolicy::AbsOfOnes => {
                let abs = self.placeholder_op()?;
                ll.push_typed(Call::op(abs, vec![Expr::Constant(ones)]), ty.clone())
            }
        };
        Ok((var.into(), ty))
    }

    /// `abs` may only wrap the constant while it is a pure unary operator.
    fn placeholder_op(&self) -> Result<Op> {
        let op = self.ops.get(names::ABS)?;
        let pure_unary = self
            .ops
            .def(names::ABS)
            .is_some_and(|def| def.pure && def.num_inputs == Some(1));
        if !pure_unary {
            return Err(Error::UnsupportedConfiguration(format!(
                "{} cannot build a closure placeholder: it must be pure and take one input",
                op
            )));
        }
        Ok(op)
    }
}

/// Fail before rewriting anything when some leaf can be neither kept nor
/// replaced.
fn ensure_eliminable(ty: &Type) -> Result<()> {
    match ty {
        Type::Tensor(_) | Type::Func(_) => Ok(()),
        Type::Tuple(fields) => fields.iter().try_for_each(ensure_eliminable),
        Type::Prim(_) | Type::TypeVar(_) => Err(unsupported_result_type(ty)),
    }
}

/// Module pass rewriting the configured entry function in place; every other
/// function is carried over untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct EliminateClosure;

impl EliminateClosure {
    pub const NAME: &'static str = "eliminate_closure";
    pub const OPT_LEVEL: u8 = 1;
}

impl ModulePass for EliminateClosure {
    fn info(&self) -> PassInfo {
        PassInfo::new(Self::NAME, Self::OPT_LEVEL)
    }

    fn run(&self, module: &IRModule, ctx: &PassContext) -> Result<IRModule> {
        let entry = ctx.config().entry_function.as_str();
        let global = module.get_global_var(entry)?;
        let function = module.lookup(entry)?;

        let rewritten = ClosureEliminator::from_context(ctx).eliminate(function)?;
        well_formed::check_function(&rewritten)?;
        rz_core::debug!("eliminated closures from {}", global);

        let mut output = module.clone();
        output.add(global, rewritten, true)?;
        Ok(output)
    }
}
