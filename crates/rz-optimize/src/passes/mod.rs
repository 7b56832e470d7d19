// Passes - module-level rewrites that implement ModulePass

pub mod eliminate_closure;

pub use eliminate_closure::*;
