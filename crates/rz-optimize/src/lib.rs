// rz-optimize: module-level rewrite passes over the razor IR
//
// Architecture:
// - pass: the pass trait, pass context, registry and priority-ordered manager
// - passes: concrete module passes
// - materialize: device constant creation used by rewrites
// - config: pass configuration loaded from JSON and the environment

pub mod config;
pub mod error;
pub mod materialize;
pub mod pass;
pub mod passes;

pub use config::*;
pub use materialize::*;
pub use pass::*;
pub use passes::*;
