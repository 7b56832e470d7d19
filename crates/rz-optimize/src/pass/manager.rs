use itertools::Itertools;
use rz_core::ir::{pretty, IRModule, PrettyOptions};
use rz_core::{Error, Result};
use tracing::info_span;

use crate::config::{normalize_pass_name, PassConfig};
use crate::error::optimization_error_in_pass;
use crate::pass::{ModulePass, PassContext, PassInfo, PassRegistry};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PassReport {
    pub executed: Vec<String>,
    pub skipped: Vec<String>,
}

/// Runs module passes ordered by optimization level, then by the order they
/// were added.
#[derive(Default)]
pub struct PassManager {
    passes: Vec<Box<dyn ModulePass>>,
}

impl PassManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every pass the registry knows, in registration order.
    pub fn from_registry(registry: &PassRegistry) -> Self {
        Self {
            passes: registry.create_all(),
        }
    }

    pub fn with_passes(registry: &PassRegistry, names: &[&str]) -> Result<Self> {
        crate::opt_ensure!(
            names.iter().map(|name| normalize_pass_name(name)).all_unique(),
            format!("a pass is scheduled more than once: {}", names.join(", "))
        );
        let passes = names
            .iter()
            .map(|name| registry.create(name))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { passes })
    }

    pub fn add(&mut self, pass: Box<dyn ModulePass>) {
        self.passes.push(pass);
    }

    pub fn len(&self) -> usize {
        self.passes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }

    fn should_run(info: &PassInfo, config: &PassConfig) -> bool {
        if info.required || config.is_required(&info.name) {
            return true;
        }
        !config.is_disabled(&info.name) && info.opt_level <= config.opt_level
    }

    /// Names of the passes in execution order, including skipped ones.
    pub fn schedule(&self) -> Vec<String> {
        self.ordered().map(|(info, _)| info.name).collect()
    }

    fn ordered(&self) -> impl Iterator<Item = (PassInfo, &dyn ModulePass)> {
        self.passes
            .iter()
            .map(|pass| (pass.info(), pass.as_ref()))
            .sorted_by_key(|(info, _)| info.opt_level)
    }

    pub fn run(&self, module: &IRModule, ctx: &PassContext) -> Result<IRModule> {
        self.run_with_report(module, ctx).map(|(module, _)| module)
    }

    /// Run the schedule, stopping at the first failing pass. The input module
    /// is never modified. Untyped failures are tagged with the pass name.
    pub fn run_with_report(
        &self,
        module: &IRModule,
        ctx: &PassContext,
    ) -> Result<(IRModule, PassReport)> {
        let config = ctx.config();
        let mut report = PassReport::default();
        let mut current = module.clone();
        for (info, pass) in self.ordered() {
            if !Self::should_run(&info, config) {
                rz_core::debug!(
                    "skipping pass {} (level {} > {} or disabled)",
                    info.name,
                    info.opt_level,
                    config.opt_level
                );
                report.skipped.push(info.name);
                continue;
            }
            let span = info_span!("module_pass", pass = %info.name, level = info.opt_level);
            let _guard = span.enter();
            current = pass.run(&current, ctx).map_err(|err| match err {
                Error::Generic(message) => optimization_error_in_pass(message, &info.name),
                err => err,
            })?;
            if config.trace_passes {
                rz_core::info!(
                    "module after {}:\n{}",
                    info.name,
                    pretty(&current, PrettyOptions::default())
                );
            }
            report.executed.push(info.name);
        }
        Ok((current, report))
    }
}
