use itertools::Itertools;
use rz_core::{Error, Result};

use crate::config::normalize_pass_name;
use crate::error::optimization_error;
use crate::pass::ModulePass;
use crate::passes::EliminateClosure;

pub type PassFactory = Box<dyn Fn() -> Box<dyn ModulePass> + Send + Sync>;

/// Name to pass factory table, in registration order.
#[derive(Default)]
pub struct PassRegistry {
    factories: Vec<(String, PassFactory)>,
}

impl PassRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        let eliminate_closure: PassFactory =
            Box::new(|| -> Box<dyn ModulePass> { Box::new(EliminateClosure) });
        registry
            .factories
            .push((EliminateClosure::NAME.to_string(), eliminate_closure));
        registry
    }

    pub fn register<F>(&mut self, name: &str, factory: F) -> Result<()>
    where
        F: Fn() -> Box<dyn ModulePass> + Send + Sync + 'static,
    {
        let name = normalize_pass_name(name);
        if self.contains(&name) {
            return Err(Error::UnsupportedConfiguration(format!(
                "module pass {} is already registered",
                name
            )));
        }
        self.factories.push((name, Box::new(factory)));
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        let name = normalize_pass_name(name);
        self.factories.iter().any(|(registered, _)| *registered == name)
    }

    pub fn create(&self, name: &str) -> Result<Box<dyn ModulePass>> {
        let wanted = normalize_pass_name(name);
        self.factories
            .iter()
            .find(|(registered, _)| *registered == wanted)
            .map(|(_, factory)| factory())
            .ok_or_else(|| {
                optimization_error(format!(
                    "unknown module pass: {} (known: {})",
                    name,
                    self.names().join(", ")
                ))
            })
    }

    pub fn create_all(&self) -> Vec<Box<dyn ModulePass>> {
        self.factories.iter().map(|(_, factory)| factory()).collect()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.iter().map(|(name, _)| name.as_str())
    }
}
