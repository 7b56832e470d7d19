use crate::error::{Error, Result};
use crate::ir::{Function, GlobalVar};

/// Named collection of functions, kept in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IRModule {
    functions: Vec<(GlobalVar, Function)>,
}

impl IRModule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_functions<I, S>(functions: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Function)>,
        S: Into<String>,
    {
        let mut module = Self::new();
        for (name, function) in functions {
            module.add(GlobalVar::new(name), function, false)?;
        }
        Ok(module)
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.functions
            .iter()
            .position(|(global, _)| global.name() == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn lookup(&self, name: &str) -> Result<&Function> {
        self.position(name)
            .map(|index| &self.functions[index].1)
            .ok_or_else(|| {
                Error::malformed(format!("module has no function named {}", name))
            })
    }

    pub fn get_global_var(&self, name: &str) -> Result<GlobalVar> {
        self.position(name)
            .map(|index| self.functions[index].0.clone())
            .ok_or_else(|| Error::malformed(format!("module has no global {}", name)))
    }

    /// Insert `function` under `global`. An existing definition is replaced
    /// in place only when `update` is set.
    pub fn add(&mut self, global: GlobalVar, function: Function, update: bool) -> Result<()> {
        match self.position(global.name()) {
            Some(index) if update => {
                self.functions[index].1 = function;
                Ok(())
            }
            Some(_) => Err(Error::malformed(format!(
                "{} is already defined in the module",
                global
            ))),
            None => {
                self.functions.push((global, function));
                Ok(())
            }
        }
    }

    pub fn functions(&self) -> impl Iterator<Item = (&GlobalVar, &Function)> {
        self.functions
            .iter()
            .map(|(global, function)| (global, function))
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}
