//! Block layout for functions and modules.
//!
//! `Display` on [`Expr`] renders a let chain on one line; this printer puts
//! every binding on its own line and indents function bodies.

use std::fmt::{self, Display, Formatter};

use crate::ir::{Expr, Function, GlobalVar, IRModule};

#[derive(Debug, Clone, Copy)]
pub struct PrettyOptions {
    /// Spaces per nesting level.
    pub indent_size: usize,
    /// Annotate let-bound variables with their checked types.
    pub show_types: bool,
}

impl Default for PrettyOptions {
    fn default() -> Self {
        Self {
            indent_size: 4,
            show_types: true,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Printable<'a> {
    Function(&'a Function),
    Expr(&'a Expr),
    Module(&'a IRModule),
}

impl<'a> From<&'a Function> for Printable<'a> {
    fn from(function: &'a Function) -> Self {
        Printable::Function(function)
    }
}

impl<'a> From<&'a Expr> for Printable<'a> {
    fn from(expr: &'a Expr) -> Self {
        Printable::Expr(expr)
    }
}

impl<'a> From<&'a IRModule> for Printable<'a> {
    fn from(module: &'a IRModule) -> Self {
        Printable::Module(module)
    }
}

/// `Display` adapter returned by [`pretty`].
pub struct Pretty<'a> {
    target: Printable<'a>,
    options: PrettyOptions,
}

pub fn pretty<'a>(target: impl Into<Printable<'a>>, options: PrettyOptions) -> Pretty<'a> {
    Pretty {
        target: target.into(),
        options,
    }
}

impl Display for Pretty<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut printer = BlockPrinter {
            f,
            options: self.options,
            depth: 0,
        };
        match self.target {
            Printable::Function(function) => printer.function(None, function),
            Printable::Expr(Expr::Function(function)) => printer.function(None, function),
            Printable::Expr(expr) => printer.block(expr),
            Printable::Module(module) => {
                for (index, (global, function)) in module.functions().enumerate() {
                    if index > 0 {
                        writeln!(printer.f)?;
                    }
                    printer.function(Some(global), function)?;
                }
                Ok(())
            }
        }
    }
}

struct BlockPrinter<'a, 'f> {
    f: &'a mut Formatter<'f>,
    options: PrettyOptions,
    depth: usize,
}

impl BlockPrinter<'_, '_> {
    fn line(&mut self, line: impl Display) -> fmt::Result {
        let width = self.depth * self.options.indent_size;
        writeln!(self.f, "{:width$}{}", "", line, width = width)
    }

    fn function(&mut self, global: Option<&GlobalVar>, function: &Function) -> fmt::Result {
        let header = match global {
            Some(global) => format!("def {} = {} {{", global, function.signature()),
            None => format!("{} {{", function.signature()),
        };
        self.line(header)?;
        self.nested(&function.body)?;
        self.line("}")
    }

    fn nested(&mut self, body: &Expr) -> fmt::Result {
        self.depth += 1;
        let result = self.block(body);
        self.depth -= 1;
        result
    }

    fn block(&mut self, body: &Expr) -> fmt::Result {
        let mut cursor = body;
        while let Expr::Let(binding) = cursor {
            let target = match (self.options.show_types, binding.var.checked_type()) {
                (true, Some(ty)) => format!("{}: {}", binding.var, ty),
                _ => binding.var.to_string(),
            };
            match binding.value.as_ref() {
                Expr::Function(function) => {
                    self.line(format!("let {} = {} {{", target, function.signature()))?;
                    self.nested(&function.body)?;
                    self.line("};")?;
                }
                value => self.line(format!("let {} = {};", target, value))?,
            }
            cursor = binding.body.as_ref();
        }
        self.line(cursor)
    }
}

pub fn escape_string(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            _ => out.push(ch),
        }
    }
    out
}
