//! Compilation sessions and the interface to the surrounding toolchain.

use std::path::PathBuf;

use enum_display::EnumDisplay;

use crate::core::diag::Location;
use crate::core::ids::QualifiedId;
use crate::core::parse::{ExprParseError, parse_expression};
use crate::core::tree::{Expr, Module};
use crate::core::types::{TypeInfo, TypeLookup};

pub mod compile;
pub mod memory;
pub mod options;

pub use compile::{CompileOutput, GlueCompiler};
pub use memory::MemoryDriver;
pub use options::CompileOptions;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumDisplay)]
pub enum UnitLanguage {
    #[display("hlt")]
    Hilti,
    #[display("spicy")]
    Spicy,
}

/// A generated module submitted to the driver for compilation.
#[derive(Debug, Clone)]
pub struct AstUnit {
    pub language: UnitLanguage,
    pub module: Module,
}

impl AstUnit {
    pub fn new(language: UnitLanguage, module: Module) -> Self {
        Self { language, module }
    }

    /// `host_init.hlt`, `spicy_hooks_HTTP.spicy`, ...
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.module.id, self.language)
    }
}

/// What the glue compiler needs from the toolchain that hosts it.
pub trait Driver: TypeLookup {
    /// Declared grammar types, optionally only the exported ones.
    fn types(&self, exported_only: bool) -> Vec<TypeInfo>;

    /// Grammar modules known to the driver, with their source files.
    fn modules(&self) -> Vec<(QualifiedId, PathBuf)> {
        Vec::new()
    }

    /// Called for every `export` before exported types are enumerated.
    fn new_export(&mut self, _id: &QualifiedId) {}

    fn debug(&self) -> bool;

    fn add_input(&mut self, unit: AstUnit);

    fn parse_expression(&self, text: &str, location: &Location) -> Result<Expr, ExprParseError> {
        parse_expression(text, Some(location))
    }
}
