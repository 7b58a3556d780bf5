use std::path::PathBuf;

use crate::core::ids::QualifiedId;
use crate::core::types::{LookupError, TypeInfo, TypeLookup, TypeTable};
use crate::driver::{AstUnit, Driver};

/// A driver backed by a [`TypeTable`] that keeps submitted units in memory.
#[derive(Debug, Default)]
pub struct MemoryDriver {
    pub table: TypeTable,
    pub debug: bool,
    pub units: Vec<AstUnit>,
}

impl MemoryDriver {
    pub fn new(table: TypeTable) -> Self {
        Self {
            table,
            debug: false,
            units: Vec::new(),
        }
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn unit(&self, module_id: &str) -> Option<&AstUnit> {
        self.units
            .iter()
            .find(|unit| unit.module.id.as_str() == module_id)
    }
}

impl TypeLookup for MemoryDriver {
    fn lookup_type(&self, id: &QualifiedId) -> Result<TypeInfo, LookupError> {
        self.table.lookup_type(id)
    }
}

impl Driver for MemoryDriver {
    fn types(&self, exported_only: bool) -> Vec<TypeInfo> {
        self.table.types(exported_only)
    }

    fn modules(&self) -> Vec<(QualifiedId, PathBuf)> {
        self.table
            .modules()
            .map(|(id, file)| (id.clone(), file.to_path_buf()))
            .collect()
    }

    fn new_export(&mut self, id: &QualifiedId) {
        self.table.mark_exported(id);
    }

    fn debug(&self) -> bool {
        self.debug
    }

    fn add_input(&mut self, unit: AstUnit) {
        self.units.push(unit);
    }
}
