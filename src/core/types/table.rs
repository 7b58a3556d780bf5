use std::path::{Path, PathBuf};

use indexmap::{IndexMap, IndexSet};
use serde::Deserialize;

use crate::core::diag::Location;
use crate::core::ids::QualifiedId;
use crate::core::types::{GrammarType, LookupError, TypeInfo, TypeLookup};

#[derive(Debug, Deserialize)]
struct TableFile {
    #[serde(default)]
    modules: Vec<ModuleEntry>,
}

#[derive(Debug, Deserialize)]
struct ModuleEntry {
    id: QualifiedId,
    file: PathBuf,
    #[serde(default)]
    types: Vec<TypeEntry>,
}

#[derive(Debug, Deserialize)]
struct TypeEntry {
    id: QualifiedId,
    #[serde(rename = "type")]
    ty: GrammarType,
    #[serde(default)]
    exported: bool,
    #[serde(default)]
    line: Option<usize>,
}

/// In-memory index of grammar modules and their types.
#[derive(Debug, Clone, Default)]
pub struct TypeTable {
    modules: IndexMap<QualifiedId, PathBuf>,
    types: IndexMap<QualifiedId, TypeInfo>,
    exported: IndexSet<QualifiedId>,
}

impl TypeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the JSON form:
    ///
    /// ```json
    /// { "modules": [ { "id": "HTTP", "file": "http.spicy",
    ///     "types": [ { "id": "HTTP::Request", "type": { "kind": "unit", "items": [] } } ] } ] }
    /// ```
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let file: TableFile = serde_json::from_str(json)?;
        let mut table = TypeTable::new();
        for module in file.modules {
            table.add_module(module.id.clone(), module.file.clone());
            for entry in module.types {
                let location = entry.line.map(|line| Location::new(&module.file, line));
                table.add_type(&module.id, entry.id.clone(), entry.ty, location);
                if entry.exported {
                    table.mark_exported(&entry.id);
                }
            }
        }
        Ok(table)
    }

    pub fn add_module(&mut self, id: QualifiedId, file: PathBuf) {
        self.modules.insert(id, file);
    }

    /// Registers `id` as declared in `module`. The module must have been added.
    pub fn add_type(
        &mut self,
        module: &QualifiedId,
        id: QualifiedId,
        ty: GrammarType,
        location: Option<Location>,
    ) {
        let module_path = self.modules.get(module).cloned().unwrap_or_default();
        self.types.insert(
            id.clone(),
            TypeInfo {
                id,
                ty,
                module_id: module.clone(),
                module_path,
                location,
            },
        );
    }

    pub fn mark_exported(&mut self, id: &QualifiedId) {
        if self.types.contains_key(id) {
            self.exported.insert(id.clone());
        }
    }

    pub fn modules(&self) -> impl Iterator<Item = (&QualifiedId, &Path)> {
        self.modules.iter().map(|(id, file)| (id, file.as_path()))
    }

    /// All types in declaration order, or only the exported ones.
    pub fn types(&self, exported_only: bool) -> Vec<TypeInfo> {
        self.types
            .values()
            .filter(|info| !exported_only || self.exported.contains(&info.id))
            .cloned()
            .collect()
    }
}

impl TypeLookup for TypeTable {
    fn lookup_type(&self, id: &QualifiedId) -> Result<TypeInfo, LookupError> {
        self.types
            .get(id)
            .cloned()
            .ok_or_else(|| LookupError::Unknown(id.clone()))
    }
}

#[cfg(test)]
#[path = "../../tests/types/t_table.rs"]
mod tests;
