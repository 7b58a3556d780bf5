//! Declarations collected from `.evt` files.

use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::PathBuf;

use enum_display::EnumDisplay;
use indexmap::IndexMap;

use crate::core::diag::Location;
use crate::core::ids::QualifiedId;
use crate::core::tree::Module;
use crate::core::types::UnitType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumDisplay)]
pub enum Transport {
    #[display("TCP")]
    Tcp,
    #[display("UDP")]
    Udp,
    #[display("ICMP")]
    Icmp,
}

impl Transport {
    /// Lower-case spelling used in `.evt` files and port literals.
    pub fn keyword(self) -> &'static str {
        match self {
            Transport::Tcp => "tcp",
            Transport::Udp => "udp",
            Transport::Icmp => "icmp",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "tcp" => Some(Transport::Tcp),
            "udp" => Some(Transport::Udp),
            "icmp" => Some(Transport::Icmp),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Port {
    pub number: u16,
    pub transport: Transport,
}

impl Port {
    pub fn new(number: u16, transport: Transport) -> Self {
        Self { number, transport }
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.number, self.transport.keyword())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtocolAnalyzer {
    pub name: String,
    pub transport: Transport,
    pub orig_unit: Option<QualifiedId>,
    pub resp_unit: Option<QualifiedId>,
    pub ports: Vec<Port>,
    pub replaces: Option<QualifiedId>,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileAnalyzer {
    pub name: String,
    pub unit: Option<QualifiedId>,
    pub mime_types: Vec<String>,
    pub replaces: Option<QualifiedId>,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PacketAnalyzer {
    pub name: String,
    pub unit: Option<QualifiedId>,
    pub replaces: Option<QualifiedId>,
    pub location: Location,
}

/// One event argument, numbered from 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpressionAccessor {
    pub index: usize,
    pub expression: String,
    pub location: Location,
}

impl ExpressionAccessor {
    /// `$conn`, `$file` and friends.
    pub fn is_reserved(&self) -> bool {
        self.expression.starts_with('$')
    }
}

/// Default hook priority; low so generated hooks run after the grammar's own.
pub const DEFAULT_EVENT_PRIORITY: i64 = -1000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub path: QualifiedId,
    pub condition: Option<String>,
    pub name: QualifiedId,
    pub exprs: Vec<String>,
    pub priority: i64,
    pub file: PathBuf,
    pub location: Location,

    // Filled in by the resolver.
    pub unit: Option<QualifiedId>,
    pub hook: Option<QualifiedId>,
    pub unit_type: Option<UnitType>,
    pub unit_module_id: Option<QualifiedId>,
    pub unit_module_path: Option<PathBuf>,
    pub spicy_module: Option<QualifiedId>,
    pub expression_accessors: Vec<ExpressionAccessor>,
}

impl Event {
    pub fn new(path: QualifiedId, name: QualifiedId, location: Location) -> Self {
        Self {
            path,
            condition: None,
            name,
            exprs: Vec::new(),
            priority: DEFAULT_EVENT_PRIORITY,
            file: location.file.clone(),
            location,
            unit: None,
            hook: None,
            unit_type: None,
            unit_module_id: None,
            unit_module_path: None,
            spicy_module: None,
            expression_accessors: Vec::new(),
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.unit_type.is_some()
    }

    /// Hash over the declaration itself; resolver output does not contribute.
    pub fn stable_hash(&self) -> u64 {
        let mut hasher = std::hash::DefaultHasher::new();
        self.path.hash(&mut hasher);
        self.condition.hash(&mut hasher);
        self.name.hash(&mut hasher);
        self.exprs.hash(&mut hasher);
        self.priority.hash(&mut hasher);
        self.location.hash(&mut hasher);
        hasher.finish()
    }

    /// `http::request` becomes `http_request_<hash>`.
    pub fn mangled_name(&self) -> String {
        format!(
            "{}_{:x}",
            self.name.as_str().replace("::", "_"),
            self.stable_hash()
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    pub module: QualifiedId,
    pub scope: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Export {
    pub id: QualifiedId,
    pub location: Location,
}

/// A grammar module that generated hooks attach to.
#[derive(Debug, Clone)]
pub struct SpicyModule {
    pub id: QualifiedId,
    pub file: PathBuf,
    /// `.evt` files that contributed events to this module.
    pub evts: BTreeSet<PathBuf>,
    pub out_module: Option<Module>,
}

impl SpicyModule {
    pub fn new(id: QualifiedId, file: PathBuf) -> Self {
        Self {
            id,
            file,
            evts: BTreeSet::new(),
            out_module: None,
        }
    }

    /// Parent directories of every contributing `.evt` file, de-duplicated.
    pub fn search_dirs(&self) -> Vec<PathBuf> {
        self.evts
            .iter()
            .map(|evt| {
                evt.parent()
                    .map(|dir| dir.to_path_buf())
                    .unwrap_or_default()
            })
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

/// Everything parsed from one or more `.evt` files, in load order.
#[derive(Debug, Clone, Default)]
pub struct DeclStore {
    pub protocol_analyzers: Vec<ProtocolAnalyzer>,
    pub file_analyzers: Vec<FileAnalyzer>,
    pub packet_analyzers: Vec<PacketAnalyzer>,
    pub events: Vec<Event>,
    pub imports: Vec<Import>,
    pub exports: Vec<Export>,
    pub spicy_modules: IndexMap<QualifiedId, SpicyModule>,
}

impl DeclStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends another store's declarations, preserving order.
    pub fn extend(&mut self, other: DeclStore) {
        self.protocol_analyzers.extend(other.protocol_analyzers);
        self.file_analyzers.extend(other.file_analyzers);
        self.packet_analyzers.extend(other.packet_analyzers);
        self.events.extend(other.events);
        self.imports.extend(other.imports);
        self.exports.extend(other.exports);
        for (id, module) in other.spicy_modules {
            self.spicy_modules.entry(id).or_insert(module);
        }
    }

    pub fn add_spicy_module(&mut self, id: QualifiedId, file: PathBuf) {
        self.spicy_modules
            .insert(id.clone(), SpicyModule::new(id, file));
    }

    pub fn is_empty(&self) -> bool {
        self.protocol_analyzers.is_empty()
            && self.file_analyzers.is_empty()
            && self.packet_analyzers.is_empty()
            && self.events.is_empty()
            && self.imports.is_empty()
            && self.exports.is_empty()
    }
}

#[cfg(test)]
#[path = "../tests/t_decls.rs"]
mod tests;
