//! Builds the init module and the per-grammar-module hook modules.

use tracing::debug;

use crate::core::decls::{DeclStore, FileAnalyzer, PacketAnalyzer, ProtocolAnalyzer};
use crate::core::diag::{GlueError, Location};
use crate::core::ids::QualifiedId;
use crate::core::parse::ExprParseError;
use crate::core::project::ProjectedType;
use crate::core::tree::builder::{call, id, linker_scope, port, string, vector};
use crate::core::tree::{
    Attribute, Block, Declaration, Expr, Function, Import, Linkage, Module, Type,
};

mod hooks;
pub mod runtime;

pub use hooks::HookBuilder;
use runtime::{HILTI, HOST_RT, INIT_MODULE, PREINIT_FUNCTION, hilti, rt};

/// Grammar compiler version from which the linker scope is a builtin.
pub const BUILTIN_SCOPE_VERSION: u32 = 10700;

/// Parses argument and condition text into expressions.
pub type ExpressionParser<'a> = &'a dyn Fn(&str, &Location) -> Result<Expr, ExprParseError>;

#[derive(Debug, Clone)]
pub struct CodegenOptions {
    pub debug: bool,
    pub grammar_version: u32,
    pub version_symbol: String,
}

impl CodegenOptions {
    /// The expression passed as every registration's linker scope.
    pub fn linker_scope(&self) -> Expr {
        if self.grammar_version >= BUILTIN_SCOPE_VERSION {
            linker_scope()
        } else {
            call(hilti("linker_scope"), vec![])
        }
    }
}

/// `""` stands in for an absent id in registration calls.
fn opt_id(value: &Option<QualifiedId>) -> Expr {
    string(value.as_ref().map(|id| id.as_str()).unwrap_or_default())
}

pub struct InitBuilder<'a> {
    options: &'a CodegenOptions,
    preinit: Block,
}

impl<'a> InitBuilder<'a> {
    pub fn new(options: &'a CodegenOptions) -> Self {
        let mut preinit = Block::new();
        preinit.add_call(options.version_symbol.as_str(), vec![]);
        Self { options, preinit }
    }

    pub fn add_protocol_analyzer(&mut self, analyzer: &ProtocolAnalyzer) {
        debug!("Adding protocol analyzer '{}'", analyzer.name);
        let ports = analyzer.ports.iter().copied().map(port).collect();
        self.preinit.add_call(
            rt("register_protocol_analyzer"),
            vec![
                string(analyzer.name.as_str()),
                id(hilti("Protocol").join(&analyzer.transport.to_string())),
                vector(ports),
                opt_id(&analyzer.orig_unit),
                opt_id(&analyzer.resp_unit),
                opt_id(&analyzer.replaces),
                self.options.linker_scope(),
            ],
        );
    }

    pub fn add_file_analyzer(&mut self, analyzer: &FileAnalyzer) {
        debug!("Adding file analyzer '{}'", analyzer.name);
        let mime_types = analyzer
            .mime_types
            .iter()
            .map(|mime| string(mime.as_str()))
            .collect();
        self.preinit.add_call(
            rt("register_file_analyzer"),
            vec![
                string(analyzer.name.as_str()),
                vector(mime_types),
                opt_id(&analyzer.unit),
                opt_id(&analyzer.replaces),
                self.options.linker_scope(),
            ],
        );
    }

    pub fn add_packet_analyzer(&mut self, analyzer: &PacketAnalyzer) {
        debug!("Adding packet analyzer '{}'", analyzer.name);
        self.preinit.add_call(
            rt("register_packet_analyzer"),
            vec![
                string(analyzer.name.as_str()),
                opt_id(&analyzer.unit),
                opt_id(&analyzer.replaces),
                self.options.linker_scope(),
            ],
        );
    }

    pub fn add_event_handler(&mut self, name: &QualifiedId) {
        self.preinit
            .add_call(rt("install_handler"), vec![string(name.as_str())]);
    }

    pub fn add_type(&mut self, projected: &ProjectedType) {
        debug!("Adding host type '{}'", projected.id);
        self.preinit.add_call(
            rt("register_type"),
            vec![
                string(projected.id.namespace().as_str()),
                string(projected.id.local()),
                projected.expr.clone(),
            ],
        );
    }

    pub fn finish(self) -> Module {
        let mut module = Module::new(INIT_MODULE);
        module.add_import(Import::module(HOST_RT, "hlt"));
        module.add_import(Import::module(HILTI, "hlt"));

        let symbol = self.options.version_symbol.clone();
        module.add(Declaration::Function(Function {
            id: symbol.clone(),
            result: Type::Void,
            params: Vec::new(),
            body: None,
            linkage: Linkage::Public,
            attributes: vec![
                Attribute::new("&cxxname", Some(string(symbol))),
                Attribute::new("&have_prototype", None),
            ],
        }));

        if !self.preinit.is_empty() {
            module.add(Declaration::Function(Function {
                id: PREINIT_FUNCTION.to_string(),
                result: Type::Void,
                params: Vec::new(),
                body: Some(self.preinit),
                linkage: Linkage::PreInit,
                attributes: Vec::new(),
            }));
        }
        module
    }
}

/// Everything one compilation hands to the driver.
#[derive(Debug, Clone)]
pub struct GeneratedUnits {
    pub init: Module,
    pub hooks: Vec<Module>,
}

/// Builds all output modules from resolved declarations.
///
/// Hook modules are stored in each grammar module's `out_module` and also
/// returned. Per-event failures are collected; the failing event's hook is
/// left out.
pub fn generate(
    decls: &mut DeclStore,
    types: &[ProjectedType],
    options: &CodegenOptions,
    parse: ExpressionParser<'_>,
) -> (GeneratedUnits, Vec<GlueError>) {
    let mut errors = Vec::new();

    let mut init = InitBuilder::new(options);
    for analyzer in &decls.protocol_analyzers {
        init.add_protocol_analyzer(analyzer);
    }
    for analyzer in &decls.file_analyzers {
        init.add_file_analyzer(analyzer);
    }
    for analyzer in &decls.packet_analyzers {
        init.add_packet_analyzer(analyzer);
    }
    for event in &decls.events {
        init.add_event_handler(&event.name);
    }
    for projected in types {
        init.add_type(projected);
    }

    let mut hooks = Vec::new();
    for module in decls.spicy_modules.values_mut() {
        if module.evts.is_empty() {
            continue;
        }

        let mut builder = HookBuilder::new(module, &decls.imports, options, parse);
        for event in decls
            .events
            .iter()
            .filter(|event| event.spicy_module.as_ref() == Some(&module.id))
        {
            if let Err(err) = builder.add_event(event) {
                errors.push(err);
            }
        }

        let out = builder.finish();
        hooks.push(out.clone());
        module.out_module = Some(out);
    }

    let units = GeneratedUnits {
        init: init.finish(),
        hooks,
    };
    (units, errors)
}

#[cfg(test)]
#[path = "../../tests/codegen/t_codegen.rs"]
mod tests;
