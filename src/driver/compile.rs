use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use tracing::{debug, error};

use crate::core::codegen::{self, GeneratedUnits};
use crate::core::decls::DeclStore;
use crate::core::diag::{GlueError, Location, format_error};
use crate::core::evt;
use crate::core::ids::QualifiedId;
use crate::core::parse::ExprParseError;
use crate::core::project::project_exported_types;
use crate::core::resolve::{check_analyzer_units, populate_events};
use crate::core::tree::{Expr, Module};
use crate::driver::{AstUnit, CompileOptions, Driver, UnitLanguage};

/// The modules produced by a successful compile, in submission order.
#[derive(Debug, Clone)]
pub struct CompileOutput {
    pub init: Module,
    pub hooks: Vec<Module>,
}

impl CompileOutput {
    pub fn units(&self) -> Vec<AstUnit> {
        let mut units = vec![AstUnit::new(UnitLanguage::Hilti, self.init.clone())];
        units.extend(
            self.hooks
                .iter()
                .map(|module| AstUnit::new(UnitLanguage::Spicy, module.clone())),
        );
        units
    }
}

impl From<GeneratedUnits> for CompileOutput {
    fn from(units: GeneratedUnits) -> Self {
        Self {
            init: units.init,
            hooks: units.hooks,
        }
    }
}

/// One glue compilation: load `.evt` files, then compile once.
pub struct GlueCompiler {
    options: CompileOptions,
    decls: DeclStore,
    sources: IndexMap<PathBuf, String>,
}

impl GlueCompiler {
    pub fn new(options: CompileOptions) -> Self {
        Self {
            options,
            decls: DeclStore::new(),
            sources: IndexMap::new(),
        }
    }

    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    pub fn decls(&self) -> &DeclStore {
        &self.decls
    }

    /// Source text of a loaded file, for rendering diagnostics.
    pub fn source(&self, path: &Path) -> Option<&str> {
        self.sources.get(path).map(String::as_str)
    }

    pub fn load_evt_file(&mut self, path: &Path) -> Result<(), GlueError> {
        let source = std::fs::read_to_string(path).map_err(|source| GlueError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.load_evt_source(path, &source)
    }

    /// Parses `source` as the contents of `path`. On error nothing from this
    /// file is kept.
    pub fn load_evt_source(&mut self, path: &Path, source: &str) -> Result<(), GlueError> {
        self.sources.insert(path.to_path_buf(), source.to_string());
        let decls = evt::load_source(path, source, self.options.host_version)?;
        self.decls.extend(decls);
        Ok(())
    }

    /// Registers a grammar module that events may attach hooks to.
    pub fn add_spicy_module(&mut self, id: QualifiedId, file: PathBuf) {
        debug!("Have grammar module {id} from {}", file.display());
        self.decls.add_spicy_module(id, file);
    }

    /// Resolves, projects and generates. Units reach the driver only if
    /// every step succeeded.
    pub fn compile<D: Driver>(&mut self, driver: &mut D) -> Result<CompileOutput, Vec<GlueError>> {
        for export in &self.decls.exports {
            driver.new_export(&export.id);
        }

        for (id, file) in driver.modules() {
            if !self.decls.spicy_modules.contains_key(&id) {
                self.add_spicy_module(id, file);
            }
        }

        let mut errors = check_analyzer_units(&self.decls, &*driver);
        errors.extend(populate_events(&mut self.decls, &*driver));

        let exported = driver.types(true);
        let (projected, project_errors) =
            project_exported_types(&*driver, &exported, &self.decls.exports);
        errors.extend(project_errors);

        let options = self.options.codegen_options(driver.debug());
        let (units, codegen_errors) = {
            let lookup: &D = &*driver;
            let parse = |text: &str, location: &Location| -> Result<Expr, ExprParseError> {
                lookup.parse_expression(text, location)
            };
            codegen::generate(&mut self.decls, &projected, &options, &parse)
        };
        errors.extend(codegen_errors);

        if !errors.is_empty() {
            return Err(errors);
        }

        let output = CompileOutput::from(units);
        for unit in output.units() {
            debug!("Handing {} to the driver", unit.file_name());
            driver.add_input(unit);
        }
        Ok(output)
    }

    /// Like [`GlueCompiler::compile`], but reports failures through the log
    /// and returns whether compilation succeeded.
    pub fn compile_ok<D: Driver>(&mut self, driver: &mut D) -> bool {
        match self.compile(driver) {
            Ok(_) => true,
            Err(errors) => {
                for err in &errors {
                    error!("{}", self.render_error(err));
                }
                false
            }
        }
    }

    /// Renders `err` with a source snippet when its file was loaded here.
    pub fn render_error(&self, err: &GlueError) -> String {
        match err.location() {
            Some(location) => match self.source(location.file()) {
                Some(source) => format_error(source, location, err.message()),
                None => err.to_string(),
            },
            None => err.to_string(),
        }
    }
}
