use crate::core::codegen::{BUILTIN_SCOPE_VERSION, CodegenOptions};

/// Host version assumed when none is given.
pub const DEFAULT_HOST_VERSION: u32 = 50200;

pub const DEFAULT_VERSION_SYMBOL: &str = "evtglue_plugin_version";

#[derive(Debug, Clone)]
pub struct CompileOptions {
    /// Value of `HOST_VERSION` in `@if` conditions.
    pub host_version: u32,
    /// Grammar compiler version; selects the linker scope expression.
    pub grammar_version: u32,
    /// Emit debug output from generated hooks.
    pub debug: bool,
    /// External name of the plugin version function.
    pub version_symbol: String,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            host_version: DEFAULT_HOST_VERSION,
            grammar_version: BUILTIN_SCOPE_VERSION,
            debug: false,
            version_symbol: DEFAULT_VERSION_SYMBOL.to_string(),
        }
    }
}

impl CompileOptions {
    pub fn codegen_options(&self, driver_debug: bool) -> CodegenOptions {
        CodegenOptions {
            debug: self.debug || driver_debug,
            grammar_version: self.grammar_version,
            version_symbol: self.version_symbol.clone(),
        }
    }
}
