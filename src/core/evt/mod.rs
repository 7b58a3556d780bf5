//! The `.evt` front end: preprocessing, statement scanning and parsing.

use std::path::Path;

use tracing::debug;

use crate::core::decls::DeclStore;
use crate::core::diag::{Location, ParseError};

mod cursor;
mod errors;
pub mod parse;
pub mod preprocess;
pub mod scanner;

pub use errors::ParseErrorKind;
pub use parse::{Statement, parse_statement};
pub use preprocess::Preprocessor;
pub use scanner::{Chunk, Scanner};

/// Parses one `.evt` file into a fresh declaration store.
///
/// The first error aborts the file; nothing parsed before it is kept.
pub fn load_source(path: &Path, source: &str, host_version: u32) -> Result<DeclStore, ParseError> {
    debug!("Loading events from {}", path.display());

    let source = Preprocessor::new(host_version).preprocess(path, source)?;

    let mut decls = DeclStore::new();
    for chunk in Scanner::new(path, &source) {
        let chunk = chunk?;
        let location = Location::new(path, chunk.line);
        let statement = parse_statement(&chunk.text, &location, host_version)
            .map_err(|kind| kind.at(&location))?;

        match statement {
            Statement::ProtocolAnalyzer(analyzer) => decls.protocol_analyzers.push(analyzer),
            Statement::FileAnalyzer(analyzer) => decls.file_analyzers.push(analyzer),
            Statement::PacketAnalyzer(analyzer) => decls.packet_analyzers.push(analyzer),
            Statement::Event(event) => decls.events.push(event),
            Statement::Import(import) => decls.imports.push(import),
            Statement::Export(export) => decls.exports.push(export),
        }
    }

    Ok(decls)
}

#[cfg(test)]
#[path = "../../tests/evt/t_load.rs"]
mod tests;
