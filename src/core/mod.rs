//! Core glue compiler pipeline: `.evt` parsing, resolution, projection and
//! code generation.

pub mod codegen;
pub mod decls;
pub mod diag;
pub mod evt;
pub mod ids;
pub mod lexer;
pub mod parse;
pub mod project;
pub mod resolve;
pub mod rewrite;
pub mod tree;
pub mod types;
