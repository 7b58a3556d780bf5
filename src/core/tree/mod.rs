//! Generated code: the module tree, its builder and renderer.

pub mod builder;
pub mod format;
pub mod model;
pub mod visit_mut;

pub use model::*;
