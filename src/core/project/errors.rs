use thiserror::Error;

use crate::core::diag::{Location, ProjectError};
use crate::core::ids::QualifiedId;
use crate::core::types::LookupError;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ProjectErrorKind {
    #[error("type '{0}' not supported")]
    Unsupported(&'static str),

    #[error("only tuples with named elements can be converted")]
    UnnamedTupleElement,

    #[error("type is self-recursive")]
    SelfRecursive,

    #[error("cannot convert anonymous {0} type")]
    Anonymous(&'static str),

    #[error("exported type must provide namespace: {0}")]
    MissingNamespace(QualifiedId),

    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error("cannot export type '{id}': {reason}")]
    CannotExport {
        id: QualifiedId,
        reason: Box<ProjectErrorKind>,
    },

    #[error("unknown type exported: {0}")]
    UnknownExport(QualifiedId),
}

impl ProjectErrorKind {
    pub fn at(self, location: Option<&Location>) -> ProjectError {
        ProjectError::new(self, location.cloned())
    }
}
