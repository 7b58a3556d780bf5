use thiserror::Error;

use crate::core::diag::{Location, ResolveError};
use crate::core::ids::QualifiedId;
use crate::core::parse::ExprParseErrorKind;
use crate::core::types::LookupError;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ResolveErrorKind {
    #[error("unit type missing in hook '{0}'")]
    UnitTypeMissing(QualifiedId),

    #[error("unknown unit type '{unit}' in hook '{hook}': {reason}")]
    UnknownUnit {
        unit: QualifiedId,
        hook: QualifiedId,
        reason: LookupError,
    },

    #[error("error with {kind} analyzer {name}: {reason}")]
    AnalyzerUnit {
        kind: &'static str,
        name: String,
        reason: LookupError,
    },

    #[error("unknown reserved parameter '{0}'")]
    UnknownReservedParameter(String),

    #[error("error parsing expression '{expr}': {reason}")]
    InvalidExpression {
        expr: String,
        reason: ExprParseErrorKind,
    },
}

impl ResolveErrorKind {
    pub fn at(self, location: &Location) -> ResolveError {
        ResolveError::new(self, Some(location.clone()))
    }
}
