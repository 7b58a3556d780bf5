use thiserror::Error;

use crate::core::diag::{LocatedError, Location};
use crate::core::lexer::{LexErrorKind, Token, TokenKind};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExprParseErrorKind {
    #[error(transparent)]
    Lex(#[from] LexErrorKind),

    #[error("expected {0}, found: {1}")]
    ExpectedToken(TokenKind, Token),

    #[error("expected identifier, found: {0}")]
    ExpectedIdent(Token),

    #[error("expected expression, found: {0}")]
    ExpectedPrimary(Token),

    #[error("unexpected {0} after expression")]
    TrailingInput(Token),

    #[error("integer literal too large: {0}")]
    IntegerTooLarge(u64),
}

pub type ExprParseError = LocatedError<ExprParseErrorKind>;

impl ExprParseErrorKind {
    pub fn at(self, location: Option<&Location>) -> ExprParseError {
        ExprParseError::new(self, location.cloned())
    }
}
