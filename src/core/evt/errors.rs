use thiserror::Error;

use crate::core::diag::{Location, ParseError};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    #[error("unexpected end of file")]
    UnexpectedEof,

    #[error("empty block")]
    EmptyBlock,

    #[error("expected token '{0}'")]
    ExpectedToken(String),

    #[error("expected id")]
    ExpectedId,

    #[error("expected path")]
    ExpectedPath,

    #[error("expected integer")]
    ExpectedInteger,

    #[error("integer out of range: {0}")]
    IntegerOutOfRange(String),

    #[error("expected grammar expression")]
    ExpectedExpression,

    #[error("unbalanced '{0}' in expression")]
    UnbalancedBracket(char),

    #[error("unterminated string in expression")]
    UnterminatedString,

    #[error("cannot parse port specification")]
    InvalidPort,

    #[error("port outside of valid range")]
    PortOutOfRange,

    #[error("start and end of port range must have same protocol")]
    PortRangeProtocolMismatch,

    #[error("start of port range cannot be after its end")]
    PortRangeInverted,

    #[error("port range must have exactly two endpoints")]
    PortRangeTooManyEndpoints,

    #[error("unknown transport protocol '{0}'")]
    UnknownTransport(String),

    #[error("invalid \"parse with ...\" specification")]
    InvalidParseSpec,

    #[error("protocol analyzer {0} needs a \"parse with ...\" specification")]
    MissingParseSpec(String),

    #[error("unexpected token")]
    UnexpectedToken,

    #[error("unexpected characters at end of line")]
    TrailingCharacters,

    #[error("expected 'import', 'export', '{{file,packet,protocol}} analyzer', or 'on'")]
    UnknownStatement,

    #[error("packet analyzer replacement requires host version 50200 or newer")]
    PacketReplacesUnsupported,

    #[error("unknown preprocessor directive '{0}'")]
    UnknownDirective(String),

    #[error("invalid preprocessor condition '{0}'")]
    InvalidCondition(String),

    #[error("unknown preprocessor variable '{0}'")]
    UnknownVariable(String),

    #[error("@{0} without matching @if")]
    UnmatchedDirective(&'static str),

    #[error("@else already seen for this @if")]
    DuplicateElse,

    #[error("unterminated preprocessor directive")]
    UnterminatedDirective,
}

impl ParseErrorKind {
    pub fn at(self, location: &Location) -> ParseError {
        ParseError::new(self, Some(location.clone()))
    }

    /// An error whose location is filled in by the statement loop.
    pub fn unlocated(self) -> ParseError {
        ParseError::new(self, None)
    }
}
