//! Parser for grammar-language expressions as written in `.evt` files.

use crate::core::diag::Location;
use crate::core::lexer::{Lexer, Token, TokenKind, TokenKind as TK};
use crate::core::tree::{Expr, ExprKind};

mod errors;
mod expr;

pub use errors::{ExprParseError, ExprParseErrorKind};

/// Parses `text` into an expression tree. Every node carries `location`.
pub fn parse_expression(text: &str, location: Option<&Location>) -> Result<Expr, ExprParseError> {
    let tokens = Lexer::new(text)
        .tokenize()
        .map_err(|e| ExprParseErrorKind::from(e).at(location))?;
    let mut parser = Parser::new(&tokens, location);
    parser.parse().map_err(|e| e.at(location))
}

pub struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    curr_token: &'a Token,
    location: Option<&'a Location>,
}

type ParseResult<T> = Result<T, ExprParseErrorKind>;

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token], location: Option<&'a Location>) -> Self {
        Parser {
            tokens,
            pos: 0,
            curr_token: tokens.first().unwrap_or(&EOF),
            location,
        }
    }

    /// Parses a single expression that must span the whole input.
    pub fn parse(&mut self) -> ParseResult<Expr> {
        let expr = self.parse_ternary()?;
        if self.curr_token.kind != TK::Eof {
            return Err(ExprParseErrorKind::TrailingInput(self.curr_token.clone()));
        }
        Ok(expr)
    }

    fn advance(&mut self) {
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
            self.curr_token = &self.tokens[self.pos];
        }
    }

    fn consume(&mut self, expected: &TokenKind) -> ParseResult<()> {
        if self.curr_token.kind == *expected {
            self.advance();
            Ok(())
        } else {
            Err(ExprParseErrorKind::ExpectedToken(
                expected.clone(),
                self.curr_token.clone(),
            ))
        }
    }

    /// Items separated by `,` up to (and including) `end_token`. A trailing
    /// separator is accepted.
    fn parse_list<T>(
        &mut self,
        end_token: TokenKind,
        mut parse_item: impl FnMut(&mut Self) -> ParseResult<T>,
    ) -> ParseResult<Vec<T>> {
        let mut items = vec![];
        while self.curr_token.kind != end_token {
            items.push(parse_item(self)?);
            if self.curr_token.kind == TK::Comma {
                self.advance();
            } else {
                break;
            }
        }
        self.consume(&end_token)?;
        Ok(items)
    }

    fn parse_ident(&mut self) -> ParseResult<String> {
        if let TK::Ident(name) = &self.curr_token.kind {
            let name = name.clone();
            self.advance();
            Ok(name)
        } else {
            Err(ExprParseErrorKind::ExpectedIdent(self.curr_token.clone()))
        }
    }

    fn node(&self, kind: ExprKind) -> Expr {
        Expr::new(kind).at(self.location)
    }
}

/// Stand-in for the lexer's final token when the input was never lexed.
static EOF: Token = Token {
    kind: TK::Eof,
    column: 1,
};

#[cfg(test)]
#[path = "../../tests/parse/t_expr.rs"]
mod tests;
