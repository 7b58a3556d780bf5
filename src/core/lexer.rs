use enum_display::EnumDisplay;
use std::fmt::{Display, Formatter};
use std::iter::Peekable;
use std::str::Chars;
use thiserror::Error;

/// A token of a grammar expression. `column` is 1-based within the
/// expression text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub column: usize,
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.kind)
    }
}

#[derive(Debug, PartialEq, Eq, Hash, Clone, EnumDisplay)]
pub enum TokenKind {
    // Identifiers
    #[display("Ident({0})")]
    Ident(String),

    // Literals
    #[display("IntLit({0})")]
    IntLit(u64),
    #[display("RealLit({0})")]
    RealLit(String),
    #[display("BoolLit({0})")]
    BoolLit(bool),
    #[display("StringLit({0})")]
    StringLit(String),
    #[display("BytesLit({0})")]
    BytesLit(String),

    // Keywords
    #[display("Null")]
    KwNull,
    #[display("in")]
    KwIn,

    // Brackets
    #[display("[")]
    LBracket,
    #[display("]")]
    RBracket,

    // Parentheses
    #[display("(")]
    LParen,
    #[display(")")]
    RParen,

    // Punctuation
    #[display(",")]
    Comma,
    #[display(".")]
    Dot,
    #[display(".?")]
    DotQuestion,
    #[display("?.")]
    QuestionDot,
    #[display(":")]
    Colon,
    #[display("::")]
    DoubleColon,
    #[display("?")]
    Question,

    // Arithmetic operators
    #[display("+")]
    Plus,
    #[display("-")]
    Minus,
    #[display("*")]
    Star,
    #[display("/")]
    Slash,
    #[display("%")]
    Percent,

    // Bitwise operators
    #[display("&")]
    Ampersand,
    #[display("|")]
    Pipe,
    #[display("^")]
    Caret,
    #[display("~")]
    Tilde,
    #[display("<<")]
    ShiftLeft,
    #[display(">>")]
    ShiftRight,

    // Assignment operator
    #[display("=")]
    Equals,

    // Comparison operators
    #[display("==")]
    EqEq,
    #[display("!=")]
    NotEq,
    #[display("<")]
    LessThan,
    #[display(">")]
    GreaterThan,
    #[display("<=")]
    LessThanEq,
    #[display(">=")]
    GreaterThanEq,

    // Logical operators
    #[display("&&")]
    LogicalAnd,
    #[display("||")]
    LogicalOr,
    #[display("!")]
    LogicalNot,

    // End of input
    #[display("EOF")]
    Eof,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexErrorKind {
    #[error("unexpected character '{0}'")]
    UnexpectedCharacter(char),

    #[error("invalid integer '{0}'")]
    InvalidInteger(String),

    #[error("invalid escape sequence '{0}'")]
    InvalidEscapeSequence(String),

    #[error("unterminated string literal")]
    UnterminatedString,
}

pub use LexErrorKind as LEK;

pub struct Lexer<'a> {
    source: Peekable<Chars<'a>>,
    column: usize,
    at_eof: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Lexer {
            source: source.chars().peekable(),
            column: 1,
            at_eof: false,
        }
    }

    fn advance(&mut self) {
        match self.source.next() {
            Some(_) => self.column += 1,
            None => self.at_eof = true,
        }
    }

    fn peek_is(&mut self, expected: char) -> bool {
        matches!(self.source.peek(), Some(&ch) if ch == expected)
    }

    /// Consumes `expected` if it is next.
    fn eat(&mut self, expected: char) -> bool {
        if self.peek_is(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(&ch) = self.source.peek()
            && ch.is_whitespace()
        {
            self.advance();
        }
    }

    fn lex_string_lit(&mut self) -> Result<String, LexErrorKind> {
        self.advance(); // consume opening quote
        let mut buf = String::new();

        loop {
            let Some(&ch) = self.source.peek() else {
                return Err(LEK::UnterminatedString);
            };

            self.advance();

            match ch {
                '"' => break,
                '\\' => buf.push(self.parse_escape()?),
                _ => buf.push(ch),
            }
        }

        Ok(buf)
    }

    fn parse_escape(&mut self) -> Result<char, LexErrorKind> {
        let esc = self.source.peek().copied().ok_or(LEK::UnterminatedString)?;
        self.advance();

        let ch = match esc {
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            '\\' => '\\',
            '"' => '"',
            '0' => '\0',
            'x' => {
                let h1 = self.source.peek().copied().ok_or(LEK::UnterminatedString)?;
                self.advance();
                let h2 = self.source.peek().copied().ok_or(LEK::UnterminatedString)?;
                self.advance();
                let hex = format!("{h1}{h2}");
                let byte = u8::from_str_radix(&hex, 16)
                    .map_err(|_| LEK::InvalidEscapeSequence(format!("\\x{hex}")))?;
                char::from(byte)
            }
            _ => return Err(LEK::InvalidEscapeSequence(format!("\\{esc}"))),
        };

        Ok(ch)
    }

    fn lex_number(&mut self) -> Result<TokenKind, LexErrorKind> {
        // Decimal, 0x-prefixed hex, or a real with a fractional part.
        let mut digits = String::new();

        if self.eat('0') {
            digits.push('0');
            if self.eat('x') || self.eat('X') {
                let mut hex = String::new();
                while let Some(&ch) = self.source.peek()
                    && ch.is_ascii_alphanumeric()
                {
                    hex.push(ch);
                    self.advance();
                }
                return u64::from_str_radix(&hex, 16)
                    .map(TokenKind::IntLit)
                    .map_err(|_| LEK::InvalidInteger(format!("0x{hex}")));
            }
        }

        while let Some(&ch) = self.source.peek()
            && ch.is_ascii_digit()
        {
            digits.push(ch);
            self.advance();
        }

        // A `.` only continues the number if a digit follows.
        let mut lookahead = self.source.clone();
        if lookahead.next() == Some('.')
            && lookahead.next().is_some_and(|ch| ch.is_ascii_digit())
        {
            self.advance();
            digits.push('.');
            while let Some(&ch) = self.source.peek()
                && ch.is_ascii_digit()
            {
                digits.push(ch);
                self.advance();
            }
            return Ok(TokenKind::RealLit(digits));
        }

        if let Some(&ch) = self.source.peek()
            && (ch.is_alphabetic() || ch == '_')
        {
            while let Some(&ch) = self.source.peek()
                && (ch.is_alphanumeric() || ch == '_')
            {
                digits.push(ch);
                self.advance();
            }
            return Err(LEK::InvalidInteger(digits));
        }

        digits
            .parse::<u64>()
            .map(TokenKind::IntLit)
            .map_err(|_| LEK::InvalidInteger(digits))
    }

    pub fn next_token(&mut self) -> Result<Token, LexErrorKind> {
        self.skip_whitespace();

        let column = self.column;
        let bytes_lit = {
            let mut lookahead = self.source.clone();
            lookahead.next() == Some('b') && lookahead.next() == Some('"')
        };
        let kind = match self.source.peek() {
            Some(_) if bytes_lit => {
                self.advance();
                Ok(TokenKind::BytesLit(self.lex_string_lit()?))
            }
            Some(&ch) if ch.is_alphabetic() || ch == '_' => {
                let mut ident = String::new();
                while let Some(&ch) = self.source.peek()
                    && (ch.is_alphanumeric() || ch == '_')
                {
                    ident.push(ch);
                    self.advance();
                }
                Ok(match ident.as_str() {
                    "True" => TokenKind::BoolLit(true),
                    "False" => TokenKind::BoolLit(false),
                    "Null" => TokenKind::KwNull,
                    "in" => TokenKind::KwIn,
                    _ => TokenKind::Ident(ident),
                })
            }
            Some(&'$') => {
                // `$$` and `$name`
                let mut ident = String::from("$");
                self.advance();
                if self.eat('$') {
                    ident.push('$');
                } else {
                    while let Some(&ch) = self.source.peek()
                        && (ch.is_alphanumeric() || ch == '_')
                    {
                        ident.push(ch);
                        self.advance();
                    }
                }
                if ident == "$" {
                    Err(LEK::UnexpectedCharacter('$'))
                } else {
                    Ok(TokenKind::Ident(ident))
                }
            }
            Some(&ch) if ch.is_ascii_digit() => self.lex_number(),
            Some(&'"') => Ok(TokenKind::StringLit(self.lex_string_lit()?)),
            Some(&'-') => {
                self.advance();
                Ok(TokenKind::Minus)
            }
            Some(&'+') => {
                self.advance();
                Ok(TokenKind::Plus)
            }
            Some(&'*') => {
                self.advance();
                Ok(TokenKind::Star)
            }
            Some(&'/') => {
                self.advance();
                Ok(TokenKind::Slash)
            }
            Some(&'%') => {
                self.advance();
                Ok(TokenKind::Percent)
            }
            Some(&'(') => {
                self.advance();
                Ok(TokenKind::LParen)
            }
            Some(&')') => {
                self.advance();
                Ok(TokenKind::RParen)
            }
            Some(&'[') => {
                self.advance();
                Ok(TokenKind::LBracket)
            }
            Some(&']') => {
                self.advance();
                Ok(TokenKind::RBracket)
            }
            Some(&'|') => {
                self.advance();
                if self.eat('|') {
                    Ok(TokenKind::LogicalOr)
                } else {
                    Ok(TokenKind::Pipe)
                }
            }
            Some(&',') => {
                self.advance();
                Ok(TokenKind::Comma)
            }
            Some(&'.') => {
                self.advance();
                if self.eat('?') {
                    Ok(TokenKind::DotQuestion)
                } else {
                    Ok(TokenKind::Dot)
                }
            }
            Some(&'?') => {
                self.advance();
                if self.eat('.') {
                    Ok(TokenKind::QuestionDot)
                } else {
                    Ok(TokenKind::Question)
                }
            }
            Some(&':') => {
                self.advance();
                if self.eat(':') {
                    Ok(TokenKind::DoubleColon)
                } else {
                    Ok(TokenKind::Colon)
                }
            }
            Some(&'=') => {
                self.advance();
                if self.eat('=') {
                    Ok(TokenKind::EqEq)
                } else {
                    Ok(TokenKind::Equals)
                }
            }
            Some(&'!') => {
                self.advance();
                if self.eat('=') {
                    Ok(TokenKind::NotEq)
                } else {
                    Ok(TokenKind::LogicalNot)
                }
            }
            Some(&'<') => {
                self.advance();
                if self.eat('<') {
                    Ok(TokenKind::ShiftLeft)
                } else if self.eat('=') {
                    Ok(TokenKind::LessThanEq)
                } else {
                    Ok(TokenKind::LessThan)
                }
            }
            Some(&'>') => {
                self.advance();
                if self.eat('>') {
                    Ok(TokenKind::ShiftRight)
                } else if self.eat('=') {
                    Ok(TokenKind::GreaterThanEq)
                } else {
                    Ok(TokenKind::GreaterThan)
                }
            }
            Some(&'&') => {
                self.advance();
                if self.eat('&') {
                    Ok(TokenKind::LogicalAnd)
                } else {
                    Ok(TokenKind::Ampersand)
                }
            }
            Some(&'^') => {
                self.advance();
                Ok(TokenKind::Caret)
            }
            Some(&'~') => {
                self.advance();
                Ok(TokenKind::Tilde)
            }
            Some(&ch) => Err(LEK::UnexpectedCharacter(ch)),
            None => {
                self.at_eof = true;
                Ok(TokenKind::Eof)
            }
        }?;
        Ok(Token { kind, column })
    }

    /// Lexes the whole input; the last token is always `Eof`.
    pub fn tokenize(self) -> Result<Vec<Token>, LexErrorKind> {
        self.collect()
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<Token, LexErrorKind>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.at_eof {
            return None;
        }
        Some(self.next_token())
    }
}

#[cfg(test)]
#[path = "../tests/t_lexer.rs"]
mod tests;
