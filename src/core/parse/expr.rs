use super::*;
use crate::core::ids::QualifiedId;
use crate::core::tree::OperatorKind;

const PREFIX_BP: u8 = 12;

impl<'a> Parser<'a> {
    /// `cond ? then : else`, right-associative and looser than every
    /// binary operator.
    pub(super) fn parse_ternary(&mut self) -> ParseResult<Expr> {
        let cond = self.parse_expr(0)?;
        if self.curr_token.kind != TK::Question {
            return Ok(cond);
        }
        self.advance();
        let then_expr = self.parse_ternary()?;
        self.consume(&TK::Colon)?;
        let else_expr = self.parse_ternary()?;
        Ok(self.node(ExprKind::Ternary {
            cond: Box::new(cond),
            then_expr: Box::new(then_expr),
            else_expr: Box::new(else_expr),
        }))
    }

    /// Expression parsing (using Pratt parsing for operator precedence)
    pub(super) fn parse_expr(&mut self, min_bp: u8) -> ParseResult<Expr> {
        // Unary operators
        let mut lhs = match Self::token_to_prefix_op(&self.curr_token.kind) {
            Some(op) => {
                self.advance();
                let operand = self.parse_expr(PREFIX_BP)?;
                self.operator(op, vec![operand])
            }
            None => self.parse_postfix()?,
        };

        while let Some(op) = Self::token_to_binary_op(&self.curr_token.kind)
            && let Some(bp) = op.infix_power()
        {
            // Binary operators
            if bp < min_bp {
                break;
            }
            self.advance();

            // Parse rhs
            let rhs = self.parse_expr(bp + 1)?;
            lhs = self.operator(op, vec![lhs, rhs]);
        }

        Ok(lhs)
    }

    fn token_to_prefix_op(token: &TokenKind) -> Option<OperatorKind> {
        match token {
            TK::LogicalNot => Some(OperatorKind::LogicalNot),
            TK::Minus => Some(OperatorKind::SignNeg),
            TK::Tilde => Some(OperatorKind::Negate),
            _ => None,
        }
    }

    /// Maps a token to a binary operator; precedence lives on the operator.
    fn token_to_binary_op(token: &TokenKind) -> Option<OperatorKind> {
        match token {
            TK::LogicalOr => Some(OperatorKind::LogicalOr),
            TK::LogicalAnd => Some(OperatorKind::LogicalAnd),
            TK::KwIn => Some(OperatorKind::In),
            TK::Pipe => Some(OperatorKind::BitOr),
            TK::Caret => Some(OperatorKind::BitXor),
            TK::Ampersand => Some(OperatorKind::BitAnd),
            TK::EqEq => Some(OperatorKind::Equal),
            TK::NotEq => Some(OperatorKind::Unequal),
            TK::LessThan => Some(OperatorKind::Lower),
            TK::LessThanEq => Some(OperatorKind::LowerEqual),
            TK::GreaterThan => Some(OperatorKind::Greater),
            TK::GreaterThanEq => Some(OperatorKind::GreaterEqual),
            TK::ShiftLeft => Some(OperatorKind::ShiftLeft),
            TK::ShiftRight => Some(OperatorKind::ShiftRight),
            TK::Plus => Some(OperatorKind::Sum),
            TK::Minus => Some(OperatorKind::Difference),
            TK::Star => Some(OperatorKind::Multiple),
            TK::Slash => Some(OperatorKind::Division),
            TK::Percent => Some(OperatorKind::Modulo),
            _ => None,
        }
    }

    fn operator(&self, kind: OperatorKind, operands: Vec<Expr>) -> Expr {
        self.node(ExprKind::Operator { kind, operands })
    }

    fn parse_postfix(&mut self) -> ParseResult<Expr> {
        let mut expr = self.parse_primary()?;

        loop {
            expr = match self.curr_token.kind {
                TK::LParen => {
                    self.advance();
                    let mut operands = vec![expr];
                    operands.extend(self.parse_list(TK::RParen, |p| p.parse_ternary())?);
                    self.operator(OperatorKind::Call, operands)
                }
                TK::LBracket => {
                    self.advance();
                    let index = self.parse_ternary()?;
                    self.consume(&TK::RBracket)?;
                    self.operator(OperatorKind::Index, vec![expr, index])
                }
                TK::Dot => {
                    self.advance();
                    let member = self.parse_member()?;
                    if self.curr_token.kind == TK::LParen {
                        // .method(args)
                        self.advance();
                        let mut operands = vec![expr, member];
                        operands.extend(self.parse_list(TK::RParen, |p| p.parse_ternary())?);
                        self.operator(OperatorKind::MethodCall, operands)
                    } else {
                        self.operator(OperatorKind::Member, vec![expr, member])
                    }
                }
                TK::DotQuestion => {
                    self.advance();
                    let member = self.parse_member()?;
                    self.operator(OperatorKind::TryMember, vec![expr, member])
                }
                TK::QuestionDot => {
                    self.advance();
                    let member = self.parse_member()?;
                    self.operator(OperatorKind::HasMember, vec![expr, member])
                }
                _ => break,
            };
        }

        Ok(expr)
    }

    fn parse_member(&mut self) -> ParseResult<Expr> {
        let name = self.parse_ident()?;
        Ok(self.node(ExprKind::Member(name)))
    }

    /// `a`, `A::b::c`
    fn parse_path(&mut self) -> ParseResult<QualifiedId> {
        let mut path = self.parse_ident()?;
        while self.curr_token.kind == TK::DoubleColon {
            self.advance();
            path.push_str("::");
            path.push_str(&self.parse_ident()?);
        }
        Ok(QualifiedId::new(path))
    }

    fn parse_primary(&mut self) -> ParseResult<Expr> {
        let kind = match &self.curr_token.kind {
            TK::Ident(_) => {
                let id = self.parse_path()?;
                return Ok(self.node(ExprKind::Id(id)));
            }
            TK::IntLit(value) => {
                let value = i64::try_from(*value)
                    .map_err(|_| ExprParseErrorKind::IntegerTooLarge(*value))?;
                ExprKind::Integer(value)
            }
            TK::RealLit(text) => ExprKind::Real(text.clone()),
            TK::StringLit(text) => ExprKind::String(text.clone()),
            TK::BytesLit(text) => ExprKind::Bytes(text.clone()),
            TK::BoolLit(value) => ExprKind::Bool(*value),
            TK::KwNull => ExprKind::Null,
            TK::LParen => return self.parse_paren_or_tuple(),
            TK::LBracket => {
                self.advance();
                let items = self.parse_list(TK::RBracket, |p| p.parse_ternary())?;
                return Ok(self.node(ExprKind::Vector(items)));
            }
            _ => return Err(ExprParseErrorKind::ExpectedPrimary(self.curr_token.clone())),
        };
        self.advance();
        Ok(self.node(kind))
    }

    /// `(e)` groups; `()`, `(e,)` and `(a, b)` are tuples.
    fn parse_paren_or_tuple(&mut self) -> ParseResult<Expr> {
        self.consume(&TK::LParen)?;
        if self.curr_token.kind == TK::RParen {
            self.advance();
            return Ok(self.node(ExprKind::Tuple(Vec::new())));
        }

        let first = self.parse_ternary()?;
        if self.curr_token.kind == TK::RParen {
            self.advance();
            return Ok(first);
        }

        self.consume(&TK::Comma)?;
        let mut items = vec![first];
        items.extend(self.parse_list(TK::RParen, |p| p.parse_ternary())?);
        Ok(self.node(ExprKind::Tuple(items)))
    }
}
