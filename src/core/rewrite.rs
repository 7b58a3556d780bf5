//! Rewrites optional member access (`.?`) into deferred evaluation.
//!
//! `a.?b` raises when `b` is unset. Wrapping the access in a deferred node
//! lets the use site decide whether that exception is caught (debug output)
//! or propagated (argument marshalling).

use crate::core::tree::visit_mut::{VisitorMut, walk_expr};
use crate::core::tree::{Expr, ExprKind, OperatorKind};

pub struct WrapTryMember {
    catch_exception: bool,
}

impl WrapTryMember {
    pub fn new(catch_exception: bool) -> Self {
        Self { catch_exception }
    }
}

impl VisitorMut for WrapTryMember {
    fn visit_expr(&mut self, expr: &mut Expr) {
        // Children first so nested accesses are wrapped innermost-out.
        walk_expr(self, expr);

        if expr.is_operator(OperatorKind::TryMember) {
            let location = expr.location.clone();
            let inner = std::mem::replace(expr, Expr::new(ExprKind::Null));
            *expr = Expr {
                kind: ExprKind::Deferred {
                    expr: Box::new(inner),
                    catch_exception: self.catch_exception,
                },
                location,
            };
        }
    }
}

/// Applies [`WrapTryMember`] to a copy of `expr`.
pub fn wrap_try_members(expr: &Expr, catch_exception: bool) -> Expr {
    let mut expr = expr.clone();
    WrapTryMember::new(catch_exception).visit_expr(&mut expr);
    expr
}

#[cfg(test)]
#[path = "../tests/t_rewrite.rs"]
mod tests;
