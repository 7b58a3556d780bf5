use crate::core::tree::*;

/// Tree mutable visitor with default traversal helpers.
///
/// Implement the methods you care about (e.g. `visit_expr`) and call the
/// corresponding `walk_*` function to recurse into children.
pub trait VisitorMut {
    fn visit_module(&mut self, module: &mut Module) {
        walk_module(self, module)
    }

    fn visit_decl(&mut self, decl: &mut Declaration) {
        walk_decl(self, decl)
    }

    fn visit_block(&mut self, block: &mut Block) {
        walk_block(self, block)
    }

    fn visit_stmt(&mut self, stmt: &mut Stmt) {
        walk_stmt(self, stmt)
    }

    fn visit_expr(&mut self, expr: &mut Expr) {
        walk_expr(self, expr)
    }
}

pub fn walk_module<V: VisitorMut + ?Sized>(v: &mut V, module: &mut Module) {
    for decl in &mut module.decls {
        v.visit_decl(decl);
    }
}

pub fn walk_decl<V: VisitorMut + ?Sized>(v: &mut V, decl: &mut Declaration) {
    match decl {
        Declaration::Function(function) => {
            if let Some(body) = &mut function.body {
                v.visit_block(body);
            }
        }
        Declaration::Global(global) => v.visit_expr(&mut global.init),
        Declaration::UnitHook(hook) => v.visit_block(&mut hook.body),
    }
}

pub fn walk_block<V: VisitorMut + ?Sized>(v: &mut V, block: &mut Block) {
    for stmt in &mut block.stmts {
        v.visit_stmt(stmt);
    }
}

pub fn walk_stmt<V: VisitorMut + ?Sized>(v: &mut V, stmt: &mut Stmt) {
    match stmt {
        Stmt::Expr(expr) => v.visit_expr(expr),
        Stmt::If { cond, then_block } => {
            v.visit_expr(cond);
            v.visit_block(then_block);
        }
        Stmt::Return(value) => {
            if let Some(value) = value {
                v.visit_expr(value);
            }
        }
        Stmt::Local { init, .. } => {
            if let Some(init) = init {
                v.visit_expr(init);
            }
        }
    }
}

pub fn walk_expr<V: VisitorMut + ?Sized>(v: &mut V, expr: &mut Expr) {
    match &mut expr.kind {
        ExprKind::Id(_)
        | ExprKind::Member(_)
        | ExprKind::Bool(_)
        | ExprKind::Integer(_)
        | ExprKind::Real(_)
        | ExprKind::String(_)
        | ExprKind::Bytes(_)
        | ExprKind::Null
        | ExprKind::Port(_)
        | ExprKind::LinkerScope => {}

        ExprKind::Tuple(items) | ExprKind::Vector(items) => {
            for item in items {
                v.visit_expr(item);
            }
        }
        ExprKind::Call { args, .. } => {
            for arg in args {
                v.visit_expr(arg);
            }
        }
        ExprKind::MemberCall { receiver, args, .. } => {
            v.visit_expr(receiver);
            for arg in args {
                v.visit_expr(arg);
            }
        }
        ExprKind::Operator { operands, .. } => {
            for operand in operands {
                v.visit_expr(operand);
            }
        }
        ExprKind::Ternary {
            cond,
            then_expr,
            else_expr,
        } => {
            v.visit_expr(cond);
            v.visit_expr(then_expr);
            v.visit_expr(else_expr);
        }
        ExprKind::Deferred { expr, .. } | ExprKind::Move(expr) => v.visit_expr(expr),
        ExprKind::Assign { target, value } => {
            v.visit_expr(target);
            v.visit_expr(value);
        }
    }
}
