//! Constructors for generated code.

use crate::core::decls::Port;
use crate::core::ids::QualifiedId;
use crate::core::tree::{Block, Expr, ExprKind, OperatorKind, Stmt, Type};

pub fn id(name: impl Into<QualifiedId>) -> Expr {
    Expr::new(ExprKind::Id(name.into()))
}

pub fn string(value: impl Into<String>) -> Expr {
    Expr::new(ExprKind::String(value.into()))
}

pub fn integer(value: i64) -> Expr {
    Expr::new(ExprKind::Integer(value))
}

pub fn bool_(value: bool) -> Expr {
    Expr::new(ExprKind::Bool(value))
}

pub fn null() -> Expr {
    Expr::new(ExprKind::Null)
}

pub fn port(port: Port) -> Expr {
    Expr::new(ExprKind::Port(port))
}

pub fn vector(items: Vec<Expr>) -> Expr {
    Expr::new(ExprKind::Vector(items))
}

pub fn tuple(items: Vec<Expr>) -> Expr {
    Expr::new(ExprKind::Tuple(items))
}

pub fn call(callee: impl Into<QualifiedId>, args: Vec<Expr>) -> Expr {
    Expr::new(ExprKind::Call {
        callee: callee.into(),
        args,
    })
}

pub fn member_call(receiver: Expr, method: impl Into<String>, args: Vec<Expr>) -> Expr {
    Expr::new(ExprKind::MemberCall {
        receiver: Box::new(receiver),
        method: method.into(),
        args,
    })
}

/// `format % args`
pub fn modulo(format: Expr, args: Expr) -> Expr {
    Expr::new(ExprKind::Operator {
        kind: OperatorKind::Modulo,
        operands: vec![format, args],
    })
}

pub fn not_(expr: Expr) -> Expr {
    Expr::new(ExprKind::Operator {
        kind: OperatorKind::LogicalNot,
        operands: vec![expr],
    })
}

pub fn move_(expr: Expr) -> Expr {
    Expr::new(ExprKind::Move(Box::new(expr)))
}

pub fn assign(target: Expr, value: Expr) -> Expr {
    Expr::new(ExprKind::Assign {
        target: Box::new(target),
        value: Box::new(value),
    })
}

pub fn deferred(expr: Expr, catch_exception: bool) -> Expr {
    let location = expr.location.clone();
    Expr {
        kind: ExprKind::Deferred {
            expr: Box::new(expr),
            catch_exception,
        },
        location,
    }
}

pub fn linker_scope() -> Expr {
    Expr::new(ExprKind::LinkerScope)
}

pub fn if_(cond: Expr, then_block: Block) -> Stmt {
    Stmt::If { cond, then_block }
}

pub fn return_() -> Stmt {
    Stmt::Return(None)
}

pub fn local(id: impl Into<String>, ty: Type, init: Option<Expr>) -> Stmt {
    Stmt::Local {
        id: id.into(),
        ty,
        init,
    }
}

impl Block {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.stmts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.stmts.len()
    }

    pub fn add(&mut self, stmt: Stmt) {
        self.stmts.push(stmt);
    }

    pub fn add_expression(&mut self, expr: Expr) {
        self.add(Stmt::Expr(expr));
    }

    pub fn add_call(&mut self, callee: impl Into<QualifiedId>, args: Vec<Expr>) {
        self.add_expression(call(callee, args));
    }

    pub fn add_member_call(&mut self, receiver: Expr, method: impl Into<String>, args: Vec<Expr>) {
        self.add_expression(member_call(receiver, method, args));
    }

    pub fn add_local(&mut self, id: impl Into<String>, ty: Type, init: Option<Expr>) {
        self.add(local(id, ty, init));
    }

    pub fn add_return(&mut self) {
        self.add(return_());
    }

    /// Appends `if ( cond ) { ... }` and hands back the empty branch.
    pub fn add_if(&mut self, cond: Expr) -> &mut Block {
        self.add(if_(cond, Block::new()));
        match self.stmts.last_mut() {
            Some(Stmt::If { then_block, .. }) => then_block,
            _ => unreachable!("an if statement was just pushed"),
        }
    }
}
