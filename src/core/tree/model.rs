//! Generated code tree.
//!
//! Modules produced by the glue compiler, plus the expressions parsed from
//! `.evt` argument text, share this one representation.

use std::path::PathBuf;

use enum_display::EnumDisplay;

use crate::core::decls::Port;
use crate::core::diag::Location;
use crate::core::ids::QualifiedId;

// -- Module --

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Module {
    pub id: QualifiedId,
    pub imports: Vec<Import>,
    pub decls: Vec<Declaration>,
}

impl Module {
    pub fn new(id: impl Into<QualifiedId>) -> Self {
        Self {
            id: id.into(),
            imports: Vec::new(),
            decls: Vec::new(),
        }
    }

    /// Adds an import unless an identical one is already present.
    pub fn add_import(&mut self, import: Import) {
        if !self.imports.contains(&import) {
            self.imports.push(import);
        }
    }

    pub fn add(&mut self, decl: Declaration) {
        self.decls.push(decl);
    }

    pub fn functions(&self) -> Vec<&Function> {
        self.decls
            .iter()
            .filter_map(|decl| match decl {
                Declaration::Function(function) => Some(function),
                _ => None,
            })
            .collect()
    }

    pub fn function(&self, id: &str) -> Option<&Function> {
        self.functions().into_iter().find(|f| f.id == id)
    }

    pub fn globals(&self) -> Vec<&Global> {
        self.decls
            .iter()
            .filter_map(|decl| match decl {
                Declaration::Global(global) => Some(global),
                _ => None,
            })
            .collect()
    }

    pub fn hooks(&self) -> Vec<&UnitHook> {
        self.decls
            .iter()
            .filter_map(|decl| match decl {
                Declaration::UnitHook(hook) => Some(hook),
                _ => None,
            })
            .collect()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Import {
    pub module: QualifiedId,
    pub extension: &'static str,
    pub scope: Option<String>,
    pub path: Option<PathBuf>,
    pub search_dirs: Vec<PathBuf>,
}

impl Import {
    pub fn module(module: impl Into<QualifiedId>, extension: &'static str) -> Self {
        Self {
            module: module.into(),
            extension,
            scope: None,
            path: None,
            search_dirs: Vec::new(),
        }
    }
}

// -- Declarations --

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Declaration {
    Function(Function),
    Global(Global),
    UnitHook(UnitHook),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumDisplay)]
pub enum Linkage {
    #[display("private")]
    Private,
    #[display("public")]
    Public,
    #[display("preinit")]
    PreInit,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: Option<Expr>,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: Option<Expr>) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Function {
    pub id: String,
    pub result: Type,
    pub params: Vec<(String, Type)>,
    /// `None` for a prototype.
    pub body: Option<Block>,
    pub linkage: Linkage,
    pub attributes: Vec<Attribute>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Global {
    pub id: String,
    pub init: Expr,
    pub linkage: Linkage,
    pub location: Option<Location>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumDisplay)]
pub enum Engine {
    #[display("all")]
    All,
    #[display("parser")]
    Parser,
    #[display("composer")]
    Composer,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnitHook {
    pub hook: QualifiedId,
    pub body: Block,
    pub engine: Engine,
    pub attributes: Vec<Attribute>,
    pub location: Option<Location>,
}

impl UnitHook {
    pub fn priority(&self) -> Option<i64> {
        self.attributes
            .iter()
            .find(|attr| attr.name == "&priority")
            .and_then(|attr| match attr.value.as_ref().map(|v| &v.kind) {
                Some(ExprKind::Integer(value)) => Some(*value),
                _ => None,
            })
    }
}

// -- Types --

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Type {
    Void,
    Bool,
    String,
    Named(QualifiedId),
    Vector(Box<Type>),
}

// -- Statements --

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Block {
    pub stmts: Vec<Stmt>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Stmt {
    Expr(Expr),
    If { cond: Expr, then_block: Block },
    Return(Option<Expr>),
    Local {
        id: String,
        ty: Type,
        init: Option<Expr>,
    },
}

// -- Expressions --

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Expr {
    pub kind: ExprKind,
    pub location: Option<Location>,
}

impl Expr {
    pub fn new(kind: ExprKind) -> Self {
        Self {
            kind,
            location: None,
        }
    }

    pub fn at(mut self, location: Option<&Location>) -> Self {
        self.location = location.cloned();
        self
    }

    pub fn is_operator(&self, op: OperatorKind) -> bool {
        matches!(&self.kind, ExprKind::Operator { kind, .. } if *kind == op)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExprKind {
    Id(QualifiedId),
    /// The member name operand of `.`, `.?` and `?.`.
    Member(String),

    Bool(bool),
    Integer(i64),
    /// Kept as written so the tree stays `Eq`.
    Real(String),
    String(String),
    Bytes(String),
    Null,
    Port(Port),

    Tuple(Vec<Expr>),
    Vector(Vec<Expr>),

    Call {
        callee: QualifiedId,
        args: Vec<Expr>,
    },
    MemberCall {
        receiver: Box<Expr>,
        method: String,
        args: Vec<Expr>,
    },

    /// An operator as parsed, before any type-driven resolution.
    Operator {
        kind: OperatorKind,
        operands: Vec<Expr>,
    },
    Ternary {
        cond: Box<Expr>,
        then_expr: Box<Expr>,
        else_expr: Box<Expr>,
    },

    /// Evaluated lazily at the use site; optionally turns exceptions into an
    /// unset value.
    Deferred {
        expr: Box<Expr>,
        catch_exception: bool,
    },
    Move(Box<Expr>),
    Assign {
        target: Box<Expr>,
        value: Box<Expr>,
    },
    /// The linking unit's scope token.
    LinkerScope,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumDisplay)]
pub enum OperatorKind {
    // Postfix
    #[display(".")]
    Member,
    #[display(".?")]
    TryMember,
    #[display("?.")]
    HasMember,
    #[display(".()")]
    MethodCall,
    #[display("()")]
    Call,
    #[display("[]")]
    Index,

    // Prefix
    #[display("!")]
    LogicalNot,
    #[display("-")]
    SignNeg,
    #[display("~")]
    Negate,

    // Infix
    #[display("||")]
    LogicalOr,
    #[display("&&")]
    LogicalAnd,
    #[display("|")]
    BitOr,
    #[display("^")]
    BitXor,
    #[display("&")]
    BitAnd,
    #[display("==")]
    Equal,
    #[display("!=")]
    Unequal,
    #[display("<")]
    Lower,
    #[display("<=")]
    LowerEqual,
    #[display(">")]
    Greater,
    #[display(">=")]
    GreaterEqual,
    #[display("in")]
    In,
    #[display("<<")]
    ShiftLeft,
    #[display(">>")]
    ShiftRight,
    #[display("+")]
    Sum,
    #[display("-")]
    Difference,
    #[display("*")]
    Multiple,
    #[display("/")]
    Division,
    #[display("%")]
    Modulo,
}

impl OperatorKind {
    pub fn is_prefix(self) -> bool {
        matches!(
            self,
            OperatorKind::LogicalNot | OperatorKind::SignNeg | OperatorKind::Negate
        )
    }

    pub fn is_postfix(self) -> bool {
        matches!(
            self,
            OperatorKind::Member
                | OperatorKind::TryMember
                | OperatorKind::HasMember
                | OperatorKind::MethodCall
                | OperatorKind::Call
                | OperatorKind::Index
        )
    }

    /// Binding power of infix operators; higher binds tighter.
    pub fn infix_power(self) -> Option<u8> {
        use OperatorKind::*;
        match self {
            LogicalOr => Some(1),
            LogicalAnd => Some(2),
            In => Some(3),
            BitOr => Some(4),
            BitXor => Some(5),
            BitAnd => Some(6),
            Equal | Unequal => Some(7),
            Lower | LowerEqual | Greater | GreaterEqual => Some(8),
            ShiftLeft | ShiftRight => Some(9),
            Sum | Difference => Some(10),
            Multiple | Division | Modulo => Some(11),
            _ => None,
        }
    }
}
