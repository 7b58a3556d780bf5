//! Text renderer for generated modules.

use std::fmt::Write as _;

use crate::core::ids::PERCENT_ESCAPE;
use crate::core::tree::*;

pub fn format_module(module: &Module) -> String {
    let mut formatter = Formatter::new();
    formatter.write_module(module);
    formatter.finish()
}

pub fn format_expr(expr: &Expr) -> String {
    let mut formatter = Formatter::new();
    formatter.write_expr(expr);
    formatter.finish()
}

pub fn format_block(block: &Block) -> String {
    let mut formatter = Formatter::new();
    formatter.write_block_body(block);
    formatter.finish()
}

pub fn format_type(ty: &Type) -> String {
    let mut formatter = Formatter::new();
    formatter.write_type(ty);
    formatter.finish()
}

const POWER_ASSIGN: u8 = 0;
const POWER_TERNARY: u8 = 1;
const POWER_PREFIX: u8 = 13;
const POWER_ATOM: u8 = 14;

/// How tightly an expression binds when it appears as an operand.
fn expr_power(expr: &Expr) -> u8 {
    match &expr.kind {
        ExprKind::Assign { .. } => POWER_ASSIGN,
        ExprKind::Ternary { .. } => POWER_TERNARY,
        ExprKind::Operator { kind, .. } => match kind.infix_power() {
            Some(power) => power + 1,
            None if kind.is_prefix() => POWER_PREFIX,
            None => POWER_ATOM,
        },
        // Negative literals print with a leading sign.
        ExprKind::Integer(value) if *value < 0 => POWER_PREFIX,
        _ => POWER_ATOM,
    }
}

fn escape_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(ch),
        }
    }
    out
}

struct Formatter {
    out: String,
    indent: usize,
}

impl Formatter {
    fn new() -> Self {
        Self {
            out: String::new(),
            indent: 0,
        }
    }

    fn finish(self) -> String {
        self.out
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent {
            self.out.push_str("    ");
        }
    }

    fn write_module(&mut self, module: &Module) {
        let _ = writeln!(&mut self.out, "module {} {{", module.id);

        if !module.imports.is_empty() {
            let _ = writeln!(&mut self.out);
            for import in &module.imports {
                self.write_import(import);
            }
        }

        for decl in &module.decls {
            let _ = writeln!(&mut self.out);
            self.write_decl(decl);
        }

        let _ = writeln!(&mut self.out);
        let _ = writeln!(&mut self.out, "}}");
    }

    fn write_import(&mut self, import: &Import) {
        let _ = write!(&mut self.out, "import {}", import.module);
        if let Some(scope) = &import.scope {
            let _ = write!(&mut self.out, " from {scope}");
        }
        self.out.push(';');

        if let Some(path) = &import.path {
            let _ = write!(&mut self.out, " # {}: {}", import.extension, path.display());
        } else if !import.search_dirs.is_empty() {
            let dirs: Vec<String> = import
                .search_dirs
                .iter()
                .map(|dir| dir.display().to_string())
                .collect();
            let _ = write!(&mut self.out, " # {} search: {}", import.extension, dirs.join(", "));
        }
        let _ = writeln!(&mut self.out);
    }

    fn write_decl(&mut self, decl: &Declaration) {
        match decl {
            Declaration::Function(function) => self.write_function(function),
            Declaration::Global(global) => {
                if global.linkage != Linkage::Private {
                    let _ = write!(&mut self.out, "{} ", global.linkage);
                }
                let _ = write!(&mut self.out, "global {} = ", global.id);
                self.write_expr(&global.init);
                let _ = writeln!(&mut self.out, ";");
            }
            Declaration::UnitHook(hook) => self.write_hook(hook),
        }
    }

    fn write_function(&mut self, function: &Function) {
        if function.body.is_none() {
            self.out.push_str("declare ");
        }
        let _ = write!(&mut self.out, "{} function ", function.linkage);
        self.write_type(&function.result);
        let _ = write!(&mut self.out, " {}(", function.id);
        for (i, (name, ty)) in function.params.iter().enumerate() {
            if i > 0 {
                self.out.push_str(", ");
            }
            let _ = write!(&mut self.out, "{name}: ");
            self.write_type(ty);
        }
        self.out.push(')');
        self.write_attributes(&function.attributes);

        match &function.body {
            Some(body) => {
                let _ = writeln!(&mut self.out, " {{");
                self.write_block_body(body);
                let _ = writeln!(&mut self.out, "}}");
            }
            None => {
                let _ = writeln!(&mut self.out, ";");
            }
        }
    }

    fn write_hook(&mut self, hook: &UnitHook) {
        let target = hook.hook.as_str().replace(PERCENT_ESCAPE, "%");
        let _ = write!(&mut self.out, "on {target}");
        if hook.engine != Engine::All {
            let _ = write!(&mut self.out, " %{}", hook.engine);
        }
        self.write_attributes(&hook.attributes);
        let _ = writeln!(&mut self.out, " {{");
        self.write_block_body(&hook.body);
        let _ = writeln!(&mut self.out, "}}");
    }

    fn write_attributes(&mut self, attributes: &[Attribute]) {
        for attr in attributes {
            let _ = write!(&mut self.out, " {}", attr.name);
            if let Some(value) = &attr.value {
                self.out.push('=');
                self.write_expr(value);
            }
        }
    }

    fn write_type(&mut self, ty: &Type) {
        match ty {
            Type::Void => self.out.push_str("void"),
            Type::Bool => self.out.push_str("bool"),
            Type::String => self.out.push_str("string"),
            Type::Named(id) => self.out.push_str(id.as_str()),
            Type::Vector(element) => {
                self.out.push_str("vector<");
                self.write_type(element);
                self.out.push('>');
            }
        }
    }

    fn write_block_body(&mut self, block: &Block) {
        self.indent += 1;
        for stmt in &block.stmts {
            self.write_stmt(stmt);
        }
        self.indent -= 1;
    }

    fn write_stmt(&mut self, stmt: &Stmt) {
        self.write_indent();
        match stmt {
            Stmt::Expr(expr) => {
                self.write_expr(expr);
                let _ = writeln!(&mut self.out, ";");
            }
            Stmt::If { cond, then_block } => {
                self.out.push_str("if ( ");
                self.write_expr(cond);
                self.out.push_str(" )");
                // A lone `return` stays on one line.
                if let [Stmt::Return(None)] = then_block.stmts.as_slice() {
                    let _ = writeln!(&mut self.out, " return;");
                    return;
                }
                let _ = writeln!(&mut self.out, " {{");
                self.write_block_body(then_block);
                self.write_indent();
                let _ = writeln!(&mut self.out, "}}");
            }
            Stmt::Return(value) => {
                self.out.push_str("return");
                if let Some(value) = value {
                    self.out.push(' ');
                    self.write_expr(value);
                }
                let _ = writeln!(&mut self.out, ";");
            }
            Stmt::Local { id, ty, init } => {
                let _ = write!(&mut self.out, "local {id}: ");
                self.write_type(ty);
                if let Some(init) = init {
                    self.out.push_str(" = ");
                    self.write_expr(init);
                }
                let _ = writeln!(&mut self.out, ";");
            }
        }
    }

    fn write_list(&mut self, items: &[Expr]) {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.out.push_str(", ");
            }
            self.write_expr(item);
        }
    }

    /// Writes `expr`, parenthesised if it binds looser than `min_power`.
    fn write_operand(&mut self, expr: &Expr, min_power: u8) {
        if expr_power(expr) < min_power {
            self.out.push('(');
            self.write_expr(expr);
            self.out.push(')');
        } else {
            self.write_expr(expr);
        }
    }

    fn write_expr(&mut self, expr: &Expr) {
        match &expr.kind {
            ExprKind::Id(id) => self.out.push_str(id.as_str()),
            ExprKind::Member(name) => self.out.push_str(name),
            ExprKind::Bool(true) => self.out.push_str("True"),
            ExprKind::Bool(false) => self.out.push_str("False"),
            ExprKind::Integer(value) => {
                let _ = write!(&mut self.out, "{value}");
            }
            ExprKind::Real(text) => self.out.push_str(text),
            ExprKind::String(text) => {
                let _ = write!(&mut self.out, "\"{}\"", escape_string(text));
            }
            ExprKind::Bytes(text) => {
                let _ = write!(&mut self.out, "b\"{}\"", escape_string(text));
            }
            ExprKind::Null => self.out.push_str("Null"),
            ExprKind::Port(port) => {
                let _ = write!(&mut self.out, "{port}");
            }
            ExprKind::Tuple(items) => {
                self.out.push('(');
                self.write_list(items);
                if items.len() == 1 {
                    self.out.push(',');
                }
                self.out.push(')');
            }
            ExprKind::Vector(items) => {
                self.out.push('[');
                self.write_list(items);
                self.out.push(']');
            }
            ExprKind::Call { callee, args } => {
                let _ = write!(&mut self.out, "{callee}(");
                self.write_list(args);
                self.out.push(')');
            }
            ExprKind::MemberCall {
                receiver,
                method,
                args,
            } => {
                self.write_operand(receiver, POWER_ATOM);
                let _ = write!(&mut self.out, ".{method}(");
                self.write_list(args);
                self.out.push(')');
            }
            ExprKind::Operator { kind, operands } => self.write_operator(*kind, operands),
            ExprKind::Ternary {
                cond,
                then_expr,
                else_expr,
            } => {
                self.write_operand(cond, POWER_TERNARY + 1);
                self.out.push_str(" ? ");
                self.write_operand(then_expr, POWER_TERNARY + 1);
                self.out.push_str(" : ");
                self.write_operand(else_expr, POWER_TERNARY);
            }
            ExprKind::Deferred {
                expr,
                catch_exception,
            } => {
                self.out.push_str("deferred(");
                self.write_expr(expr);
                let _ = write!(&mut self.out, ", catch_exception={catch_exception})");
            }
            ExprKind::Move(inner) => {
                self.out.push_str("move(");
                self.write_expr(inner);
                self.out.push(')');
            }
            ExprKind::Assign { target, value } => {
                self.write_operand(target, POWER_TERNARY);
                self.out.push_str(" = ");
                self.write_operand(value, POWER_ASSIGN);
            }
            ExprKind::LinkerScope => self.out.push_str("scope()"),
        }
    }

    fn write_operator(&mut self, kind: OperatorKind, operands: &[Expr]) {
        match (kind, operands) {
            (
                OperatorKind::Member | OperatorKind::TryMember | OperatorKind::HasMember,
                [receiver, member],
            ) => {
                self.write_operand(receiver, POWER_ATOM);
                let _ = write!(&mut self.out, "{kind}");
                self.write_expr(member);
            }
            (OperatorKind::MethodCall, [receiver, method, args @ ..]) => {
                self.write_operand(receiver, POWER_ATOM);
                self.out.push('.');
                self.write_expr(method);
                self.out.push('(');
                self.write_list(args);
                self.out.push(')');
            }
            (OperatorKind::Call, [callee, args @ ..]) => {
                self.write_operand(callee, POWER_ATOM);
                self.out.push('(');
                self.write_list(args);
                self.out.push(')');
            }
            (OperatorKind::Index, [base, index]) => {
                self.write_operand(base, POWER_ATOM);
                self.out.push('[');
                self.write_expr(index);
                self.out.push(']');
            }
            (kind, [operand]) if kind.is_prefix() => {
                let _ = write!(&mut self.out, "{kind}");
                self.write_operand(operand, POWER_PREFIX);
            }
            (kind, [lhs, rhs]) if kind.infix_power().is_some() => {
                let power = kind.infix_power().unwrap_or_default() + 1;
                self.write_operand(lhs, power);
                let _ = write!(&mut self.out, " {kind} ");
                self.write_operand(rhs, power + 1);
            }
            (kind, operands) => {
                // Malformed arity; keep it readable.
                let _ = write!(&mut self.out, "<{kind}>(");
                self.write_list(operands);
                self.out.push(')');
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/tree/t_format.rs"]
mod tests;
