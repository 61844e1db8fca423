//! Read-only AST traversal.
//!
//! Implement [`Visitor`] and override only the hooks you need; the default
//! methods call the matching `walk_*` function, which recurses into every
//! child in source order. Overrides that still want the subtree visited must
//! call the `walk_*` function themselves.

use crate::ast::{ExceptHandler, Expr, ExprKind, Module, Stmt, StmtKind};

pub trait Visitor {
    fn visit_stmt(&mut self, stmt: &Stmt) {
        walk_stmt(self, stmt);
    }

    fn visit_expr(&mut self, expr: &Expr) {
        walk_expr(self, expr);
    }

    fn visit_except_handler(&mut self, handler: &ExceptHandler) {
        walk_except_handler(self, handler);
    }
}

pub fn walk_module<V: Visitor + ?Sized>(visitor: &mut V, module: &Module) {
    walk_body(visitor, &module.body);
}

pub fn walk_body<V: Visitor + ?Sized>(visitor: &mut V, body: &[Stmt]) {
    for stmt in body {
        visitor.visit_stmt(stmt);
    }
}

pub fn walk_stmt<V: Visitor + ?Sized>(visitor: &mut V, stmt: &Stmt) {
    match &stmt.kind {
        StmtKind::FunctionDef(func) => {
            for dec in &func.decorators {
                visitor.visit_expr(dec);
            }
            for param in &func.params {
                if let Some(default) = &param.default {
                    visitor.visit_expr(default);
                }
            }
            walk_body(visitor, &func.body);
        }
        StmtKind::ClassDef(class) => {
            for dec in &class.decorators {
                visitor.visit_expr(dec);
            }
            for base in &class.bases {
                visitor.visit_expr(base);
            }
            walk_body(visitor, &class.body);
        }
        StmtKind::Import(_)
        | StmtKind::ImportFrom(_)
        | StmtKind::Global(_)
        | StmtKind::Nonlocal(_)
        | StmtKind::Pass
        | StmtKind::Break
        | StmtKind::Continue => {}
        StmtKind::Assign { targets, value } => {
            for target in targets {
                visitor.visit_expr(target);
            }
            visitor.visit_expr(value);
        }
        StmtKind::AnnAssign { target, value, .. } => {
            visitor.visit_expr(target);
            if let Some(value) = value {
                visitor.visit_expr(value);
            }
        }
        StmtKind::AugAssign { target, value } => {
            visitor.visit_expr(target);
            visitor.visit_expr(value);
        }
        StmtKind::If { test, body, orelse } | StmtKind::While { test, body, orelse } => {
            visitor.visit_expr(test);
            walk_body(visitor, body);
            walk_body(visitor, orelse);
        }
        StmtKind::For {
            target,
            iter,
            body,
            orelse,
            ..
        } => {
            visitor.visit_expr(target);
            visitor.visit_expr(iter);
            walk_body(visitor, body);
            walk_body(visitor, orelse);
        }
        StmtKind::Try {
            body,
            handlers,
            orelse,
            finalbody,
        } => {
            walk_body(visitor, body);
            for handler in handlers {
                visitor.visit_except_handler(handler);
            }
            walk_body(visitor, orelse);
            walk_body(visitor, finalbody);
        }
        StmtKind::With { items, body } => {
            for item in items {
                visitor.visit_expr(item);
            }
            walk_body(visitor, body);
        }
        StmtKind::Return(value) => {
            if let Some(value) = value {
                visitor.visit_expr(value);
            }
        }
        StmtKind::Expr(expr) => visitor.visit_expr(expr),
        StmtKind::Other { exprs, body } => {
            for expr in exprs {
                visitor.visit_expr(expr);
            }
            walk_body(visitor, body);
        }
    }
}

pub fn walk_except_handler<V: Visitor + ?Sized>(visitor: &mut V, handler: &ExceptHandler) {
    if let Some(type_) = &handler.type_ {
        visitor.visit_expr(type_);
    }
    walk_body(visitor, &handler.body);
}

pub fn walk_expr<V: Visitor + ?Sized>(visitor: &mut V, expr: &Expr) {
    match &expr.kind {
        ExprKind::Name(_) | ExprKind::Constant(_) => {}
        ExprKind::Call { func, args } => {
            visitor.visit_expr(func);
            for arg in args {
                visitor.visit_expr(arg);
            }
        }
        ExprKind::Keyword { value, .. } => visitor.visit_expr(value),
        ExprKind::Attribute { value, .. } => visitor.visit_expr(value),
        ExprKind::BinOp { left, right, .. } => {
            visitor.visit_expr(left);
            visitor.visit_expr(right);
        }
        ExprKind::BoolOp { values, .. }
        | ExprKind::FString { values, .. }
        | ExprKind::List(values)
        | ExprKind::Tuple(values)
        | ExprKind::Set(values)
        | ExprKind::Dict(values)
        | ExprKind::Other(values) => {
            for value in values {
                visitor.visit_expr(value);
            }
        }
    }
}
