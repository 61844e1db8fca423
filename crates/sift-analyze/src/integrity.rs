//! Fixed-rule security and integrity scanner.
//!
//! This is a pattern matcher over the AST, not a taint analysis: values built
//! indirectly (a query assembled over several statements, `getattr(builtins,
//! "eval")`) are not detected.

use std::collections::HashMap;

use sift_core::types::{Finding, FindingCategory, Severity};
use sift_parsers::ast::{
    BinOperator, Constant, ExceptHandler, Expr, ExprKind, FunctionDef, Module, Stmt, StmtKind,
};
use sift_parsers::parse_module;
use sift_parsers::visit::{walk_except_handler, walk_expr, walk_module, walk_stmt, Visitor};

use crate::types::IntegrityReport;

const DANGEROUS_FUNCTIONS: &[&str] = &["eval", "exec"];
const CREDENTIAL_MARKERS: &[&str] = &["password", "secret", "api_key", "token"];
const SQL_KEYWORDS: &[&str] = &["SELECT", "INSERT", "UPDATE", "DELETE"];

/// Scan `source`. A parse failure is reported in [`IntegrityReport::error`].
pub fn check_integrity(source: &str) -> IntegrityReport {
    match parse_module(source) {
        Ok(module) => check_module(&module),
        Err(e) => {
            let err = e.into_syntax_error();
            tracing::debug!(error = %err, "integrity check skipped");
            IntegrityReport::failed(err.message)
        }
    }
}

pub fn check_module(module: &Module) -> IntegrityReport {
    let mut checker = Checker::default();
    checker.check_duplicates(&module.body);
    walk_module(&mut checker, module);
    checker.report
}

#[derive(Default)]
struct Checker {
    report: IntegrityReport,
    /// Enclosing function names, innermost last.
    functions: Vec<String>,
}

impl Checker {
    fn enclosing_function(&self) -> Option<String> {
        self.functions.last().cloned()
    }

    fn security(
        &mut self,
        category: FindingCategory,
        symbol: Option<String>,
        line: u32,
        severity: Severity,
        message: String,
    ) {
        self.report.security_issues.push(Finding {
            category,
            symbol,
            line: Some(line),
            severity,
            message,
        });
    }

    /// A function or class bound twice directly in the same body. Decorated
    /// definitions are skipped: property setters and `@overload` stubs reuse
    /// names on purpose.
    fn check_duplicates(&mut self, body: &[Stmt]) {
        let mut first_seen: HashMap<&str, u32> = HashMap::new();
        for stmt in body {
            let name = match &stmt.kind {
                StmtKind::FunctionDef(f) if f.decorators.is_empty() => f.name.as_str(),
                StmtKind::ClassDef(c) if c.decorators.is_empty() => c.name.as_str(),
                _ => continue,
            };
            match first_seen.get(name) {
                Some(&previous) => self.report.integrity_issues.push(Finding {
                    category: FindingCategory::DuplicateDefinition,
                    symbol: Some(name.to_string()),
                    line: Some(stmt.line),
                    severity: Severity::Medium,
                    message: format!(
                        "{name} is redefined at line {}, shadowing the definition at line {previous}",
                        stmt.line
                    ),
                }),
                None => {
                    first_seen.insert(name, stmt.line);
                }
            }
        }
    }

    fn check_mutable_defaults(&mut self, func: &FunctionDef) {
        for param in &func.params {
            let Some(default) = &param.default else {
                continue;
            };
            if is_mutable_literal(default) {
                self.report.best_practice_violations.push(Finding {
                    category: FindingCategory::MutableDefault,
                    symbol: Some(func.name.clone()),
                    line: Some(default.line),
                    severity: Severity::Medium,
                    message: format!(
                        "Mutable default argument {} in {}",
                        param.name, func.name
                    ),
                });
            }
        }
    }

    fn check_credential(&mut self, target: &Expr, value: &Expr, line: u32) {
        let Some(name) = target.as_name() else {
            return;
        };
        let lowered = name.to_lowercase();
        if !CREDENTIAL_MARKERS.iter().any(|m| lowered.contains(m)) {
            return;
        }
        // `token = None` is a placeholder, not a credential.
        if matches!(&value.kind, ExprKind::Constant(c) if *c != Constant::None) {
            self.security(
                FindingCategory::HardcodedCredential,
                Some(name.to_string()),
                line,
                Severity::High,
                "Hardcoded credentials detected".to_string(),
            );
        }
    }

    fn check_injection(&mut self, expr: &Expr) {
        let template = match &expr.kind {
            ExprKind::BinOp {
                left,
                op: BinOperator::Mod,
                ..
            } => left.as_str_constant(),
            ExprKind::FString { template, values } if !values.is_empty() => Some(template.as_str()),
            ExprKind::Call { func, .. } => match &func.kind {
                ExprKind::Attribute { value, attr } if attr == "format" => value.as_str_constant(),
                _ => None,
            },
            _ => None,
        };
        if template.is_some_and(contains_sql_keyword) {
            let symbol = self.enclosing_function();
            self.security(
                FindingCategory::InjectionRisk,
                symbol,
                expr.line,
                Severity::High,
                "Potential SQL injection vulnerability".to_string(),
            );
        }
    }
}

impl Visitor for Checker {
    fn visit_stmt(&mut self, stmt: &Stmt) {
        match &stmt.kind {
            StmtKind::FunctionDef(func) => {
                self.check_mutable_defaults(func);
                self.check_duplicates(&func.body);
                self.functions.push(func.name.clone());
                walk_stmt(self, stmt);
                self.functions.pop();
                return;
            }
            StmtKind::ClassDef(class) => self.check_duplicates(&class.body),
            StmtKind::Assign { targets, value } => {
                for target in targets {
                    self.check_credential(target, value, stmt.line);
                }
            }
            StmtKind::AnnAssign {
                target,
                value: Some(value),
                ..
            } => self.check_credential(target, value, stmt.line),
            StmtKind::ImportFrom(from) if from.wildcard => {
                let module = format!(
                    "{}{}",
                    ".".repeat(from.level as usize),
                    from.module.as_deref().unwrap_or_default()
                );
                self.report.best_practice_violations.push(Finding {
                    category: FindingCategory::WildcardImport,
                    symbol: Some(module.clone()),
                    line: Some(stmt.line),
                    severity: Severity::Low,
                    message: format!("Wildcard import from {module}"),
                });
            }
            _ => {}
        }
        walk_stmt(self, stmt);
    }

    fn visit_expr(&mut self, expr: &Expr) {
        if let ExprKind::Call { func, .. } = &expr.kind {
            if let Some(name) = func.as_name().filter(|n| DANGEROUS_FUNCTIONS.contains(n)) {
                self.security(
                    FindingCategory::DangerousFunction,
                    Some(name.to_string()),
                    expr.line,
                    Severity::Critical,
                    format!("Use of {name} is dangerous and should be avoided"),
                );
            }
        }
        self.check_injection(expr);
        walk_expr(self, expr);
    }

    fn visit_except_handler(&mut self, handler: &ExceptHandler) {
        if handler.type_.is_none() {
            self.report.best_practice_violations.push(Finding {
                category: FindingCategory::BareExcept,
                symbol: self.enclosing_function(),
                line: Some(handler.line),
                severity: Severity::Low,
                message: "Bare except clause catches every exception".to_string(),
            });
        }
        walk_except_handler(self, handler);
    }
}

fn contains_sql_keyword(template: &str) -> bool {
    let upper = template.to_uppercase();
    SQL_KEYWORDS.iter().any(|k| upper.contains(k))
}

/// `[]`, `{}`, `{1}` and bare `list()` / `dict()` / `set()` calls.
fn is_mutable_literal(expr: &Expr) -> bool {
    match &expr.kind {
        ExprKind::List(_) | ExprKind::Dict(_) | ExprKind::Set(_) => true,
        ExprKind::Call { func, args } => {
            args.is_empty() && matches!(func.as_name(), Some("list" | "dict" | "set"))
        }
        _ => false,
    }
}

#[cfg(test)]
#[path = "integrity_tests.rs"]
mod tests;
