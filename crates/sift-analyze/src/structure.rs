//! Structural analysis: declarations, cyclomatic complexity, and quality issues.

use std::collections::HashSet;

use sift_core::config::AnalysisConfig;
use sift_core::types::SyntaxError;
use sift_parsers::ast::{
    ClassDef, ExceptHandler, Expr, ExprKind, FunctionDef, ImportFrom, Module, Stmt, StmtKind,
};
use sift_parsers::parse_module;
use sift_parsers::visit::{walk_except_handler, walk_expr, walk_module, walk_stmt, Visitor};

use crate::types::{Analysis, ClassInfo, FunctionInfo};

/// Analyze `source` with the default thresholds.
pub fn analyze(source: &str) -> Result<Analysis, SyntaxError> {
    analyze_with(source, &AnalysisConfig::default())
}

pub fn analyze_with(source: &str, config: &AnalysisConfig) -> Result<Analysis, SyntaxError> {
    let module = parse_module(source).map_err(|e| e.into_syntax_error())?;
    Ok(analyze_module(&module, source, config))
}

/// Analyze an already parsed module. `source` is only used for the line count.
pub fn analyze_module(module: &Module, source: &str, config: &AnalysisConfig) -> Analysis {
    let mut collector = Collector::new(config);
    walk_module(&mut collector, module);

    let complexity = collector
        .functions
        .iter()
        .map(|f| f.complexity)
        .sum::<u32>()
        .max(1);

    let mut issues = collector.docstring_issues;
    issues.extend(collector.argument_issues);
    issues.extend(collector.global_issues);

    Analysis {
        functions: collector.functions,
        classes: collector.classes,
        imports: collector.imports.into_vec(),
        variables: collector.variables.into_vec(),
        complexity,
        lines_of_code: line_count(source),
        issues,
    }
}

/// Newline-delimited line count: `""` is one line, and a trailing newline
/// starts another.
pub fn line_count(source: &str) -> u32 {
    source.matches('\n').count() as u32 + 1
}

/// `1 + if/elif + while + for + except handlers + (operands - 1) per boolean
/// operator`, counted over the whole definition including nested ones.
pub fn function_complexity(def: &Stmt) -> u32 {
    let mut counter = BranchCounter::default();
    walk_stmt(&mut counter, def);
    1 + counter.branches
}

#[derive(Default)]
struct BranchCounter {
    branches: u32,
}

impl Visitor for BranchCounter {
    fn visit_stmt(&mut self, stmt: &Stmt) {
        if matches!(
            stmt.kind,
            StmtKind::If { .. } | StmtKind::While { .. } | StmtKind::For { .. }
        ) {
            self.branches += 1;
        }
        walk_stmt(self, stmt);
    }

    fn visit_expr(&mut self, expr: &Expr) {
        if let ExprKind::BoolOp { values, .. } = &expr.kind {
            self.branches += values.len().saturating_sub(1) as u32;
        }
        walk_expr(self, expr);
    }

    fn visit_except_handler(&mut self, handler: &ExceptHandler) {
        self.branches += 1;
        walk_except_handler(self, handler);
    }
}

/// Insertion-ordered set of names.
#[derive(Default)]
struct OrderedNames {
    seen: HashSet<String>,
    names: Vec<String>,
}

impl OrderedNames {
    fn insert(&mut self, name: String) {
        if self.seen.insert(name.clone()) {
            self.names.push(name);
        }
    }

    fn into_vec(self) -> Vec<String> {
        self.names
    }
}

enum Scope {
    Class(String),
    Function(String),
}

impl Scope {
    fn name(&self) -> &str {
        match self {
            Scope::Class(name) | Scope::Function(name) => name,
        }
    }
}

struct Collector<'c> {
    config: &'c AnalysisConfig,
    scopes: Vec<Scope>,
    functions: Vec<FunctionInfo>,
    classes: Vec<ClassInfo>,
    imports: OrderedNames,
    variables: OrderedNames,
    docstring_issues: Vec<String>,
    argument_issues: Vec<String>,
    global_issues: Vec<String>,
}

impl<'c> Collector<'c> {
    fn new(config: &'c AnalysisConfig) -> Self {
        Self {
            config,
            scopes: Vec::new(),
            functions: Vec::new(),
            classes: Vec::new(),
            imports: OrderedNames::default(),
            variables: OrderedNames::default(),
            docstring_issues: Vec::new(),
            argument_issues: Vec::new(),
            global_issues: Vec::new(),
        }
    }

    fn current_scope(&self) -> Option<String> {
        self.scopes.last().map(|s| s.name().to_string())
    }

    fn record_function(&mut self, func: &FunctionDef, stmt: &Stmt) {
        let parameters: Vec<String> = func.positional_params().map(|p| p.name.clone()).collect();
        if func.docstring.is_none() {
            self.docstring_issues
                .push(format!("Missing docstring for {}", func.name));
        }
        if parameters.len() > self.config.max_parameters {
            self.argument_issues.push(format!(
                "Function {} has too many arguments ({})",
                func.name,
                parameters.len()
            ));
        }
        self.functions.push(FunctionInfo {
            name: func.name.clone(),
            parameters,
            returns: func.returns.clone(),
            docstring: func.docstring.clone(),
            complexity: function_complexity(stmt),
            line: stmt.line,
            is_async: func.is_async,
            scope: self.current_scope(),
        });
    }

    fn record_class(&mut self, class: &ClassDef, stmt: &Stmt) {
        if class.docstring.is_none() {
            self.docstring_issues
                .push(format!("Missing docstring for {}", class.name));
        }
        self.classes.push(ClassInfo {
            name: class.name.clone(),
            methods: class.methods().map(|m| m.name.clone()).collect(),
            docstring: class.docstring.clone(),
            line: stmt.line,
            scope: self.current_scope(),
        });
    }

    fn record_targets(&mut self, target: &Expr) {
        match &target.kind {
            ExprKind::Name(name) => self.variables.insert(name.clone()),
            ExprKind::Tuple(items) | ExprKind::List(items) => {
                for item in items {
                    self.record_targets(item);
                }
            }
            _ => {}
        }
    }
}

impl Visitor for Collector<'_> {
    fn visit_stmt(&mut self, stmt: &Stmt) {
        match &stmt.kind {
            StmtKind::FunctionDef(func) => {
                self.record_function(func, stmt);
                self.scopes.push(Scope::Function(func.name.clone()));
                walk_stmt(self, stmt);
                self.scopes.pop();
                return;
            }
            StmtKind::ClassDef(class) => {
                self.record_class(class, stmt);
                self.scopes.push(Scope::Class(class.name.clone()));
                walk_stmt(self, stmt);
                self.scopes.pop();
                return;
            }
            StmtKind::Import(aliases) => {
                for alias in aliases {
                    self.imports.insert(alias.name.clone());
                }
            }
            StmtKind::ImportFrom(from) => {
                for name in from_import_names(from) {
                    self.imports.insert(name);
                }
            }
            StmtKind::Assign { targets, .. } if self.scopes.is_empty() => {
                for target in targets {
                    self.record_targets(target);
                }
            }
            StmtKind::AnnAssign { target, .. } if self.scopes.is_empty() => {
                self.record_targets(target);
            }
            StmtKind::Global(names) => {
                if let Some(Scope::Function(function)) = self.scopes.last() {
                    self.global_issues.push(format!(
                        "Use of global variable {} in {}",
                        names.join(", "),
                        function
                    ));
                }
            }
            _ => {}
        }
        walk_stmt(self, stmt);
    }
}

/// `from pkg import a` gives `pkg.a`; relative imports keep their dots
/// (`from . import a` gives `.a`) and a wildcard gives `pkg.*`.
fn from_import_names(from: &ImportFrom) -> Vec<String> {
    let mut base = ".".repeat(from.level as usize);
    if let Some(module) = &from.module {
        base.push_str(module);
    }
    let join = |name: &str| {
        if base.is_empty() || base.ends_with('.') {
            format!("{base}{name}")
        } else {
            format!("{base}.{name}")
        }
    };
    if from.wildcard {
        return vec![join("*")];
    }
    from.names.iter().map(|alias| join(&alias.name)).collect()
}

#[cfg(test)]
#[path = "structure_tests.rs"]
mod tests;
