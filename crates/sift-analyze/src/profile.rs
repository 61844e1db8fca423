//! Structural performance heuristics.
//!
//! Nothing is executed: hotspots are nested loops and suggestions come from
//! `append`/`extend` calls made directly inside a loop.

use sift_core::types::Severity;
use sift_parsers::ast::{Expr, ExprKind, Module, Stmt, StmtKind};
use sift_parsers::parse_module;
use sift_parsers::visit::{walk_expr, walk_module, walk_stmt, Visitor};

use crate::types::{performance_score, Hotspot, HotspotKind, PerformanceProfile};

const NESTED_LOOP_SUGGESTION: &str = "Consider using more efficient algorithms or data structures";

pub fn profile(source: &str) -> PerformanceProfile {
    match parse_module(source) {
        Ok(module) => profile_module(&module),
        Err(e) => {
            let err = e.into_syntax_error();
            tracing::debug!(error = %err, "profiling skipped");
            PerformanceProfile::failed(err.message)
        }
    }
}

pub fn profile_module(module: &Module) -> PerformanceProfile {
    let mut walker = LoopWalker::default();
    walk_module(&mut walker, module);

    // One hotspot per (loop, descendant loop) pair, grouped by the outer loop.
    let mut hotspots = Vec::new();
    let mut suggestions = Vec::new();
    for record in &walker.loops {
        for _ in 0..record.descendants {
            hotspots.push(Hotspot {
                kind: HotspotKind::NestedLoop,
                line: record.line,
                severity: Severity::High,
                suggestion: NESTED_LOOP_SUGGESTION.to_string(),
            });
        }
        if record.appends {
            suggestions.push(format!(
                "Consider using list comprehension instead of append in loop at line {}",
                record.line
            ));
        }
    }

    PerformanceProfile {
        performance_score: performance_score(hotspots.len(), suggestions.len()),
        hotspots,
        memory_leaks: Vec::new(),
        optimization_suggestions: suggestions,
        error: None,
    }
}

struct LoopRecord {
    line: u32,
    descendants: usize,
    appends: bool,
}

/// Records every `for`/`while` in pre-order with its count of descendant
/// loops.
#[derive(Default)]
struct LoopWalker {
    loops: Vec<LoopRecord>,
    /// Indices into `loops` of the loops enclosing the current node.
    open: Vec<usize>,
}

impl Visitor for LoopWalker {
    fn visit_stmt(&mut self, stmt: &Stmt) {
        if !matches!(stmt.kind, StmtKind::For { .. } | StmtKind::While { .. }) {
            walk_stmt(self, stmt);
            return;
        }
        for &outer in &self.open {
            self.loops[outer].descendants += 1;
        }
        self.loops.push(LoopRecord {
            line: stmt.line,
            descendants: 0,
            appends: false,
        });
        self.open.push(self.loops.len() - 1);
        walk_stmt(self, stmt);
        self.open.pop();
    }

    fn visit_expr(&mut self, expr: &Expr) {
        if let ExprKind::Call { func, .. } = &expr.kind {
            let grows_list = matches!(
                &func.kind,
                ExprKind::Attribute { attr, .. } if attr == "append" || attr == "extend"
            );
            if grows_list {
                if let Some(&innermost) = self.open.last() {
                    self.loops[innermost].appends = true;
                }
            }
        }
        walk_expr(self, expr);
    }
}
