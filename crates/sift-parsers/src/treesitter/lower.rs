//! Lowering from the tree-sitter-python concrete tree into [`crate::ast`].
//!
//! Callers must have rejected trees containing error nodes first; lowering
//! itself never fails and maps anything unexpected to an `Other` variant.

use tree_sitter::Node;

use super::strings::{clean_docstring, decode_content, StringPrefix};
use crate::ast::{
    Alias, BinOperator, BoolOperator, ClassDef, Constant, ExceptHandler, Expr, ExprKind,
    FunctionDef, ImportFrom, Module, Param, ParamKind, Stmt, StmtKind,
};

pub(crate) fn lower_module(root: Node<'_>, source: &[u8]) -> Module {
    let lowerer = Lowerer { source };
    Module {
        body: lowerer.statements(root),
    }
}

fn line_of(node: Node<'_>) -> u32 {
    node.start_position().row as u32 + 1
}

fn end_line_of(node: Node<'_>) -> u32 {
    node.end_position().row as u32 + 1
}

/// Named children without comments and other extras.
fn named_children(node: Node<'_>) -> Vec<Node<'_>> {
    let mut cursor = node.walk();
    let children = node
        .named_children(&mut cursor)
        .filter(|c| !c.is_extra())
        .collect();
    children
}

fn field_children<'t>(node: Node<'t>, field: &str) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    let children = node
        .children_by_field_name(field, &mut cursor)
        .filter(|c| !c.is_extra())
        .collect();
    children
}

struct Lowerer<'s> {
    source: &'s [u8],
}

impl<'s> Lowerer<'s> {
    fn text(&self, node: Node<'_>) -> String {
        node.utf8_text(self.source).unwrap_or("").to_string()
    }

    /// Lower every statement child of a `module` or `block`.
    fn statements(&self, node: Node<'_>) -> Vec<Stmt> {
        named_children(node)
            .into_iter()
            .filter_map(|child| self.stmt(child))
            .collect()
    }

    /// Lower the `block` stored under `field`, or nothing when absent.
    fn suite(&self, node: Node<'_>, field: &str) -> Vec<Stmt> {
        node.child_by_field_name(field)
            .map(|block| self.statements(block))
            .unwrap_or_default()
    }

    fn stmt(&self, node: Node<'_>) -> Option<Stmt> {
        let line = line_of(node);
        let kind = match node.kind() {
            "function_definition" => StmtKind::FunctionDef(self.function(node, Vec::new())),
            "class_definition" => StmtKind::ClassDef(self.class(node, Vec::new())),
            "decorated_definition" => return self.decorated(node),
            "import_statement" => StmtKind::Import(self.aliases(node)),
            "import_from_statement" => StmtKind::ImportFrom(self.import_from(node)),
            "future_import_statement" => StmtKind::ImportFrom(ImportFrom {
                module: Some("__future__".to_string()),
                level: 0,
                names: self.aliases(node),
                wildcard: false,
            }),
            "expression_statement" => self.expression_statement(node),
            "if_statement" => self.if_statement(node),
            "for_statement" => StmtKind::For {
                is_async: has_token(node, "async"),
                target: self.field_expr(node, "left"),
                iter: self.field_expr(node, "right"),
                body: self.suite(node, "body"),
                orelse: self.else_body(node),
            },
            "while_statement" => StmtKind::While {
                test: self.field_expr(node, "condition"),
                body: self.suite(node, "body"),
                orelse: self.else_body(node),
            },
            "try_statement" => self.try_statement(node),
            "with_statement" => self.with_statement(node),
            "return_statement" => {
                StmtKind::Return(named_children(node).first().map(|c| self.expr(*c)))
            }
            "global_statement" => StmtKind::Global(self.identifiers(node)),
            "nonlocal_statement" => StmtKind::Nonlocal(self.identifiers(node)),
            "pass_statement" => StmtKind::Pass,
            "break_statement" => StmtKind::Break,
            "continue_statement" => StmtKind::Continue,
            _ => self.other_stmt(node),
        };
        Some(Stmt {
            kind,
            line,
            end_line: end_line_of(node),
        })
    }

    /// Generic statement: nested blocks become `body`, everything else `exprs`.
    fn other_stmt(&self, node: Node<'_>) -> StmtKind {
        let mut exprs = Vec::new();
        let mut body = Vec::new();
        self.collect_other(node, &mut exprs, &mut body);
        StmtKind::Other { exprs, body }
    }

    fn collect_other(&self, node: Node<'_>, exprs: &mut Vec<Expr>, body: &mut Vec<Stmt>) {
        for child in named_children(node) {
            match child.kind() {
                "block" => body.extend(self.statements(child)),
                // match/case plumbing
                "case_clause" | "case_pattern" | "else_clause" | "elif_clause" => {
                    self.collect_other(child, exprs, body)
                }
                k if is_statement_kind(k) => body.extend(self.stmt(child)),
                _ => exprs.push(self.expr(child)),
            }
        }
    }

    fn decorated(&self, node: Node<'_>) -> Option<Stmt> {
        let decorators: Vec<Expr> = named_children(node)
            .into_iter()
            .filter(|c| c.kind() == "decorator")
            .filter_map(|d| named_children(d).first().map(|e| self.expr(*e)))
            .collect();
        let definition = node.child_by_field_name("definition")?;
        // Python reports the `def`/`class` line, not the decorator line.
        let line = line_of(definition);
        let kind = match definition.kind() {
            "function_definition" => StmtKind::FunctionDef(self.function(definition, decorators)),
            "class_definition" => StmtKind::ClassDef(self.class(definition, decorators)),
            _ => return self.stmt(definition),
        };
        Some(Stmt {
            kind,
            line,
            end_line: end_line_of(definition),
        })
    }

    fn function(&self, node: Node<'_>, decorators: Vec<Expr>) -> FunctionDef {
        let body = self.suite(node, "body");
        FunctionDef {
            name: node
                .child_by_field_name("name")
                .map(|n| self.text(n))
                .unwrap_or_default(),
            params: node
                .child_by_field_name("parameters")
                .map(|p| self.parameters(p))
                .unwrap_or_default(),
            returns: node.child_by_field_name("return_type").map(|n| self.text(n)),
            docstring: docstring_of(&body),
            body,
            decorators,
            is_async: has_token(node, "async"),
        }
    }

    fn class(&self, node: Node<'_>, decorators: Vec<Expr>) -> ClassDef {
        let body = self.suite(node, "body");
        ClassDef {
            name: node
                .child_by_field_name("name")
                .map(|n| self.text(n))
                .unwrap_or_default(),
            bases: node
                .child_by_field_name("superclasses")
                .map(|args| {
                    named_children(args)
                        .into_iter()
                        .map(|a| self.expr(a))
                        .collect()
                })
                .unwrap_or_default(),
            docstring: docstring_of(&body),
            body,
            decorators,
        }
    }

    fn parameters(&self, node: Node<'_>) -> Vec<Param> {
        let children = named_children(node);
        // Everything before a `/` is positional-only.
        let has_positional_separator = children
            .iter()
            .any(|c| c.kind() == "positional_separator");
        let mut kind = if has_positional_separator {
            ParamKind::PositionalOnly
        } else {
            ParamKind::Positional
        };
        let mut params = Vec::new();

        for child in children {
            match child.kind() {
                "positional_separator" => kind = ParamKind::Positional,
                "keyword_separator" => kind = ParamKind::KeywordOnly,
                "list_splat_pattern" => {
                    params.push(self.param(child, ParamKind::VarPositional, None, None));
                    kind = ParamKind::KeywordOnly;
                }
                "dictionary_splat_pattern" => {
                    params.push(self.param(child, ParamKind::VarKeyword, None, None));
                }
                "identifier" => params.push(self.param(child, kind, None, None)),
                "typed_parameter" => {
                    let annotation = child.child_by_field_name("type").map(|t| self.text(t));
                    let Some(inner) = named_children(child).into_iter().next() else {
                        continue;
                    };
                    let inner_kind = match inner.kind() {
                        "list_splat_pattern" => ParamKind::VarPositional,
                        "dictionary_splat_pattern" => ParamKind::VarKeyword,
                        _ => kind,
                    };
                    params.push(self.param(inner, inner_kind, annotation, None));
                    if inner_kind == ParamKind::VarPositional {
                        kind = ParamKind::KeywordOnly;
                    }
                }
                "default_parameter" | "typed_default_parameter" => {
                    let Some(name) = child.child_by_field_name("name") else {
                        continue;
                    };
                    let annotation = child.child_by_field_name("type").map(|t| self.text(t));
                    let default = child.child_by_field_name("value").map(|v| self.expr(v));
                    params.push(self.param(name, kind, annotation, default));
                }
                _ => {}
            }
        }
        params
    }

    fn param(
        &self,
        node: Node<'_>,
        kind: ParamKind,
        annotation: Option<String>,
        default: Option<Expr>,
    ) -> Param {
        let text = self.text(node);
        Param {
            name: text.trim_start_matches('*').trim().to_string(),
            kind,
            annotation,
            default,
        }
    }

    fn aliases(&self, node: Node<'_>) -> Vec<Alias> {
        field_children(node, "name")
            .into_iter()
            .map(|n| self.alias(n))
            .collect()
    }

    fn alias(&self, node: Node<'_>) -> Alias {
        if node.kind() == "aliased_import" {
            Alias {
                name: node
                    .child_by_field_name("name")
                    .map(|n| self.text(n))
                    .unwrap_or_default(),
                asname: node.child_by_field_name("alias").map(|n| self.text(n)),
            }
        } else {
            Alias {
                name: self.text(node),
                asname: None,
            }
        }
    }

    fn import_from(&self, node: Node<'_>) -> ImportFrom {
        let (module, level) = match node.child_by_field_name("module_name") {
            Some(m) if m.kind() == "relative_import" => {
                let mut level = 0;
                let mut module = None;
                for part in named_children(m) {
                    match part.kind() {
                        "import_prefix" => level = self.text(part).matches('.').count() as u32,
                        "dotted_name" => module = Some(self.text(part)),
                        _ => {}
                    }
                }
                (module, level)
            }
            Some(m) => (Some(self.text(m)), 0),
            None => (None, 0),
        };
        let wildcard = named_children(node)
            .iter()
            .any(|c| c.kind() == "wildcard_import");
        ImportFrom {
            module,
            level,
            names: self.aliases(node),
            wildcard,
        }
    }

    fn expression_statement(&self, node: Node<'_>) -> StmtKind {
        let children = named_children(node);
        match children.as_slice() {
            [only] => match only.kind() {
                "assignment" => self.assignment(*only),
                "augmented_assignment" => StmtKind::AugAssign {
                    target: self.field_expr(*only, "left"),
                    value: self.field_expr(*only, "right"),
                },
                _ => StmtKind::Expr(self.expr(*only)),
            },
            many => StmtKind::Expr(Expr {
                kind: ExprKind::Tuple(many.iter().map(|c| self.expr(*c)).collect()),
                line: line_of(node),
            }),
        }
    }

    fn assignment(&self, node: Node<'_>) -> StmtKind {
        if let Some(annotation) = node.child_by_field_name("type") {
            return StmtKind::AnnAssign {
                target: self.field_expr(node, "left"),
                annotation: self.text(annotation),
                value: node.child_by_field_name("right").map(|r| self.expr(r)),
            };
        }
        // `a = b = 1` nests as assignment(a, assignment(b, 1)).
        let mut targets = vec![self.field_expr(node, "left")];
        let mut current = node.child_by_field_name("right");
        while let Some(right) = current {
            if right.kind() == "assignment" && right.child_by_field_name("type").is_none() {
                targets.push(self.field_expr(right, "left"));
                current = right.child_by_field_name("right");
            } else {
                break;
            }
        }
        let value = match current {
            Some(v) => self.expr(v),
            None => empty_expr(line_of(node)),
        };
        StmtKind::Assign { targets, value }
    }

    fn if_statement(&self, node: Node<'_>) -> StmtKind {
        let test = self.field_expr(node, "condition");
        let body = self.suite(node, "consequence");
        let alternatives = field_children(node, "alternative");
        StmtKind::If {
            test,
            body,
            orelse: self.elif_chain(&alternatives),
        }
    }

    fn elif_chain(&self, alternatives: &[Node<'_>]) -> Vec<Stmt> {
        let Some((first, rest)) = alternatives.split_first() else {
            return Vec::new();
        };
        match first.kind() {
            "elif_clause" => vec![Stmt {
                kind: StmtKind::If {
                    test: self.field_expr(*first, "condition"),
                    body: self.suite(*first, "consequence"),
                    orelse: self.elif_chain(rest),
                },
                line: line_of(*first),
                end_line: end_line_of(*first),
            }],
            "else_clause" => self.suite(*first, "body"),
            _ => Vec::new(),
        }
    }

    fn else_body(&self, node: Node<'_>) -> Vec<Stmt> {
        node.child_by_field_name("alternative")
            .map(|alt| self.suite(alt, "body"))
            .unwrap_or_default()
    }

    fn try_statement(&self, node: Node<'_>) -> StmtKind {
        let mut handlers = Vec::new();
        let mut orelse = Vec::new();
        let mut finalbody = Vec::new();
        for child in named_children(node) {
            match child.kind() {
                "except_clause" | "except_group_clause" => handlers.push(self.handler(child)),
                "else_clause" => orelse = self.suite(child, "body"),
                "finally_clause" => {
                    finalbody = named_children(child)
                        .into_iter()
                        .filter(|c| c.kind() == "block")
                        .flat_map(|b| self.statements(b))
                        .collect()
                }
                _ => {}
            }
        }
        StmtKind::Try {
            body: self.suite(node, "body"),
            handlers,
            orelse,
            finalbody,
        }
    }

    fn handler(&self, node: Node<'_>) -> ExceptHandler {
        let mut type_ = None;
        let mut name = None;
        let mut body = Vec::new();
        for child in named_children(node) {
            match child.kind() {
                "block" => body = self.statements(child),
                // `except E as e` may arrive as a single as_pattern.
                "as_pattern" => {
                    let parts = named_children(child);
                    type_ = parts.first().map(|p| self.expr(*p));
                    name = parts
                        .iter()
                        .skip(1)
                        .map(|p| self.text(*p))
                        .find(|t| !t.is_empty());
                }
                _ if type_.is_none() => type_ = Some(self.expr(child)),
                _ if name.is_none() => name = Some(self.text(child)),
                _ => {}
            }
        }
        ExceptHandler {
            line: line_of(node),
            type_,
            name,
            body,
        }
    }

    fn with_statement(&self, node: Node<'_>) -> StmtKind {
        let mut items = Vec::new();
        for child in named_children(node) {
            if child.kind() == "with_clause" {
                for item in named_children(child) {
                    match item.child_by_field_name("value") {
                        Some(value) => items.push(self.expr(value)),
                        None => items.push(self.expr(item)),
                    }
                }
            }
        }
        StmtKind::With {
            items,
            body: self.suite(node, "body"),
        }
    }

    fn identifiers(&self, node: Node<'_>) -> Vec<String> {
        named_children(node)
            .into_iter()
            .filter(|c| c.kind() == "identifier")
            .map(|c| self.text(c))
            .collect()
    }

    fn field_expr(&self, node: Node<'_>, field: &str) -> Expr {
        match node.child_by_field_name(field) {
            Some(child) => self.expr(child),
            None => empty_expr(line_of(node)),
        }
    }

    fn exprs(&self, node: Node<'_>) -> Vec<Expr> {
        named_children(node)
            .into_iter()
            .map(|c| self.expr(c))
            .collect()
    }

    fn expr(&self, node: Node<'_>) -> Expr {
        let line = line_of(node);
        let kind = match node.kind() {
            "identifier" | "keyword_identifier" => ExprKind::Name(self.text(node)),
            "integer" => ExprKind::Constant(Constant::Int(self.text(node))),
            "float" => ExprKind::Constant(Constant::Float(self.text(node))),
            "true" => ExprKind::Constant(Constant::Bool(true)),
            "false" => ExprKind::Constant(Constant::Bool(false)),
            "none" => ExprKind::Constant(Constant::None),
            "ellipsis" => ExprKind::Constant(Constant::Ellipsis),
            "string" => self.string(node),
            "concatenated_string" => self.concatenated(node),
            "call" => ExprKind::Call {
                func: Box::new(self.field_expr(node, "function")),
                args: node
                    .child_by_field_name("arguments")
                    .map(|args| match args.kind() {
                        "argument_list" => self.exprs(args),
                        _ => vec![self.expr(args)],
                    })
                    .unwrap_or_default(),
            },
            "keyword_argument" => ExprKind::Keyword {
                name: node.child_by_field_name("name").map(|n| self.text(n)),
                value: Box::new(self.field_expr(node, "value")),
            },
            "dictionary_splat" => ExprKind::Keyword {
                name: None,
                value: Box::new(
                    named_children(node)
                        .first()
                        .map(|c| self.expr(*c))
                        .unwrap_or_else(|| empty_expr(line)),
                ),
            },
            "attribute" => ExprKind::Attribute {
                value: Box::new(self.field_expr(node, "object")),
                attr: node
                    .child_by_field_name("attribute")
                    .map(|a| self.text(a))
                    .unwrap_or_default(),
            },
            "boolean_operator" => self.bool_op(node),
            "binary_operator" => {
                let op = node
                    .child_by_field_name("operator")
                    .and_then(|o| BinOperator::from_token(o.kind()));
                match op {
                    Some(op) => ExprKind::BinOp {
                        left: Box::new(self.field_expr(node, "left")),
                        op,
                        right: Box::new(self.field_expr(node, "right")),
                    },
                    None => ExprKind::Other(self.exprs(node)),
                }
            }
            "parenthesized_expression" => match named_children(node).as_slice() {
                [inner] => return self.expr(*inner),
                many => ExprKind::Other(many.iter().map(|c| self.expr(*c)).collect()),
            },
            "list" => ExprKind::List(self.exprs(node)),
            "tuple" | "expression_list" | "pattern_list" | "tuple_pattern" => {
                ExprKind::Tuple(self.exprs(node))
            }
            "set" => ExprKind::Set(self.exprs(node)),
            "dictionary" => ExprKind::Dict(self.exprs(node)),
            _ => ExprKind::Other(self.exprs(node)),
        };
        Expr { kind, line }
    }

    /// Flatten `a and b and c` into one node; parenthesised or mixed
    /// operators stay nested, as in Python's own AST.
    fn bool_op(&self, node: Node<'_>) -> ExprKind {
        let op = match node.child_by_field_name("operator").map(|o| o.kind()) {
            Some("or") => BoolOperator::Or,
            _ => BoolOperator::And,
        };
        let mut values = Vec::new();
        self.collect_bool_operands(node, op, &mut values);
        ExprKind::BoolOp { op, values }
    }

    fn collect_bool_operands(&self, node: Node<'_>, op: BoolOperator, values: &mut Vec<Expr>) {
        for field in ["left", "right"] {
            let Some(side) = node.child_by_field_name(field) else {
                continue;
            };
            let same_op = side.kind() == "boolean_operator"
                && matches!(
                    (side.child_by_field_name("operator").map(|o| o.kind()), op),
                    (Some("and"), BoolOperator::And) | (Some("or"), BoolOperator::Or)
                );
            if same_op && field == "left" {
                self.collect_bool_operands(side, op, values);
            } else {
                values.push(self.expr(side));
            }
        }
    }

    fn string(&self, node: Node<'_>) -> ExprKind {
        let mut prefix = StringPrefix::default();
        let mut template = String::new();
        let mut values = Vec::new();
        for child in named_children(node) {
            match child.kind() {
                "string_start" => prefix = StringPrefix::from_start_token(&self.text(child)),
                "string_content" => template.push_str(&decode_content(&self.text(child), prefix)),
                "interpolation" => {
                    template.push_str("{}");
                    if let Some(inner) = child
                        .child_by_field_name("expression")
                        .or_else(|| named_children(child).into_iter().next())
                    {
                        values.push(self.expr(inner));
                    }
                }
                _ => {}
            }
        }
        if prefix.format {
            ExprKind::FString { template, values }
        } else if prefix.bytes {
            ExprKind::Constant(Constant::Bytes(template))
        } else {
            ExprKind::Constant(Constant::Str(template))
        }
    }

    fn concatenated(&self, node: Node<'_>) -> ExprKind {
        let parts: Vec<ExprKind> = named_children(node)
            .into_iter()
            .map(|part| self.string(part))
            .collect();
        let any_format = parts.iter().any(|p| matches!(p, ExprKind::FString { .. }));
        let mut template = String::new();
        let mut values = Vec::new();
        let mut bytes = false;
        for part in parts {
            match part {
                ExprKind::FString {
                    template: t,
                    values: v,
                } => {
                    template.push_str(&t);
                    values.extend(v);
                }
                ExprKind::Constant(Constant::Str(s)) => template.push_str(&s),
                ExprKind::Constant(Constant::Bytes(s)) => {
                    bytes = true;
                    template.push_str(&s);
                }
                _ => {}
            }
        }
        if any_format {
            ExprKind::FString { template, values }
        } else if bytes {
            ExprKind::Constant(Constant::Bytes(template))
        } else {
            ExprKind::Constant(Constant::Str(template))
        }
    }
}

fn empty_expr(line: u32) -> Expr {
    Expr {
        kind: ExprKind::Other(Vec::new()),
        line,
    }
}

/// Does `node` have a direct anonymous child token with this text?
fn has_token(node: Node<'_>, token: &str) -> bool {
    let mut cursor = node.walk();
    let found = node
        .children(&mut cursor)
        .any(|c| !c.is_named() && c.kind() == token);
    found
}

fn is_statement_kind(kind: &str) -> bool {
    kind.ends_with("_statement")
        || matches!(
            kind,
            "function_definition" | "class_definition" | "decorated_definition"
        )
}

/// Python's `get_docstring`: a leading plain string expression statement.
fn docstring_of(body: &[Stmt]) -> Option<String> {
    match body.first().map(|s| &s.kind) {
        Some(StmtKind::Expr(expr)) => expr.as_str_constant().and_then(clean_docstring),
        _ => None,
    }
}
