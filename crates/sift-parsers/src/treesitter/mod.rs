use sift_core::types::SyntaxError;
use tree_sitter::{Node, Parser, Tree};

use crate::ast::Module;

mod lower;
mod strings;

pub use strings::clean_docstring;

/// Thin owner of a tree-sitter parser configured for Python.
///
/// Parsers are cheap to create but not `Sync`; keep one per thread or create
/// one per call through [`parse_module`].
pub struct PythonParser {
    parser: Parser,
}

impl PythonParser {
    pub fn new() -> Result<Self, ParseError> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_python::LANGUAGE.into())
            .map_err(|e| ParseError::Language(format!("{e}")))?;
        Ok(Self { parser })
    }

    /// Parse the raw concrete syntax tree without error checks.
    pub fn parse_tree(&mut self, source: &str) -> Result<Tree, ParseError> {
        self.parser
            .parse(source.as_bytes(), None)
            .ok_or(ParseError::ParseFailed)
    }

    /// Parse and lower `source` into the typed AST.
    ///
    /// Any error or missing node in the tree, or a Python 2 only statement,
    /// makes the whole source a [`ParseError::Syntax`].
    pub fn parse(&mut self, source: &str) -> Result<Module, ParseError> {
        let tree = self.parse_tree(source)?;
        let root = tree.root_node();
        if let Some(err) = first_syntax_error(root, source.as_bytes()) {
            tracing::debug!(
                line = err.line,
                column = err.column,
                "rejecting source: {}",
                err.message
            );
            return Err(ParseError::Syntax(err));
        }
        Ok(lower::lower_module(root, source.as_bytes()))
    }
}

/// Parse `source` with a fresh parser.
pub fn parse_module(source: &str) -> Result<Module, ParseError> {
    PythonParser::new()?.parse(source)
}

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    #[error("language error: {0}")]
    Language(String),
    #[error("parse failed")]
    ParseFailed,
}

impl ParseError {
    /// Collapse into a [`SyntaxError`]. Parser setup failures keep their
    /// message but carry no position.
    pub fn into_syntax_error(self) -> SyntaxError {
        match self {
            ParseError::Syntax(e) => e,
            other => SyntaxError::new(other.to_string()),
        }
    }
}

/// Deepest concrete-tree nesting accepted. Lowering and every analysis pass
/// recurse once per level, so deeper trees are rejected here, the same way
/// CPython refuses input nested past its parser limits.
pub const MAX_NESTING_DEPTH: usize = 256;

/// Depth-first search for the first node that makes the source invalid
/// Python 3, or nests deeper than [`MAX_NESTING_DEPTH`].
fn first_syntax_error(root: Node<'_>, source: &[u8]) -> Option<SyntaxError> {
    let mut cursor = root.walk();
    let mut depth = 0usize;
    loop {
        let node = cursor.node();
        if let Some(err) = node_syntax_error(node, source) {
            return Some(err);
        }
        if cursor.goto_first_child() {
            depth += 1;
            if depth > MAX_NESTING_DEPTH {
                return Some(syntax_error_at(
                    cursor.node(),
                    source,
                    "too many nested levels",
                ));
            }
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return None;
            }
            depth -= 1;
        }
    }
}

fn node_syntax_error(node: Node<'_>, source: &[u8]) -> Option<SyntaxError> {
    let detail = if node.is_missing() {
        format!("missing `{}`", node.kind())
    } else if node.is_error() {
        match node.utf8_text(source).ok().and_then(|t| t.split_whitespace().next()) {
            Some(token) => format!("invalid syntax near `{token}`"),
            None => "invalid syntax".to_string(),
        }
    } else {
        match node.kind() {
            "print_statement" => "Missing parentheses in call to 'print'".to_string(),
            "exec_statement" => "Missing parentheses in call to 'exec'".to_string(),
            _ => return None,
        }
    };
    Some(syntax_error_at(node, source, &detail))
}

fn syntax_error_at(node: Node<'_>, source: &[u8], detail: &str) -> SyntaxError {
    let pos = node.start_position();
    let line = pos.row as u32 + 1;
    let column = char_column(source, node.start_byte(), pos.column) + 1;
    SyntaxError::at(
        format!("Syntax Error: {detail} (line {line}, column {column})"),
        line,
        column,
    )
}

/// 0-based character column of `byte`, given its 0-based byte column.
/// Tree-sitter counts bytes; Python reports characters.
fn char_column(source: &[u8], byte: usize, byte_column: usize) -> u32 {
    let line_start = byte.saturating_sub(byte_column);
    let chars = source
        .get(line_start..byte)
        .and_then(|prefix| std::str::from_utf8(prefix).ok())
        .map(|prefix| prefix.chars().count())
        .unwrap_or(byte_column);
    chars as u32
}
