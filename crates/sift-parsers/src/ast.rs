//! Typed Python AST.
//!
//! Only the node kinds the analyzers distinguish get their own variant.
//! Everything else lowers to an `Other` variant that still carries its nested
//! statements and expressions, so traversals never lose a subtree.

use serde::Serialize;

/// A parsed source file.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Module {
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stmt {
    pub kind: StmtKind,
    /// 1-based line of the first token.
    pub line: u32,
    /// 1-based line of the last token.
    pub end_line: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum StmtKind {
    FunctionDef(FunctionDef),
    ClassDef(ClassDef),
    Import(Vec<Alias>),
    ImportFrom(ImportFrom),
    /// `a = b = value`; one entry in `targets` per `=`.
    Assign {
        targets: Vec<Expr>,
        value: Expr,
    },
    AnnAssign {
        target: Expr,
        annotation: String,
        value: Option<Expr>,
    },
    AugAssign {
        target: Expr,
        value: Expr,
    },
    /// `elif` chains are nested `If`s inside `orelse`.
    If {
        test: Expr,
        body: Vec<Stmt>,
        orelse: Vec<Stmt>,
    },
    For {
        is_async: bool,
        target: Expr,
        iter: Expr,
        body: Vec<Stmt>,
        orelse: Vec<Stmt>,
    },
    While {
        test: Expr,
        body: Vec<Stmt>,
        orelse: Vec<Stmt>,
    },
    Try {
        body: Vec<Stmt>,
        handlers: Vec<ExceptHandler>,
        orelse: Vec<Stmt>,
        finalbody: Vec<Stmt>,
    },
    With {
        items: Vec<Expr>,
        body: Vec<Stmt>,
    },
    Return(Option<Expr>),
    Global(Vec<String>),
    Nonlocal(Vec<String>),
    Expr(Expr),
    Pass,
    Break,
    Continue,
    /// `raise`, `assert`, `del`, `match`, `type X = ...` and anything newer.
    Other {
        exprs: Vec<Expr>,
        body: Vec<Stmt>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionDef {
    pub name: String,
    pub params: Vec<Param>,
    /// Return annotation source text.
    pub returns: Option<String>,
    pub body: Vec<Stmt>,
    pub decorators: Vec<Expr>,
    pub is_async: bool,
    pub docstring: Option<String>,
}

impl FunctionDef {
    /// Names of parameters that can be passed positionally, in order.
    pub fn positional_params(&self) -> impl Iterator<Item = &Param> {
        self.params.iter().filter(|p| p.kind.is_positional())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Param {
    pub name: String,
    pub kind: ParamKind,
    pub annotation: Option<String>,
    pub default: Option<Expr>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamKind {
    PositionalOnly,
    Positional,
    VarPositional,
    KeywordOnly,
    VarKeyword,
}

impl ParamKind {
    pub fn is_positional(&self) -> bool {
        matches!(self, ParamKind::PositionalOnly | ParamKind::Positional)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassDef {
    pub name: String,
    pub bases: Vec<Expr>,
    pub body: Vec<Stmt>,
    pub decorators: Vec<Expr>,
    pub docstring: Option<String>,
}

impl ClassDef {
    /// Functions declared directly in the class body.
    pub fn methods(&self) -> impl Iterator<Item = &FunctionDef> {
        self.body.iter().filter_map(|s| match &s.kind {
            StmtKind::FunctionDef(f) => Some(f),
            _ => None,
        })
    }
}

/// `import a.b as c` / one name of a `from` import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alias {
    /// Dotted name as written.
    pub name: String,
    pub asname: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportFrom {
    /// Module path without leading dots; `None` for `from . import x`.
    pub module: Option<String>,
    /// Number of leading dots.
    pub level: u32,
    pub names: Vec<Alias>,
    pub wildcard: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExceptHandler {
    pub line: u32,
    /// `None` for a bare `except:`.
    pub type_: Option<Expr>,
    pub name: Option<String>,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Expr {
    pub kind: ExprKind,
    pub line: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ExprKind {
    Name(String),
    Constant(Constant),
    Call {
        func: Box<Expr>,
        args: Vec<Expr>,
    },
    Keyword {
        name: Option<String>,
        value: Box<Expr>,
    },
    Attribute {
        value: Box<Expr>,
        attr: String,
    },
    /// `a and b and c` is one node with three values.
    BoolOp {
        op: BoolOperator,
        values: Vec<Expr>,
    },
    BinOp {
        left: Box<Expr>,
        op: BinOperator,
        right: Box<Expr>,
    },
    /// f-string; `template` is the literal text with `{}` where each value goes.
    FString {
        template: String,
        values: Vec<Expr>,
    },
    List(Vec<Expr>),
    Tuple(Vec<Expr>),
    Set(Vec<Expr>),
    Dict(Vec<Expr>),
    Other(Vec<Expr>),
}

impl Expr {
    /// Literal string value, if this is a plain (non-f) string.
    pub fn as_str_constant(&self) -> Option<&str> {
        match &self.kind {
            ExprKind::Constant(Constant::Str(s)) => Some(s),
            _ => None,
        }
    }

    /// Identifier, if this is a bare name.
    pub fn as_name(&self) -> Option<&str> {
        match &self.kind {
            ExprKind::Name(n) => Some(n),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Constant {
    Str(String),
    Bytes(String),
    Int(String),
    Float(String),
    Bool(bool),
    None,
    Ellipsis,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BoolOperator {
    And,
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BinOperator {
    Add,
    Sub,
    Mult,
    MatMult,
    Div,
    FloorDiv,
    Mod,
    Pow,
    LShift,
    RShift,
    BitOr,
    BitXor,
    BitAnd,
}

impl BinOperator {
    pub fn from_token(token: &str) -> Option<Self> {
        Some(match token {
            "+" => BinOperator::Add,
            "-" => BinOperator::Sub,
            "*" => BinOperator::Mult,
            "@" => BinOperator::MatMult,
            "/" => BinOperator::Div,
            "//" => BinOperator::FloorDiv,
            "%" => BinOperator::Mod,
            "**" => BinOperator::Pow,
            "<<" => BinOperator::LShift,
            ">>" => BinOperator::RShift,
            "|" => BinOperator::BitOr,
            "^" => BinOperator::BitXor,
            "&" => BinOperator::BitAnd,
            _ => return None,
        })
    }
}
