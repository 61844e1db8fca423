//! Python front end for sift.
//!
//! - [`treesitter`]: parses source with tree-sitter-python, reports syntax
//!   errors, and lowers the concrete tree into the typed [`ast`]
//! - [`ast`]: statement/expression sum types for the supported Python subset
//! - [`visit`]: the [`Visitor`](visit::Visitor) trait and exhaustive `walk_*` helpers

pub mod ast;
pub mod treesitter;
pub mod visit;

pub use treesitter::{parse_module, ParseError, PythonParser};
