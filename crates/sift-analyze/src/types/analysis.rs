use serde::{Deserialize, Serialize};

/// Declarations and metrics extracted from one source file.
///
/// Functions and classes are listed in source order, nested declarations
/// directly after their parent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub functions: Vec<FunctionInfo>,
    pub classes: Vec<ClassInfo>,
    /// Dotted import names, first occurrence wins.
    pub imports: Vec<String>,
    /// Names assigned at module scope, first occurrence wins.
    pub variables: Vec<String>,
    /// Sum of function complexities; 1 when there are no functions.
    pub complexity: u32,
    pub lines_of_code: u32,
    pub issues: Vec<String>,
}

impl Analysis {
    /// Functions declared at module level, outside any class or function.
    pub fn module_functions(&self) -> impl Iterator<Item = &FunctionInfo> {
        self.functions.iter().filter(|f| f.scope.is_none())
    }

    /// Classes declared at module level.
    pub fn module_classes(&self) -> impl Iterator<Item = &ClassInfo> {
        self.classes.iter().filter(|c| c.scope.is_none())
    }

    /// Units a generated test can target: module-level functions plus every
    /// method of every class.
    pub fn testable_units(&self) -> usize {
        let methods: usize = self.classes.iter().map(|c| c.methods.len()).sum();
        self.module_functions().count() + methods
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionInfo {
    pub name: String,
    /// Parameters that can be passed positionally, in declaration order.
    pub parameters: Vec<String>,
    /// Return annotation as written.
    pub returns: Option<String>,
    pub docstring: Option<String>,
    pub complexity: u32,
    pub line: u32,
    pub is_async: bool,
    /// Name of the enclosing class or function; `None` at module level.
    pub scope: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassInfo {
    pub name: String,
    /// Functions declared directly in the class body.
    pub methods: Vec<String>,
    pub docstring: Option<String>,
    pub line: u32,
    pub scope: Option<String>,
}
