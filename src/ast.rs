//! Abstract syntax tree for stage definitions
//!
//! Stage bodies are plain trees: every node owns its children and nothing
//! points back at its container. Access to the shared shader object (`self`)
//! is explicit in the tree (`ExprKind::Field`, `Target::Field`,
//! `ExprKind::MethodCall`) so the passes never pattern-match on syntax.

use crate::interface::Interface;
use crate::types::GlslType;

pub type Ident = String;

/// Source location for error reporting
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn merge(&self, other: &Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

/// Human-readable source position (1-indexed line and column)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    /// Counted in characters, not bytes
    pub column: usize,
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Maps byte offsets to line:column positions.
#[derive(Debug, Clone)]
pub struct SourceMap {
    source: String,
    /// Byte offset of the start of each line
    line_starts: Vec<usize>,
}

impl SourceMap {
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            source
                .char_indices()
                .filter(|&(_, c)| c == '\n')
                .map(|(i, _)| i + 1),
        );
        Self {
            source: source.to_string(),
            line_starts,
        }
    }

    /// Convert a byte offset to a 1-indexed position
    pub fn position(&self, byte_offset: usize) -> Position {
        let offset = byte_offset.min(self.source.len());
        let line_idx = match self.line_starts.binary_search(&offset) {
            Ok(idx) => idx,
            Err(idx) => idx - 1,
        };
        let line_start = self.line_starts[line_idx];
        Position {
            line: line_idx + 1,
            column: self.source[line_start..offset].chars().count() + 1,
        }
    }

    /// Text of a 1-indexed line without its terminator
    pub fn line(&self, line_num: usize) -> Option<&str> {
        if line_num == 0 || line_num > self.line_starts.len() {
            return None;
        }
        let start = self.line_starts[line_num - 1];
        let end = self
            .line_starts
            .get(line_num)
            .map(|next| next - 1)
            .unwrap_or(self.source.len());
        Some(self.source[start..end].trim_end_matches('\r'))
    }
}

/// A node paired with the source range it came from
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    pub node: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(node: T, span: Span) -> Self {
        Self { node, span }
    }

    /// A node with no source location (synthesized by a pass or a builder)
    pub fn synthetic(node: T) -> Self {
        Self {
            node,
            span: Span::default(),
        }
    }
}

// ============================================================================
// Expressions
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i64),
    Float(f64),
    Bool(bool),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    Neq,
    Lt,
    Gt,
    Lte,
    Gte,
    And,
    Or,
}

impl BinOp {
    /// Spelling shared by the stage language and GLSL
    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Mod => "%",
            BinOp::Eq => "==",
            BinOp::Neq => "!=",
            BinOp::Lt => "<",
            BinOp::Gt => ">",
            BinOp::Lte => "<=",
            BinOp::Gte => ">=",
            BinOp::And => "&&",
            BinOp::Or => "||",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Neg,
    Not,
}

impl UnaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::Not => "!",
        }
    }
}

pub type Expr = Spanned<ExprKind>;

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Lit(Literal),

    /// A name not rooted at the shared object: locals, parameters, globals
    Var(Ident),

    /// Read of a shared field: `self.name`
    Field(Ident),

    /// Member access on any other value: `v.xyz`, `self.pos.x`
    Member { base: Box<Expr>, name: Ident },

    /// Subscript: `base[index]`
    Index { base: Box<Expr>, index: Box<Expr> },

    /// Free function call, GLSL builtins and constructors: `vec4(..)`
    Call { func: Ident, args: Vec<Expr> },

    /// Call rooted at the shared object: `self.helper(..)`
    MethodCall { name: Ident, args: Vec<Expr> },

    Binary {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    Unary { op: UnaryOp, operand: Box<Expr> },
}

impl ExprKind {
    /// Short description used in diagnostics
    pub fn kind_name(&self) -> &'static str {
        match self {
            ExprKind::Lit(_) => "literal",
            ExprKind::Var(_) => "name",
            ExprKind::Field(_) => "shared field read",
            ExprKind::Member { .. } => "member access",
            ExprKind::Index { .. } => "subscript",
            ExprKind::Call { .. } => "call",
            ExprKind::MethodCall { .. } => "method call",
            ExprKind::Binary { .. } => "binary operation",
            ExprKind::Unary { .. } => "unary operation",
        }
    }
}

// ============================================================================
// Statements
// ============================================================================

/// Left-hand side of an assignment
#[derive(Debug, Clone, PartialEq)]
pub enum Target {
    /// Write of a shared field: `self.name = ..`
    Field(Ident),
    Var(Ident),
    Index { base: Box<Target>, index: Expr },
    Member { base: Box<Target>, name: Ident },
}

pub type Stmt = Spanned<StmtKind>;

#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    Assign { target: Target, value: Expr },

    /// Local declaration: `let x: float = ..;`
    Let {
        name: Ident,
        ty: GlslType,
        value: Option<Expr>,
    },

    /// Expression evaluated for its effect, typically a call
    Expr(Expr),

    Return(Option<Expr>),

    If {
        cond: Expr,
        then_body: Vec<Stmt>,
        else_body: Vec<Stmt>,
    },

    While { cond: Expr, body: Vec<Stmt> },
}

impl StmtKind {
    pub fn kind_name(&self) -> &'static str {
        match self {
            StmtKind::Assign { .. } => "assignment",
            StmtKind::Let { .. } => "local declaration",
            StmtKind::Expr(_) => "expression statement",
            StmtKind::Return(_) => "return",
            StmtKind::If { .. } => "if statement",
            StmtKind::While { .. } => "while loop",
        }
    }
}

// ============================================================================
// Functions and programs
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: Ident,
    pub ty: GlslType,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDef {
    pub name: Ident,
    /// Whether the first parameter is the `self` receiver
    pub has_self: bool,
    /// Parameters after `self`
    pub params: Vec<Param>,
    /// `None` means `void`
    pub ret: Option<GlslType>,
    pub body: Vec<Stmt>,
    pub span: Span,
}

/// An interface field declared on the shader object
#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceDecl {
    pub name: Ident,
    pub kind: Interface,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Interface(InterfaceDecl),
    Function(FunctionDef),
}

/// The shader object: its interface fields and its methods
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    pub items: Vec<Item>,
}

impl Program {
    pub fn functions(&self) -> impl Iterator<Item = &FunctionDef> {
        self.items.iter().filter_map(|item| match item {
            Item::Function(def) => Some(def),
            Item::Interface(_) => None,
        })
    }

    pub fn interfaces(&self) -> impl Iterator<Item = &InterfaceDecl> {
        self.items.iter().filter_map(|item| match item {
            Item::Interface(decl) => Some(decl),
            Item::Function(_) => None,
        })
    }

    pub fn function(&self, name: &str) -> Option<&FunctionDef> {
        self.functions().find(|def| def.name == name)
    }

    pub fn interface(&self, name: &str) -> Option<&InterfaceDecl> {
        self.interfaces().find(|decl| decl.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_map_positions() {
        let map = SourceMap::new("fn a(self) {\n    x\n}");
        assert_eq!(map.position(0), Position { line: 1, column: 1 });
        assert_eq!(map.position(17), Position { line: 2, column: 5 });
        assert_eq!(map.line(2), Some("    x"));
        assert_eq!(map.line(4), None);
    }
}
