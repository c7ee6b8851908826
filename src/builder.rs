//! Programmatic construction of stage programs
//!
//! Builds the same trees the parser produces, with synthetic spans:
//!
//! ```
//! use stagelink::builder::{call, float, write_field, FunctionBuilder, ProgramBuilder};
//! use stagelink::GlslType;
//!
//! let program = ProgramBuilder::new()
//!     .frag_output("color", GlslType::vec(4))
//!     .function(
//!         FunctionBuilder::method("frag_shader")
//!             .stmt(write_field("color", call("vec4", [float(1.0), float(0.0), float(0.0), float(1.0)])))
//!             .build(),
//!     )
//!     .build();
//! assert!(program.function("frag_shader").is_some());
//! ```

use crate::ast::{
    BinOp, Expr, ExprKind, FunctionDef, Ident, InterfaceDecl, Item, Literal, Param, Program,
    Span, Spanned, Stmt, StmtKind, Target, UnaryOp,
};
use crate::interface::Interface;
use crate::types::GlslType;

// ============================================================================
// Expressions
// ============================================================================

pub fn int(value: i64) -> Expr {
    Spanned::synthetic(ExprKind::Lit(Literal::Int(value)))
}

pub fn float(value: f64) -> Expr {
    Spanned::synthetic(ExprKind::Lit(Literal::Float(value)))
}

pub fn boolean(value: bool) -> Expr {
    Spanned::synthetic(ExprKind::Lit(Literal::Bool(value)))
}

pub fn var(name: impl Into<Ident>) -> Expr {
    Spanned::synthetic(ExprKind::Var(name.into()))
}

/// `self.name`
pub fn field(name: impl Into<Ident>) -> Expr {
    Spanned::synthetic(ExprKind::Field(name.into()))
}

pub fn member(base: Expr, name: impl Into<Ident>) -> Expr {
    Spanned::synthetic(ExprKind::Member {
        base: Box::new(base),
        name: name.into(),
    })
}

pub fn index(base: Expr, index: Expr) -> Expr {
    Spanned::synthetic(ExprKind::Index {
        base: Box::new(base),
        index: Box::new(index),
    })
}

pub fn call(func: impl Into<Ident>, args: impl IntoIterator<Item = Expr>) -> Expr {
    Spanned::synthetic(ExprKind::Call {
        func: func.into(),
        args: args.into_iter().collect(),
    })
}

/// `self.name(args..)`
pub fn method(name: impl Into<Ident>, args: impl IntoIterator<Item = Expr>) -> Expr {
    Spanned::synthetic(ExprKind::MethodCall {
        name: name.into(),
        args: args.into_iter().collect(),
    })
}

pub fn binary(op: BinOp, left: Expr, right: Expr) -> Expr {
    Spanned::synthetic(ExprKind::Binary {
        op,
        left: Box::new(left),
        right: Box::new(right),
    })
}

pub fn unary(op: UnaryOp, operand: Expr) -> Expr {
    Spanned::synthetic(ExprKind::Unary {
        op,
        operand: Box::new(operand),
    })
}

// ============================================================================
// Statements
// ============================================================================

pub fn assign(target: Target, value: Expr) -> Stmt {
    Spanned::synthetic(StmtKind::Assign { target, value })
}

/// `self.name = value;`
pub fn write_field(name: impl Into<Ident>, value: Expr) -> Stmt {
    assign(Target::Field(name.into()), value)
}

pub fn let_(name: impl Into<Ident>, ty: GlslType, value: Option<Expr>) -> Stmt {
    Spanned::synthetic(StmtKind::Let {
        name: name.into(),
        ty,
        value,
    })
}

pub fn expr_stmt(expr: Expr) -> Stmt {
    Spanned::synthetic(StmtKind::Expr(expr))
}

pub fn ret(value: Option<Expr>) -> Stmt {
    Spanned::synthetic(StmtKind::Return(value))
}

pub fn if_(cond: Expr, then_body: Vec<Stmt>, else_body: Vec<Stmt>) -> Stmt {
    Spanned::synthetic(StmtKind::If {
        cond,
        then_body,
        else_body,
    })
}

pub fn while_(cond: Expr, body: Vec<Stmt>) -> Stmt {
    Spanned::synthetic(StmtKind::While { cond, body })
}

// ============================================================================
// Functions and programs
// ============================================================================

pub struct FunctionBuilder {
    def: FunctionDef,
}

impl FunctionBuilder {
    /// A function taking `self`
    pub fn method(name: impl Into<Ident>) -> Self {
        Self {
            def: FunctionDef {
                name: name.into(),
                has_self: true,
                params: Vec::new(),
                ret: None,
                body: Vec::new(),
                span: Span::default(),
            },
        }
    }

    /// A function without a receiver
    pub fn free(name: impl Into<Ident>) -> Self {
        let mut builder = Self::method(name);
        builder.def.has_self = false;
        builder
    }

    pub fn param(mut self, name: impl Into<Ident>, ty: GlslType) -> Self {
        self.def.params.push(Param {
            name: name.into(),
            ty,
        });
        self
    }

    pub fn returns(mut self, ty: GlslType) -> Self {
        self.def.ret = Some(ty);
        self
    }

    pub fn stmt(mut self, stmt: Stmt) -> Self {
        self.def.body.push(stmt);
        self
    }

    pub fn stmts(mut self, stmts: impl IntoIterator<Item = Stmt>) -> Self {
        self.def.body.extend(stmts);
        self
    }

    pub fn build(self) -> FunctionDef {
        self.def
    }
}

#[derive(Default)]
pub struct ProgramBuilder {
    items: Vec<Item>,
}

impl ProgramBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn interface(mut self, name: impl Into<Ident>, kind: Interface) -> Self {
        self.items.push(Item::Interface(InterfaceDecl {
            name: name.into(),
            kind,
            span: Span::default(),
        }));
        self
    }

    pub fn uniform(self, name: impl Into<Ident>, ty: GlslType) -> Self {
        self.interface(name, Interface::Uniform(ty))
    }

    pub fn attribute(self, name: impl Into<Ident>, ty: GlslType) -> Self {
        self.interface(name, Interface::Attribute(ty))
    }

    pub fn varying(self, name: impl Into<Ident>, ty: GlslType) -> Self {
        self.interface(name, Interface::Varying(ty))
    }

    pub fn frag_output(self, name: impl Into<Ident>, ty: GlslType) -> Self {
        self.interface(name, Interface::FragOutput(ty))
    }

    pub fn function(mut self, def: FunctionDef) -> Self {
        self.items.push(Item::Function(def));
        self
    }

    pub fn build(self) -> Program {
        Program { items: self.items }
    }
}
