//! Dependency Analysis Pass
//!
//! Walks a stage body once and classifies every shared field it touches:
//! - an *input* is read while the stage has not yet written it
//! - an *output* is written anywhere in the body
//! - a *call* is a method invoked on the shared object
//!
//! The walk never fails. Assignment targets it cannot attribute to a single
//! field (chains nested more than one level below the field, such as
//! `self.m[i][j] = v`) are skipped entirely, index expressions included.

use indexmap::IndexSet;

use crate::ast::{Expr, ExprKind, FunctionDef, Ident, Stmt, StmtKind, Target};

/// Inputs, outputs and calls of a stage body, each in order of first use
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencySet {
    pub inputs: IndexSet<Ident>,
    pub outputs: IndexSet<Ident>,
    pub calls: IndexSet<Ident>,
}

impl DependencySet {
    pub fn is_input(&self, name: &str) -> bool {
        self.inputs.contains(name)
    }

    pub fn is_output(&self, name: &str) -> bool {
        self.outputs.contains(name)
    }
}

/// Analyze a function body
pub fn find_deps(def: &FunctionDef) -> DependencySet {
    let mut walker = DepsWalker::default();
    walker.block(&def.body);
    walker.deps
}

#[derive(Default)]
struct DepsWalker {
    deps: DependencySet,
}

impl DepsWalker {
    fn read(&mut self, name: &Ident) {
        if !self.deps.outputs.contains(name) {
            self.deps.inputs.insert(name.clone());
        }
    }

    fn write(&mut self, name: &Ident) {
        self.deps.outputs.insert(name.clone());
    }

    fn block(&mut self, body: &[Stmt]) {
        for stmt in body {
            self.stmt(stmt);
        }
    }

    fn stmt(&mut self, stmt: &Stmt) {
        match &stmt.node {
            StmtKind::Assign { target, value } => {
                // Reads on the right happen before the write on the left
                self.expr(value);
                self.target(target);
            }
            StmtKind::Let { value, .. } | StmtKind::Return(value) => {
                if let Some(value) = value {
                    self.expr(value);
                }
            }
            StmtKind::Expr(expr) => self.expr(expr),
            StmtKind::If {
                cond,
                then_body,
                else_body,
            } => {
                self.expr(cond);
                self.block(then_body);
                self.block(else_body);
            }
            StmtKind::While { cond, body } => {
                self.expr(cond);
                self.block(body);
            }
        }
    }

    fn target(&mut self, target: &Target) {
        match target {
            Target::Field(name) => self.write(name),
            Target::Var(_) => {}
            Target::Index { base, index } => match base.as_ref() {
                Target::Field(name) => {
                    self.expr(index);
                    self.write(name);
                }
                Target::Var(_) => self.expr(index),
                // Opaque
                Target::Index { .. } | Target::Member { .. } => {}
            },
            Target::Member { base, .. } => {
                if let Target::Field(name) = base.as_ref() {
                    self.write(name);
                }
            }
        }
    }

    fn expr(&mut self, expr: &Expr) {
        match &expr.node {
            ExprKind::Lit(_) | ExprKind::Var(_) => {}
            ExprKind::Field(name) => self.read(name),
            ExprKind::Member { base, .. } => self.expr(base),
            ExprKind::Index { base, index } => {
                self.expr(base);
                self.expr(index);
            }
            ExprKind::Call { args, .. } => {
                for arg in args {
                    self.expr(arg);
                }
            }
            ExprKind::MethodCall { name, args } => {
                self.deps.calls.insert(name.clone());
                for arg in args {
                    self.expr(arg);
                }
            }
            ExprKind::Binary { left, right, .. } => {
                self.expr(left);
                self.expr(right);
            }
            ExprKind::Unary { operand, .. } => self.expr(operand),
        }
    }
}
