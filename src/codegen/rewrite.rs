//! Tree rebuilding shared by the renaming passes
//!
//! A [`SharedAccessRewriter`] decides what each shared-object access
//! becomes; the default methods rebuild every other node unchanged. The
//! input tree is only borrowed, so callers keep the original.

use crate::ast::{Expr, ExprKind, FunctionDef, Ident, Spanned, Stmt, StmtKind, Target};

pub trait SharedAccessRewriter {
    /// Replacement for a shared field read (`self.name`)
    fn read(&self, name: &Ident) -> ExprKind;

    /// Replacement for a shared field write target
    fn write(&self, name: &Ident) -> Target;

    /// Replacement for a shared method call, given rewritten arguments
    fn method_call(&self, name: &Ident, args: Vec<Expr>) -> ExprKind;

    fn rewrite_function(&self, def: &FunctionDef) -> FunctionDef {
        FunctionDef {
            name: def.name.clone(),
            has_self: def.has_self,
            params: def.params.clone(),
            ret: def.ret.clone(),
            body: self.rewrite_block(&def.body),
            span: def.span.clone(),
        }
    }

    fn rewrite_block(&self, body: &[Stmt]) -> Vec<Stmt> {
        body.iter().map(|stmt| self.rewrite_stmt(stmt)).collect()
    }

    fn rewrite_stmt(&self, stmt: &Stmt) -> Stmt {
        let node = match &stmt.node {
            StmtKind::Assign { target, value } => StmtKind::Assign {
                target: self.rewrite_target(target),
                value: self.rewrite_expr(value),
            },
            StmtKind::Let { name, ty, value } => StmtKind::Let {
                name: name.clone(),
                ty: ty.clone(),
                value: value.as_ref().map(|v| self.rewrite_expr(v)),
            },
            StmtKind::Expr(expr) => StmtKind::Expr(self.rewrite_expr(expr)),
            StmtKind::Return(value) => {
                StmtKind::Return(value.as_ref().map(|v| self.rewrite_expr(v)))
            }
            StmtKind::If {
                cond,
                then_body,
                else_body,
            } => StmtKind::If {
                cond: self.rewrite_expr(cond),
                then_body: self.rewrite_block(then_body),
                else_body: self.rewrite_block(else_body),
            },
            StmtKind::While { cond, body } => StmtKind::While {
                cond: self.rewrite_expr(cond),
                body: self.rewrite_block(body),
            },
        };
        Spanned::new(node, stmt.span.clone())
    }

    fn rewrite_target(&self, target: &Target) -> Target {
        match target {
            Target::Field(name) => self.write(name),
            Target::Var(name) => Target::Var(name.clone()),
            Target::Index { base, index } => Target::Index {
                base: Box::new(self.rewrite_target(base)),
                index: self.rewrite_expr(index),
            },
            Target::Member { base, name } => Target::Member {
                base: Box::new(self.rewrite_target(base)),
                name: name.clone(),
            },
        }
    }

    fn rewrite_expr(&self, expr: &Expr) -> Expr {
        let boxed = |e: &Expr| Box::new(self.rewrite_expr(e));
        let node = match &expr.node {
            ExprKind::Field(name) => self.read(name),
            ExprKind::MethodCall { name, args } => {
                self.method_call(name, args.iter().map(|a| self.rewrite_expr(a)).collect())
            }
            ExprKind::Lit(_) | ExprKind::Var(_) => expr.node.clone(),
            ExprKind::Member { base, name } => ExprKind::Member {
                base: boxed(base),
                name: name.clone(),
            },
            ExprKind::Index { base, index } => ExprKind::Index {
                base: boxed(base),
                index: boxed(index),
            },
            ExprKind::Call { func, args } => ExprKind::Call {
                func: func.clone(),
                args: args.iter().map(|a| self.rewrite_expr(a)).collect(),
            },
            ExprKind::Binary { op, left, right } => ExprKind::Binary {
                op: *op,
                left: boxed(left),
                right: boxed(right),
            },
            ExprKind::Unary { op, operand } => ExprKind::Unary {
                op: *op,
                operand: boxed(operand),
            },
        };
        Spanned::new(node, expr.span.clone())
    }
}
