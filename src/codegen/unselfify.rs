//! Receiver removal
//!
//! After renaming, every shared field is a GLSL global and every method a
//! free function, so `self.` prefixes are dropped: field reads become names,
//! field writes become name targets, method calls become plain calls.

use crate::ast::{Expr, ExprKind, FunctionDef, Ident, Target};

use super::rewrite::SharedAccessRewriter;

struct Unselfify;

impl SharedAccessRewriter for Unselfify {
    fn read(&self, name: &Ident) -> ExprKind {
        ExprKind::Var(name.clone())
    }

    fn write(&self, name: &Ident) -> Target {
        Target::Var(name.clone())
    }

    fn method_call(&self, name: &Ident, args: Vec<Expr>) -> ExprKind {
        ExprKind::Call {
            func: name.clone(),
            args,
        }
    }
}

pub fn strip_self(def: &FunctionDef) -> FunctionDef {
    let mut stripped = Unselfify.rewrite_function(def);
    stripped.has_self = false;
    stripped
}
