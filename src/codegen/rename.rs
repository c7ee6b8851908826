//! Shared-field renaming
//!
//! Reads, writes and method calls on the shared object are renamed through
//! three separate tables, so one field can load from `v_normal` and store
//! to `f_normal` within the same body. Names absent from a table pass
//! through unchanged.

use crate::ast::{Expr, ExprKind, FunctionDef, Ident, Target};
use crate::config::{BuiltinTable, NameMap};

use super::rewrite::SharedAccessRewriter;

struct FieldRenamer<'a> {
    loads: &'a NameMap,
    stores: &'a NameMap,
    calls: &'a NameMap,
}

fn lookup(table: &NameMap, name: &Ident) -> Ident {
    table.get(name).unwrap_or(name).clone()
}

impl SharedAccessRewriter for FieldRenamer<'_> {
    fn read(&self, name: &Ident) -> ExprKind {
        ExprKind::Field(lookup(self.loads, name))
    }

    fn write(&self, name: &Ident) -> Target {
        Target::Field(lookup(self.stores, name))
    }

    fn method_call(&self, name: &Ident, args: Vec<Expr>) -> ExprKind {
        ExprKind::MethodCall {
            name: lookup(self.calls, name),
            args,
        }
    }
}

/// Return a copy of `def` with every shared access renamed
pub fn rename_fields(
    def: &FunctionDef,
    load_names: &NameMap,
    store_names: &NameMap,
    call_names: &NameMap,
) -> FunctionDef {
    FieldRenamer {
        loads: load_names,
        stores: store_names,
        calls: call_names,
    }
    .rewrite_function(def)
}

/// Map builtin pseudo-fields and methods to their GLSL spelling
pub fn rename_builtins(def: &FunctionDef, builtins: &BuiltinTable) -> FunctionDef {
    rename_fields(def, &builtins.loads, &builtins.stores, &builtins.calls)
}
