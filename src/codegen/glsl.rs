//! GLSL Code Generation
//!
//! Prints a fully renamed, receiver-free function as GLSL source. Stage
//! entry points always print as `void main()`; helper functions keep their
//! own name and signature.
//!
//! ## Layout
//!
//! ```glsl
//! void main() {
//!     if (v_t < 0.5) {
//!         color = vec4(1.0, 0.0, 0.0, 1.0);
//!     } else {
//!         color = vec4(v_t);
//!     }
//! }
//! ```
//!
//! Parentheses are inserted only where operator precedence requires them,
//! so printed expressions parse back to the same tree.

use crate::ast::{Expr, ExprKind, FunctionDef, Literal, Span, Spanned, Stmt, StmtKind, Target};
use crate::errors::CompileError;
use crate::operators::{Associativity, UNARY_PRECEDENCE};

/// Binding strength of names, literals, calls and postfix forms
const ATOM_PRECEDENCE: u8 = UNARY_PRECEDENCE + 1;

type EmitResult<T> = Result<T, CompileError>;

pub struct GlslEmitter {
    lines: Vec<String>,
    indent: usize,
}

impl GlslEmitter {
    pub fn new() -> Self {
        GlslEmitter {
            lines: Vec::new(),
            indent: 0,
        }
    }

    /// Emit a stage body as the shader entry point
    pub fn emit_entry(&mut self, def: &FunctionDef) -> EmitResult<String> {
        self.emit_definition("void main()".to_string(), &def.body)
    }

    /// Emit a helper function under its own name
    pub fn emit_function(&mut self, def: &FunctionDef) -> EmitResult<String> {
        let ret = def
            .ret
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_else(|| "void".to_string());
        let params: Vec<String> = def
            .params
            .iter()
            .map(|param| param.ty.declare(&param.name))
            .collect();
        let signature = format!("{} {}({})", ret, def.name, params.join(", "));
        self.emit_definition(signature, &def.body)
    }

    fn emit_definition(&mut self, signature: String, body: &[Stmt]) -> EmitResult<String> {
        self.lines.clear();
        self.indent = 0;
        self.line(format!("{} {{", signature));
        self.indent = 1;
        self.emit_block(body)?;
        self.indent = 0;
        self.line("}".to_string());
        Ok(std::mem::take(&mut self.lines).join("\n"))
    }

    fn line(&mut self, text: String) {
        let padded = format!("{}{}", self.pad(), text);
        self.lines.push(padded);
    }

    fn pad(&self) -> String {
        "    ".repeat(self.indent)
    }

    fn emit_block(&mut self, body: &[Stmt]) -> EmitResult<()> {
        for stmt in body {
            self.emit_stmt(stmt)?;
        }
        Ok(())
    }

    fn emit_stmt(&mut self, stmt: &Stmt) -> EmitResult<()> {
        match &stmt.node {
            StmtKind::Assign { target, value } => {
                let target = self.emit_target(target, &stmt.span)?;
                let value = self.emit_expr(value)?;
                self.line(format!("{} = {};", target, value));
            }
            StmtKind::Let { name, ty, value } => match value {
                Some(value) => {
                    let value = self.emit_expr(value)?;
                    self.line(format!("{} = {};", ty.declare(name), value));
                }
                None => self.line(format!("{};", ty.declare(name))),
            },
            StmtKind::Expr(expr) => {
                let expr = self.emit_expr(expr)?;
                self.line(format!("{};", expr));
            }
            StmtKind::Return(Some(value)) => {
                let value = self.emit_expr(value)?;
                self.line(format!("return {};", value));
            }
            StmtKind::Return(None) => self.line("return;".to_string()),
            StmtKind::If {
                cond,
                then_body,
                else_body,
            } => {
                let cond = self.emit_expr(cond)?;
                self.line(format!("if ({}) {{", cond));
                self.emit_if_tail(then_body, else_body)?;
            }
            StmtKind::While { .. } => return Err(unsupported(stmt.node.kind_name(), &stmt.span)),
        }
        Ok(())
    }

    /// Everything after an `if (..) {` line, folding `else { if .. }` into `else if`
    fn emit_if_tail(&mut self, then_body: &[Stmt], else_body: &[Stmt]) -> EmitResult<()> {
        self.indent += 1;
        self.emit_block(then_body)?;
        self.indent -= 1;

        match else_body {
            [] => self.line("}".to_string()),
            [Spanned {
                node:
                    StmtKind::If {
                        cond,
                        then_body,
                        else_body,
                    },
                ..
            }] => {
                let cond = self.emit_expr(cond)?;
                self.line(format!("}} else if ({}) {{", cond));
                self.emit_if_tail(then_body, else_body)?;
            }
            _ => {
                self.line("} else {".to_string());
                self.indent += 1;
                self.emit_block(else_body)?;
                self.indent -= 1;
                self.line("}".to_string());
            }
        }
        Ok(())
    }

    fn emit_target(&self, target: &Target, span: &Span) -> EmitResult<String> {
        match target {
            Target::Var(name) => Ok(name.clone()),
            Target::Field(_) => Err(unsupported("shared field write", span)),
            Target::Index { base, index } => Ok(format!(
                "{}[{}]",
                self.emit_target(base, span)?,
                self.emit_expr(index)?
            )),
            Target::Member { base, name } => {
                Ok(format!("{}.{}", self.emit_target(base, span)?, name))
            }
        }
    }

    pub fn emit_expr(&self, expr: &Expr) -> EmitResult<String> {
        match &expr.node {
            ExprKind::Lit(Literal::Float(f)) if !f.is_finite() => {
                Err(unsupported("non-finite float literal", &expr.span))
            }
            ExprKind::Lit(lit) => Ok(emit_literal(lit)),
            ExprKind::Var(name) => Ok(name.clone()),
            ExprKind::Field(_) | ExprKind::MethodCall { .. } => {
                Err(unsupported(expr.node.kind_name(), &expr.span))
            }
            ExprKind::Member { base, name } => {
                Ok(format!("{}.{}", self.emit_postfix_base(base)?, name))
            }
            ExprKind::Index { base, index } => Ok(format!(
                "{}[{}]",
                self.emit_postfix_base(base)?,
                self.emit_expr(index)?
            )),
            ExprKind::Call { func, args } => {
                let args = args
                    .iter()
                    .map(|arg| self.emit_expr(arg))
                    .collect::<EmitResult<Vec<_>>>()?;
                Ok(format!("{}({})", func, args.join(", ")))
            }
            ExprKind::Binary { op, left, right } => {
                let info = op.info();
                let left_prec = precedence(left);
                let right_prec = precedence(right);

                let wrap_left = left_prec < info.precedence
                    || (left_prec == info.precedence && info.assoc == Associativity::None);
                let wrap_right = right_prec <= info.precedence;

                Ok(format!(
                    "{} {} {}",
                    self.emit_operand(left, wrap_left)?,
                    op.symbol(),
                    self.emit_operand(right, wrap_right)?
                ))
            }
            ExprKind::Unary { op, operand } => {
                let wrap = precedence(operand) <= UNARY_PRECEDENCE;
                Ok(format!("{}{}", op.symbol(), self.emit_operand(operand, wrap)?))
            }
        }
    }

    fn emit_postfix_base(&self, base: &Expr) -> EmitResult<String> {
        self.emit_operand(base, precedence(base) < ATOM_PRECEDENCE)
    }

    fn emit_operand(&self, expr: &Expr, wrap: bool) -> EmitResult<String> {
        let text = self.emit_expr(expr)?;
        Ok(if wrap { format!("({})", text) } else { text })
    }
}

impl Default for GlslEmitter {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn precedence(expr: &Expr) -> u8 {
    match &expr.node {
        ExprKind::Binary { op, .. } => op.info().precedence,
        ExprKind::Unary { .. } => UNARY_PRECEDENCE,
        // A negative literal prints with its sign
        ExprKind::Lit(Literal::Int(n)) if *n < 0 => UNARY_PRECEDENCE,
        ExprKind::Lit(Literal::Float(f)) if f.is_sign_negative() => UNARY_PRECEDENCE,
        _ => ATOM_PRECEDENCE,
    }
}

/// GLSL literal spelling; floats always carry a decimal point
fn emit_literal(lit: &Literal) -> String {
    match lit {
        Literal::Int(n) => n.to_string(),
        Literal::Float(f) => {
            let text = f.to_string();
            if text.contains('.') {
                text
            } else {
                format!("{}.0", text)
            }
        }
        Literal::Bool(b) => b.to_string(),
    }
}

fn unsupported(kind: &'static str, span: &Span) -> CompileError {
    CompileError::UnsupportedConstruct {
        kind,
        span: span.clone(),
    }
}

/// Emit a prepared stage body as `void main()`
pub fn emit_glsl(def: &FunctionDef) -> EmitResult<String> {
    GlslEmitter::new().emit_entry(def)
}
