//! Stage passes: analyzed AST → renamed AST → GLSL
//!
//! A stage body goes through:
//! 1. Dependency analysis (which shared fields are read, written, called)
//! 2. Link renaming (shared fields get their stage-specific GLSL names)
//! 3. Builtin renaming (pseudo-fields map to `gl_*` variables)
//! 4. Receiver removal (`self.x` becomes `x`)
//! 5. GLSL emission
//!
//! Every pass except emission is infallible and returns a new tree.

pub mod deps;
pub mod glsl;
pub mod rename;
pub mod rewrite;
pub mod unselfify;

pub use deps::{find_deps, DependencySet};
pub use glsl::{emit_glsl, GlslEmitter};
pub use rename::{rename_builtins, rename_fields};
pub use rewrite::SharedAccessRewriter;
pub use unselfify::strip_self;
