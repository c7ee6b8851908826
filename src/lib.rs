//! Stagelink - translates self-qualified shader stage code into linked GLSL
//!
//! A shader object declares interface fields and stage methods. Each stage
//! compiles to its own GLSL program; fields read by one stage and written by
//! the previous one are forwarded and renamed automatically.

pub mod ast;
pub mod builder;
pub mod codegen;
pub mod config;
pub mod errors;
pub mod interface;
pub mod lexer;
pub mod operators;
pub mod parser;
pub mod pipeline;
pub mod stage;
pub mod test_support;
pub mod types;

pub use ast::{FunctionDef, Position, Program, SourceMap, Span};
pub use codegen::{emit_glsl, find_deps, DependencySet, GlslEmitter};
pub use config::{BuiltinTable, CompileOptions, NameMap};
pub use errors::{
    find_similar, format_header, format_location, format_snippet, format_suggestions,
    levenshtein_distance, Colors, CompileError, ErrorConfig,
};
pub use interface::{ExternalLinks, Interface};
pub use lexer::Lexer;
pub use parser::{parse, Parser};
pub use pipeline::{CompiledShaders, Pipeline};
pub use stage::{make_prefix, FunctionLibrary, Stage, StageRole};
pub use types::GlslType;
