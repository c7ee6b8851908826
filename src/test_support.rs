//! Helpers shared by unit and integration tests.
//!
//! Error values are flattened to strings so tests can `unwrap()` with a
//! readable message, in the same way for every stage of the pipeline.

use crate::ast::Program;
use crate::codegen::{find_deps, DependencySet};
use crate::config::CompileOptions;
use crate::errors::CompileError;
use crate::parser::parse;
use crate::pipeline::{CompiledShaders, Pipeline};
use crate::stage::Stage;

/// Strip leading whitespace from every line and concatenate the lines
pub fn deindent(text: &str) -> String {
    text.lines().map(str::trim_start).collect()
}

/// Parse a program
pub fn parse_program(input: &str) -> Result<Program, String> {
    parse(input).map_err(|e| format!("Parse error: {}", e))
}

/// Dependencies of the function `name` in `input`
pub fn analyze_function(input: &str, name: &str) -> Result<DependencySet, String> {
    let program = parse_program(input)?;
    let def = program
        .function(name)
        .ok_or_else(|| format!("no function named `{}`", name))?;
    Ok(find_deps(def))
}

/// Compile one stage of `input` on its own, with every other function as
/// its library
pub fn compile_stage(input: &str, name: &str) -> Result<String, CompileError> {
    let program = parse(input)?;
    let stage = Stage::new(&program, name)?;
    let library = program.library(&[stage.name.clone()]);
    stage.compile(&program.links(), &library, &CompileOptions::default())
}

/// Translate every stage of `input` with default options
pub fn translate(input: &str) -> Result<CompiledShaders, CompileError> {
    Pipeline::parse(input, CompileOptions::default())?.translate()
}
