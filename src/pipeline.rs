//! Whole-program translation
//!
//! Finds the stage methods of a shader object by their conventional names,
//! links each producer to its consumer and compiles every stage.

use indexmap::IndexMap;

use crate::ast::{Ident, Program};
use crate::config::CompileOptions;
use crate::errors::{find_similar, CompileError};
use crate::parser::parse;
use crate::stage::{Stage, StageRole};

/// Stage name to GLSL program text, in pipeline order
pub type CompiledShaders = IndexMap<Ident, String>;

#[derive(Debug, Clone)]
pub struct Pipeline {
    program: Program,
    options: CompileOptions,
}

impl Pipeline {
    pub fn new(program: Program, options: CompileOptions) -> Self {
        Self { program, options }
    }

    pub fn parse(source: &str, options: CompileOptions) -> Result<Self, CompileError> {
        Ok(Self::new(parse(source)?, options))
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    /// Stages present in the program, linked and ready to compile
    pub fn stages(&self) -> Result<Vec<Stage>, CompileError> {
        let names: Vec<&Ident> = self
            .options
            .stage_names
            .iter()
            .filter(|name| self.program.function(name).is_some())
            .collect();

        if names.is_empty() {
            let name = self.options.stage_names.first().cloned().unwrap_or_default();
            let candidates = self.program.functions().map(|def| def.name.as_str());
            return Err(CompileError::StageNotFound {
                suggestions: find_similar(&name, candidates, 2),
                name,
                reason: "the program defines none of the stage methods".to_string(),
            });
        }

        let count = names.len();
        let mut stages = names
            .into_iter()
            .enumerate()
            .map(|(index, name)| {
                Stage::new(&self.program, name)
                    .map(|stage| stage.with_role(StageRole::for_position(index, count)))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let links = self.program.links();
        let builtin_prefix = &self.options.builtin_prefix;
        // Back to front, so a field the last stage needs reaches the first
        for index in (1..count).rev() {
            let (producers, consumers) = stages.split_at_mut(index);
            let producer = &mut producers[index - 1];
            let consumer = &mut consumers[0];
            producer.link_excluding(consumer, |name| {
                links.uniforms.contains_key(name) || name.starts_with(builtin_prefix.as_str())
            });
            consumer.input_prefix = producer.output_prefix.clone();
        }

        Ok(stages)
    }

    pub fn translate(&self) -> Result<CompiledShaders, CompileError> {
        let stages = self.stages()?;
        let links = self.program.links();
        let stage_names: Vec<Ident> = stages.iter().map(|stage| stage.name.clone()).collect();
        let library = self.program.library(&stage_names);

        stages
            .iter()
            .map(|stage| -> Result<(Ident, String), CompileError> {
                let text = stage.compile(&links, &library, &self.options)?;
                Ok((stage.name.clone(), text))
            })
            .collect()
    }
}
