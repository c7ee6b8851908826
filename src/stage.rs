//! Stages: extraction, linking, name tables and the per-stage driver
//!
//! A stage is one method of the shader object compiled to its own GLSL
//! program. Stages talk to each other only through shared fields: the
//! producer writes `self.normal`, the consumer reads it, and the linker
//! makes sure every field a consumer reads is written by its producer.

use indexmap::{IndexMap, IndexSet};

use crate::ast::{ExprKind, FunctionDef, Ident, Param, Program, Spanned, StmtKind, Target};
use crate::codegen::{
    find_deps, rename_builtins, rename_fields, strip_self, DependencySet, GlslEmitter,
};
use crate::config::{CompileOptions, NameMap};
use crate::errors::{find_similar, CompileError};
use crate::interface::{declare_input, declare_output, ExternalLinks, Interface};

/// Where a stage sits in the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageRole {
    First,
    Intermediate,
    Last,
    /// Both first and last
    Sole,
}

impl StageRole {
    pub fn for_position(index: usize, count: usize) -> Self {
        match (index, count) {
            (_, 0 | 1) => StageRole::Sole,
            (0, _) => StageRole::First,
            (i, n) if i + 1 == n => StageRole::Last,
            _ => StageRole::Intermediate,
        }
    }

    /// Whether vertex attributes are visible to this stage
    pub fn reads_attributes(self) -> bool {
        matches!(self, StageRole::First | StageRole::Sole)
    }

    pub fn writes_frag_outputs(self) -> bool {
        matches!(self, StageRole::Last | StageRole::Sole)
    }

    pub fn has_producer(self) -> bool {
        matches!(self, StageRole::Intermediate | StageRole::Last)
    }

    pub fn has_consumer(self) -> bool {
        matches!(self, StageRole::First | StageRole::Intermediate)
    }
}

/// First letter of each `_`-separated word, then `_`: `vert_shader` → `vs_`
pub fn make_prefix(name: &str) -> String {
    let mut prefix: String = name
        .split('_')
        .filter_map(|word| word.chars().next())
        .collect();
    prefix.push('_');
    prefix
}

// ============================================================================
// Function library
// ============================================================================

/// Helper functions a stage may call, by name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FunctionLibrary {
    functions: IndexMap<Ident, FunctionDef>,
}

impl FunctionLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, def: FunctionDef) {
        self.functions.insert(def.name.clone(), def);
    }

    pub fn get(&self, name: &str) -> Option<&FunctionDef> {
        self.functions.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.functions.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

impl FromIterator<FunctionDef> for FunctionLibrary {
    fn from_iter<I: IntoIterator<Item = FunctionDef>>(iter: I) -> Self {
        let mut library = Self::new();
        for def in iter {
            library.insert(def);
        }
        library
    }
}

// ============================================================================
// Stage
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Stage {
    pub name: Ident,
    pub body: FunctionDef,
    /// Parameters after `self`, declared as plain `in` variables
    pub parameters: Vec<Param>,
    /// Prefix of the producer's outputs; empty for the first stage
    pub input_prefix: String,
    pub output_prefix: String,
    pub role: StageRole,
}

impl Stage {
    /// Extract the stage method `name` from a program
    pub fn new(program: &Program, name: &str) -> Result<Self, CompileError> {
        let not_found = |reason: &str, suggestions: Vec<String>| CompileError::StageNotFound {
            name: name.to_string(),
            reason: reason.to_string(),
            suggestions,
        };

        match program.function(name) {
            Some(def) if def.has_self => Ok(Self::from_function(def.clone())),
            Some(_) => Err(not_found("the function does not take `self`", vec![])),
            None if program.interface(name).is_some() => Err(not_found(
                "the name is an interface field, not a function",
                vec![],
            )),
            None => {
                let names = program.functions().map(|def| def.name.as_str());
                Err(not_found("no function has this name", find_similar(name, names, 2)))
            }
        }
    }

    /// Wrap an already extracted method as a standalone stage
    pub fn from_function(def: FunctionDef) -> Self {
        Self {
            name: def.name.clone(),
            parameters: def.params.clone(),
            input_prefix: String::new(),
            output_prefix: make_prefix(&def.name),
            role: StageRole::Sole,
            body: def,
        }
    }

    pub fn with_role(mut self, role: StageRole) -> Self {
        self.role = role;
        self
    }

    pub fn with_input_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.input_prefix = prefix.into();
        self
    }

    pub fn analyze(&self) -> DependencySet {
        find_deps(&self.body)
    }

    /// Forward every field `downstream` reads that this stage does not write
    pub fn link(&mut self, downstream: &Stage) {
        self.link_excluding(downstream, |_| false);
    }

    /// [`Stage::link`], skipping names for which `skip` holds.
    ///
    /// Appends `self.n = self.n` for each forwarded name, in the order
    /// `downstream` first reads them, and returns those names.
    pub fn link_excluding(
        &mut self,
        downstream: &Stage,
        skip: impl Fn(&str) -> bool,
    ) -> Vec<Ident> {
        let needed = downstream.analyze().inputs;
        let provided = self.analyze().outputs;

        let forwarded: Vec<Ident> = needed
            .into_iter()
            .filter(|name| !provided.contains(name) && !skip(name))
            .collect();

        for name in &forwarded {
            log::debug!(
                "{}: forwarding `{}` to {}",
                self.name,
                name,
                downstream.name
            );
            self.body.body.push(Spanned::synthetic(StmtKind::Assign {
                target: Target::Field(name.clone()),
                value: Spanned::synthetic(ExprKind::Field(name.clone())),
            }));
        }
        forwarded
    }

    /// GLSL names for the fields this stage reads
    pub fn load_names(&self, links: &ExternalLinks, options: &CompileOptions) -> NameMap {
        self.prefixed(&self.analyze().inputs, &self.input_prefix, links, options)
    }

    /// GLSL names for the fields this stage writes
    pub fn store_names(&self, links: &ExternalLinks, options: &CompileOptions) -> NameMap {
        self.prefixed(&self.analyze().outputs, &self.output_prefix, links, options)
    }

    fn prefixed(
        &self,
        names: &IndexSet<Ident>,
        prefix: &str,
        links: &ExternalLinks,
        options: &CompileOptions,
    ) -> NameMap {
        names
            .iter()
            .filter(|name| !is_unprefixed(name, links, options))
            .map(|name| (name.clone(), format!("{}{}", prefix, name)))
            .collect()
    }

    /// Translate this stage to a complete GLSL program
    pub fn compile(
        &self,
        links: &ExternalLinks,
        library: &FunctionLibrary,
        options: &CompileOptions,
    ) -> Result<String, CompileError> {
        log::debug!("compiling stage {} as {:?}", self.name, self.role);

        let deps = self.analyze();
        let load_names = self.load_names(links, options);
        let store_names = self.store_names(links, options);

        let helpers = self.collect_helpers(&deps, library, options)?;

        // Helpers read shared fields by their bare names, so their uniforms
        // need declaring here too
        let mut reads = deps.inputs.clone();
        for helper in &helpers {
            reads.extend(find_deps(helper).inputs);
        }

        let mut lines = vec![options.version_line()];

        for name in &reads {
            if let Some(ty) = links.uniforms.get(name) {
                lines.push(Interface::Uniform(ty.clone()).render_declaration(name, None));
            }
        }

        if self.role.reads_attributes() {
            for (slot, (name, ty)) in links.attributes.iter().enumerate() {
                lines.push(Interface::Attribute(ty.clone()).render_declaration(name, Some(slot)));
            }
        }

        if self.role.writes_frag_outputs() {
            for (name, ty) in &links.frag_outputs {
                lines.push(Interface::FragOutput(ty.clone()).render_declaration(name, None));
            }
        }

        for param in &self.parameters {
            lines.push(declare_input(&param.ty, &param.name));
        }

        self.declare_varyings(&mut lines, links, &load_names, &store_names);

        let mut emitter = GlslEmitter::new();
        for helper in helpers {
            let helper = strip_self(&rename_builtins(helper, &options.builtins));
            lines.push(emitter.emit_function(&helper)?);
        }

        let mut entry = self.body.clone();
        entry.name = "main".to_string();
        entry.params.clear();
        let entry = rename_fields(&entry, &load_names, &store_names, &NameMap::new());
        let entry = strip_self(&rename_builtins(&entry, &options.builtins));
        lines.push(emitter.emit_entry(&entry)?);

        Ok(lines.join("\n"))
    }

    fn declare_varyings(
        &self,
        lines: &mut Vec<String>,
        links: &ExternalLinks,
        load_names: &NameMap,
        store_names: &NameMap,
    ) {
        for (name, glsl_name) in load_names {
            match links.varyings.get(name) {
                Some(ty) if self.role.has_producer() => lines.push(declare_input(ty, glsl_name)),
                _ if self.role.reads_attributes() && links.attributes.contains_key(name) => {}
                _ => log::warn!(
                    "{}: `{}` is read but not declared as a varying",
                    self.name,
                    name
                ),
            }
        }

        for (name, glsl_name) in store_names {
            match links.varyings.get(name) {
                Some(ty) if self.role.has_consumer() => lines.push(declare_output(ty, glsl_name)),
                _ => log::warn!(
                    "{}: `{}` is written but no later stage receives it",
                    self.name,
                    name
                ),
            }
        }
    }

    /// Helpers reachable from this stage, callees before callers, each once
    fn collect_helpers<'a>(
        &self,
        deps: &DependencySet,
        library: &'a FunctionLibrary,
        options: &CompileOptions,
    ) -> Result<Vec<&'a FunctionDef>, CompileError> {
        let mut ordered = IndexMap::new();
        let mut visiting = IndexSet::new();
        for name in &deps.calls {
            self.visit_helper(name, library, options, &mut visiting, &mut ordered)?;
        }
        Ok(ordered.into_values().collect())
    }

    fn visit_helper<'a>(
        &self,
        name: &Ident,
        library: &'a FunctionLibrary,
        options: &CompileOptions,
        visiting: &mut IndexSet<Ident>,
        ordered: &mut IndexMap<Ident, &'a FunctionDef>,
    ) -> Result<(), CompileError> {
        if options.builtins.is_builtin_call(name)
            || ordered.contains_key(name)
            || !visiting.insert(name.clone())
        {
            return Ok(());
        }

        let def = library
            .get(name)
            .ok_or_else(|| CompileError::MissingFunction {
                stage: self.name.clone(),
                function: name.clone(),
                suggestions: find_similar(name, library.names(), 2),
            })?;

        for callee in &find_deps(def).calls {
            self.visit_helper(callee, library, options, visiting, ordered)?;
        }
        ordered.insert(name.clone(), def);
        Ok(())
    }
}

/// Names that keep their spelling in every stage
fn is_unprefixed(name: &str, links: &ExternalLinks, options: &CompileOptions) -> bool {
    links.uniforms.contains_key(name)
        || links.frag_outputs.contains_key(name)
        || options.is_builtin_name(name)
}

impl Program {
    /// Interface fields of the shader object, grouped by kind
    pub fn links(&self) -> ExternalLinks {
        ExternalLinks::from_program(self)
    }

    /// Every function except the named stages
    pub fn library(&self, stage_names: &[Ident]) -> FunctionLibrary {
        self.functions()
            .filter(|def| !stage_names.contains(&def.name))
            .cloned()
            .collect()
    }
}
