//! Interface fields of a shader object and their declarations

use indexmap::IndexMap;

use crate::ast::{Ident, Program};
use crate::types::GlslType;

/// Declaration descriptor for a field of the shader object
#[derive(Debug, Clone, PartialEq)]
pub enum Interface {
    /// Shared by every stage
    Uniform(GlslType),
    /// Per-vertex input of the first stage; slot assigned by declaration order
    Attribute(GlslType),
    /// Output of the last stage
    FragOutput(GlslType),
    /// Value passed from one stage to the next
    Varying(GlslType),
}

impl Interface {
    /// Render the GLSL declaration line for a field called `name`.
    ///
    /// `slot` is only meaningful for attributes. Varyings render their
    /// producer-side (`out`) form; consumers declare them with [`declare_input`].
    pub fn render_declaration(&self, name: &str, slot: Option<usize>) -> String {
        match (self, slot) {
            (Interface::Uniform(ty), _) => format!("uniform {};", ty.declare(name)),
            (Interface::Attribute(ty), Some(slot)) => {
                format!("layout(location = {}) in {};", slot, ty.declare(name))
            }
            (Interface::Attribute(ty), None) => declare_input(ty, name),
            (Interface::FragOutput(ty), _) | (Interface::Varying(ty), _) => {
                declare_output(ty, name)
            }
        }
    }
}

pub fn declare_input(ty: &GlslType, name: &str) -> String {
    format!("in {};", ty.declare(name))
}

pub fn declare_output(ty: &GlslType, name: &str) -> String {
    format!("out {};", ty.declare(name))
}

/// Interface fields grouped by kind, in declaration order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExternalLinks {
    pub uniforms: IndexMap<Ident, GlslType>,
    pub attributes: IndexMap<Ident, GlslType>,
    pub frag_outputs: IndexMap<Ident, GlslType>,
    pub varyings: IndexMap<Ident, GlslType>,
}

impl ExternalLinks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_program(program: &Program) -> Self {
        let mut links = Self::new();
        for decl in program.interfaces() {
            links.insert(decl.name.clone(), decl.kind.clone());
        }
        links
    }

    pub fn insert(&mut self, name: impl Into<Ident>, field: Interface) {
        let name = name.into();
        match field {
            Interface::Uniform(ty) => self.uniforms.insert(name, ty),
            Interface::Attribute(ty) => self.attributes.insert(name, ty),
            Interface::FragOutput(ty) => self.frag_outputs.insert(name, ty),
            Interface::Varying(ty) => self.varyings.insert(name, ty),
        };
    }

    pub fn with_uniform(mut self, name: impl Into<Ident>, ty: GlslType) -> Self {
        self.insert(name, Interface::Uniform(ty));
        self
    }

    pub fn with_attribute(mut self, name: impl Into<Ident>, ty: GlslType) -> Self {
        self.insert(name, Interface::Attribute(ty));
        self
    }

    pub fn with_frag_output(mut self, name: impl Into<Ident>, ty: GlslType) -> Self {
        self.insert(name, Interface::FragOutput(ty));
        self
    }

    pub fn with_varying(mut self, name: impl Into<Ident>, ty: GlslType) -> Self {
        self.insert(name, Interface::Varying(ty));
        self
    }

    /// Whether `name` is declared as any kind of interface field
    pub fn contains(&self, name: &str) -> bool {
        self.uniforms.contains_key(name)
            || self.attributes.contains_key(name)
            || self.frag_outputs.contains_key(name)
            || self.varyings.contains_key(name)
    }
}
