//! Translation options and the GLSL builtin vocabulary

use indexmap::IndexMap;

use crate::ast::Ident;

/// Old name to new name, iterated in insertion order
pub type NameMap = IndexMap<Ident, Ident>;

/// Pseudo-names that always map to GLSL builtins, whatever the stage.
///
/// Kept as data so another target vocabulary can be swapped in without
/// touching the renamer.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltinTable {
    /// Shared fields that are read: `self.gl_frag_coord`
    pub loads: NameMap,
    /// Shared fields that are written: `self.gl_position`
    pub stores: NameMap,
    /// Methods on the shared object: `self.emit_vertex()`
    pub calls: NameMap,
}

impl BuiltinTable {
    pub fn empty() -> Self {
        Self {
            loads: NameMap::new(),
            stores: NameMap::new(),
            calls: NameMap::new(),
        }
    }

    /// GLSL 3.30 builtin variables and functions
    pub fn glsl() -> Self {
        fn table(pairs: &[(&str, &str)]) -> NameMap {
            pairs
                .iter()
                .map(|&(from, to)| (from.to_string(), to.to_string()))
                .collect()
        }

        Self {
            loads: table(&[
                ("gl_frag_coord", "gl_FragCoord"),
                ("gl_front_facing", "gl_FrontFacing"),
                ("gl_point_coord", "gl_PointCoord"),
                ("gl_vertex_id", "gl_VertexID"),
                ("gl_instance_id", "gl_InstanceID"),
                ("gl_primitive_id", "gl_PrimitiveID"),
            ]),
            stores: table(&[
                ("gl_position", "gl_Position"),
                ("gl_point_size", "gl_PointSize"),
                ("gl_frag_depth", "gl_FragDepth"),
            ]),
            calls: table(&[
                ("emit_vertex", "EmitVertex"),
                ("end_primitive", "EndPrimitive"),
            ]),
        }
    }

    /// Whether `name` is a builtin method rather than a helper to inline
    pub fn is_builtin_call(&self, name: &str) -> bool {
        self.calls.contains_key(name)
    }
}

impl Default for BuiltinTable {
    fn default() -> Self {
        Self::glsl()
    }
}

/// Settings shared by every stage of a translation
#[derive(Debug, Clone, PartialEq)]
pub struct CompileOptions {
    /// Emitted as `#version <version>`
    pub version: String,
    /// Names with this prefix are never given a stage prefix
    pub builtin_prefix: String,
    pub builtins: BuiltinTable,
    /// Conventional stage method names, in pipeline order
    pub stage_names: Vec<Ident>,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            version: "330 core".to_string(),
            builtin_prefix: "gl_".to_string(),
            builtins: BuiltinTable::glsl(),
            stage_names: ["vert_shader", "geom_shader", "frag_shader"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

impl CompileOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn with_builtin_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.builtin_prefix = prefix.into();
        self
    }

    pub fn with_builtins(mut self, builtins: BuiltinTable) -> Self {
        self.builtins = builtins;
        self
    }

    pub fn with_stage_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Ident>,
    {
        self.stage_names = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn is_builtin_name(&self, name: &str) -> bool {
        name.starts_with(&self.builtin_prefix)
    }

    pub fn version_line(&self) -> String {
        format!("#version {}", self.version)
    }
}
