//! GLSL types understood by the translator
//!
//! A closed set: scalars, vectors, matrices, samplers and fixed-length
//! arrays of those. Each type knows its GLSL spelling and how to declare a
//! variable of that type.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scalar {
    Float,
    Int,
    UInt,
    Bool,
}

impl Scalar {
    fn name(self) -> &'static str {
        match self {
            Scalar::Float => "float",
            Scalar::Int => "int",
            Scalar::UInt => "uint",
            Scalar::Bool => "bool",
        }
    }

    /// Prefix used by the vector spelling (`vec3`, `ivec3`, ..)
    fn vector_prefix(self) -> &'static str {
        match self {
            Scalar::Float => "",
            Scalar::Int => "i",
            Scalar::UInt => "u",
            Scalar::Bool => "b",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SamplerKind {
    Sampler2D,
    Sampler3D,
    SamplerCube,
    Sampler2DShadow,
}

impl SamplerKind {
    fn name(self) -> &'static str {
        match self {
            SamplerKind::Sampler2D => "sampler2D",
            SamplerKind::Sampler3D => "sampler3D",
            SamplerKind::SamplerCube => "samplerCube",
            SamplerKind::Sampler2DShadow => "sampler2DShadow",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GlslType {
    Void,
    Scalar(Scalar),
    /// Component type and size (2..=4)
    Vector(Scalar, u8),
    /// Float matrix, columns x rows (2..=4 each)
    Matrix { cols: u8, rows: u8 },
    Sampler(SamplerKind),
    Array(Box<GlslType>, usize),
}

impl GlslType {
    pub const FLOAT: GlslType = GlslType::Scalar(Scalar::Float);
    pub const INT: GlslType = GlslType::Scalar(Scalar::Int);
    pub const BOOL: GlslType = GlslType::Scalar(Scalar::Bool);

    pub fn vec(size: u8) -> Self {
        GlslType::Vector(Scalar::Float, size)
    }

    pub fn mat(size: u8) -> Self {
        GlslType::Matrix {
            cols: size,
            rows: size,
        }
    }

    pub fn array(elem: GlslType, len: usize) -> Self {
        GlslType::Array(Box::new(elem), len)
    }

    /// Resolve a non-array type from its GLSL spelling
    pub fn from_name(name: &str) -> Option<Self> {
        let ty = match name {
            "void" => GlslType::Void,
            "float" => GlslType::Scalar(Scalar::Float),
            "int" => GlslType::Scalar(Scalar::Int),
            "uint" => GlslType::Scalar(Scalar::UInt),
            "bool" => GlslType::Scalar(Scalar::Bool),
            "sampler2D" => GlslType::Sampler(SamplerKind::Sampler2D),
            "sampler3D" => GlslType::Sampler(SamplerKind::Sampler3D),
            "samplerCube" => GlslType::Sampler(SamplerKind::SamplerCube),
            "sampler2DShadow" => GlslType::Sampler(SamplerKind::Sampler2DShadow),
            _ => return Self::vector_from_name(name).or_else(|| Self::matrix_from_name(name)),
        };
        Some(ty)
    }

    fn vector_from_name(name: &str) -> Option<Self> {
        let (scalar, rest) = match name.as_bytes().first()? {
            b'i' => (Scalar::Int, &name[1..]),
            b'u' => (Scalar::UInt, &name[1..]),
            b'b' => (Scalar::Bool, &name[1..]),
            _ => (Scalar::Float, name),
        };
        let size = parse_dimension(rest.strip_prefix("vec")?)?;
        Some(GlslType::Vector(scalar, size))
    }

    fn matrix_from_name(name: &str) -> Option<Self> {
        let dims = name.strip_prefix("mat")?;
        match dims.split_once('x') {
            Some((cols, rows)) => Some(GlslType::Matrix {
                cols: parse_dimension(cols)?,
                rows: parse_dimension(rows)?,
            }),
            None => Some(GlslType::mat(parse_dimension(dims)?)),
        }
    }

    /// Declarator for a variable of this type: `vec3 lights[4]`
    pub fn declare(&self, name: &str) -> String {
        let mut dims = String::new();
        let mut base = self;
        while let GlslType::Array(elem, len) = base {
            dims.push_str(&format!("[{}]", len));
            base = elem;
        }
        format!("{} {}{}", base, name, dims)
    }
}

fn parse_dimension(text: &str) -> Option<u8> {
    match text {
        "2" => Some(2),
        "3" => Some(3),
        "4" => Some(4),
        _ => None,
    }
}

impl fmt::Display for GlslType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GlslType::Void => write!(f, "void"),
            GlslType::Scalar(s) => write!(f, "{}", s.name()),
            GlslType::Vector(s, n) => write!(f, "{}vec{}", s.vector_prefix(), n),
            GlslType::Matrix { cols, rows } if cols == rows => write!(f, "mat{}", cols),
            GlslType::Matrix { cols, rows } => write!(f, "mat{}x{}", cols, rows),
            GlslType::Sampler(kind) => write!(f, "{}", kind.name()),
            GlslType::Array(elem, len) => write!(f, "{}[{}]", elem, len),
        }
    }
}
