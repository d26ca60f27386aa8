//! Parameter type descriptors
//!
//! The engine never looks at live Rust types. Every parameter is described by a
//! [`ParamType`] built up front when the catalog is registered.

use crate::catalog::Value;
use crate::resolve::Comparison;
use std::fmt;
use std::sync::Arc;

/// Primitive scalar kinds, named after their type code in help output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Boolean,
    Char,
    SByte,
    Byte,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Single,
    Double,
    DateTime,
    String,
}

impl ScalarKind {
    /// Type-code name shown in help when nothing better is known
    pub fn type_code(&self) -> &'static str {
        match self {
            ScalarKind::Boolean => "Boolean",
            ScalarKind::Char => "Char",
            ScalarKind::SByte => "SByte",
            ScalarKind::Byte => "Byte",
            ScalarKind::Int16 => "Int16",
            ScalarKind::UInt16 => "UInt16",
            ScalarKind::Int32 => "Int32",
            ScalarKind::UInt32 => "UInt32",
            ScalarKind::Int64 => "Int64",
            ScalarKind::UInt64 => "UInt64",
            ScalarKind::Single => "Single",
            ScalarKind::Double => "Double",
            ScalarKind::DateTime => "DateTime",
            ScalarKind::String => "String",
        }
    }
}

/// Declared container for a repeatable parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContainerShape {
    /// Growable list
    List,
    /// Fixed array
    Array,
    /// Any other container; rejected when the parameter is finalized
    Other(String),
}

/// Closed set of parameter type descriptors
#[derive(Debug, Clone)]
pub enum ParamType {
    Scalar(ScalarKind),
    Enum(Arc<EnumType>),
    Nullable(Box<ParamType>),
    Enumerable {
        item: Box<ParamType>,
        shape: ContainerShape,
    },
    Composite(Arc<CompositeType>),
    /// Byte stream; `-` means stdin
    Stream,
    /// Text reader; `-` means stdin
    TextReader,
    /// Text writer; `-` means stdout, otherwise a new file
    TextWriter,
    FilePath,
    DirectoryPath,
    /// Accepts the raw token
    Any,
    Custom(Arc<CustomType>),
}

impl ParamType {
    pub fn string() -> Self {
        ParamType::Scalar(ScalarKind::String)
    }

    pub fn boolean() -> Self {
        ParamType::Scalar(ScalarKind::Boolean)
    }

    pub fn int32() -> Self {
        ParamType::Scalar(ScalarKind::Int32)
    }

    pub fn int64() -> Self {
        ParamType::Scalar(ScalarKind::Int64)
    }

    pub fn double() -> Self {
        ParamType::Scalar(ScalarKind::Double)
    }

    pub fn date_time() -> Self {
        ParamType::Scalar(ScalarKind::DateTime)
    }

    pub fn enumeration(ty: Arc<EnumType>) -> Self {
        ParamType::Enum(ty)
    }

    pub fn nullable(inner: ParamType) -> Self {
        ParamType::Nullable(Box::new(inner))
    }

    pub fn list(item: ParamType) -> Self {
        ParamType::Enumerable {
            item: Box::new(item),
            shape: ContainerShape::List,
        }
    }

    pub fn array(item: ParamType) -> Self {
        ParamType::Enumerable {
            item: Box::new(item),
            shape: ContainerShape::Array,
        }
    }

    pub fn composite(ty: Arc<CompositeType>) -> Self {
        ParamType::Composite(ty)
    }

    pub fn custom(ty: Arc<CustomType>) -> Self {
        ParamType::Custom(ty)
    }

    pub fn is_enumerable(&self) -> bool {
        matches!(self, ParamType::Enumerable { .. })
    }

    /// Item type of a repeatable parameter, or the type itself
    pub fn element_type(&self) -> &ParamType {
        match self {
            ParamType::Enumerable { item, .. } => item,
            other => other,
        }
    }

    /// Strip one level of nullability
    pub fn underlying(&self) -> &ParamType {
        match self {
            ParamType::Nullable(inner) => inner,
            other => other,
        }
    }

    /// Human readable type name used by help output
    pub fn display_name(&self) -> String {
        match self {
            ParamType::Scalar(kind) => kind.type_code().to_string(),
            ParamType::Enum(ty) => ty.name.clone(),
            ParamType::Nullable(inner) => format!("Nullable<{}>", inner.display_name()),
            ParamType::Enumerable { item, shape } => match shape {
                ContainerShape::Array => format!("{}[]", item.display_name()),
                ContainerShape::List => format!("List<{}>", item.display_name()),
                ContainerShape::Other(name) => format!("{}<{}>", name, item.display_name()),
            },
            ParamType::Composite(ty) => ty.name.clone(),
            ParamType::Stream => "Stream".to_string(),
            ParamType::TextReader => "TextReader".to_string(),
            ParamType::TextWriter => "TextWriter".to_string(),
            ParamType::FilePath => "FileInfo".to_string(),
            ParamType::DirectoryPath => "DirectoryInfo".to_string(),
            ParamType::Any => "Object".to_string(),
            ParamType::Custom(ty) => ty.name.clone(),
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name())
    }
}

/// One named member of an enumeration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumMember {
    pub name: String,
    pub value: i64,
}

/// An enumeration type: a closed set of named members
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumType {
    pub name: String,
    pub members: Vec<EnumMember>,
}

impl EnumType {
    /// Create an enumeration whose members are numbered from zero
    pub fn new(name: impl Into<String>, members: &[&str]) -> Self {
        EnumType {
            name: name.into(),
            members: members
                .iter()
                .enumerate()
                .map(|(i, m)| EnumMember {
                    name: m.to_string(),
                    value: i as i64,
                })
                .collect(),
        }
    }

    /// Create an enumeration with explicit member values
    pub fn with_values(name: impl Into<String>, members: &[(&str, i64)]) -> Self {
        EnumType {
            name: name.into(),
            members: members
                .iter()
                .map(|(m, v)| EnumMember {
                    name: m.to_string(),
                    value: *v,
                })
                .collect(),
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(|m| m.name.as_str())
    }

    pub fn by_value(&self, value: i64) -> Option<&EnumMember> {
        self.members.iter().find(|m| m.value == value)
    }

    /// Look a member up by name, or by its numeric value
    pub fn parse(&self, s: &str, cmp: Comparison) -> Option<&EnumMember> {
        let s = s.trim();
        if let Some(member) = self.members.iter().find(|m| cmp.eq(&m.name, s)) {
            return Some(member);
        }

        s.parse::<i64>().ok().and_then(|v| self.by_value(v))
    }
}

/// A member field of a composite parameter object
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: String,
    pub ty: ParamType,
    pub default: Option<Literal>,
    pub description: Option<String>,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, ty: ParamType) -> Self {
        FieldSpec {
            name: name.into(),
            ty,
            default: None,
            description: None,
        }
    }

    pub fn with_default(mut self, default: Literal) -> Self {
        self.default = Some(default);
        self
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A nested parameter object whose fields are set by name
#[derive(Debug, Clone)]
pub struct CompositeType {
    pub name: String,
    pub fields: Vec<FieldSpec>,
}

impl CompositeType {
    pub fn new(name: impl Into<String>, fields: Vec<FieldSpec>) -> Self {
        CompositeType {
            name: name.into(),
            fields,
        }
    }

    pub fn field(&self, name: &str, cmp: Comparison) -> Option<usize> {
        self.fields.iter().position(|f| cmp.eq(&f.name, name))
    }
}

/// Turns a string token into a value
pub type Converter = Arc<dyn Fn(&str) -> anyhow::Result<Value> + Send + Sync>;

/// A host-defined type with its own string conversion
///
/// `converter` is consulted first; `constructor` is the fallback for types that are
/// simply built from one string. A type with neither cannot be used as a parameter.
#[derive(Clone)]
pub struct CustomType {
    pub name: String,
    pub converter: Option<Converter>,
    pub constructor: Option<Converter>,
}

impl CustomType {
    pub fn new(name: impl Into<String>) -> Self {
        CustomType {
            name: name.into(),
            converter: None,
            constructor: None,
        }
    }

    pub fn with_converter<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        self.converter = Some(Arc::new(f));
        self
    }

    pub fn with_constructor<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        self.constructor = Some(Arc::new(f));
        self
    }
}

impl fmt::Debug for CustomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomType")
            .field("name", &self.name)
            .field("converter", &self.converter.is_some())
            .field("constructor", &self.constructor.is_some())
            .finish()
    }
}

/// A declared default value
///
/// Text defaults go through the same conversion as a typed token; the others are
/// coerced numerically.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

/// A declared parameter of an operation
#[derive(Debug, Clone)]
pub struct ParameterSpec {
    pub name: String,
    pub ty: ParamType,
    pub default: Option<Literal>,
    pub description: Option<String>,
}

impl ParameterSpec {
    pub fn new(name: impl Into<String>, ty: ParamType) -> Self {
        ParameterSpec {
            name: name.into(),
            ty,
            default: None,
            description: None,
        }
    }

    pub fn with_default(mut self, default: Literal) -> Self {
        self.default = Some(default);
        self
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }
}
