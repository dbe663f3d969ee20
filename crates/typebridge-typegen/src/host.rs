//! Host type descriptors.
//!
//! The extractor never inspects live values. It reads an explicit description
//! of the host language's types: a kind-tagged [`HostType`] tree whose named
//! references are resolved through a [`TypeCatalog`]. A reflection layer, a
//! parser-derived AST or a hand-written schema file can all produce these.
//!
//! # Example descriptor (JSON)
//!
//! ```json
//! {
//!   "package": "example.com/api",
//!   "types": [
//!     {
//!       "name": "Person",
//!       "type": { "kind": "struct", "fields": [
//!         { "name": "Name", "type": { "kind": "string" } },
//!         { "name": "Age", "type": { "kind": "int" }, "tag": "age,omitempty" }
//!       ]}
//!     }
//!   ]
//! }
//! ```

use crate::ir::EnumMember;
use serde::{Deserialize, Serialize};

/// A host-language type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HostType {
    Bool,
    Int {
        #[serde(default = "default_bits")]
        bits: u8,
        #[serde(default)]
        unsigned: bool,
    },
    Float {
        #[serde(default = "default_bits")]
        bits: u8,
    },
    Complex {
        #[serde(default = "default_complex_bits")]
        bits: u8,
    },
    String,
    /// A growable sequence.
    Slice { elem: Box<HostType> },
    /// A fixed-length sequence.
    Array { len: usize, elem: Box<HostType> },
    Map {
        key: Box<HostType>,
        value: Box<HostType>,
    },
    /// One level of indirection; transparent for typing purposes.
    Pointer { elem: Box<HostType> },
    /// A struct literal. Anonymous unless it is the shape of a [`TypeDecl`].
    Struct {
        #[serde(default)]
        fields: Vec<HostField>,
    },
    /// A method set. Anonymous unless it is the shape of a [`TypeDecl`].
    Interface {
        #[serde(default)]
        methods: Vec<HostMethod>,
    },
    /// The host's error capability.
    Error,
    Chan { elem: Box<HostType> },
    Func { signature: Signature },
    /// Reference to a named declaration in the catalog.
    Named { name: String },
}

fn default_bits() -> u8 {
    64
}

fn default_complex_bits() -> u8 {
    128
}

/// A struct field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostField {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: HostType,
    /// Serialization annotation in `rename,option,...` form.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

/// A method of an interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostMethod {
    pub name: String,
    #[serde(flatten)]
    pub signature: Signature,
    /// Documentation, read by [`DeclaredDocs`](crate::providers::DeclaredDocs).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docs: Option<String>,
}

/// Parameters and results of a function or method.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    #[serde(default)]
    pub params: Vec<HostParam>,
    #[serde(default)]
    pub results: Vec<HostType>,
    #[serde(default)]
    pub variadic: bool,
}

/// A method parameter. Hosts that do not retain parameter names leave
/// `name` empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostParam {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub ty: HostType,
}

/// A named declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDecl {
    pub name: String,
    /// Underlying shape of the named type.
    #[serde(rename = "type")]
    pub ty: HostType,
    /// Documentation, read by [`DeclaredDocs`](crate::providers::DeclaredDocs).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docs: Option<String>,
    /// Explicit enumeration annotation, read by
    /// [`DeclaredEnums`](crate::providers::DeclaredEnums).
    #[serde(default, rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_members: Option<Vec<EnumMember>>,
}

/// Parsed form of a field's serialization tag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldTag {
    /// Replacement name, if the first segment is non-empty.
    pub rename: Option<String>,
    /// Whether `omitempty` is among the options.
    pub optional: bool,
}

/// Resolves named references to their declarations.
///
/// This is the only view of the host type universe the extractor needs.
pub trait TypeCatalog {
    fn lookup(&self, name: &str) -> Option<&TypeDecl>;
}

/// A set of declarations loaded from a descriptor file or built in code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostModule {
    /// Package / module path of the host declarations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,
    #[serde(default)]
    pub types: Vec<TypeDecl>,
}

impl HostType {
    pub fn int() -> Self {
        HostType::Int {
            bits: 64,
            unsigned: false,
        }
    }

    pub fn float() -> Self {
        HostType::Float { bits: 64 }
    }

    pub fn named(name: impl Into<String>) -> Self {
        HostType::Named { name: name.into() }
    }

    pub fn slice(elem: HostType) -> Self {
        HostType::Slice {
            elem: Box::new(elem),
        }
    }

    pub fn map(key: HostType, value: HostType) -> Self {
        HostType::Map {
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    pub fn pointer(elem: HostType) -> Self {
        HostType::Pointer {
            elem: Box::new(elem),
        }
    }

    pub fn structure(fields: Vec<HostField>) -> Self {
        HostType::Struct { fields }
    }

    pub fn interface(methods: Vec<HostMethod>) -> Self {
        HostType::Interface { methods }
    }

    /// Kind label used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            HostType::Bool => "bool",
            HostType::Int { .. } => "int",
            HostType::Float { .. } => "float",
            HostType::Complex { .. } => "complex",
            HostType::String => "string",
            HostType::Slice { .. } => "slice",
            HostType::Array { .. } => "array",
            HostType::Map { .. } => "map",
            HostType::Pointer { .. } => "pointer",
            HostType::Struct { .. } => "struct",
            HostType::Interface { .. } => "interface",
            HostType::Error => "error",
            HostType::Chan { .. } => "chan",
            HostType::Func { .. } => "func",
            HostType::Named { .. } => "named",
        }
    }

    /// Strip every level of pointer indirection.
    pub fn deref(&self) -> &HostType {
        let mut ty = self;
        while let HostType::Pointer { elem } = ty {
            ty = elem;
        }
        ty
    }

    /// Whether values of this type satisfy the host's error capability:
    /// the builtin error type, or a named interface with an `Error() string`
    /// method.
    ///
    /// Named types are followed through the catalog. A chain of names that
    /// comes back to itself fails with the repeated name.
    pub fn is_error_like<'a>(&'a self, catalog: &'a dyn TypeCatalog) -> Result<bool, String> {
        let mut seen: Vec<&str> = Vec::new();
        let mut ty = self.deref();
        loop {
            match ty {
                HostType::Error => return Ok(true),
                HostType::Named { name } => {
                    if seen.contains(&name.as_str()) {
                        return Err(name.clone());
                    }
                    seen.push(name.as_str());
                    match catalog.lookup(name) {
                        Some(decl) => ty = decl.ty.deref(),
                        None => return Ok(false),
                    }
                }
                HostType::Interface { methods } => {
                    return Ok(methods.iter().any(|m| {
                        m.name == "Error"
                            && m.signature.params.is_empty()
                            && m.signature.results == [HostType::String]
                    }));
                }
                _ => return Ok(false),
            }
        }
    }
}

impl HostField {
    pub fn new(name: impl Into<String>, ty: HostType) -> Self {
        Self {
            name: name.into(),
            ty,
            tag: None,
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Host convention: a field is exported when its name starts with an
    /// upper-case letter.
    pub fn is_exported(&self) -> bool {
        self.name.chars().next().is_some_and(char::is_uppercase)
    }

    pub fn parsed_tag(&self) -> FieldTag {
        self.tag.as_deref().map(FieldTag::parse).unwrap_or_default()
    }

    /// Name under which the field is serialized. `-` means "never".
    pub fn serialized_name(&self) -> &str {
        match self.tag.as_deref().and_then(|t| t.split(',').next()) {
            Some(first) if !first.is_empty() => first,
            _ => &self.name,
        }
    }
}

impl FieldTag {
    /// Parse a `rename,option,...` annotation.
    pub fn parse(tag: &str) -> Self {
        let mut segments = tag.split(',');
        let rename = segments
            .next()
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        let optional = segments.any(|s| s == "omitempty");
        Self { rename, optional }
    }
}

impl HostMethod {
    pub fn new(name: impl Into<String>, params: Vec<HostType>, results: Vec<HostType>) -> Self {
        Self {
            name: name.into(),
            signature: Signature {
                params: params
                    .into_iter()
                    .map(|ty| HostParam { name: None, ty })
                    .collect(),
                results,
                variadic: false,
            },
            docs: None,
        }
    }

    pub fn variadic(mut self) -> Self {
        self.signature.variadic = true;
        self
    }

    pub fn with_docs(mut self, docs: impl Into<String>) -> Self {
        self.docs = Some(docs.into());
        self
    }
}

impl TypeDecl {
    pub fn new(name: impl Into<String>, ty: HostType) -> Self {
        Self {
            name: name.into(),
            ty,
            docs: None,
            enum_members: None,
        }
    }

    pub fn with_docs(mut self, docs: impl Into<String>) -> Self {
        self.docs = Some(docs.into());
        self
    }

    pub fn with_enum(mut self, members: Vec<EnumMember>) -> Self {
        self.enum_members = Some(members);
        self
    }
}

impl HostModule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, decl: TypeDecl) {
        self.types.push(decl);
    }

    pub fn with(mut self, decl: TypeDecl) -> Self {
        self.add(decl);
        self
    }
}

impl TypeCatalog for HostModule {
    fn lookup(&self, name: &str) -> Option<&TypeDecl> {
        self.types.iter().find(|d| d.name == name)
    }
}
