//! Intermediate representation of the extracted type graph.
//!
//! The extractor produces these nodes from host type descriptors; the
//! renderer turns them into TypeScript declarations.

use serde::{Deserialize, Serialize};

/// A node in the type graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeNode {
    /// A bare symbol: a primitive (`string`, `number`, `boolean`) or the
    /// name of another declaration.
    Simple { name: String },
    /// An array. Well-formed nodes carry exactly one parameter.
    Array { params: Vec<TypeNode> },
    /// A map / index signature. Well-formed nodes carry key and value.
    Map { params: Vec<TypeNode> },
    /// An interface, either a top-level declaration or an inline object type
    /// (empty name).
    Interface(InterfaceNode),
    /// An enumeration declaration.
    Enum(EnumNode),
    /// No type at all. Only used as the return type of a function member.
    Void,
}

/// An interface with ordered members.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceNode {
    /// Declaration name; empty for embedded/inline interfaces.
    pub name: String,
    /// Documentation comment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub members: Vec<Member>,
}

/// An enumeration with ordered members.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumNode {
    pub name: String,
    /// Documentation comment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub members: Vec<EnumMember>,
}

/// A member of an interface: a property or a method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// Member name as it appears in the target language.
    pub name: String,
    /// Property type, or the return type of a function member.
    #[serde(rename = "type")]
    pub ty: TypeNode,
    /// Whether the property may be absent (`name?: T`).
    #[serde(default)]
    pub optional: bool,
    /// Whether this member is a method.
    #[serde(default)]
    pub function: bool,
    /// Documentation comment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Positional arguments. Empty unless `function` is set.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<Arg>,
}

/// A named method argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Arg {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeNode,
}

/// A member of an enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumMember {
    pub name: String,
    /// Literal text, already quoted for the target language
    /// (e.g. `"\"active\""` or `"3"`).
    pub value: String,
}

impl TypeNode {
    pub fn simple(name: impl Into<String>) -> Self {
        TypeNode::Simple { name: name.into() }
    }

    pub fn string() -> Self {
        Self::simple("string")
    }

    pub fn number() -> Self {
        Self::simple("number")
    }

    pub fn boolean() -> Self {
        Self::simple("boolean")
    }

    pub fn array(elem: TypeNode) -> Self {
        TypeNode::Array { params: vec![elem] }
    }

    pub fn map(key: TypeNode, value: TypeNode) -> Self {
        TypeNode::Map {
            params: vec![key, value],
        }
    }

    pub fn interface(name: impl Into<String>, members: Vec<Member>) -> Self {
        TypeNode::Interface(InterfaceNode {
            name: name.into(),
            comment: None,
            members,
        })
    }

    pub fn enumeration(name: impl Into<String>, members: Vec<EnumMember>) -> Self {
        TypeNode::Enum(EnumNode {
            name: name.into(),
            comment: None,
            members,
        })
    }

    /// The declared or referenced name. Empty for arrays, maps, void and
    /// inline interfaces.
    pub fn name(&self) -> &str {
        match self {
            TypeNode::Simple { name } => name,
            TypeNode::Interface(iface) => &iface.name,
            TypeNode::Enum(e) => &e.name,
            TypeNode::Array { .. } | TypeNode::Map { .. } | TypeNode::Void => "",
        }
    }

    /// Short kind label, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            TypeNode::Simple { .. } => "simple",
            TypeNode::Array { .. } => "array",
            TypeNode::Map { .. } => "map",
            TypeNode::Interface(_) => "interface",
            TypeNode::Enum(_) => "enum",
            TypeNode::Void => "void",
        }
    }

    pub fn is_void(&self) -> bool {
        matches!(self, TypeNode::Void)
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        match &mut self {
            TypeNode::Interface(iface) => iface.comment = Some(comment.into()),
            TypeNode::Enum(e) => e.comment = Some(comment.into()),
            _ => {}
        }
        self
    }
}

impl Member {
    /// A required property.
    pub fn field(name: impl Into<String>, ty: TypeNode) -> Self {
        Self {
            name: name.into(),
            ty,
            optional: false,
            function: false,
            comment: None,
            args: Vec::new(),
        }
    }

    /// A method. Pass [`TypeNode::Void`] for methods without a result.
    pub fn method(name: impl Into<String>, returns: TypeNode, args: Vec<Arg>) -> Self {
        Self {
            name: name.into(),
            ty: returns,
            optional: false,
            function: true,
            comment: None,
            args,
        }
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

impl Arg {
    pub fn new(name: impl Into<String>, ty: TypeNode) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

impl EnumMember {
    /// A member with a pre-rendered literal value.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// A member whose value is a string literal. The value is quoted and
    /// escaped.
    pub fn string(name: impl Into<String>, value: &str) -> Self {
        Self::new(name, quote(value))
    }

    /// A member whose value is an integer literal.
    pub fn integer(name: impl Into<String>, value: i64) -> Self {
        Self::new(name, value.to_string())
    }
}

/// Quote a string as a double-quoted literal.
pub(crate) fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
