//! Structural check of JSON instances against an extracted type graph.
//!
//! A serialized host value should type-check against the declarations
//! rendered from its type. [`check_instance`] applies the same structural
//! rules TypeScript applies to an object literal: required members present,
//! no excess members, every value of the declared shape.

use crate::ir::{EnumNode, InterfaceNode, TypeNode};
use serde_json::Value;

/// A place where an instance disagrees with the graph.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConformanceError {
    #[error("{path}: expected {expected}, found {found}")]
    Mismatch {
        path: String,
        expected: String,
        found: &'static str,
    },

    #[error("{path}: required member is missing")]
    Missing { path: String },

    #[error("{path}: member is not declared")]
    Unexpected { path: String },

    #[error("{path}: no declaration named {name}")]
    UnknownType { path: String, name: String },

    #[error("{path}: malformed {kind} node")]
    Malformed { path: String, kind: &'static str },
}

/// Check `value` against the declaration named `root` in `graph`.
pub fn check_instance(graph: &[TypeNode], root: &str, value: &Value) -> Result<(), ConformanceError> {
    Checker { graph }.check(&TypeNode::simple(root), value, root)
}

struct Checker<'g> {
    graph: &'g [TypeNode],
}

impl Checker<'_> {
    fn check(&self, node: &TypeNode, value: &Value, path: &str) -> Result<(), ConformanceError> {
        match node {
            TypeNode::Simple { name } => match name.as_str() {
                "string" => expect(value.is_string(), "string", value, path),
                "number" => expect(value.is_number(), "number", value, path),
                "boolean" => expect(value.is_boolean(), "boolean", value, path),
                _ => self.check_named(name, value, path),
            },
            TypeNode::Void => expect(value.is_null(), "void", value, path),
            TypeNode::Array { params } => {
                let [elem] = params.as_slice() else {
                    return Err(malformed(path, "array"));
                };
                let Value::Array(items) = value else {
                    return Err(mismatch("array", value, path));
                };
                for (i, item) in items.iter().enumerate() {
                    self.check(elem, item, &format!("{}[{}]", path, i))?;
                }
                Ok(())
            }
            TypeNode::Map { params } => {
                let [_, elem] = params.as_slice() else {
                    return Err(malformed(path, "map"));
                };
                let Value::Object(entries) = value else {
                    return Err(mismatch("map", value, path));
                };
                for (key, item) in entries {
                    self.check(elem, item, &format!("{}[{:?}]", path, key))?;
                }
                Ok(())
            }
            TypeNode::Interface(iface) => self.check_interface(iface, value, path),
            TypeNode::Enum(e) => check_enum(e, value, path),
        }
    }

    fn check_named(&self, name: &str, value: &Value, path: &str) -> Result<(), ConformanceError> {
        match self.graph.iter().find(|node| node.name() == name) {
            Some(TypeNode::Interface(iface)) => self.check_interface(iface, value, path),
            Some(TypeNode::Enum(e)) => check_enum(e, value, path),
            _ => Err(ConformanceError::UnknownType {
                path: path.to_string(),
                name: name.to_string(),
            }),
        }
    }

    fn check_interface(
        &self,
        iface: &InterfaceNode,
        value: &Value,
        path: &str,
    ) -> Result<(), ConformanceError> {
        let Value::Object(entries) = value else {
            return Err(mismatch("object", value, path));
        };
        for key in entries.keys() {
            let declared = iface.members.iter().any(|m| !m.function && m.name == *key);
            if !declared {
                return Err(ConformanceError::Unexpected {
                    path: format!("{}.{}", path, key),
                });
            }
        }
        for member in iface.members.iter().filter(|m| !m.function) {
            let member_path = format!("{}.{}", path, member.name);
            match entries.get(&member.name) {
                Some(item) => self.check(&member.ty, item, &member_path)?,
                None if member.optional => {}
                None => return Err(ConformanceError::Missing { path: member_path }),
            }
        }
        Ok(())
    }
}

fn check_enum(e: &EnumNode, value: &Value, path: &str) -> Result<(), ConformanceError> {
    let known = e
        .members
        .iter()
        .any(|m| serde_json::from_str::<Value>(&m.value).is_ok_and(|literal| literal == *value));
    if known {
        Ok(())
    } else {
        Err(ConformanceError::Mismatch {
            path: path.to_string(),
            expected: format!("a member of {}", e.name),
            found: kind_of(value),
        })
    }
}

fn expect(ok: bool, expected: &str, value: &Value, path: &str) -> Result<(), ConformanceError> {
    if ok { Ok(()) } else { Err(mismatch(expected, value, path)) }
}

fn mismatch(expected: &str, value: &Value, path: &str) -> ConformanceError {
    ConformanceError::Mismatch {
        path: path.to_string(),
        expected: expected.to_string(),
        found: kind_of(value),
    }
}

fn malformed(path: &str, kind: &'static str) -> ConformanceError {
    ConformanceError::Malformed {
        path: path.to_string(),
        kind,
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
