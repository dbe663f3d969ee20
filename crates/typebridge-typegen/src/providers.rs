//! Built-in enumeration and documentation providers.

use crate::host::{HostMethod, TypeDecl};
use crate::ir::EnumMember;
use crate::traits::{DocProvider, EnumProvider, ProviderError};
use indexmap::IndexMap;

/// Documentation provider that never has anything to say. The default.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDocs;

impl DocProvider for NoDocs {
    fn doc_for_type(&self, _decl: &TypeDecl) -> String {
        String::new()
    }

    fn doc_for_method(&self, _parent: &TypeDecl, _method: &HostMethod) -> String {
        String::new()
    }
}

/// Reads the `docs` annotations carried by the descriptors themselves.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeclaredDocs;

impl DocProvider for DeclaredDocs {
    fn doc_for_type(&self, decl: &TypeDecl) -> String {
        decl.docs.as_deref().unwrap_or("").trim().to_string()
    }

    fn doc_for_method(&self, _parent: &TypeDecl, method: &HostMethod) -> String {
        method.docs.as_deref().unwrap_or("").trim().to_string()
    }
}

/// Treats every declaration with an `enum` annotation as an enumeration.
///
/// An annotation with no members still marks the type as an enum; it then
/// renders as an empty enumeration.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeclaredEnums;

impl EnumProvider for DeclaredEnums {
    fn is_enum(&self, decl: &TypeDecl) -> bool {
        decl.enum_members.is_some()
    }

    fn members(&self, decl: &TypeDecl) -> Result<Vec<EnumMember>, ProviderError> {
        decl.enum_members
            .clone()
            .ok_or_else(|| ProviderError::NotFound(decl.name.clone()))
    }
}

/// In-memory table of enumerations keyed by host type name.
#[derive(Debug, Clone, Default)]
pub struct EnumTable {
    enums: IndexMap<String, Vec<EnumMember>>,
}

impl EnumTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) an enumeration.
    pub fn insert(&mut self, type_name: impl Into<String>, members: Vec<EnumMember>) {
        self.enums.insert(type_name.into(), members);
    }

    pub fn with(mut self, type_name: impl Into<String>, members: Vec<EnumMember>) -> Self {
        self.insert(type_name, members);
        self
    }

    pub fn len(&self) -> usize {
        self.enums.len()
    }

    pub fn is_empty(&self) -> bool {
        self.enums.is_empty()
    }
}

impl EnumProvider for EnumTable {
    fn is_enum(&self, decl: &TypeDecl) -> bool {
        self.enums.contains_key(&decl.name)
    }

    fn members(&self, decl: &TypeDecl) -> Result<Vec<EnumMember>, ProviderError> {
        self.enums
            .get(&decl.name)
            .cloned()
            .ok_or_else(|| ProviderError::NotFound(decl.name.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::HostType;

    #[test]
    fn declared_enums_follow_annotation() {
        let plain = TypeDecl::new("Plain", HostType::String);
        let empty = TypeDecl::new("Empty", HostType::String).with_enum(vec![]);
        let color = TypeDecl::new("Color", HostType::String)
            .with_enum(vec![EnumMember::string("Red", "red")]);

        assert!(!DeclaredEnums.is_enum(&plain));
        assert!(DeclaredEnums.is_enum(&empty));
        assert!(DeclaredEnums.members(&empty).unwrap().is_empty());
        assert_eq!(DeclaredEnums.members(&color).unwrap()[0].value, "\"red\"");
        assert!(matches!(
            DeclaredEnums.members(&plain),
            Err(ProviderError::NotFound(name)) if name == "Plain"
        ));
    }

    #[test]
    fn enum_table_lookup() {
        let table = EnumTable::new().with(
            "Level",
            vec![EnumMember::integer("Low", 0), EnumMember::integer("High", 1)],
        );
        let level = TypeDecl::new("Level", HostType::int());
        let other = TypeDecl::new("Other", HostType::int());

        assert_eq!(table.len(), 1);
        assert!(table.is_enum(&level));
        assert!(!table.is_enum(&other));
        assert_eq!(table.members(&level).unwrap().len(), 2);
    }

    #[test]
    fn declared_docs_are_trimmed() {
        let decl = TypeDecl::new("Person", HostType::String).with_docs("  A person.\n");
        let method = HostMethod::new("Do", vec![], vec![]).with_docs("Does it.");
        assert_eq!(DeclaredDocs.doc_for_type(&decl), "A person.");
        assert_eq!(DeclaredDocs.doc_for_method(&decl, &method), "Does it.");
        assert_eq!(NoDocs.doc_for_type(&decl), "");
    }
}
