//! Host descriptors to type graph.
//!
//! [`extract`] walks a root struct or interface and everything reachable
//! from it, applying the policies of an [`ExtractConfig`], and returns one
//! node per top-level declaration.
//!
//! Resolution of any field, parameter or result type, in priority order:
//!
//! 1. pointers are stripped;
//! 2. structs: anonymous ones are inlined or promoted to declarations
//!    (`name_anon_structs`); named ones are embedded (`embed_structs`),
//!    declared and referenced (`follow_structs`) or just referenced;
//! 3. named types the enum provider recognizes become enum declarations;
//! 4. everything else goes through [`map_primitive`].

use crate::config::ExtractConfig;
use crate::host::{HostField, HostMethod, HostType, TypeCatalog, TypeDecl};
use crate::ir::{Arg, EnumNode, InterfaceNode, Member, TypeNode};
use crate::primitive::map_primitive;
use crate::traits::{EnumProvider, ProviderError};
use indexmap::IndexMap;
use std::collections::HashSet;
use tracing::{debug, trace};

/// Reasons extraction fails. Any error aborts the whole extraction.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("cannot map {kind} to a TypeScript type (at {site})")]
    UnsupportedKind { kind: &'static str, site: String },

    #[error("second return value of {type_name}.{method} must be an error")]
    InvalidReturnShape { type_name: String, method: String },

    #[error("cannot export more than two return values in {type_name}.{method}")]
    TooManyReturnValues { type_name: String, method: String },

    #[error("variadic methods are not supported: {type_name}.{method}")]
    UnsupportedVariadic { type_name: String, method: String },

    #[error("enumeration provider failed for {type_name}")]
    EnumProvider {
        type_name: String,
        #[source]
        source: ProviderError,
    },

    #[error("cannot extract a declaration from {0}")]
    RootType(String),

    #[error("unknown type {name} (at {site})")]
    UnknownType { name: String, site: String },

    #[error("{name} contains itself and cannot be inlined")]
    CyclicType { name: String },
}

/// Extract the declarations reachable from `root`.
///
/// `root` must denote a named struct or interface, optionally behind
/// pointers. The result holds the root and every declaration discovered
/// while walking it, dependencies first unless the configuration sorts.
pub fn extract(
    catalog: &dyn TypeCatalog,
    root: &HostType,
    config: &ExtractConfig,
) -> Result<Vec<TypeNode>, ExtractError> {
    let mut extraction = Extraction::new(catalog, config);
    extraction.root(root)?;
    Ok(extraction.finish())
}

/// Shorthand for [`extract`] with a named root.
pub fn extract_named(
    catalog: &dyn TypeCatalog,
    root: &str,
    config: &ExtractConfig,
) -> Result<Vec<TypeNode>, ExtractError> {
    extract(catalog, &HostType::named(root), config)
}

/// State of one extraction call.
struct Extraction<'a> {
    catalog: &'a dyn TypeCatalog,
    config: &'a ExtractConfig,
    /// Declarations by target name. Last write wins.
    result: IndexMap<String, TypeNode>,
    /// Host names currently being walked.
    in_progress: HashSet<String>,
    /// Host names already materialized into `result`.
    declared: HashSet<String>,
}

impl<'a> Extraction<'a> {
    fn new(catalog: &'a dyn TypeCatalog, config: &'a ExtractConfig) -> Self {
        Self {
            catalog,
            config,
            result: IndexMap::new(),
            in_progress: HashSet::new(),
            declared: HashSet::new(),
        }
    }

    fn finish(self) -> Vec<TypeNode> {
        let mut nodes: Vec<TypeNode> = self.result.into_values().collect();
        self.config.sort().sort_by_name(&mut nodes, TypeNode::name);
        nodes
    }

    fn add_result(&mut self, node: TypeNode) {
        debug!(name = node.name(), kind = node.kind(), "declaration extracted");
        self.result.insert(node.name().to_string(), node);
    }

    fn lookup(&self, name: &str, site: &str) -> Result<&'a TypeDecl, ExtractError> {
        let catalog = self.catalog;
        catalog
            .lookup(name)
            .ok_or_else(|| ExtractError::UnknownType {
                name: name.to_string(),
                site: site.to_string(),
            })
    }

    fn root(&mut self, root: &HostType) -> Result<(), ExtractError> {
        let name = match root.deref() {
            HostType::Named { name } => name,
            HostType::Struct { .. } | HostType::Interface { .. } => {
                return Err(ExtractError::RootType(
                    "an anonymous type (declarations need a name)".to_string(),
                ));
            }
            other => return Err(ExtractError::RootType(other.kind_name().to_string())),
        };
        let decl = self.lookup(name, "root")?;
        match decl.ty.deref() {
            HostType::Struct { fields } => self.declare_struct(decl, fields),
            HostType::Interface { methods } => self.declare_interface(decl, methods),
            other => Err(ExtractError::RootType(format!(
                "{} (a {}, not a struct or interface)",
                decl.name,
                other.kind_name()
            ))),
        }
    }

    fn resolve(
        &mut self,
        ty: &HostType,
        field: Option<&HostField>,
        site: &str,
    ) -> Result<TypeNode, ExtractError> {
        match ty.deref() {
            HostType::Struct { fields } => self.anonymous_struct(fields, field, site),
            HostType::Named { name } => self.named(name, site),
            other => map_primitive(other, site, |elem| self.resolve(elem, None, site)),
        }
    }

    fn named(&mut self, name: &str, site: &str) -> Result<TypeNode, ExtractError> {
        let decl = self.lookup(name, site)?;
        if let HostType::Struct { fields } = decl.ty.deref() {
            return self.named_struct(decl, fields);
        }
        let config = self.config;
        if let Some(enums) = config.enums() {
            if enums.is_enum(decl) {
                return self.enumeration(decl, enums);
            }
        }

        if let HostType::Interface { .. } = decl.ty.deref() {
            return Err(ExtractError::UnsupportedKind {
                kind: "interface",
                site: site.to_string(),
            });
        }

        // A named non-struct type stands for its underlying shape.
        if !self.in_progress.insert(decl.name.clone()) {
            return Err(ExtractError::CyclicType {
                name: decl.name.clone(),
            });
        }
        let resolved = self.resolve(&decl.ty, None, site);
        self.in_progress.remove(&decl.name);
        resolved
    }

    fn anonymous_struct(
        &mut self,
        fields: &[HostField],
        field: Option<&HostField>,
        site: &str,
    ) -> Result<TypeNode, ExtractError> {
        let members = self.struct_members(site, fields)?;
        let mut node = InterfaceNode {
            name: String::new(),
            comment: None,
            members,
        };

        let config = self.config;
        let Some(namer) = config.anon_struct_namer() else {
            return Ok(TypeNode::Interface(node));
        };
        let Some(field) = field else {
            debug!(site, "anonymous struct outside a field cannot be named; inlining");
            return Ok(TypeNode::Interface(node));
        };
        let name = namer(field);
        node.name = name.clone();
        self.add_result(TypeNode::Interface(node));
        Ok(TypeNode::simple(name))
    }

    fn named_struct(
        &mut self,
        decl: &TypeDecl,
        fields: &[HostField],
    ) -> Result<TypeNode, ExtractError> {
        if self.config.embed_structs() {
            if !self.in_progress.insert(decl.name.clone()) {
                return Err(ExtractError::CyclicType {
                    name: decl.name.clone(),
                });
            }
            let members = self.struct_members(&decl.name, fields);
            self.in_progress.remove(&decl.name);
            return Ok(TypeNode::Interface(InterfaceNode {
                name: String::new(),
                comment: self.type_comment(decl),
                members: members?,
            }));
        }

        let name = self.config.type_name(decl);
        if self.config.follow_structs() {
            if self.in_progress.contains(&decl.name) || self.declared.contains(&decl.name) {
                debug!(name = %decl.name, "struct already declared or in progress; referencing");
            } else {
                self.declare_struct(decl, fields)?;
            }
        }
        Ok(TypeNode::simple(name))
    }

    /// Walk a named struct and add it to the result. The name is marked
    /// in progress before its fields are walked, so cycles end in a name
    /// reference.
    fn declare_struct(&mut self, decl: &TypeDecl, fields: &[HostField]) -> Result<(), ExtractError> {
        self.in_progress.insert(decl.name.clone());
        let members = self.struct_members(&decl.name, fields);
        self.in_progress.remove(&decl.name);

        let node = InterfaceNode {
            name: self.config.type_name(decl),
            comment: self.type_comment(decl),
            members: members?,
        };
        self.declared.insert(decl.name.clone());
        self.add_result(TypeNode::Interface(node));
        Ok(())
    }

    fn declare_interface(
        &mut self,
        decl: &TypeDecl,
        methods: &[HostMethod],
    ) -> Result<(), ExtractError> {
        self.in_progress.insert(decl.name.clone());
        let members = self.interface_members(decl, methods);
        self.in_progress.remove(&decl.name);

        let node = InterfaceNode {
            name: self.config.type_name(decl),
            comment: self.type_comment(decl),
            members: members?,
        };
        self.declared.insert(decl.name.clone());
        self.add_result(TypeNode::Interface(node));
        Ok(())
    }

    fn enumeration(
        &mut self,
        decl: &TypeDecl,
        enums: &dyn EnumProvider,
    ) -> Result<TypeNode, ExtractError> {
        let name = self.config.type_name(decl);
        if self.declared.insert(decl.name.clone()) {
            let mut members = enums
                .members(decl)
                .map_err(|source| ExtractError::EnumProvider {
                    type_name: decl.name.clone(),
                    source,
                })?;
            self.config
                .sort()
                .sort_by_name(&mut members, |m| m.name.as_str());
            self.add_result(TypeNode::Enum(EnumNode {
                name: name.clone(),
                comment: self.type_comment(decl),
                members,
            }));
        }
        Ok(TypeNode::simple(name))
    }

    fn struct_members(
        &mut self,
        owner: &str,
        fields: &[HostField],
    ) -> Result<Vec<Member>, ExtractError> {
        let mut members = Vec::with_capacity(fields.len());
        for field in fields {
            if !field.is_exported() {
                continue;
            }
            let tag = field.parsed_tag();
            let name = tag.rename.unwrap_or_else(|| field.name.clone());
            if name == "-" {
                trace!(owner, field = %field.name, "field skipped by tag");
                continue;
            }

            let site = format!("{}.{}", owner, field.name);
            trace!(site = %site, "resolving field");
            let ty = self.resolve(&field.ty, Some(field), &site)?;
            let mut member = Member::field(name, ty);
            member.optional = tag.optional;
            members.push(member);
        }
        self.config
            .sort()
            .sort_by_name(&mut members, |m| m.name.as_str());
        Ok(members)
    }

    fn interface_members(
        &mut self,
        decl: &TypeDecl,
        methods: &[HostMethod],
    ) -> Result<Vec<Member>, ExtractError> {
        let mut members = Vec::with_capacity(methods.len());
        for method in methods {
            let site = format!("{}.{}", decl.name, method.name);
            let signature = &method.signature;
            if signature.variadic {
                return Err(ExtractError::UnsupportedVariadic {
                    type_name: decl.name.clone(),
                    method: method.name.clone(),
                });
            }

            let returns = match signature.results.as_slice() {
                [] => TypeNode::Void,
                [only] => {
                    if self.is_error_like(only)? {
                        TypeNode::Void
                    } else {
                        self.resolve(only, None, &site)?
                    }
                }
                [first, second] => {
                    if !self.is_error_like(second)? {
                        return Err(ExtractError::InvalidReturnShape {
                            type_name: decl.name.clone(),
                            method: method.name.clone(),
                        });
                    }
                    if self.is_error_like(first)? {
                        TypeNode::Void
                    } else {
                        self.resolve(first, None, &site)?
                    }
                }
                _ => {
                    return Err(ExtractError::TooManyReturnValues {
                        type_name: decl.name.clone(),
                        method: method.name.clone(),
                    });
                }
            };

            let mut args = Vec::with_capacity(signature.params.len());
            for (i, param) in signature.params.iter().enumerate() {
                let name = match param.name.as_deref() {
                    Some(name) if self.config.preserve_param_names() && !name.is_empty() => {
                        name.to_string()
                    }
                    _ => format!("arg{}", i),
                };
                let ty = self.resolve(&param.ty, None, &site)?;
                args.push(Arg::new(name, ty));
            }

            let mut member = Member::method(method.name.clone(), returns, args);
            member.comment = non_empty(self.config.docs().doc_for_method(decl, method));
            members.push(member);
        }
        self.config
            .sort()
            .sort_by_name(&mut members, |m| m.name.as_str());
        Ok(members)
    }

    fn is_error_like(&self, ty: &HostType) -> Result<bool, ExtractError> {
        ty.is_error_like(self.catalog)
            .map_err(|name| ExtractError::CyclicType { name })
    }

    fn type_comment(&self, decl: &TypeDecl) -> Option<String> {
        non_empty(self.config.docs().doc_for_type(decl))
    }
}

fn non_empty(text: String) -> Option<String> {
    if text.is_empty() { None } else { Some(text) }
}
