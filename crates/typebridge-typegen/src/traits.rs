//! Lookup services consumed by the extractor.
//!
//! Enum detection and documentation usually come from parsing host source
//! code, which this crate does not do. Both are injected instead, so an
//! AST-backed provider can be swapped for one backed by explicit annotations.

use crate::host::{HostMethod, TypeDecl};
use crate::ir::EnumMember;

/// Error reported by a provider implementation.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("no enumeration named {0}")]
    NotFound(String),

    #[error("{0}")]
    Other(String),
}

/// Decides which named types are enumerations and lists their members.
///
/// # Implementing a provider
///
/// ```
/// use typebridge_typegen::{EnumMember, EnumProvider, ProviderError, host::TypeDecl};
///
/// struct Weekdays;
///
/// impl EnumProvider for Weekdays {
///     fn is_enum(&self, decl: &TypeDecl) -> bool {
///         decl.name == "Weekday"
///     }
///
///     fn members(&self, _decl: &TypeDecl) -> Result<Vec<EnumMember>, ProviderError> {
///         Ok(vec![EnumMember::integer("Monday", 1), EnumMember::integer("Tuesday", 2)])
///     }
/// }
/// ```
pub trait EnumProvider: Send + Sync {
    /// Whether `decl` should be extracted as an enumeration.
    fn is_enum(&self, decl: &TypeDecl) -> bool;

    /// Ordered members of an enumeration, literal values pre-rendered.
    fn members(&self, decl: &TypeDecl) -> Result<Vec<EnumMember>, ProviderError>;
}

/// Supplies documentation text. Empty text means "no comment".
pub trait DocProvider: Send + Sync {
    /// Documentation for a named type.
    fn doc_for_type(&self, decl: &TypeDecl) -> String;

    /// Documentation for a method of an interface type.
    fn doc_for_method(&self, parent: &TypeDecl, method: &HostMethod) -> String;
}
