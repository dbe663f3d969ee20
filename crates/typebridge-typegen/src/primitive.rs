//! Mapping of host primitive and collection kinds to target types.

use crate::extract::ExtractError;
use crate::host::HostType;
use crate::ir::TypeNode;

/// Map a primitive or collection kind to its target node.
///
/// Element, key and value types are handed back to `resolve`, so that
/// structs and enums nested in collections go through the extractor's
/// policies. Every numeric width collapses to `number`; the target has a
/// single numeric type.
///
/// Structs and named references are the extractor's business and are
/// rejected here like any other kind without a mapping. `site` names the
/// field or method being resolved, for the error message.
pub fn map_primitive<F>(ty: &HostType, site: &str, mut resolve: F) -> Result<TypeNode, ExtractError>
where
    F: FnMut(&HostType) -> Result<TypeNode, ExtractError>,
{
    match ty {
        HostType::Bool => Ok(TypeNode::boolean()),
        HostType::Int { .. } | HostType::Float { .. } => Ok(TypeNode::number()),
        HostType::String => Ok(TypeNode::string()),
        HostType::Slice { elem } | HostType::Array { elem, .. } => {
            Ok(TypeNode::array(resolve(elem)?))
        }
        HostType::Map { key, value } => {
            let key = resolve(key)?;
            let value = resolve(value)?;
            Ok(TypeNode::map(key, value))
        }
        HostType::Pointer { elem } => resolve(elem),
        HostType::Complex { .. }
        | HostType::Struct { .. }
        | HostType::Interface { .. }
        | HostType::Error
        | HostType::Chan { .. }
        | HostType::Func { .. }
        | HostType::Named { .. } => Err(ExtractError::UnsupportedKind {
            kind: ty.kind_name(),
            site: site.to_string(),
        }),
    }
}
