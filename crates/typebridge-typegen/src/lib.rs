//! TypeScript declarations from host-language type descriptors.
//!
//! `typebridge-typegen` walks a description of a host program's types and
//! produces the TypeScript declarations that describe the same values once
//! serialized to JSON.
//!
//! # Architecture
//!
//! ```text
//! Host descriptors        IR                 Output
//! ────────────────     ───────────────     ──────────────────────
//! HostModule     ─┐                      ┌─> export interface ...
//! (host.rs)       ├─> Vec<TypeNode> ─────┼─> export enum ...
//! ExtractConfig  ─┘   (ir.rs)            └─> export type ... = a | b
//! (config.rs)
//! ```
//!
//! # Example
//!
//! ```
//! use typebridge_typegen::host::{HostField, HostModule, HostType, TypeDecl};
//! use typebridge_typegen::{ExtractConfig, RenderOptions, extract_named, render_to_string};
//!
//! let module = HostModule::new().with(TypeDecl::new(
//!     "User",
//!     HostType::structure(vec![
//!         HostField::new("Id", HostType::String).with_tag("id"),
//!         HostField::new("Email", HostType::String).with_tag("email,omitempty"),
//!     ]),
//! ));
//!
//! let graph = extract_named(&module, "User", &ExtractConfig::default()).unwrap();
//! let ts = render_to_string(&graph, &RenderOptions::default()).unwrap();
//! assert!(ts.contains("export interface User {"));
//! assert!(ts.contains("    email?: string;"));
//! ```

pub mod config;
pub mod conform;
pub mod extract;
pub mod host;
pub mod ir;
pub mod output;
pub mod primitive;
pub mod providers;
pub mod traits;

pub use config::{CaseStyle, ConfigError, ExtractConfig, ExtractConfigBuilder, SortOrder};
pub use conform::{ConformanceError, check_instance};
pub use extract::{ExtractError, extract, extract_named};
pub use host::{HostModule, HostType, TypeCatalog};
pub use ir::{Arg, EnumMember, Member, TypeNode};
pub use output::{RenderError, RenderOptions, render, render_to_string};
pub use providers::{DeclaredDocs, DeclaredEnums, EnumTable, NoDocs};
pub use traits::{DocProvider, EnumProvider, ProviderError};
