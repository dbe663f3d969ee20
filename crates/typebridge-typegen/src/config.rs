//! Extraction policies.
//!
//! Policies are independent switches collected into an immutable
//! [`ExtractConfig`], built with [`ExtractConfigBuilder`]:
//!
//! ```
//! use typebridge_typegen::{CaseStyle, ExtractConfig, SortOrder};
//!
//! let config = ExtractConfig::builder()
//!     .follow_structs(true)
//!     .type_naming(CaseStyle::Preserve)
//!     .sort(SortOrder::Alphabetical)
//!     .build()
//!     .unwrap();
//! assert!(config.follow_structs());
//! ```

use crate::host::{HostField, TypeDecl};
use crate::providers::NoDocs;
use crate::traits::{DocProvider, EnumProvider};
use heck::{ToLowerCamelCase, ToSnakeCase, ToUpperCamelCase};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// Translates a host type's name into the target declaration name.
pub type TypeNamer = Arc<dyn Fn(&TypeDecl) -> String + Send + Sync>;

/// Names an anonymous struct after the field it appears in.
pub type AnonStructNamer = Arc<dyn Fn(&HostField) -> String + Send + Sync>;

/// Comparison between two names.
pub type NameComparator = Arc<dyn Fn(&str, &str) -> Ordering + Send + Sync>;

/// Error raised when a configuration is inconsistent.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("name_anon_structs is enabled but no anonymous struct namer was given")]
    MissingAnonStructNamer,
}

/// Casing applied to names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CaseStyle {
    /// `MyType` (default)
    #[default]
    UpperCamel,
    /// `myType`
    LowerCamel,
    /// `my_type`
    Snake,
    /// Keep the host spelling.
    Preserve,
}

impl CaseStyle {
    pub fn apply(self, name: &str) -> String {
        match self {
            CaseStyle::UpperCamel => name.to_upper_camel_case(),
            CaseStyle::LowerCamel => name.to_lower_camel_case(),
            CaseStyle::Snake => name.to_snake_case(),
            CaseStyle::Preserve => name.to_string(),
        }
    }

    /// A type namer applying this casing to the declaration name.
    pub fn type_namer(self) -> TypeNamer {
        Arc::new(move |decl: &TypeDecl| self.apply(&decl.name))
    }

    /// An anonymous struct namer applying this casing to the field name.
    pub fn field_namer(self) -> AnonStructNamer {
        Arc::new(move |field: &HostField| self.apply(&field.name))
    }
}

/// Order of declarations, members and enum members.
#[derive(Clone, Default)]
pub enum SortOrder {
    /// Order in which the extractor discovered things.
    #[default]
    Discovery,
    /// Byte-wise ascending by name.
    Alphabetical,
    /// Caller-supplied total order on names.
    Custom(NameComparator),
}

impl SortOrder {
    pub fn custom(cmp: impl Fn(&str, &str) -> Ordering + Send + Sync + 'static) -> Self {
        SortOrder::Custom(Arc::new(cmp))
    }

    /// Sort `items` by the names `key` returns. A no-op for discovery order.
    pub fn sort_by_name<T>(&self, items: &mut [T], key: impl Fn(&T) -> &str) {
        match self {
            SortOrder::Discovery => {}
            SortOrder::Alphabetical => items.sort_by(|a, b| key(a).cmp(key(b))),
            SortOrder::Custom(cmp) => items.sort_by(|a, b| cmp(key(a), key(b))),
        }
    }
}

impl fmt::Debug for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Discovery => f.write_str("Discovery"),
            SortOrder::Alphabetical => f.write_str("Alphabetical"),
            SortOrder::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Immutable set of extraction policies.
#[derive(Clone)]
pub struct ExtractConfig {
    embed_structs: bool,
    follow_structs: bool,
    anon_struct_namer: Option<AnonStructNamer>,
    type_namer: TypeNamer,
    sort: SortOrder,
    enums: Option<Arc<dyn EnumProvider>>,
    docs: Arc<dyn DocProvider>,
    preserve_param_names: bool,
}

impl ExtractConfig {
    pub fn builder() -> ExtractConfigBuilder {
        ExtractConfigBuilder::default()
    }

    /// Inline nested structs as anonymous interfaces.
    pub fn embed_structs(&self) -> bool {
        self.embed_structs
    }

    /// Extract named nested structs as declarations of their own.
    /// Always true when [`embed_structs`](Self::embed_structs) is.
    pub fn follow_structs(&self) -> bool {
        self.follow_structs || self.embed_structs
    }

    /// Namer for anonymous structs; `Some` exactly when anonymous structs
    /// are promoted to declarations.
    pub fn anon_struct_namer(&self) -> Option<&AnonStructNamer> {
        self.anon_struct_namer.as_ref()
    }

    pub fn type_name(&self, decl: &TypeDecl) -> String {
        (self.type_namer)(decl)
    }

    pub fn sort(&self) -> &SortOrder {
        &self.sort
    }

    pub fn enums(&self) -> Option<&dyn EnumProvider> {
        self.enums.as_deref()
    }

    pub fn docs(&self) -> &dyn DocProvider {
        self.docs.as_ref()
    }

    pub fn preserve_param_names(&self) -> bool {
        self.preserve_param_names
    }
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            embed_structs: false,
            follow_structs: false,
            anon_struct_namer: None,
            type_namer: CaseStyle::default().type_namer(),
            sort: SortOrder::default(),
            enums: None,
            docs: Arc::new(NoDocs),
            preserve_param_names: false,
        }
    }
}

impl fmt::Debug for ExtractConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractConfig")
            .field("embed_structs", &self.embed_structs)
            .field("follow_structs", &self.follow_structs())
            .field("name_anon_structs", &self.anon_struct_namer.is_some())
            .field("sort", &self.sort)
            .field("enums", &self.enums.is_some())
            .field("preserve_param_names", &self.preserve_param_names)
            .finish_non_exhaustive()
    }
}

/// Builder for [`ExtractConfig`].
#[derive(Default)]
pub struct ExtractConfigBuilder {
    embed_structs: bool,
    follow_structs: bool,
    name_anon_structs: bool,
    anon_struct_namer: Option<AnonStructNamer>,
    type_namer: Option<TypeNamer>,
    sort: SortOrder,
    enums: Option<Arc<dyn EnumProvider>>,
    docs: Option<Arc<dyn DocProvider>>,
    preserve_param_names: bool,
}

impl ExtractConfigBuilder {
    /// Produce one monolithic declaration: every nested struct is inlined.
    pub fn embed_structs(mut self, on: bool) -> Self {
        self.embed_structs = on;
        self
    }

    /// Extract referenced named structs transitively.
    pub fn follow_structs(mut self, on: bool) -> Self {
        self.follow_structs = on;
        self
    }

    /// Promote anonymous structs to declarations. Requires a namer.
    pub fn name_anon_structs(mut self, on: bool) -> Self {
        self.name_anon_structs = on;
        self
    }

    pub fn anon_struct_namer(
        mut self,
        namer: impl Fn(&HostField) -> String + Send + Sync + 'static,
    ) -> Self {
        self.anon_struct_namer = Some(Arc::new(namer));
        self
    }

    /// Shorthand for `name_anon_structs(true).anon_struct_namer(namer)`.
    pub fn name_anon_structs_with(
        self,
        namer: impl Fn(&HostField) -> String + Send + Sync + 'static,
    ) -> Self {
        self.name_anon_structs(true).anon_struct_namer(namer)
    }

    pub fn type_namer(mut self, namer: impl Fn(&TypeDecl) -> String + Send + Sync + 'static) -> Self {
        self.type_namer = Some(Arc::new(namer));
        self
    }

    pub fn type_naming(mut self, style: CaseStyle) -> Self {
        self.type_namer = Some(style.type_namer());
        self
    }

    pub fn sort(mut self, order: SortOrder) -> Self {
        self.sort = order;
        self
    }

    pub fn sort_alphabetically(self) -> Self {
        self.sort(SortOrder::Alphabetical)
    }

    pub fn enums(mut self, provider: impl EnumProvider + 'static) -> Self {
        self.enums = Some(Arc::new(provider));
        self
    }

    pub fn docs(mut self, provider: impl DocProvider + 'static) -> Self {
        self.docs = Some(Arc::new(provider));
        self
    }

    /// Use real parameter names when the descriptor has them, instead of
    /// `arg0`, `arg1`, ...
    pub fn preserve_param_names(mut self, on: bool) -> Self {
        self.preserve_param_names = on;
        self
    }

    pub fn build(self) -> Result<ExtractConfig, ConfigError> {
        let anon_struct_namer = match (self.name_anon_structs, self.anon_struct_namer) {
            (true, Some(namer)) => Some(namer),
            (true, None) => return Err(ConfigError::MissingAnonStructNamer),
            (false, _) => None,
        };
        let defaults = ExtractConfig::default();
        Ok(ExtractConfig {
            embed_structs: self.embed_structs,
            follow_structs: self.follow_structs || self.embed_structs,
            anon_struct_namer,
            type_namer: self.type_namer.unwrap_or(defaults.type_namer),
            sort: self.sort,
            enums: self.enums,
            docs: self.docs.unwrap_or(defaults.docs),
            preserve_param_names: self.preserve_param_names,
        })
    }
}
