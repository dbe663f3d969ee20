//! Configuration file for typebridge.
//!
//! Loaded from `typebridge.toml` in the working directory, or from the path
//! given with `--config`. Command-line flags override file values.
//!
//! Example typebridge.toml:
//! ```toml
//! [extract]
//! follow_structs = true
//! type_naming = "upper-camel"
//! sort = "alphabetical"
//! enums = true
//!
//! [render]
//! namespace = "api"
//! enums_as_sum_types = true
//! ```

use crate::cli::{Cli, SortKey};
use anyhow::Context;
use serde::Deserialize;
use std::path::Path;
use typebridge_typegen::host::HostField;
use typebridge_typegen::{
    CaseStyle, ConfigError, DeclaredDocs, DeclaredEnums, ExtractConfig, RenderOptions, SortOrder,
};

/// File looked up in the working directory when `--config` is not given.
pub const CONFIG_FILE: &str = "typebridge.toml";

/// How anonymous structs are named when `name_anon_structs` is on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnonStructNaming {
    /// The field name as written.
    #[default]
    Field,
    /// The field name in UpperCamelCase.
    UpperCamel,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortSetting {
    #[default]
    Discovery,
    Alphabetical,
}

/// `[extract]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ExtractSection {
    pub follow_structs: bool,
    pub embed_structs: bool,
    pub name_anon_structs: bool,
    pub anon_struct_naming: AnonStructNaming,
    pub type_naming: CaseStyle,
    pub sort: SortSetting,
    /// Use the `enum` annotations of the descriptors.
    pub enums: bool,
    /// Use the `docs` annotations of the descriptors.
    pub docs: bool,
    pub preserve_param_names: bool,
}

/// `[render]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RenderSection {
    pub namespace: Option<String>,
    /// Replaces the generated banner.
    pub preamble: Option<String>,
    pub additional_preamble: Option<String>,
    pub enums_as_sum_types: bool,
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TypebridgeConfig {
    pub extract: ExtractSection,
    pub render: RenderSection,
}

impl TypebridgeConfig {
    /// Load the configuration.
    ///
    /// An explicit path must exist. Without one, `typebridge.toml` in `dir`
    /// is used when present and defaults otherwise.
    pub fn load(explicit: Option<&Path>, dir: &Path) -> anyhow::Result<Self> {
        if let Some(path) = explicit {
            return Self::load_file(path);
        }
        let path = dir.join(CONFIG_FILE);
        if path.is_file() {
            Self::load_file(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load a single config file.
    pub fn load_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config = toml::from_str(&content)
            .with_context(|| format!("invalid config {}", path.display()))?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Apply command-line overrides. Flags only switch options on or set
    /// values; they never switch a file setting off.
    pub fn apply_args(&mut self, cli: &Cli) {
        let extract = &mut self.extract;
        extract.follow_structs |= cli.follow_structs;
        extract.embed_structs |= cli.embed_structs;
        extract.name_anon_structs |= cli.name_anon_structs;
        extract.enums |= cli.enums;
        extract.docs |= cli.docs;
        extract.preserve_param_names |= cli.preserve_param_names;
        if let Some(naming) = cli.type_naming {
            extract.type_naming = naming.into();
        }
        match cli.sort {
            Some(SortKey::Discovery) => extract.sort = SortSetting::Discovery,
            Some(SortKey::Alphabetical) => extract.sort = SortSetting::Alphabetical,
            None => {}
        }

        let render = &mut self.render;
        render.enums_as_sum_types |= cli.enums_as_sum_types;
        if cli.namespace.is_some() {
            render.namespace.clone_from(&cli.namespace);
        }
        if cli.preamble.is_some() {
            render.preamble.clone_from(&cli.preamble);
        }
        if cli.additional_preamble.is_some() {
            render.additional_preamble.clone_from(&cli.additional_preamble);
        }
    }

    pub fn extract_config(&self) -> Result<ExtractConfig, ConfigError> {
        let section = &self.extract;
        let mut builder = ExtractConfig::builder()
            .follow_structs(section.follow_structs)
            .embed_structs(section.embed_structs)
            .type_naming(section.type_naming)
            .preserve_param_names(section.preserve_param_names);

        if section.name_anon_structs {
            builder = match section.anon_struct_naming {
                AnonStructNaming::Field => {
                    builder.name_anon_structs_with(|field: &HostField| field.name.clone())
                }
                AnonStructNaming::UpperCamel => builder.name_anon_structs_with(|field: &HostField| {
                    CaseStyle::UpperCamel.apply(&field.name)
                }),
            };
        }
        if section.sort == SortSetting::Alphabetical {
            builder = builder.sort(SortOrder::Alphabetical);
        }
        if section.enums {
            builder = builder.enums(DeclaredEnums);
        }
        if section.docs {
            builder = builder.docs(DeclaredDocs);
        }
        builder.build()
    }

    pub fn render_options(&self) -> RenderOptions {
        let section = &self.render;
        let mut options = RenderOptions::default().enums_as_sum_types(section.enums_as_sum_types);
        if let Some(namespace) = &section.namespace {
            options = options.with_namespace(namespace.as_str());
        }
        if let Some(preamble) = &section.preamble {
            options = options.with_preamble(with_newline(preamble));
        }
        if let Some(extra) = &section.additional_preamble {
            options = options.append_preamble(&with_newline(extra));
        }
        options
    }
}

fn with_newline(text: &str) -> String {
    if text.is_empty() || text.ends_with('\n') {
        text.to_string()
    } else {
        format!("{}\n", text)
    }
}
