//! Command-line arguments.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use typebridge_typegen::CaseStyle;

/// Generate TypeScript declarations from host type descriptors
#[derive(Debug, Parser)]
#[command(name = "typebridge", version)]
pub struct Cli {
    /// Descriptor file (.json or .toml)
    pub descriptors: PathBuf,

    /// Root declaration to extract (repeatable)
    #[arg(short, long = "root", value_name = "NAME", required = true)]
    pub roots: Vec<String>,

    /// Output file (stdout if not specified)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// What to emit
    #[arg(long, value_enum, default_value = "ts")]
    pub emit: Emit,

    /// Config file (defaults to ./typebridge.toml when present)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Declare referenced named structs too
    #[arg(long)]
    pub follow_structs: bool,

    /// Inline every nested struct
    #[arg(long)]
    pub embed_structs: bool,

    /// Declare anonymous structs, named after their field
    #[arg(long)]
    pub name_anon_structs: bool,

    /// Order of declarations and members
    #[arg(long, value_enum)]
    pub sort: Option<SortKey>,

    /// Casing of declaration names
    #[arg(long, value_enum)]
    pub type_naming: Option<TypeNaming>,

    /// Treat types with an `enum` annotation as enumerations
    #[arg(long)]
    pub enums: bool,

    /// Attach `docs` annotations as comments
    #[arg(long)]
    pub docs: bool,

    /// Use parameter names from the descriptors instead of arg0, arg1, ...
    #[arg(long)]
    pub preserve_param_names: bool,

    /// Wrap declarations in this namespace
    #[arg(long)]
    pub namespace: Option<String>,

    /// Replace the generated banner
    #[arg(long, value_name = "TEXT")]
    pub preamble: Option<String>,

    /// Text appended to the preamble
    #[arg(long, value_name = "TEXT")]
    pub additional_preamble: Option<String>,

    /// Render enums as unions of their values
    #[arg(long)]
    pub enums_as_sum_types: bool,

    /// Log extraction details to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Emit {
    /// TypeScript declarations
    Ts,
    /// The extracted type graph as JSON
    Ir,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortKey {
    /// Order of discovery
    Discovery,
    /// Ascending by name
    Alphabetical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TypeNaming {
    UpperCamel,
    LowerCamel,
    Snake,
    Preserve,
}

impl From<TypeNaming> for CaseStyle {
    fn from(naming: TypeNaming) -> Self {
        match naming {
            TypeNaming::UpperCamel => CaseStyle::UpperCamel,
            TypeNaming::LowerCamel => CaseStyle::LowerCamel,
            TypeNaming::Snake => CaseStyle::Snake,
            TypeNaming::Preserve => CaseStyle::Preserve,
        }
    }
}
