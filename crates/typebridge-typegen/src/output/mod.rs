//! Output backends.
//!
//! Only TypeScript declarations for now.

pub mod typescript;

pub use typescript::{
    RenderError, RenderOptions, collapse_blank_lines, default_preamble, render, render_to_string,
};
