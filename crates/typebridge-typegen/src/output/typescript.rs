//! TypeScript declaration renderer.
//!
//! Emits the extracted type graph as TypeScript declarations.

use crate::ir::{EnumNode, InterfaceNode, Member, TypeNode, quote};
use std::io::Write;

/// Rendering options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Wrap every declaration in `export namespace <name> { ... }`.
    pub namespace: Option<String>,
    /// Text emitted before any declaration.
    pub preamble: String,
    /// Render enums as unions of their literal values instead of `enum` blocks.
    pub enums_as_sum_types: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            namespace: None,
            preamble: default_preamble(),
            enums_as_sum_types: false,
        }
    }
}

impl RenderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Replace the preamble.
    pub fn with_preamble(mut self, preamble: impl Into<String>) -> Self {
        self.preamble = preamble.into();
        self
    }

    /// Append to the current preamble.
    pub fn append_preamble(mut self, text: &str) -> Self {
        self.preamble.push_str(text);
        self
    }

    pub fn enums_as_sum_types(mut self, on: bool) -> Self {
        self.enums_as_sum_types = on;
        self
    }
}

/// The banner used when no preamble is given.
pub fn default_preamble() -> String {
    format!(
        "// generated by typebridge v{}\n// DO NOT MODIFY\n",
        env!("CARGO_PKG_VERSION")
    )
}

/// Reasons rendering fails.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("{kind} needs {expected} type parameter(s), found {found}")]
    InvalidParamCount {
        kind: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("cannot render a {kind} node as a top-level declaration")]
    UnsupportedRoot { kind: &'static str },

    #[error("failed to write declarations")]
    Write(#[from] std::io::Error),
}

/// Render `types` to `out`.
///
/// The whole text is built and cleaned up in memory first, so `out` either
/// receives complete output or nothing.
pub fn render(
    types: &[TypeNode],
    options: &RenderOptions,
    out: &mut impl Write,
) -> Result<(), RenderError> {
    let text = render_to_string(types, options)?;
    out.write_all(text.as_bytes())?;
    out.flush()?;
    Ok(())
}

/// Render `types` to a string.
pub fn render_to_string(types: &[TypeNode], options: &RenderOptions) -> Result<String, RenderError> {
    let mut writer = TypeScriptWriter::new(options);
    writer.write_file(types)?;
    Ok(collapse_blank_lines(&writer.output))
}

/// Collapse runs of blank lines into one and drop leading and trailing
/// blank lines. The result ends with a single newline unless empty.
pub fn collapse_blank_lines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_blank = false;
    for line in text.lines() {
        if line.trim().is_empty() {
            pending_blank = !out.is_empty();
            continue;
        }
        if pending_blank {
            out.push('\n');
            pending_blank = false;
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

/// Emits type graph nodes as TypeScript.
struct TypeScriptWriter<'o> {
    options: &'o RenderOptions,
    output: String,
    indent: usize,
}

impl<'o> TypeScriptWriter<'o> {
    fn new(options: &'o RenderOptions) -> Self {
        Self {
            options,
            output: String::new(),
            indent: 0,
        }
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent {
            self.output.push_str("    ");
        }
    }

    fn write_file(&mut self, types: &[TypeNode]) -> Result<(), RenderError> {
        self.output.push_str(&self.options.preamble);
        self.output.push_str("\n\n");

        let namespace = self.options.namespace.as_deref();
        if let Some(ns) = namespace {
            self.output.push_str("export namespace ");
            self.output.push_str(ns);
            self.output.push_str(" {\n");
            self.indent += 1;
        }

        for (i, node) in types.iter().enumerate() {
            if i > 0 {
                self.output.push('\n');
            }
            self.write_root(node)?;
            self.output.push('\n');
        }

        if namespace.is_some() {
            self.indent -= 1;
            self.output.push_str("}\n");
        }
        Ok(())
    }

    fn write_root(&mut self, node: &TypeNode) -> Result<(), RenderError> {
        match node {
            TypeNode::Interface(iface) if !iface.name.is_empty() => self.write_interface_decl(iface),
            TypeNode::Enum(e) if self.options.enums_as_sum_types => {
                self.write_sum_type(e);
                Ok(())
            }
            TypeNode::Enum(e) => {
                self.write_enum(e);
                Ok(())
            }
            TypeNode::Interface(_) => Err(RenderError::UnsupportedRoot {
                kind: "anonymous interface",
            }),
            other => Err(RenderError::UnsupportedRoot { kind: other.kind() }),
        }
    }

    fn write_comment(&mut self, comment: Option<&str>) {
        let Some(comment) = comment else {
            return;
        };
        self.write_indent();
        self.output.push_str("/**\n");
        for line in comment.lines() {
            self.write_indent();
            self.output.push_str(" *");
            if !line.trim().is_empty() {
                self.output.push(' ');
                self.output.push_str(line.trim_end());
            }
            self.output.push('\n');
        }
        self.write_indent();
        self.output.push_str(" */\n");
    }

    fn write_interface_decl(&mut self, iface: &InterfaceNode) -> Result<(), RenderError> {
        self.write_comment(iface.comment.as_deref());
        self.write_indent();
        self.output.push_str("export interface ");
        self.output.push_str(&iface.name);
        self.output.push(' ');
        self.write_block(&iface.members)
    }

    fn write_enum(&mut self, e: &EnumNode) {
        self.write_comment(e.comment.as_deref());
        self.write_indent();
        self.output.push_str("export enum ");
        self.output.push_str(&e.name);
        if e.members.is_empty() {
            self.output.push_str(" {}");
            return;
        }
        self.output.push_str(" {\n");
        self.indent += 1;
        for member in &e.members {
            self.write_indent();
            self.write_member_name(&member.name);
            self.output.push_str(" = ");
            self.output.push_str(&member.value);
            self.output.push_str(",\n");
        }
        self.indent -= 1;
        self.write_indent();
        self.output.push('}');
    }

    fn write_sum_type(&mut self, e: &EnumNode) {
        self.write_comment(e.comment.as_deref());
        self.write_indent();
        self.output.push_str("export type ");
        self.output.push_str(&e.name);
        self.output.push_str(" = ");
        if e.members.is_empty() {
            self.output.push_str("never");
        }
        for (i, member) in e.members.iter().enumerate() {
            if i > 0 {
                self.output.push_str(" | ");
            }
            self.output.push_str(&member.value);
        }
        self.output.push(';');
    }

    /// `{ ... }` with one member per line, closing brace at the current
    /// indentation.
    fn write_block(&mut self, members: &[Member]) -> Result<(), RenderError> {
        if members.is_empty() {
            self.output.push_str("{}");
            return Ok(());
        }
        self.output.push_str("{\n");
        self.indent += 1;
        for member in members {
            self.write_member(member)?;
        }
        self.indent -= 1;
        self.write_indent();
        self.output.push('}');
        Ok(())
    }

    fn write_member(&mut self, member: &Member) -> Result<(), RenderError> {
        self.write_comment(member.comment.as_deref());
        self.write_indent();
        self.write_member_name(&member.name);
        if member.optional {
            self.output.push('?');
        }
        if member.function {
            self.output.push('(');
            for (i, arg) in member.args.iter().enumerate() {
                if i > 0 {
                    self.output.push_str(", ");
                }
                self.output.push_str(&arg.name);
                self.output.push_str(": ");
                self.write_type(&arg.ty)?;
            }
            self.output.push(')');
        }
        self.output.push_str(": ");
        self.write_type(&member.ty)?;
        self.output.push_str(";\n");
        Ok(())
    }

    fn write_member_name(&mut self, name: &str) {
        if is_valid_identifier(name) {
            self.output.push_str(name);
        } else {
            self.output.push_str(&quote(name));
        }
    }

    fn write_type(&mut self, node: &TypeNode) -> Result<(), RenderError> {
        match node {
            TypeNode::Simple { name } => self.output.push_str(name),
            TypeNode::Void => self.output.push_str("void"),
            TypeNode::Array { params } => {
                let [elem] = params.as_slice() else {
                    return Err(RenderError::InvalidParamCount {
                        kind: "array",
                        expected: 1,
                        found: params.len(),
                    });
                };
                self.write_type(elem)?;
                self.output.push_str("[]");
            }
            TypeNode::Map { params } => {
                let [key, value] = params.as_slice() else {
                    return Err(RenderError::InvalidParamCount {
                        kind: "map",
                        expected: 2,
                        found: params.len(),
                    });
                };
                self.output.push_str("{ [key: ");
                self.write_type(key)?;
                self.output.push_str("]: ");
                self.write_type(value)?;
                self.output.push_str(" }");
            }
            TypeNode::Interface(iface) => self.write_block(&iface.members)?,
            // Enums are declared at the root and referenced by name.
            TypeNode::Enum(e) => self.output.push_str(&e.name),
        }
        Ok(())
    }
}

fn is_valid_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !first.is_alphabetic() && first != '_' && first != '$' {
        return false;
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}
