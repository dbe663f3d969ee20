//! typebridge command-line tool.
//!
//! Loads a descriptor file, extracts the requested roots with
//! `typebridge-typegen` and writes TypeScript declarations (or the type graph
//! as JSON).

pub mod cli;
pub mod config;

use anyhow::Context;
use cli::{Cli, Emit};
use config::TypebridgeConfig;
use indexmap::IndexMap;
use std::io::Write;
use std::path::Path;
use typebridge_typegen::{
    ExtractConfig, HostModule, RenderOptions, TypeNode, extract_named, render_to_string,
};

/// Load a descriptor file. `.toml` files are read as TOML, anything else
/// as JSON.
pub fn load_descriptors(path: &Path) -> anyhow::Result<HostModule> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read descriptors {}", path.display()))?;
    let module: HostModule = match path.extension().and_then(|e| e.to_str()) {
        Some("toml") => toml::from_str(&content)
            .with_context(|| format!("invalid descriptors {}", path.display()))?,
        _ => serde_json::from_str(&content)
            .with_context(|| format!("invalid descriptors {}", path.display()))?,
    };
    tracing::debug!(
        path = %path.display(),
        types = module.types.len(),
        "loaded descriptors"
    );
    Ok(module)
}

/// Extract each root and merge the results by name. A later root's
/// declaration replaces an earlier one with the same name.
pub fn extract_roots(
    module: &HostModule,
    roots: &[String],
    config: &ExtractConfig,
) -> anyhow::Result<Vec<TypeNode>> {
    let mut merged: IndexMap<String, TypeNode> = IndexMap::new();
    for root in roots {
        let graph = extract_named(module, root, config)
            .with_context(|| format!("failed to extract {}", root))?;
        for node in graph {
            merged.insert(node.name().to_string(), node);
        }
    }
    let mut nodes: Vec<TypeNode> = merged.into_values().collect();
    config.sort().sort_by_name(&mut nodes, TypeNode::name);
    Ok(nodes)
}

/// Run the tool. Returns the process exit code.
pub fn run(cli: Cli) -> i32 {
    match try_run(&cli) {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            1
        }
    }
}

fn try_run(cli: &Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir().context("failed to read working directory")?;
    let mut config = TypebridgeConfig::load(cli.config.as_deref(), &cwd)?;
    config.apply_args(cli);

    let extract_config = config.extract_config()?;
    let module = load_descriptors(&cli.descriptors)?;
    let graph = extract_roots(&module, &cli.roots, &extract_config)?;

    write_output(&graph, cli.emit, &config.render_options(), cli.output.as_deref())
}

/// Render `graph` in the requested form and write it to `output`, or to
/// stdout when no path is given. Nothing is written unless rendering
/// succeeds.
pub fn write_output(
    graph: &[TypeNode],
    emit: Emit,
    options: &RenderOptions,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let text = match emit {
        Emit::Ts => render_to_string(graph, options)?,
        Emit::Ir => {
            let mut json = serde_json::to_string_pretty(graph)?;
            json.push('\n');
            json
        }
    };

    match output {
        Some(path) => {
            std::fs::write(path, &text)
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), declarations = graph.len(), "wrote output");
        }
        None => {
            let mut out = std::io::stdout().lock();
            out.write_all(text.as_bytes())?;
            out.flush()?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use typebridge_typegen::Member;
    use typebridge_typegen::host::{HostField, HostType, TypeDecl};

    fn module() -> HostModule {
        HostModule::new()
            .with(TypeDecl::new(
                "Shared",
                HostType::structure(vec![HostField::new("Id", HostType::String)]),
            ))
            .with(TypeDecl::new(
                "User",
                HostType::structure(vec![HostField::new("Ref", HostType::named("Shared"))]),
            ))
            .with(TypeDecl::new(
                "Group",
                HostType::structure(vec![HostField::new(
                    "Members",
                    HostType::slice(HostType::named("Shared")),
                )]),
            ))
    }

    #[test]
    fn merges_roots_by_name() {
        let config = ExtractConfig::builder().follow_structs(true).build().unwrap();
        let graph = extract_roots(
            &module(),
            &["User".to_string(), "Group".to_string()],
            &config,
        )
        .unwrap();

        let names: Vec<&str> = graph.iter().map(TypeNode::name).collect();
        assert_eq!(names, ["Shared", "User", "Group"]);
        assert_eq!(
            graph[0],
            TypeNode::interface("Shared", vec![Member::field("Id", TypeNode::string())])
        );
    }

    #[test]
    fn merged_roots_respect_sort() {
        let config = ExtractConfig::builder()
            .follow_structs(true)
            .sort_alphabetically()
            .build()
            .unwrap();
        let graph = extract_roots(
            &module(),
            &["User".to_string(), "Group".to_string()],
            &config,
        )
        .unwrap();

        let names: Vec<&str> = graph.iter().map(TypeNode::name).collect();
        assert_eq!(names, ["Group", "Shared", "User"]);
    }

    #[test]
    fn unknown_root_has_context() {
        let err = extract_roots(&module(), &["Nope".to_string()], &ExtractConfig::default())
            .unwrap_err();
        assert!(format!("{:#}", err).contains("failed to extract Nope"));
    }

    #[test]
    fn failed_render_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.ts");
        let err = write_output(&[TypeNode::Void], Emit::Ts, &RenderOptions::new(), Some(&path))
            .unwrap_err();
        assert!(format!("{:#}", err).contains("top-level declaration"));
        assert!(!path.exists());
    }

    #[test]
    fn writes_ir_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.json");
        let graph = vec![TypeNode::interface("A", vec![])];
        write_output(&graph, Emit::Ir, &RenderOptions::new(), Some(&path)).unwrap();

        let written: Vec<TypeNode> =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, graph);
    }

    #[test]
    fn toml_descriptors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("types.toml");
        std::fs::write(
            &path,
            r#"
package = "example.com/api"

[[types]]
name = "Point"

[types.type]
kind = "struct"

[[types.type.fields]]
name = "X"
type = { kind = "float" }

[[types.type.fields]]
name = "Y"
type = { kind = "float", bits = 32 }
"#,
        )
        .unwrap();

        let module = load_descriptors(&path).unwrap();
        assert_eq!(module.types.len(), 1);
        assert_eq!(module.types[0].name, "Point");
    }
}
