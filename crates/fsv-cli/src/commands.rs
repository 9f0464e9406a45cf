use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{bail, Context};
use colored::Colorize;
use fsv_content::PropertyValue;
use fsv_mapper::{FileVaultMapper, MapperConfig, Resource, ResourceKind};
use serde::Serialize;

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let mapper = build_mapper(&cli)?;
    let format = cli.format;
    match cli.command {
        Command::Resolve(args) => cmd_resolve(&mapper, &args.path, format),
        Command::Ls(args) => cmd_ls(&mapper, &args.path, format),
        Command::Tree(args) => cmd_tree(&mapper, &args.path, args.depth, format),
        Command::Show(args) => cmd_show(&mapper, &args.path, format),
    }
}

/// `--config` first, then `--root` / `--filter` override it.
fn build_mapper(cli: &Cli) -> anyhow::Result<FileVaultMapper> {
    let mut config = match &cli.config {
        Some(file) => MapperConfig::load(file)
            .with_context(|| format!("loading config {}", file.display()))?,
        None => MapperConfig::default(),
    };
    if let Some(root) = &cli.root {
        config.provider_root = root.clone();
    }
    if let Some(filter) = &cli.filter {
        config.filter_xml = Some(filter.clone());
    }
    FileVaultMapper::from_config(&config)
        .with_context(|| format!("opening {}", config.provider_root.display()))
}

#[derive(Debug, Serialize)]
struct ResourceView {
    path: String,
    name: String,
    kind: ResourceKind,
    file: PathBuf,
    resource_type: Option<String>,
}

impl From<&Resource> for ResourceView {
    fn from(resource: &Resource) -> Self {
        Self {
            path: resource.path().to_string(),
            name: resource.name().to_string(),
            kind: resource.kind(),
            file: resource.file().to_path_buf(),
            resource_type: resource.resource_type().map(str::to_string),
        }
    }
}

#[derive(Debug, Serialize)]
struct TreeNode {
    #[serde(flatten)]
    resource: ResourceView,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    children: Vec<TreeNode>,
}

#[derive(Debug, Serialize)]
struct PropertiesView {
    path: String,
    kind: ResourceKind,
    resource_type: Option<String>,
    properties: BTreeMap<String, PropertyValue>,
}

fn resolve_or_fail(mapper: &FileVaultMapper, path: &str) -> anyhow::Result<Resource> {
    match mapper.resolve(path) {
        Some(resource) => Ok(resource),
        None => bail!("no resource at {path}"),
    }
}

fn list_children(mapper: &FileVaultMapper, path: &str) -> anyhow::Result<Vec<Resource>> {
    let children = mapper
        .children(path)
        .with_context(|| format!("listing {path}"))?;
    Ok(children.map(|c| c.collect()).unwrap_or_default())
}

fn build_tree(
    mapper: &FileVaultMapper,
    resource: &Resource,
    depth: Option<usize>,
) -> anyhow::Result<TreeNode> {
    let children = match depth {
        Some(0) => Vec::new(),
        _ => list_children(mapper, resource.path())?
            .iter()
            .map(|child| build_tree(mapper, child, depth.map(|d| d - 1)))
            .collect::<anyhow::Result<_>>()?,
    };
    Ok(TreeNode {
        resource: ResourceView::from(resource),
        children,
    })
}

fn styled_name(view: &ResourceView) -> String {
    match view.kind {
        ResourceKind::Directory => format!("{}/", view.name).blue().bold().to_string(),
        ResourceKind::Content => view.name.cyan().to_string(),
        ResourceKind::File => view.name.clone(),
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn cmd_resolve(mapper: &FileVaultMapper, path: &str, format: OutputFormat) -> anyhow::Result<()> {
    let view = ResourceView::from(&resolve_or_fail(mapper, path)?);
    match format {
        OutputFormat::Json => print_json(&view),
        OutputFormat::Text => {
            println!("{} {}", view.path.bold(), format!("({})", view.kind).dimmed());
            println!("  File: {}", view.file.display());
            if let Some(resource_type) = &view.resource_type {
                println!("  Type: {}", resource_type.yellow());
            }
            Ok(())
        }
    }
}

fn cmd_ls(mapper: &FileVaultMapper, path: &str, format: OutputFormat) -> anyhow::Result<()> {
    resolve_or_fail(mapper, path)?;
    let views: Vec<ResourceView> = list_children(mapper, path)?
        .iter()
        .map(ResourceView::from)
        .collect();
    match format {
        OutputFormat::Json => print_json(&views),
        OutputFormat::Text => {
            if views.is_empty() {
                println!("{}", "No children.".dimmed());
            }
            for view in &views {
                println!("  {:<10} {}", view.kind.to_string().dimmed(), styled_name(view));
            }
            Ok(())
        }
    }
}

fn cmd_tree(
    mapper: &FileVaultMapper,
    path: &str,
    depth: Option<usize>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let root = resolve_or_fail(mapper, path)?;
    let tree = build_tree(mapper, &root, depth)?;
    match format {
        OutputFormat::Json => print_json(&tree),
        OutputFormat::Text => {
            println!("{}", tree.resource.path.bold());
            print_tree(&tree.children, 1);
            Ok(())
        }
    }
}

fn print_tree(nodes: &[TreeNode], level: usize) {
    for node in nodes {
        println!("{}{}", "  ".repeat(level), styled_name(&node.resource));
        print_tree(&node.children, level + 1);
    }
}

fn cmd_show(mapper: &FileVaultMapper, path: &str, format: OutputFormat) -> anyhow::Result<()> {
    let resource = resolve_or_fail(mapper, path)?;
    let view = PropertiesView {
        path: resource.path().to_string(),
        kind: resource.kind(),
        resource_type: resource.resource_type().map(str::to_string),
        properties: resource.properties(),
    };
    match format {
        OutputFormat::Json => print_json(&view),
        OutputFormat::Text => {
            println!("{} {}", view.path.bold(), format!("({})", view.kind).dimmed());
            if view.properties.is_empty() {
                println!("  {}", "No properties.".dimmed());
            }
            for (name, value) in &view.properties {
                println!("  {} = {}", name.green(), serde_json::to_string(value)?);
            }
            Ok(())
        }
    }
}
