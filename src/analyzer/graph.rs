//! Two-phase component graph construction.
//!
//! Phase 1 parses every analyzable file into a node; no edges exist yet, so
//! forward references and import cycles cannot confuse construction. Phase 2
//! resolves every import of every node against the completed node set and
//! emits one edge per bound name. An unresolved import produces no edge.

use std::collections::HashSet;
use std::sync::Mutex;
use std::thread;

use tracing::debug;

use crate::config::AnalyzerConfig;
use crate::types::{
    node_id_for, ComponentGraph, ComponentNode, ComponentRole, DependencyEdge, EdgeKind,
    ImportInfo, ScannedFile,
};

use super::aliases::AliasTable;
use super::ast_js::extract_syntax;
use super::resolve::{FileIndex, ModuleResolver};

/// Build the full graph from the locator's file set. Parse failures are
/// downgraded to warnings; the file simply contributes no node.
pub fn build_graph(
    files: &[ScannedFile],
    aliases: &AliasTable,
    cfg: &AnalyzerConfig,
    warnings: &mut Vec<String>,
) -> ComponentGraph {
    let mut graph = ComponentGraph::default();
    graph.nodes = parse_nodes(files, cfg, warnings);

    let index = FileIndex::from_files(files);
    let resolver = ModuleResolver::new(aliases, &index);
    let node_paths: HashSet<&str> = graph.nodes.iter().map(|n| n.path.as_str()).collect();

    for node in &graph.nodes {
        for import in &node.imports {
            let Some(target_path) = resolver.resolve(&import.specifier, &node.path) else {
                debug!(from = %node.path, specifier = %import.specifier, "unresolved import");
                continue;
            };
            // Resolved to a tracked file that is not a graph node (css,
            // json): the dependency exists but carries no analyzable code.
            if !node_paths.contains(target_path.as_str()) {
                continue;
            }
            let target = node_id_for(&target_path);
            push_edges(&mut graph.edges, &node.id, &target, import);
        }
    }

    graph
}

/// Phase 1: parse files into nodes on a bounded worker pool. Workers take
/// disjoint chunks and return their nodes; the merged set is sorted by path
/// so the result is independent of scheduling.
fn parse_nodes(
    files: &[ScannedFile],
    cfg: &AnalyzerConfig,
    warnings: &mut Vec<String>,
) -> Vec<ComponentNode> {
    let analyzable: Vec<&ScannedFile> = files.iter().filter(|f| f.is_analyzable()).collect();
    if analyzable.is_empty() {
        return Vec::new();
    }

    let workers = cfg.parse_workers.max(1);
    let chunk_size = analyzable.len().div_ceil(workers);
    let collected: Mutex<Vec<ComponentNode>> = Mutex::new(Vec::new());
    let skipped: Mutex<Vec<String>> = Mutex::new(Vec::new());

    thread::scope(|s| {
        let handles: Vec<_> = analyzable
            .chunks(chunk_size)
            .map(|chunk| {
                s.spawn(move || {
                    let mut nodes = Vec::new();
                    let mut failed = Vec::new();
                    for file in chunk {
                        match parse_node(file) {
                            Some(node) => nodes.push(node),
                            None => failed.push(file.relative.clone()),
                        }
                    }
                    (nodes, failed)
                })
            })
            .collect();

        for handle in handles {
            if let Ok((nodes, failed)) = handle.join() {
                collected.lock().unwrap().extend(nodes);
                skipped.lock().unwrap().extend(failed);
            }
        }
    });

    let mut skipped = skipped.into_inner().unwrap();
    skipped.sort();
    for path in skipped {
        warnings.push(format!("parse failed, file skipped: {path}"));
    }

    let mut nodes = collected.into_inner().unwrap();
    nodes.sort_by(|a, b| a.path.cmp(&b.path));
    nodes
}

fn parse_node(file: &ScannedFile) -> Option<ComponentNode> {
    let content = file.content.as_deref()?;
    let syntax = extract_syntax(content, &file.path)?;
    let name = component_name(&file.relative);
    Some(ComponentNode {
        id: node_id_for(&file.relative),
        path: file.relative.clone(),
        name,
        role: classify_role(&file.relative, file.supports_markup),
        exports: syntax.exports,
        imports: syntax.imports,
        has_server_directive: syntax.has_server_directive,
    })
}

/// Phase 2 edge emission: one edge per imported name, `*` for namespace,
/// whole-module and side-effect imports.
fn push_edges(edges: &mut Vec<DependencyEdge>, source: &str, target: &str, import: &ImportInfo) {
    let kind = if import.is_lazy {
        EdgeKind::Lazy
    } else if import.is_dynamic {
        EdgeKind::Dynamic
    } else {
        EdgeKind::Static
    };

    if import.names.is_empty() {
        edges.push(DependencyEdge {
            source: source.to_string(),
            target: target.to_string(),
            kind,
            binding: "*".to_string(),
            type_only: false,
        });
        return;
    }

    for name in &import.names {
        edges.push(DependencyEdge {
            source: source.to_string(),
            target: target.to_string(),
            kind,
            binding: name.name.clone(),
            type_only: name.type_only,
        });
    }
}

fn file_stem(relative: &str) -> &str {
    let file = relative.rsplit('/').next().unwrap_or(relative);
    match file.find('.') {
        Some(idx) => &file[..idx],
        None => file,
    }
}

fn component_name(relative: &str) -> String {
    let stem = file_stem(relative);
    if stem == "index" {
        // Index files take their directory's name.
        let mut parts = relative.rsplit('/');
        parts.next();
        if let Some(dir) = parts.next() {
            return dir.to_string();
        }
    }
    stem.to_string()
}

/// Role from filename and path convention. Checked in order of specificity;
/// the first match wins.
fn classify_role(relative: &str, supports_markup: bool) -> ComponentRole {
    let stem = file_stem(relative);
    let in_pages_api = relative.starts_with("pages/api/") || relative.starts_with("src/pages/api/");
    let in_pages = relative.starts_with("pages/") || relative.starts_with("src/pages/");

    if in_pages_api || stem == "route" {
        return ComponentRole::RouteHandler;
    }
    match stem {
        "page" => return ComponentRole::RoutePage,
        "layout" | "template" => return ComponentRole::Layout,
        "loading" => return ComponentRole::Loading,
        "error" | "global-error" => return ComponentRole::Error,
        "not-found" => return ComponentRole::NotFound,
        _ => {}
    }
    if in_pages {
        return ComponentRole::RoutePage;
    }
    if stem.starts_with("use") && stem.chars().nth(3).is_some_and(|c| c.is_ascii_uppercase()) {
        return ComponentRole::Hook;
    }
    if stem.contains(".config") || relative.ends_with(".config.ts") || relative.ends_with(".config.js") || relative.ends_with(".config.mjs") {
        return ComponentRole::Config;
    }
    if supports_markup && stem.chars().next().is_some_and(|c| c.is_ascii_uppercase()) {
        return ComponentRole::GenericComponent;
    }
    ComponentRole::Utility
}
