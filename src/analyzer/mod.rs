//! Analysis pipeline: locate, parse, link, classify.

pub mod aliases;
pub mod ast_js;
pub mod callsites;
pub mod cycles;
pub mod endpoints;
pub mod graph;
pub mod reachability;
pub mod resolve;
pub mod routes;

use std::collections::HashMap;

use tracing::info;

use crate::config::AnalyzerConfig;
use crate::error::Result;
use crate::locator;
use crate::types::{
    AnalysisReport, ComponentGraph, FileClassification, FileReport, GraphStats, ScannedFile,
};

use aliases::AliasTable;

/// Run the whole pipeline. The only fatal fault is an unreadable project
/// root; every other failure is downgraded to a warning on the report.
pub fn run_analysis(cfg: &AnalyzerConfig) -> Result<AnalysisReport> {
    let mut warnings = Vec::new();

    let files = locator::scan_project(cfg, &mut warnings)?;
    info!(files = files.len(), root = %cfg.root.display(), "project scanned");

    let aliases = AliasTable::load(&cfg.root, &mut warnings);

    let mut graph = graph::build_graph(&files, &aliases, cfg, &mut warnings);
    reachability::mark_reachability(&mut graph, cfg);
    cycles::detect_cycles(&mut graph);
    info!(
        nodes = graph.nodes.len(),
        edges = graph.edges.len(),
        orphans = graph.orphans.len(),
        cycles = graph.cycles.len(),
        "graph built"
    );

    let mut endpoints = routes::extract_endpoints(&files, &graph, cfg.router);
    let route_files: std::collections::HashSet<String> =
        endpoints.iter().map(|e| e.file.clone()).collect();
    let references = callsites::scan_call_sites(&files, &route_files);
    endpoints::match_endpoints(&mut endpoints, &references, &cfg.confidence);
    info!(endpoints = endpoints.len(), call_sites = references.len(), "endpoints matched");

    let file_reports = classify_files(&files, &graph, cfg);
    let stats = GraphStats {
        nodes: graph.nodes.len(),
        edges: graph.edges.len(),
        cycles: graph.cycles.len(),
        orphans: graph.orphans.len(),
        entry_points: graph.entry_points.len(),
    };

    Ok(AnalysisReport {
        graph,
        files: file_reports,
        endpoints,
        warnings,
        stats,
    })
}

/// One report per scanned file, in scan (path) order. Files outside the
/// module graph are never called unused; absence of evidence about them is
/// stated, not guessed over.
fn classify_files(
    files: &[ScannedFile],
    graph: &ComponentGraph,
    cfg: &AnalyzerConfig,
) -> Vec<FileReport> {
    let by_path: HashMap<&str, &crate::types::ComponentNode> =
        graph.nodes.iter().map(|n| (n.path.as_str(), n)).collect();
    let orphan_ids: std::collections::HashSet<&str> =
        graph.orphans.iter().map(|s| s.as_str()).collect();
    let knobs = &cfg.confidence;

    files
        .iter()
        .map(|file| {
            let Some(node) = by_path.get(file.relative.as_str()) else {
                let reason = if file.is_analyzable() {
                    "file could not be parsed"
                } else {
                    "not part of the module graph"
                };
                return FileReport {
                    path: file.relative.clone(),
                    role: None,
                    import_count: 0,
                    export_count: 0,
                    classification: FileClassification::UntrackedForUsageAnalysis,
                    confidence: 0,
                    reasons: vec![reason.to_string()],
                    size: file.size,
                };
            };

            let (classification, confidence, reason) = if orphan_ids.contains(node.id.as_str()) {
                (
                    FileClassification::Unused,
                    knobs.orphan_file,
                    "unreachable from any entry point".to_string(),
                )
            } else {
                (
                    FileClassification::Active,
                    knobs.reachable_file,
                    "reachable from an entry point".to_string(),
                )
            };

            FileReport {
                path: file.relative.clone(),
                role: Some(node.role),
                import_count: node.imports.len(),
                export_count: node.exports.len(),
                classification,
                confidence,
                reasons: vec![reason],
                size: file.size,
            }
        })
        .collect()
}
