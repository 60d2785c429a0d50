//! Entry-point seeding and reachability.
//!
//! Entry points are the union of framework-invoked files (pages, layouts,
//! route handlers, middleware) and any caller-supplied paths. A breadth-first
//! walk from those seeds marks the live set; every node outside it is an
//! orphan. An empty seed set is legitimate and makes every node an orphan.

use std::collections::{HashMap, HashSet, VecDeque};
use std::path::Path;

use tracing::debug;

use crate::config::AnalyzerConfig;
use crate::locator::is_auto_invoked;
use crate::types::ComponentGraph;

/// Populate `entry_points` and `orphans` on a built graph. Both lists come
/// out sorted so output is deterministic.
pub fn mark_reachability(graph: &mut ComponentGraph, cfg: &AnalyzerConfig) {
    let configured: HashSet<String> = cfg
        .entry_points
        .iter()
        .filter_map(|p| relative_entry(p, &cfg.root))
        .collect();

    let mut seeds: Vec<String> = Vec::new();
    for node in &graph.nodes {
        if is_auto_invoked(&node.path, cfg.router) || configured.contains(&node.path) {
            seeds.push(node.id.clone());
        }
    }
    seeds.sort();
    seeds.dedup();

    let reachable = walk_from(graph, &seeds);
    debug!(seeds = seeds.len(), reachable = reachable.len(), "reachability walk done");

    let mut orphans: Vec<String> = graph
        .nodes
        .iter()
        .filter(|n| !reachable.contains(&n.id))
        .map(|n| n.id.clone())
        .collect();
    orphans.sort();

    graph.entry_points = seeds;
    graph.orphans = orphans;
}

/// BFS over the edge list. Every edge kind counts as reachability; a lazily
/// loaded module is still live code.
fn walk_from(graph: &ComponentGraph, seeds: &[String]) -> HashSet<String> {
    let mut adjacency: HashMap<&str, Vec<&str>> = HashMap::new();
    for edge in &graph.edges {
        adjacency
            .entry(edge.source.as_str())
            .or_default()
            .push(edge.target.as_str());
    }

    let mut reachable: HashSet<String> = HashSet::new();
    let mut queue: VecDeque<&str> = VecDeque::new();
    for seed in seeds {
        if reachable.insert(seed.clone()) {
            queue.push_back(seed.as_str());
        }
    }
    while let Some(id) = queue.pop_front() {
        if let Some(targets) = adjacency.get(id) {
            for &target in targets {
                if reachable.insert(target.to_string()) {
                    queue.push_back(target);
                }
            }
        }
    }
    reachable
}

/// Caller-supplied entry paths may be absolute or project-relative; either
/// way they are compared as project-relative forward-slash paths.
fn relative_entry(path: &Path, root: &Path) -> Option<String> {
    let stripped = path.strip_prefix(root).unwrap_or(path);
    let s = stripped.to_str()?;
    Some(s.replace('\\', "/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AnalyzerConfig, RouterMode};
    use crate::types::{
        node_id_for, ComponentGraph, ComponentNode, ComponentRole, DependencyEdge, EdgeKind,
    };

    fn node(path: &str) -> ComponentNode {
        ComponentNode {
            id: node_id_for(path),
            path: path.to_string(),
            name: path.to_string(),
            role: ComponentRole::Utility,
            exports: Vec::new(),
            imports: Vec::new(),
            has_server_directive: false,
        }
    }

    fn edge(from: &str, to: &str) -> DependencyEdge {
        DependencyEdge {
            source: node_id_for(from),
            target: node_id_for(to),
            kind: EdgeKind::Static,
            binding: "*".to_string(),
            type_only: false,
        }
    }

    #[test]
    fn unreachable_nodes_become_orphans() {
        let mut graph = ComponentGraph {
            nodes: vec![
                node("app/page.tsx"),
                node("components/Used.tsx"),
                node("components/Unused.tsx"),
            ],
            edges: vec![edge("app/page.tsx", "components/Used.tsx")],
            ..Default::default()
        };
        let cfg = AnalyzerConfig::default();
        mark_reachability(&mut graph, &cfg);

        assert_eq!(graph.entry_points, vec![node_id_for("app/page.tsx")]);
        assert_eq!(graph.orphans, vec![node_id_for("components/Unused.tsx")]);
    }

    #[test]
    fn empty_entry_set_orphans_everything() {
        let mut graph = ComponentGraph {
            nodes: vec![node("lib/a.ts"), node("lib/b.ts")],
            edges: vec![edge("lib/a.ts", "lib/b.ts")],
            ..Default::default()
        };
        let cfg = AnalyzerConfig::default();
        mark_reachability(&mut graph, &cfg);

        assert!(graph.entry_points.is_empty());
        assert_eq!(graph.orphans.len(), 2);
    }

    #[test]
    fn configured_entry_points_seed_the_walk() {
        let mut graph = ComponentGraph {
            nodes: vec![node("scripts/migrate.ts"), node("lib/db.ts")],
            edges: vec![edge("scripts/migrate.ts", "lib/db.ts")],
            ..Default::default()
        };
        let mut cfg = AnalyzerConfig::default();
        cfg.entry_points = vec!["scripts/migrate.ts".into()];
        mark_reachability(&mut graph, &cfg);

        assert!(graph.orphans.is_empty());
    }

    #[test]
    fn pages_router_files_are_entry_points() {
        let mut graph = ComponentGraph {
            nodes: vec![node("pages/about.tsx")],
            edges: Vec::new(),
            ..Default::default()
        };
        let mut cfg = AnalyzerConfig::default();
        cfg.router = RouterMode::Pages;
        mark_reachability(&mut graph, &cfg);
        assert_eq!(graph.entry_points.len(), 1);
        assert!(graph.orphans.is_empty());
    }

    #[test]
    fn cycle_members_reachable_only_through_the_cycle_stay_live() {
        let mut graph = ComponentGraph {
            nodes: vec![node("app/page.tsx"), node("lib/a.ts"), node("lib/b.ts")],
            edges: vec![
                edge("app/page.tsx", "lib/a.ts"),
                edge("lib/a.ts", "lib/b.ts"),
                edge("lib/b.ts", "lib/a.ts"),
            ],
            ..Default::default()
        };
        let cfg = AnalyzerConfig::default();
        mark_reachability(&mut graph, &cfg);
        assert!(graph.orphans.is_empty());
    }
}
