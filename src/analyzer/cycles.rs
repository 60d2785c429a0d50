//! Import cycle detection.
//!
//! Depth-first search with an explicit path stack. When the walk reaches a
//! node already on the current stack, the stack slice from that node to the
//! top is one cycle, recorded at the moment of discovery. The search
//! restarts from every still-unvisited node so disconnected regions are
//! covered, and both the node order and each adjacency list are sorted so
//! the recorded cycles do not depend on input order.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::types::ComponentGraph;

/// Populate `graph.cycles`. Self-imports count as single-node cycles.
pub fn detect_cycles(graph: &mut ComponentGraph) {
    let mut adjacency: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for node in &graph.nodes {
        adjacency.entry(node.id.as_str()).or_default();
    }
    for edge in &graph.edges {
        adjacency
            .entry(edge.source.as_str())
            .or_default()
            .push(edge.target.as_str());
    }
    // The graph is a multigraph; one neighbor entry per distinct target.
    for targets in adjacency.values_mut() {
        targets.sort();
        targets.dedup();
    }

    let mut state = Walk {
        adjacency: &adjacency,
        visited: HashSet::new(),
        on_stack: HashMap::new(),
        stack: Vec::new(),
        cycles: Vec::new(),
    };
    for &id in adjacency.keys() {
        if !state.visited.contains(id) {
            state.visit(id);
        }
    }
    graph.cycles = state.cycles;
}

struct Walk<'a> {
    adjacency: &'a BTreeMap<&'a str, Vec<&'a str>>,
    visited: HashSet<&'a str>,
    /// Node id to its index in `stack`, for O(1) slice starts.
    on_stack: HashMap<&'a str, usize>,
    stack: Vec<&'a str>,
    cycles: Vec<Vec<String>>,
}

impl<'a> Walk<'a> {
    /// Iterative DFS from one root. Each frame is (node, next neighbor
    /// index); recursion would make depth equal the longest import chain,
    /// which real projects can push past the thread stack.
    fn visit(&mut self, root: &'a str) {
        let mut frames: Vec<(&'a str, usize)> = Vec::new();
        self.enter(root);
        frames.push((root, 0));

        while let Some(&(id, next)) = frames.last() {
            let targets = self
                .adjacency
                .get(id)
                .map(|v| v.as_slice())
                .unwrap_or_default();

            let Some(&target) = targets.get(next) else {
                frames.pop();
                self.stack.pop();
                self.on_stack.remove(id);
                continue;
            };
            let top = frames.len() - 1;
            frames[top].1 += 1;

            if let Some(&start) = self.on_stack.get(target) {
                let cycle = self.stack[start..].iter().map(|s| s.to_string()).collect();
                self.cycles.push(cycle);
            } else if !self.visited.contains(target) {
                self.enter(target);
                frames.push((target, 0));
            }
        }
    }

    fn enter(&mut self, id: &'a str) {
        self.visited.insert(id);
        self.on_stack.insert(id, self.stack.len());
        self.stack.push(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
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
    fn two_file_cycle_reported_exactly_once() {
        let mut graph = ComponentGraph {
            nodes: vec![node("a.ts"), node("b.ts")],
            edges: vec![edge("a.ts", "b.ts"), edge("b.ts", "a.ts")],
            ..Default::default()
        };
        detect_cycles(&mut graph);
        assert_eq!(graph.cycles.len(), 1);
        assert_eq!(graph.cycles[0], vec![node_id_for("a.ts"), node_id_for("b.ts")]);
    }

    #[test]
    fn cycle_count_is_input_order_independent() {
        let mut forward = ComponentGraph {
            nodes: vec![node("a.ts"), node("b.ts")],
            edges: vec![edge("a.ts", "b.ts"), edge("b.ts", "a.ts")],
            ..Default::default()
        };
        let mut backward = ComponentGraph {
            nodes: vec![node("b.ts"), node("a.ts")],
            edges: vec![edge("b.ts", "a.ts"), edge("a.ts", "b.ts")],
            ..Default::default()
        };
        detect_cycles(&mut forward);
        detect_cycles(&mut backward);
        assert_eq!(forward.cycles, backward.cycles);
    }

    #[test]
    fn self_import_is_a_single_node_cycle() {
        let mut graph = ComponentGraph {
            nodes: vec![node("loop.ts")],
            edges: vec![edge("loop.ts", "loop.ts")],
            ..Default::default()
        };
        detect_cycles(&mut graph);
        assert_eq!(graph.cycles, vec![vec![node_id_for("loop.ts")]]);
    }

    #[test]
    fn acyclic_graph_reports_nothing() {
        let mut graph = ComponentGraph {
            nodes: vec![node("a.ts"), node("b.ts"), node("c.ts")],
            edges: vec![edge("a.ts", "b.ts"), edge("a.ts", "c.ts"), edge("b.ts", "c.ts")],
            ..Default::default()
        };
        detect_cycles(&mut graph);
        assert!(graph.cycles.is_empty());
    }

    #[test]
    fn disconnected_cycle_is_still_found() {
        let mut graph = ComponentGraph {
            nodes: vec![node("main.ts"), node("x.ts"), node("y.ts"), node("z.ts")],
            edges: vec![
                edge("x.ts", "y.ts"),
                edge("y.ts", "z.ts"),
                edge("z.ts", "x.ts"),
            ],
            ..Default::default()
        };
        detect_cycles(&mut graph);
        assert_eq!(graph.cycles.len(), 1);
        assert_eq!(graph.cycles[0].len(), 3);
    }

    #[test]
    fn deep_import_chain_does_not_blow_the_stack() {
        // 50k-file chain closing into one cycle; depth-proportional
        // recursion would overflow long before the end.
        let count = 50_000;
        let paths: Vec<String> = (0..count).map(|i| format!("m{i:05}.ts")).collect();
        let mut graph = ComponentGraph {
            nodes: paths.iter().map(|p| node(p)).collect(),
            edges: (0..count)
                .map(|i| edge(&paths[i], &paths[(i + 1) % count]))
                .collect(),
            ..Default::default()
        };
        detect_cycles(&mut graph);
        assert_eq!(graph.cycles.len(), 1);
        assert_eq!(graph.cycles[0].len(), count);
    }

    #[test]
    fn three_node_cycle_with_chord_reports_both_loops() {
        // a -> b -> c -> a and b -> a: two distinct back edges, two cycles.
        let mut graph = ComponentGraph {
            nodes: vec![node("a.ts"), node("b.ts"), node("c.ts")],
            edges: vec![
                edge("a.ts", "b.ts"),
                edge("b.ts", "c.ts"),
                edge("c.ts", "a.ts"),
                edge("b.ts", "a.ts"),
            ],
            ..Default::default()
        };
        detect_cycles(&mut graph);
        assert_eq!(graph.cycles.len(), 2);
    }
}
