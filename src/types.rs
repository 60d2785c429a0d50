use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Extensions the syntax extractor can parse, in probe order.
pub const SCRIPT_EXTENSIONS: [&str; 6] = ["tsx", "ts", "jsx", "js", "mjs", "cjs"];

/// Index filenames probed when a specifier resolves to a directory.
pub const INDEX_FILES: [&str; 4] = ["index.tsx", "index.ts", "index.jsx", "index.js"];

/// HTTP verbs a route handler may export.
pub const HTTP_VERBS: [&str; 7] = ["GET", "POST", "PUT", "PATCH", "DELETE", "HEAD", "OPTIONS"];

/// A file discovered under the project root. Created once by the source
/// locator and never mutated afterwards.
#[derive(Clone, Debug)]
pub struct ScannedFile {
    /// Absolute path on disk.
    pub path: PathBuf,
    /// Project-relative path with forward slashes.
    pub relative: String,
    pub size: u64,
    pub extension: String,
    /// TypeScript family (`ts`/`tsx`).
    pub is_typed: bool,
    /// May contain JSX markup (`tsx`/`jsx`).
    pub supports_markup: bool,
    /// Loaded only for source-like extensions; binary assets carry size only.
    pub content: Option<String>,
}

impl ScannedFile {
    /// Whether the syntax extractor can turn this file into a graph node.
    pub fn is_analyzable(&self) -> bool {
        SCRIPT_EXTENSIONS.contains(&self.extension.as_str())
    }
}

/// Structural role of a file, derived from filename and path convention.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ComponentRole {
    RoutePage,
    Layout,
    Loading,
    Error,
    NotFound,
    Hook,
    Config,
    Utility,
    GenericComponent,
    RouteHandler,
}

/// One imported binding: `{ name as alias }`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ImportedName {
    pub name: String,
    pub alias: Option<String>,
    pub type_only: bool,
}

/// One import declaration (or dynamic/lazy import call) in a file.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ImportInfo {
    /// Raw specifier as written in source.
    pub specifier: String,
    pub names: Vec<ImportedName>,
    pub is_dynamic: bool,
    pub is_lazy: bool,
}

impl ImportInfo {
    pub fn new(specifier: String) -> Self {
        Self {
            specifier,
            names: Vec::new(),
            is_dynamic: false,
            is_lazy: false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportKind {
    Named,
    Default,
}

/// One exported binding. Default exports are always named `default` so they
/// match `import X from './file'` on the consuming side.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExportInfo {
    pub name: String,
    pub kind: ExportKind,
    pub type_only: bool,
}

impl ExportInfo {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ExportKind::Named,
            type_only: false,
        }
    }

    pub fn default_export() -> Self {
        Self {
            name: "default".to_string(),
            kind: ExportKind::Default,
            type_only: false,
        }
    }
}

/// One node per analyzable file. Ids are derived from the project-relative
/// path and are stable across runs for an unchanged file set.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ComponentNode {
    pub id: String,
    /// Project-relative path with forward slashes.
    pub path: String,
    pub name: String,
    pub role: ComponentRole,
    pub exports: Vec<ExportInfo>,
    pub imports: Vec<ImportInfo>,
    /// File begins with a `"use server"` directive.
    pub has_server_directive: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    Static,
    Dynamic,
    Lazy,
}

/// One edge per resolved imported binding. The graph is a multigraph:
/// importing three names from the same file yields three edges.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DependencyEdge {
    pub source: String,
    pub target: String,
    pub kind: EdgeKind,
    /// The specific imported binding (`*` for namespace/whole-module edges).
    pub binding: String,
    /// The binding is a type-only import. The edge still counts for
    /// reachability; deleting a file only types depend on breaks the build.
    pub type_only: bool,
}

/// The completed module graph. Immutable after construction.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ComponentGraph {
    pub nodes: Vec<ComponentNode>,
    pub edges: Vec<DependencyEdge>,
    /// Import cycles as node-id sequences, one per discovery.
    pub cycles: Vec<Vec<String>>,
    /// Node ids unreachable from any entry point and not auto-invoked.
    pub orphans: Vec<String>,
    /// Node ids seeded into reachability.
    pub entry_points: Vec<String>,
}

impl ComponentGraph {
    pub fn node_by_id(&self, id: &str) -> Option<&ComponentNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn node_by_path(&self, path: &str) -> Option<&ComponentNode> {
        self.nodes.iter().find(|n| n.path == path)
    }
}

/// A candidate call site: a string literal that looks like an API path,
/// passed to an outbound request call.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Reference {
    pub file: String,
    pub line: usize,
    pub column: usize,
    /// The full source line, trimmed.
    pub context: String,
    /// The candidate route path extracted from the line.
    pub candidate_path: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndpointUsage {
    Active,
    Unused,
}

/// A declared backend route and the evidence of its usage.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ApiEndpoint {
    /// Normalized route path: single leading slash, `[param]` segments
    /// preserved verbatim from the source convention.
    pub route: String,
    /// Project-relative path of the declaring handler file.
    pub file: String,
    pub verbs: Vec<String>,
    pub references: Vec<Reference>,
    pub dynamic_segments: Vec<String>,
    pub usage: EndpointUsage,
    /// 0-100.
    pub confidence: u8,
    pub reasons: Vec<String>,
    pub has_server_directive: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FileClassification {
    Active,
    Unused,
    UntrackedForUsageAnalysis,
}

/// Per-file record handed to external reporting layers.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FileReport {
    pub path: String,
    pub role: Option<ComponentRole>,
    pub import_count: usize,
    pub export_count: usize,
    pub classification: FileClassification,
    /// 0-100.
    pub confidence: u8,
    pub reasons: Vec<String>,
    pub size: u64,
}

/// Aggregate counters so callers can render a summary without re-walking
/// the graph.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct GraphStats {
    pub nodes: usize,
    pub edges: usize,
    pub cycles: usize,
    pub orphans: usize,
    pub entry_points: usize,
}

/// Everything the analyzer produces for one run.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub graph: ComponentGraph,
    pub files: Vec<FileReport>,
    pub endpoints: Vec<ApiEndpoint>,
    /// Downgraded failures: unreadable files, parse skips, malformed config.
    pub warnings: Vec<String>,
    pub stats: GraphStats,
}

/// Derive a stable node id from a project-relative path.
///
/// Every byte outside `[A-Za-z0-9]` maps to `_`; distinct paths that differ
/// only in separator/punctuation class collide, which is accepted for
/// human-legible ids (see DESIGN.md).
pub fn node_id_for(relative: &str) -> String {
    relative
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_ids_are_stable_and_path_derived() {
        assert_eq!(node_id_for("app/page.tsx"), "app_page_tsx");
        assert_eq!(
            node_id_for("components/Button.tsx"),
            node_id_for("components/Button.tsx")
        );
        assert_ne!(node_id_for("a/b.ts"), node_id_for("a/c.ts"));
    }

    #[test]
    fn analyzable_covers_script_family_only() {
        let mut f = ScannedFile {
            path: PathBuf::from("/p/app/page.tsx"),
            relative: "app/page.tsx".into(),
            size: 10,
            extension: "tsx".into(),
            is_typed: true,
            supports_markup: true,
            content: Some(String::new()),
        };
        assert!(f.is_analyzable());
        f.extension = "css".into();
        assert!(!f.is_analyzable());
    }
}
