//! API endpoint extraction from routing conventions.
//!
//! App router: any `route.*` file under `app/` (or `src/app/`) declares one
//! endpoint; the route path is the directory chain below the router root,
//! with parenthesized group segments dropped and `[param]` segments kept
//! verbatim. Verbs come from the handler's exported names.
//!
//! Pages router: any file under `pages/api/` (or `src/pages/api/`) declares
//! one endpoint; the route path is the file path with the extension
//! stripped and a trailing `/index` removed. Verbs come from `req.method`
//! comparisons inside the handler body.
//!
//! Either way an endpoint with no detected verb defaults to `GET`.

use std::sync::OnceLock;

use regex::Regex;

use crate::config::RouterMode;
use crate::types::{
    ApiEndpoint, ComponentGraph, EndpointUsage, ScannedFile, HTTP_VERBS, SCRIPT_EXTENSIONS,
};

fn method_compare_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"\.method\s*[=!]==?\s*['"](GET|POST|PUT|PATCH|DELETE|HEAD|OPTIONS)['"]"#)
            .expect("static regex")
    })
}

/// Extract every declared endpoint. Usage starts as `Unused` with zero
/// confidence; the matcher fills both in later.
pub fn extract_endpoints(
    files: &[ScannedFile],
    graph: &ComponentGraph,
    router: RouterMode,
) -> Vec<ApiEndpoint> {
    let mut endpoints = Vec::new();
    for file in files {
        if !file.is_analyzable() {
            continue;
        }
        let declared = match router {
            RouterMode::App => app_route(&file.relative),
            RouterMode::Pages => pages_route(&file.relative),
            RouterMode::Mixed => app_route(&file.relative).or_else(|| pages_route(&file.relative)),
        };
        let Some(route) = declared else { continue };

        let verbs = detect_verbs(file, graph);
        let dynamic_segments = dynamic_segment_names(&route);
        let has_server_directive = graph
            .node_by_path(&file.relative)
            .is_some_and(|n| n.has_server_directive);

        endpoints.push(ApiEndpoint {
            route,
            file: file.relative.clone(),
            verbs,
            references: Vec::new(),
            dynamic_segments,
            usage: EndpointUsage::Unused,
            confidence: 0,
            reasons: Vec::new(),
            has_server_directive,
        });
    }
    endpoints.sort_by(|a, b| a.route.cmp(&b.route).then_with(|| a.file.cmp(&b.file)));
    endpoints
}

/// `app/api/users/[id]/route.ts` -> `/api/users/[id]`.
fn app_route(relative: &str) -> Option<String> {
    let below = strip_router_root(relative, "app/")?;
    let (dirs, filename) = split_filename(below);
    if !is_route_file(filename) {
        return None;
    }
    let segments: Vec<&str> = dirs
        .split('/')
        .filter(|s| !s.is_empty() && !(s.starts_with('(') && s.ends_with(')')))
        .collect();
    Some(format!("/{}", segments.join("/")))
}

/// `pages/api/users/[id].ts` -> `/api/users/[id]`,
/// `pages/api/users/index.ts` -> `/api/users`.
fn pages_route(relative: &str) -> Option<String> {
    let below = strip_router_root(relative, "pages/")?;
    if !below.starts_with("api/") && below != "api" {
        return None;
    }
    let stem = strip_script_extension(below)?;
    let stem = stem.strip_suffix("/index").unwrap_or(stem);
    Some(format!("/{stem}"))
}

fn strip_router_root<'a>(relative: &'a str, root: &str) -> Option<&'a str> {
    relative
        .strip_prefix(root)
        .or_else(|| relative.strip_prefix("src/").and_then(|r| r.strip_prefix(root)))
}

fn split_filename(path: &str) -> (&str, &str) {
    match path.rfind('/') {
        Some(idx) => (&path[..idx], &path[idx + 1..]),
        None => ("", path),
    }
}

fn is_route_file(filename: &str) -> bool {
    let Some(stem) = filename.strip_suffix_any(&SCRIPT_EXTENSIONS) else {
        return false;
    };
    stem == "route"
}

fn strip_script_extension(path: &str) -> Option<&str> {
    path.strip_suffix_any(&SCRIPT_EXTENSIONS)
}

trait StripSuffixAny {
    /// Strip `.{ext}` for the first matching extension.
    fn strip_suffix_any<'a>(&'a self, exts: &[&str]) -> Option<&'a str>;
}

impl StripSuffixAny for str {
    fn strip_suffix_any<'a>(&'a self, exts: &[&str]) -> Option<&'a str> {
        for ext in exts {
            if let Some(stem) = self.strip_suffix(ext).and_then(|s| s.strip_suffix('.')) {
                return Some(stem);
            }
        }
        None
    }
}

/// Verbs for one handler file. App-style handlers export verb-named
/// functions; pages-style handlers branch on `req.method`. Both signals are
/// checked regardless of router mode so mixed projects work, and `GET` is
/// the fallback when neither says anything.
fn detect_verbs(file: &ScannedFile, graph: &ComponentGraph) -> Vec<String> {
    let mut verbs: Vec<String> = Vec::new();

    if let Some(node) = graph.node_by_path(&file.relative) {
        for export in &node.exports {
            if HTTP_VERBS.contains(&export.name.as_str()) && !verbs.contains(&export.name) {
                verbs.push(export.name.clone());
            }
        }
    }

    if verbs.is_empty() {
        if let Some(content) = &file.content {
            for cap in method_compare_re().captures_iter(content) {
                let verb = cap[1].to_string();
                if !verbs.contains(&verb) {
                    verbs.push(verb);
                }
            }
        }
    }

    if verbs.is_empty() {
        verbs.push("GET".to_string());
    }
    verbs.sort();
    verbs
}

/// `[id]` -> `id`, `[...slug]` -> `slug`, `[[...slug]]` -> `slug`.
fn dynamic_segment_names(route: &str) -> Vec<String> {
    route
        .split('/')
        .filter(|s| s.starts_with('[') && s.ends_with(']'))
        .map(|s| {
            s.trim_matches(|c| c == '[' || c == ']')
                .trim_start_matches("...")
                .to_string()
        })
        .collect()
}
