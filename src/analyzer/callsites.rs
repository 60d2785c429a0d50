//! Outbound API call-site scanning.
//!
//! Text-level scan for request calls whose first argument is a string
//! literal that looks like an API path. Three families are recognized:
//! `fetch(...)`, `axios.get(...)` and friends, and generic client objects
//! (`api.get(...)`, `apiClient.post(...)`, `http.delete(...)`). Template
//! literals are kept verbatim; interpolated `${...}` holes are matched
//! against dynamic route segments later.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;

use crate::types::{Reference, ScannedFile};

fn fetch_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"\bfetch\s*\(\s*['"`](/?api/[^'"`]+)['"`]"#).expect("static regex")
    })
}

fn axios_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r#"\baxios(?:\.(?:get|post|put|patch|delete|head|options|request))?\s*\(\s*['"`](/?api/[^'"`]+)['"`]"#,
        )
        .expect("static regex")
    })
}

fn client_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r#"\b(?:api|apiClient|client|http)\.(?:get|post|put|patch|delete|head|options)\s*\(\s*['"`](/?api/[^'"`]+)['"`]"#,
        )
        .expect("static regex")
    })
}

/// Collect candidate references from every analyzable file outside the
/// route-handler set. A handler mentioning its own path (or a sibling's)
/// is declaration noise, not usage evidence.
pub fn scan_call_sites(files: &[ScannedFile], route_files: &HashSet<String>) -> Vec<Reference> {
    let mut references = Vec::new();
    for file in files {
        if !file.is_analyzable() || route_files.contains(&file.relative) {
            continue;
        }
        let Some(content) = &file.content else { continue };
        for (line_idx, line) in content.lines().enumerate() {
            scan_line(file, line_idx, line, &mut references);
        }
    }
    references.sort_by(|a, b| {
        a.file
            .cmp(&b.file)
            .then(a.line.cmp(&b.line))
            .then(a.column.cmp(&b.column))
    });
    references
}

fn scan_line(file: &ScannedFile, line_idx: usize, line: &str, out: &mut Vec<Reference>) {
    for re in [fetch_re(), axios_re(), client_re()] {
        for cap in re.captures_iter(line) {
            let whole = cap.get(0).expect("group 0 always present");
            let path = cap.get(1).expect("pattern has one capture group");
            out.push(Reference {
                file: file.relative.clone(),
                line: line_idx + 1,
                column: whole.start() + 1,
                context: line.trim().to_string(),
                candidate_path: path.as_str().to_string(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn file(relative: &str, content: &str) -> ScannedFile {
        let extension = relative.rsplit('.').next().unwrap_or("").to_string();
        ScannedFile {
            path: PathBuf::from(format!("/project/{relative}")),
            relative: relative.to_string(),
            size: content.len() as u64,
            extension,
            is_typed: true,
            supports_markup: false,
            content: Some(content.to_string()),
        }
    }

    #[test]
    fn fetch_calls_are_captured_with_position() {
        let f = file(
            "components/UserList.tsx",
            "export async function load() {\n  const res = await fetch('/api/users');\n  return res.json();\n}",
        );
        let refs = scan_call_sites(&[f], &HashSet::new());
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].candidate_path, "/api/users");
        assert_eq!(refs[0].line, 2);
        assert!(refs[0].context.contains("fetch('/api/users')"));
    }

    #[test]
    fn axios_and_generic_clients_are_captured() {
        let f = file(
            "lib/requests.ts",
            "axios.post('/api/orders', body);\napi.get('api/items');\nhttp.delete('/api/items/3');",
        );
        let refs = scan_call_sites(&[f], &HashSet::new());
        let paths: Vec<&str> = refs.iter().map(|r| r.candidate_path.as_str()).collect();
        assert_eq!(paths, vec!["/api/orders", "api/items", "/api/items/3"]);
    }

    #[test]
    fn template_literals_keep_their_holes() {
        let f = file(
            "lib/users.ts",
            "const get = (id) => fetch(`/api/users/${id}`);",
        );
        let refs = scan_call_sites(&[f], &HashSet::new());
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].candidate_path, "/api/users/${id}");
    }

    #[test]
    fn non_api_literals_are_ignored() {
        let f = file(
            "lib/misc.ts",
            "fetch('https://example.com/data');\nconst s = '/api/users';\napi.get(url);",
        );
        let refs = scan_call_sites(&[f], &HashSet::new());
        assert!(refs.is_empty());
    }

    #[test]
    fn route_handler_files_are_not_scanned() {
        let handler = file(
            "app/api/users/route.ts",
            "export async function GET() { return fetch('/api/users/refresh'); }",
        );
        let route_files: HashSet<String> = ["app/api/users/route.ts".to_string()].into();
        let refs = scan_call_sites(&[handler], &route_files);
        assert!(refs.is_empty());
    }

    #[test]
    fn output_is_sorted_by_file_then_position() {
        let b = file("b.ts", "fetch('/api/two');");
        let a = file("a.ts", "fetch('/api/one');");
        let refs = scan_call_sites(&[b, a], &HashSet::new());
        assert_eq!(refs[0].file, "a.ts");
        assert_eq!(refs[1].file, "b.ts");
    }
}
