//! Alias resolver backed by the project's compiler-options file
//! (`tsconfig.json`, falling back to `jsconfig.json`).
//!
//! `baseUrl` + `paths` flatten into an ordered table of
//! (alias prefix, candidate base directories), sorted by prefix length
//! descending so a more specific alias always wins over a shorter
//! overlapping one. A missing or malformed file yields an empty table,
//! never an error.

use std::path::Path;

use serde_json::Value;
use tracing::warn;

#[derive(Clone, Debug)]
pub struct AliasEntry {
    /// Alias prefix with the wildcard stripped, e.g. `@/` for `@/*`.
    pub prefix: String,
    /// Candidate base directories (project-relative, forward slashes),
    /// tried in declaration order.
    pub bases: Vec<String>,
}

#[derive(Clone, Debug, Default)]
pub struct AliasTable {
    entries: Vec<AliasEntry>,
}

impl AliasTable {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[AliasEntry] {
        &self.entries
    }

    /// Build a table from explicit (prefix, bases) pairs. Used by callers
    /// that precompute the alias list, and by tests.
    pub fn from_entries(pairs: Vec<(String, Vec<String>)>) -> Self {
        let mut entries: Vec<AliasEntry> = pairs
            .into_iter()
            .map(|(prefix, bases)| AliasEntry { prefix, bases })
            .collect();
        // Longest prefix first; ties broken lexically for determinism.
        entries.sort_by(|a, b| {
            b.prefix
                .len()
                .cmp(&a.prefix.len())
                .then_with(|| a.prefix.cmp(&b.prefix))
        });
        Self { entries }
    }

    /// Load from the project's compiler-options file if present.
    pub fn load(root: &Path, warnings: &mut Vec<String>) -> Self {
        let config_path = ["tsconfig.json", "jsconfig.json"]
            .iter()
            .map(|name| root.join(name))
            .find(|p| p.exists());
        let Some(config_path) = config_path else {
            return Self::empty();
        };

        let Some(json) = load_config_recursive(&config_path, 0) else {
            let msg = format!(
                "malformed compiler options in {}, alias table disabled",
                config_path.display()
            );
            warn!("{msg}");
            warnings.push(msg);
            return Self::empty();
        };

        let compiler = json
            .get("compilerOptions")
            .and_then(|v| v.as_object())
            .cloned()
            .unwrap_or_default();
        let base_url = compiler
            .get("baseUrl")
            .and_then(|v| v.as_str())
            .unwrap_or(".")
            .trim_start_matches("./")
            .trim_end_matches('/')
            .to_string();

        let mut pairs = Vec::new();
        if let Some(paths) = compiler.get("paths").and_then(|p| p.as_object()) {
            for (alias, targets) in paths {
                let bases: Vec<String> = targets
                    .as_array()
                    .into_iter()
                    .flat_map(|arr| arr.iter())
                    .filter_map(|v| v.as_str())
                    .map(|t| join_base(&base_url, t))
                    .collect();
                if bases.is_empty() {
                    continue;
                }
                let prefix = alias.replace('\\', "/").replace('*', "");
                pairs.push((prefix, bases));
            }
        }
        Self::from_entries(pairs)
    }

    /// All candidate resolutions for a specifier, longest alias prefix
    /// first, preserving per-alias target order.
    pub fn candidates(&self, specifier: &str) -> Vec<String> {
        let mut out = Vec::new();
        for entry in &self.entries {
            let Some(remainder) = specifier.strip_prefix(entry.prefix.as_str()) else {
                continue;
            };
            // An extensionless alias only matches at a path-segment
            // boundary: `@utils` covers `@utils` and `@utils/x`, never
            // `@utils-extra`.
            if !entry.prefix.ends_with('/')
                && !remainder.is_empty()
                && !remainder.starts_with('/')
            {
                continue;
            }
            let remainder = remainder.trim_start_matches('/');
            for base in &entry.bases {
                if remainder.is_empty() {
                    out.push(base.clone());
                } else if base.is_empty() {
                    out.push(remainder.to_string());
                } else {
                    out.push(format!("{}/{}", base.trim_end_matches('/'), remainder));
                }
            }
        }
        out
    }
}

/// Join `baseUrl` and a `paths` target, stripping the wildcard tail.
fn join_base(base_url: &str, target: &str) -> String {
    let target = target
        .replace('\\', "/")
        .trim_start_matches("./")
        .trim_end_matches('*')
        .trim_end_matches('/')
        .to_string();
    if base_url.is_empty() || base_url == "." {
        target
    } else if target.is_empty() {
        base_url.to_string()
    } else {
        format!("{base_url}/{target}")
    }
}

/// Parse a compiler-options file, tolerating JSON5 constructs (comments,
/// trailing commas) the way real tsconfig files are written.
fn parse_config_value(content: &str) -> Option<Value> {
    if let Ok(v) = serde_json::from_str(content) {
        return Some(v);
    }
    if let Ok(v) = json_five::from_str::<Value>(content) {
        return Some(v);
    }
    None
}

/// Load a config file, merging its `extends` chain (child overrides
/// parent, `paths` keys merged individually). Depth-capped against
/// accidental extends loops.
fn load_config_recursive(path: &Path, depth: usize) -> Option<Value> {
    if depth > 8 {
        return None;
    }
    let content = std::fs::read_to_string(path).ok()?;
    let mut current = parse_config_value(&content)?;

    if let Some(ext) = current.get("extends").and_then(|v| v.as_str()) {
        let base_path = if Path::new(ext).is_absolute() {
            Path::new(ext).to_path_buf()
        } else {
            path.parent()
                .map(|p| p.join(ext))
                .unwrap_or_else(|| Path::new(ext).to_path_buf())
        };
        if base_path.exists() {
            if let Some(parent) = load_config_recursive(&base_path, depth + 1) {
                let parent_co = parent
                    .get("compilerOptions")
                    .and_then(|v| v.as_object())
                    .cloned()
                    .unwrap_or_default();
                let child_co = current
                    .get("compilerOptions")
                    .and_then(|v| v.as_object())
                    .cloned()
                    .unwrap_or_default();
                let mut merged = parent_co.clone();
                for (k, v) in &child_co {
                    if k == "paths" {
                        let mut combined = parent_co
                            .get("paths")
                            .and_then(|v| v.as_object())
                            .cloned()
                            .unwrap_or_default();
                        if let Some(child_paths) = v.as_object() {
                            for (alias, targets) in child_paths {
                                combined.insert(alias.clone(), targets.clone());
                            }
                        }
                        merged.insert(k.clone(), Value::Object(combined));
                    } else {
                        merged.insert(k.clone(), v.clone());
                    }
                }
                current["compilerOptions"] = Value::Object(merged);
            }
        }
    }

    Some(current)
}
