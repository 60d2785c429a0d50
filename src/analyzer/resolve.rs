//! Module specifier resolution.
//!
//! Resolution consults the source locator's file index, not the live
//! filesystem, so results are independent of enumeration order and
//! testable without a real tree. Order:
//!
//! 1. Alias match, longest prefix first, each candidate base directory in
//!    declaration order, through extension probing.
//! 2. Relative specifier (`./`, `../`) against the importer's directory,
//!    through extension probing.
//! 3. Anything else is an external/untracked dependency: unresolved, and
//!    an unresolved import never produces an edge.
//!
//! Extension probing, given a base path with no confirmed extension:
//! each of `tsx, ts, jsx, js, mjs, cjs` appended in that order (first
//! match wins), then `index.{tsx,ts,jsx,js}` under the base path as a
//! directory. A base that already carries an extension and exists in the
//! index is accepted as-is. The order is fixed because it decides ties
//! when multiple candidate files could match.

use std::collections::HashSet;

use crate::types::{ScannedFile, INDEX_FILES, SCRIPT_EXTENSIONS};

use super::aliases::AliasTable;

/// The set of project-relative paths known to the source locator.
#[derive(Clone, Debug, Default)]
pub struct FileIndex {
    paths: HashSet<String>,
}

impl FileIndex {
    pub fn from_files(files: &[ScannedFile]) -> Self {
        Self {
            paths: files.iter().map(|f| f.relative.clone()).collect(),
        }
    }

    pub fn from_paths<I: IntoIterator<Item = String>>(paths: I) -> Self {
        Self {
            paths: paths.into_iter().collect(),
        }
    }

    pub fn contains(&self, relative: &str) -> bool {
        self.paths.contains(relative)
    }
}

pub struct ModuleResolver<'a> {
    aliases: &'a AliasTable,
    index: &'a FileIndex,
}

impl<'a> ModuleResolver<'a> {
    pub fn new(aliases: &'a AliasTable, index: &'a FileIndex) -> Self {
        Self { aliases, index }
    }

    /// Resolve a raw specifier from `importer` (project-relative path of
    /// the importing file). `None` is the explicit unresolved sentinel.
    pub fn resolve(&self, specifier: &str, importer: &str) -> Option<String> {
        let specifier = specifier.replace('\\', "/");

        // 1. Alias table, longest prefix first. A candidate base that
        // escapes the project root is skipped, not fatal: the remaining
        // base directories of the same alias still get their turn.
        for candidate in self.aliases.candidates(&specifier) {
            let Some(normalized) = normalize(&candidate) else {
                continue;
            };
            if let Some(hit) = self.probe(&normalized) {
                return Some(hit);
            }
        }

        // 2. Relative to the importer's directory.
        if specifier.starts_with("./") || specifier.starts_with("../") {
            let dir = match importer.rfind('/') {
                Some(idx) => &importer[..idx],
                None => "",
            };
            let joined = if dir.is_empty() {
                specifier.clone()
            } else {
                format!("{dir}/{specifier}")
            };
            let normalized = normalize(&joined)?;
            return self.probe(&normalized);
        }

        // 3. Bare specifier: external package, never guessed.
        None
    }

    /// Extension/index probing against the file index.
    fn probe(&self, base: &str) -> Option<String> {
        if base.is_empty() {
            return None;
        }

        // Already carries an extension and exists as-is.
        if has_extension(base) && self.index.contains(base) {
            return Some(base.to_string());
        }

        for ext in SCRIPT_EXTENSIONS {
            let candidate = format!("{base}.{ext}");
            if self.index.contains(&candidate) {
                return Some(candidate);
            }
        }

        for index_name in INDEX_FILES {
            let candidate = format!("{base}/{index_name}");
            if self.index.contains(&candidate) {
                return Some(candidate);
            }
        }

        None
    }
}

/// The final path segment carries a file extension.
fn has_extension(path: &str) -> bool {
    let last = path.rsplit('/').next().unwrap_or(path);
    last.rfind('.').is_some_and(|idx| idx > 0 && idx + 1 < last.len())
}

/// Lexically normalize a relative path: collapse `.` and `..` segments.
/// `None` when the path escapes the project root.
fn normalize(path: &str) -> Option<String> {
    let mut stack: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                stack.pop()?;
            }
            other => stack.push(other),
        }
    }
    Some(stack.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index(paths: &[&str]) -> FileIndex {
        FileIndex::from_paths(paths.iter().map(|s| s.to_string()))
    }

    #[test]
    fn relative_resolution_with_extension_probe() {
        let aliases = AliasTable::empty();
        let idx = index(&["app/page.tsx", "components/Button.tsx", "lib/api.ts"]);
        let resolver = ModuleResolver::new(&aliases, &idx);

        assert_eq!(
            resolver.resolve("../components/Button", "app/page.tsx"),
            Some("components/Button.tsx".to_string())
        );
        assert_eq!(
            resolver.resolve("../lib/api", "app/page.tsx"),
            Some("lib/api.ts".to_string())
        );
        assert_eq!(resolver.resolve("../missing", "app/page.tsx"), None);
    }

    #[test]
    fn probe_order_prefers_tsx_then_ts() {
        let aliases = AliasTable::empty();
        let idx = index(&["src/Thing.tsx", "src/Thing.ts"]);
        let resolver = ModuleResolver::new(&aliases, &idx);
        assert_eq!(
            resolver.resolve("./Thing", "src/main.ts"),
            Some("src/Thing.tsx".to_string())
        );
    }

    #[test]
    fn directory_falls_back_to_index_file() {
        let aliases = AliasTable::empty();
        let idx = index(&["src/utils/index.ts"]);
        let resolver = ModuleResolver::new(&aliases, &idx);
        assert_eq!(
            resolver.resolve("./utils", "src/main.ts"),
            Some("src/utils/index.ts".to_string())
        );
    }

    #[test]
    fn explicit_extension_accepted_as_is() {
        let aliases = AliasTable::empty();
        let idx = index(&["src/styles.css"]);
        let resolver = ModuleResolver::new(&aliases, &idx);
        assert_eq!(
            resolver.resolve("./styles.css", "src/main.ts"),
            Some("src/styles.css".to_string())
        );
    }

    #[test]
    fn longest_alias_prefix_wins() {
        // `@` -> src/ and `@/components` -> src/components/: the longer
        // alias's base directory must be used.
        let aliases = AliasTable::from_entries(vec![
            ("@/".into(), vec!["src".into()]),
            ("@/components/".into(), vec!["src/components".into()]),
        ]);
        let idx = index(&["src/components/Button.tsx"]);
        let resolver = ModuleResolver::new(&aliases, &idx);
        assert_eq!(
            resolver.resolve("@/components/Button", "app/page.tsx"),
            Some("src/components/Button.tsx".to_string())
        );
    }

    #[test]
    fn bare_specifiers_stay_unresolved() {
        let aliases = AliasTable::empty();
        let idx = index(&["node_modules/react/index.js"]);
        let resolver = ModuleResolver::new(&aliases, &idx);
        assert_eq!(resolver.resolve("react", "src/main.ts"), None);
        assert_eq!(resolver.resolve("lodash/merge", "src/main.ts"), None);
    }

    #[test]
    fn alias_base_outside_the_root_falls_through_to_the_next_base() {
        // Monorepo tsconfigs list sibling-package bases first; the ones
        // outside this project root must not poison the in-root bases.
        let aliases =
            AliasTable::from_entries(vec![("@/".into(), vec!["../shared".into(), "src".into()])]);
        let idx = index(&["src/lib/api.ts"]);
        let resolver = ModuleResolver::new(&aliases, &idx);
        assert_eq!(
            resolver.resolve("@/lib/api", "app/page.tsx"),
            Some("src/lib/api.ts".to_string())
        );
    }

    #[test]
    fn escaping_the_root_is_unresolved() {
        let aliases = AliasTable::empty();
        let idx = index(&["main.ts"]);
        let resolver = ModuleResolver::new(&aliases, &idx);
        assert_eq!(resolver.resolve("../../outside", "main.ts"), None);
    }

    #[test]
    fn resolution_is_independent_of_enumeration_order() {
        let aliases = AliasTable::from_entries(vec![("@/".into(), vec!["src".into()])]);
        let forward = index(&["src/a.ts", "src/b.ts", "src/c/index.ts"]);
        let backward = index(&["src/c/index.ts", "src/b.ts", "src/a.ts"]);
        for idx in [&forward, &backward] {
            let resolver = ModuleResolver::new(&aliases, idx);
            assert_eq!(resolver.resolve("@/a", "src/b.ts"), Some("src/a.ts".into()));
            assert_eq!(
                resolver.resolve("./c", "src/b.ts"),
                Some("src/c/index.ts".into())
            );
        }
    }
}
