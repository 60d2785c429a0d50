//! Source locator: enumerates and classifies files under the project root.
//!
//! Exclude patterns take precedence over include patterns. A file that
//! cannot be stat'd or read is skipped with a warning — enumeration of the
//! root itself is the only fatal failure.

use std::fs;
use std::path::Path;

use globset::{Glob, GlobSet, GlobSetBuilder};
use tracing::warn;
use walkdir::WalkDir;

use crate::config::{AnalyzerConfig, RouterMode};
use crate::error::{AnalyzeError, Result};
use crate::types::{ScannedFile, SCRIPT_EXTENSIONS};

/// Extensions whose text content is loaded. Everything else is recorded
/// with size only.
const TEXT_EXTENSIONS: [&str; 11] = [
    "ts", "tsx", "js", "jsx", "mjs", "cjs", "css", "scss", "html", "json", "svg",
];

/// Framework-special stems under an `app/`-style routed tree.
const APP_SPECIAL_STEMS: [&str; 9] = [
    "page",
    "layout",
    "loading",
    "error",
    "global-error",
    "not-found",
    "route",
    "template",
    "default",
];

fn build_globset(patterns: &[String]) -> Option<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    let mut added = false;
    for pat in patterns {
        if pat.trim().is_empty() {
            continue;
        }
        match Glob::new(pat) {
            Ok(glob) => {
                builder.add(glob);
                added = true;
            }
            Err(err) => warn!(pattern = %pat, %err, "invalid glob, skipping"),
        }
    }
    if !added {
        None
    } else {
        builder.build().ok()
    }
}

/// Project-relative path with forward slashes.
fn relative_of(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}

/// Enumerate files matching the include/exclude rules, stat each one, and
/// load text content for source-like extensions. Output is sorted by
/// relative path so downstream phases are deterministic.
pub fn scan_project(cfg: &AnalyzerConfig, warnings: &mut Vec<String>) -> Result<Vec<ScannedFile>> {
    // Reading the root is the one fault we cannot absorb.
    fs::read_dir(&cfg.root).map_err(|source| AnalyzeError::RootUnreadable {
        root: cfg.root.clone(),
        source,
    })?;

    let include = build_globset(&cfg.include);
    let exclude = build_globset(&cfg.exclude);

    let mut files = Vec::new();
    for entry in WalkDir::new(&cfg.root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            // Never descend into VCS metadata.
            e.file_name().to_string_lossy() != ".git"
        })
    {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                let msg = format!("skipping unreadable entry: {err}");
                warn!("{msg}");
                warnings.push(msg);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = relative_of(&cfg.root, entry.path());

        // Exclusion wins over inclusion.
        if let Some(set) = &exclude {
            if set.is_match(&relative) {
                continue;
            }
        }
        if let Some(set) = &include {
            if !set.is_match(&relative) {
                continue;
            }
        }

        let size = match entry.metadata() {
            Ok(meta) => meta.len(),
            Err(err) => {
                let msg = format!("cannot stat {relative}: {err}");
                warn!("{msg}");
                warnings.push(msg);
                continue;
            }
        };

        let extension = entry
            .path()
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        let content = if TEXT_EXTENSIONS.contains(&extension.as_str()) {
            match fs::read_to_string(entry.path()) {
                Ok(text) => Some(text),
                Err(err) => {
                    let msg = format!("cannot read {relative}: {err}");
                    warn!("{msg}");
                    warnings.push(msg);
                    continue;
                }
            }
        } else {
            None
        };

        files.push(ScannedFile {
            path: entry.path().to_path_buf(),
            relative,
            size,
            is_typed: extension == "ts" || extension == "tsx",
            supports_markup: extension == "tsx" || extension == "jsx",
            extension,
            content,
        });
    }

    files.sort_by(|a, b| a.relative.cmp(&b.relative));
    Ok(files)
}

/// Whether the hosting framework invokes this file without any import.
///
/// Pure predicate over the project-relative path; consulted by the graph
/// builder for entry-point seeding and by the reachability engine to exempt
/// conventionally-invoked files from orphan status.
pub fn is_auto_invoked(relative: &str, _router: RouterMode) -> bool {
    let relative = relative.trim_start_matches("./");
    let (dir, file) = match relative.rfind('/') {
        Some(idx) => (&relative[..idx], &relative[idx + 1..]),
        None => ("", relative),
    };
    let (stem, ext) = match file.rfind('.') {
        Some(idx) => (&file[..idx], &file[idx + 1..]),
        None => (file, ""),
    };
    let is_script = SCRIPT_EXTENSIONS.contains(&ext);

    // Framework-special filenames under an app-router tree.
    if is_script && in_routed_tree(dir, "app") && APP_SPECIAL_STEMS.contains(&stem) {
        return true;
    }

    // Every script file under a flat pages-style tree is a route.
    if is_script && in_routed_tree_or_below(dir, "pages") {
        return true;
    }

    // Middleware and instrumentation at the root (or under src/).
    if is_script
        && (dir.is_empty() || dir == "src")
        && (stem == "middleware" || stem == "instrumentation")
    {
        return true;
    }

    // Recognized configuration/system files at the project root.
    if dir.is_empty() && (stem.ends_with(".config") || stem == "next-env.d") {
        return true;
    }

    false
}

/// `dir` is exactly `name` or `src/name` or a subdirectory of either.
fn in_routed_tree_or_below(dir: &str, name: &str) -> bool {
    dir == name
        || dir.starts_with(&format!("{name}/"))
        || dir == format!("src/{name}")
        || dir.starts_with(&format!("src/{name}/"))
}

fn in_routed_tree(dir: &str, name: &str) -> bool {
    in_routed_tree_or_below(dir, name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn auto_invoked_covers_app_conventions() {
        let m = RouterMode::App;
        assert!(is_auto_invoked("app/page.tsx", m));
        assert!(is_auto_invoked("app/dashboard/layout.tsx", m));
        assert!(is_auto_invoked("app/blog/[slug]/loading.tsx", m));
        assert!(is_auto_invoked("src/app/not-found.tsx", m));
        assert!(is_auto_invoked("app/api/users/route.ts", m));
        assert!(!is_auto_invoked("app/components/Button.tsx", m));
        assert!(!is_auto_invoked("components/page-header.tsx", m));
    }

    #[test]
    fn auto_invoked_covers_pages_middleware_and_config() {
        let m = RouterMode::Pages;
        assert!(is_auto_invoked("pages/index.tsx", m));
        assert!(is_auto_invoked("pages/api/users/[id].ts", m));
        assert!(is_auto_invoked("src/pages/about.jsx", m));
        assert!(is_auto_invoked("middleware.ts", m));
        assert!(is_auto_invoked("src/middleware.ts", m));
        assert!(is_auto_invoked("next.config.js", m));
        assert!(!is_auto_invoked("lib/pages-util.ts", m));
        assert!(!is_auto_invoked("pages.ts", m));
    }

    #[test]
    fn scan_skips_excluded_and_loads_script_text() {
        let tmp = tempfile::tempdir().expect("tmp dir");
        let root = tmp.path();
        fs::create_dir_all(root.join("app")).unwrap();
        fs::create_dir_all(root.join("node_modules/react")).unwrap();
        fs::write(root.join("app/page.tsx"), "export default function P() {}").unwrap();
        fs::write(root.join("node_modules/react/index.js"), "module.exports = {}").unwrap();
        fs::write(root.join("logo.png"), [0u8, 1, 2]).unwrap();

        let mut cfg = AnalyzerConfig::new(root);
        cfg.include.push("**/*.png".into());
        let mut warnings = Vec::new();
        let files = scan_project(&cfg, &mut warnings).expect("scan");

        let rels: Vec<&str> = files.iter().map(|f| f.relative.as_str()).collect();
        assert!(rels.contains(&"app/page.tsx"));
        assert!(rels.contains(&"logo.png"));
        assert!(!rels.iter().any(|r| r.contains("node_modules")));

        let page = files.iter().find(|f| f.relative == "app/page.tsx").unwrap();
        assert!(page.content.is_some());
        assert!(page.is_typed && page.supports_markup);
        let png = files.iter().find(|f| f.relative == "logo.png").unwrap();
        assert!(png.content.is_none());
        assert_eq!(png.size, 3);
    }

    #[test]
    fn missing_root_is_fatal() {
        let cfg = AnalyzerConfig::new("/definitely/not/a/real/path");
        let mut warnings = Vec::new();
        assert!(scan_project(&cfg, &mut warnings).is_err());
    }

    #[test]
    fn scan_output_is_sorted_by_relative_path() {
        let tmp = tempfile::tempdir().expect("tmp dir");
        let root = tmp.path();
        fs::create_dir_all(root.join("z")).unwrap();
        fs::create_dir_all(root.join("a")).unwrap();
        fs::write(root.join("z/one.ts"), "").unwrap();
        fs::write(root.join("a/two.ts"), "").unwrap();

        let cfg = AnalyzerConfig::new(root);
        let mut warnings = Vec::new();
        let files = scan_project(&cfg, &mut warnings).expect("scan");
        let rels: Vec<&str> = files.iter().map(|f| f.relative.as_str()).collect();
        assert_eq!(rels, vec!["a/two.ts", "z/one.ts"]);
    }
}
