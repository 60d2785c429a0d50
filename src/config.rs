use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Which routing convention the target project uses. Supplied by the
/// external project-bootstrapping collaborator; `Mixed` honors both trees.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouterMode {
    App,
    Pages,
    Mixed,
}

/// Policy constants for classification confidence. These are knobs, not
/// measured quantities; defaults carry the documented values.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct ConfidenceKnobs {
    /// Files reachable from an entry point.
    pub reachable_file: u8,
    /// Files flagged as orphans.
    pub orphan_file: u8,
    /// Base confidence for an endpoint classified active.
    pub endpoint_active_base: u8,
    /// Added per matching call site, up to `endpoint_match_cap`.
    pub endpoint_match_bonus: u8,
    pub endpoint_match_cap: u8,
    /// Base confidence for an endpoint classified unused.
    pub endpoint_unused_base: u8,
    /// Subtracted from an unused endpoint whose verbs are all reads
    /// (GET/HEAD) — those are the ones external callers hit.
    pub read_verb_penalty: u8,
}

impl Default for ConfidenceKnobs {
    fn default() -> Self {
        Self {
            reachable_file: 100,
            orphan_file: 80,
            endpoint_active_base: 60,
            endpoint_match_bonus: 15,
            endpoint_match_cap: 90,
            endpoint_unused_base: 70,
            read_verb_penalty: 20,
        }
    }
}

/// Input configuration for one analysis run.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Project root. The one path that must be readable.
    pub root: PathBuf,
    pub router: RouterMode,
    /// Include globs, matched against project-relative paths.
    pub include: Vec<String>,
    /// Exclude globs; exclusion wins over inclusion.
    pub exclude: Vec<String>,
    /// Precomputed entry-point paths (absolute or project-relative) from
    /// the bootstrapping collaborator. May be empty: that is a legitimate
    /// signal, not an error — everything becomes an orphan.
    pub entry_points: Vec<PathBuf>,
    pub confidence: ConfidenceKnobs,
    /// Width of the phase-1 parse pool.
    pub parse_workers: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            router: RouterMode::App,
            include: vec![
                "**/*.ts".into(),
                "**/*.tsx".into(),
                "**/*.js".into(),
                "**/*.jsx".into(),
                "**/*.mjs".into(),
                "**/*.cjs".into(),
                "**/*.css".into(),
                "**/*.scss".into(),
                "**/*.html".into(),
                "**/*.json".into(),
            ],
            exclude: vec![
                "**/node_modules/**".into(),
                "**/.next/**".into(),
                "**/dist/**".into(),
                "**/build/**".into(),
                "**/out/**".into(),
                "**/coverage/**".into(),
                "**/*.d.ts".into(),
            ],
            entry_points: Vec::new(),
            confidence: ConfidenceKnobs::default(),
            parse_workers: 8,
        }
    }
}

impl AnalyzerConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_carry_documented_confidence_values() {
        let knobs = ConfidenceKnobs::default();
        assert_eq!(knobs.reachable_file, 100);
        assert_eq!(knobs.orphan_file, 80);
        assert!(knobs.endpoint_active_base + knobs.endpoint_match_bonus > 70);
    }

    #[test]
    fn default_excludes_win_over_includes() {
        let cfg = AnalyzerConfig::default();
        assert!(cfg.exclude.iter().any(|p| p.contains("node_modules")));
        assert!(cfg.include.iter().any(|p| p.ends_with("*.tsx")));
    }
}
